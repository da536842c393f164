/// Side-by-side comparison columns.
///
/// Markers are matched case-sensitively against whole trimmed lines.
pub struct SideBySide;

impl SideBySide {
    pub const START: &'static str = "##side-by-side-start";
    pub const END: &'static str = "##side-by-side-end";
    pub const SEPARATOR: &'static str = "##separator";

    pub fn is_start(trimmed: &str) -> bool {
        trimmed == Self::START
    }

    pub fn is_end(trimmed: &str) -> bool {
        trimmed == Self::END
    }

    pub fn is_separator(trimmed: &str) -> bool {
        trimmed == Self::SEPARATOR
    }

    /// Every delimiter, for matching inside rendered text.
    pub fn markers() -> [&'static str; 3] {
        [Self::START, Self::END, Self::SEPARATOR]
    }
}
