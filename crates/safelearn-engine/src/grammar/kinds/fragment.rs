use crate::document::Span;

/// Alternative-answer fragment marker.
pub struct Fragment;

impl Fragment {
    pub const MARKER: &'static str = "##fragment";

    /// A trimmed line consisting of nothing but the marker.
    pub fn is_whole_line(trimmed: &str) -> bool {
        trimmed == Self::MARKER
    }

    /// All marker occurrences in `text`, as spans local to `text`.
    ///
    /// An occurrence counts only when it is not followed by an ASCII word
    /// character or `-`, so `##fragment-x` and `##fragments` are plain text.
    /// A single trailing space belongs to the match.
    pub fn find_all(text: &str) -> Vec<Span> {
        let bytes = text.as_bytes();
        let mut out = vec![];
        let mut from = 0;

        while let Some(rel) = text[from..].find(Self::MARKER) {
            let start = from + rel;
            let mut end = start + Self::MARKER.len();
            from = end;

            match bytes.get(end) {
                Some(b) if b.is_ascii_alphanumeric() || *b == b'_' || *b == b'-' => continue,
                Some(b' ') => end += 1,
                _ => {}
            }
            out.push(Span::new(start, end));
        }
        out
    }
}
