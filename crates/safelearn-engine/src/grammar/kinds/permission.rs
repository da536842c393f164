use std::sync::OnceLock;

use regex::Regex;

use crate::document::Span;

/// Permission blocks and the global directive share the `@@@` delimiter.
pub struct PermissionBlock;

impl PermissionBlock {
    pub const MARKER: &'static str = "@@@";

    /// A trimmed line that opens a block: starts with `@@@` and is not exactly `@@@`.
    pub fn opens(trimmed: &str) -> bool {
        trimmed.starts_with(Self::MARKER) && trimmed != Self::MARKER
    }

    /// A trimmed line that closes an open block.
    pub fn closes(trimmed: &str) -> bool {
        trimmed == Self::MARKER
    }

    /// Parses a global directive (`@@@ role, role`) from a trimmed line.
    ///
    /// Returns the role list, or `None` if the text is not a well-formed
    /// directive. Roles are separated by runs of spaces, tabs and commas; a
    /// line break ends the directive, so merged rendered text never matches.
    pub fn global_roles(trimmed: &str) -> Option<Vec<String>> {
        static DIRECTIVE: OnceLock<Regex> = OnceLock::new();
        let directive = DIRECTIVE.get_or_init(|| {
            Regex::new(r"^@@@[ \t]+([^\s,]+(?:[ \t,]+[^\s,]+)*)$").expect("Invalid directive regex")
        });

        let caps = directive.captures(trimmed)?;
        let roles = caps
            .get(1)?
            .as_str()
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect();
        Some(roles)
    }

    /// Inline `@@@` occurrences in rendered text, each with its optional role list.
    ///
    /// Spans are local to `text`.
    pub fn find_inline(text: &str) -> Vec<Span> {
        static INLINE: OnceLock<Regex> = OnceLock::new();
        let inline = INLINE.get_or_init(|| {
            Regex::new(r"@@@(?: +[^\s,]+(?:[ ,]+[^\s,]+)*)?").expect("Invalid inline directive regex")
        });

        inline
            .find_iter(text)
            .map(|m| Span::new(m.start(), m.end()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("@@@ teacher", Some(vec!["teacher"]))]
    #[case("@@@ teacher, student", Some(vec!["teacher", "student"]))]
    #[case("@@@   a,b c", Some(vec!["a", "b", "c"]))]
    #[case("@@@\tteacher", Some(vec!["teacher"]))]
    #[case("@@@", None)]
    #[case("@@@teacher", None)]
    #[case("@@@ teacher,", None)]
    #[case("@@@ , teacher", None)]
    #[case("text @@@ teacher", None)]
    #[case("@@@ teacher\nsecret", None)]
    fn global_roles_cases(#[case] line: &str, #[case] expected: Option<Vec<&str>>) {
        let expected = expected.map(|v| v.into_iter().map(String::from).collect::<Vec<_>>());
        assert_eq!(PermissionBlock::global_roles(line), expected);
    }

    #[rstest]
    #[case("@@@ teacher", true)]
    #[case("@@@teacher", true)]
    #[case("@@@", false)]
    #[case("text", false)]
    fn opens_cases(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(PermissionBlock::opens(line), expected);
    }

    #[test]
    fn inline_includes_role_list() {
        let text = "see @@@ teacher, student";
        assert_eq!(PermissionBlock::find_inline(text), vec![Span::new(4, 24)]);
    }

    #[test]
    fn inline_bare_marker() {
        assert_eq!(PermissionBlock::find_inline("a @@@"), vec![Span::new(2, 5)]);
    }
}
