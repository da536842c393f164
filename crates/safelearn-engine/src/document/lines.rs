use xi_rope::Rope;

use super::span::Span;

/// A single line of the document with its byte spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef {
    /// Zero-based line index.
    pub index: usize,
    /// Span of the line content, line terminator excluded.
    pub span: Span,
    /// Span of the whole line, line terminator included.
    pub full: Span,
    /// The line content without its terminator.
    pub text: String,
}

impl LineRef {
    /// The line content with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }
}

/// Returns an iterator over lines with their byte spans.
///
/// Uses `lines_raw` so the terminator length is known and offsets stay exact
/// for `\r\n` documents. A trailing newline does not yield an extra empty line.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..)
        .enumerate()
        .map(move |(index, line)| {
            let start = offset;
            offset += line.len();
            let content = line.trim_end_matches(['\r', '\n']);
            LineRef {
                index,
                span: Span::new(start, start + content.len()),
                full: Span::new(start, offset),
                text: content.to_string(),
            }
        })
        .filter(|l| !l.full.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collect(s: &str) -> Vec<LineRef> {
        lines_with_spans(&Rope::from(s)).collect()
    }

    #[test]
    fn empty_document_has_no_lines() {
        assert!(collect("").is_empty());
    }

    #[test]
    fn trailing_newline_adds_no_line() {
        let lines = collect("a\nb\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].span, Span::new(2, 3));
        assert_eq!(lines[1].full, Span::new(2, 4));
    }

    #[test]
    fn crlf_is_excluded_from_content() {
        let lines = collect("ab\r\ncd");
        assert_eq!(lines[0].text, "ab");
        assert_eq!(lines[0].span, Span::new(0, 2));
        assert_eq!(lines[0].full, Span::new(0, 4));
        assert_eq!(lines[1].span, Span::new(4, 6));
    }

    #[test]
    fn blank_lines_are_kept() {
        let lines = collect("a\n\nb");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].text, "");
        assert_eq!(lines[1].index, 1);
    }

    #[test]
    fn trimmed_strips_both_sides() {
        let lines = collect("   @@@  ");
        assert_eq!(lines[0].trimmed(), "@@@");
    }
}
