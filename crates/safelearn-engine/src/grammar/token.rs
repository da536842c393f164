use serde::Serialize;

use crate::document::Span;

/// Where a line sits inside a closed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LinePosition {
    First,
    Middle,
    Last,
}

impl LinePosition {
    /// Position of line `index` within the inclusive range `start..=end`.
    pub fn of(index: usize, start: usize, end: usize) -> Self {
        if index == start {
            Self::First
        } else if index == end {
            Self::Last
        } else {
            Self::Middle
        }
    }
}

/// Whether a fragment marker shares its line with content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FragmentPlacement {
    Inline,
    WholeLine,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// Line-1 `@@@ roles` declaration.
    GlobalDirective { roles: Vec<String> },
    FragmentMarker { placement: FragmentPlacement },
    PermissionBlockLine { position: LinePosition },
    SideBySideLine { position: LinePosition },
    /// A `##separator` line inside a closed side-by-side block.
    Separator,
}

impl TokenKind {
    /// Tokens that classify a whole line rather than a piece of it.
    pub fn is_line_level(&self) -> bool {
        match self {
            TokenKind::GlobalDirective { .. } => false,
            TokenKind::FragmentMarker { placement } => *placement == FragmentPlacement::WholeLine,
            TokenKind::PermissionBlockLine { .. }
            | TokenKind::SideBySideLine { .. }
            | TokenKind::Separator => true,
        }
    }
}

/// A recognized piece of markup.
///
/// `span` covers the matched text: the marker itself for inline constructs,
/// the line content (terminator excluded) for line-level ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Zero-based line index the token was found on.
    pub line: usize,
}
