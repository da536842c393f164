use serde::Serialize;

use crate::document::{Document, LineRef, Span};

use super::{
    kinds::{Fragment, PermissionBlock, SideBySide},
    state::{BlockParseState, DanglingBlock, OpenSideBySide},
    token::{FragmentPlacement, LinePosition, Token, TokenKind},
};

/// Result of one scan pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Scan {
    /// Tokens in discovery order. Block lines are discovered when the block
    /// closes, so this is not offset order.
    pub tokens: Vec<Token>,
    /// Blocks left open at end of document; they contributed no tokens.
    pub dangling: Vec<DanglingBlock>,
}

impl Scan {
    /// Tokens stably sorted by start offset.
    pub fn tokens_by_offset(&self) -> Vec<Token> {
        let mut tokens = self.tokens.clone();
        tokens.sort_by_key(|t| t.span.start);
        tokens
    }
}

/// Scans a document snapshot.
pub fn scan(doc: &Document) -> Scan {
    scan_lines(&doc.lines())
}

/// Scans lines in order, folding a fresh [`BlockParseState`] over them.
pub fn scan_lines(lines: &[LineRef]) -> Scan {
    let mut tokens = vec![];
    let state = lines
        .iter()
        .fold(BlockParseState::default(), |state, line| {
            step(state, line, lines, &mut tokens)
        });

    let dangling = state.dangling();
    for d in &dangling {
        log::debug!(
            "dropping unterminated {:?} block opened on line {}",
            d.kind,
            d.start_line + 1
        );
    }

    Scan { tokens, dangling }
}

/// Classifies one line and returns the state for the next.
///
/// `lines` is the whole document, needed to emit every line of a block when
/// it closes. Precedence: global directive, fragment, permission block,
/// side-by-side block (with separators).
pub fn step(
    mut state: BlockParseState,
    line: &LineRef,
    lines: &[LineRef],
    out: &mut Vec<Token>,
) -> BlockParseState {
    let trimmed = line.trimmed();

    if line.index == 0 {
        if let Some(roles) = PermissionBlock::global_roles(trimmed) {
            // The directive owns line 1 exclusively.
            let at = line.text.find(PermissionBlock::MARKER).unwrap_or(0);
            out.push(Token {
                kind: TokenKind::GlobalDirective { roles },
                span: Span::new(line.span.start + at, line.span.end),
                line: line.index,
            });
            return state;
        }
    }

    push_fragments(line, trimmed, out);

    match state.permission {
        None if PermissionBlock::opens(trimmed) => {
            state.permission = Some(line.index);
            return state;
        }
        Some(start) if PermissionBlock::closes(trimmed) => {
            for (l, position) in block_lines(lines, start, line.index) {
                out.push(Token {
                    kind: TokenKind::PermissionBlockLine { position },
                    span: l.span,
                    line: l.index,
                });
            }
            state.permission = None;
        }
        _ => {}
    }

    state.side_by_side = match state.side_by_side.take() {
        None if SideBySide::is_start(trimmed) => Some(OpenSideBySide {
            start: line.index,
            separators: vec![],
        }),
        None => None,
        Some(open) if SideBySide::is_end(trimmed) => {
            close_side_by_side(&open, line.index, lines, out);
            None
        }
        Some(mut open) => {
            if SideBySide::is_separator(trimmed) {
                open.separators.push(line.index);
            }
            Some(open)
        }
    };

    state
}

fn push_fragments(line: &LineRef, trimmed: &str, out: &mut Vec<Token>) {
    if Fragment::is_whole_line(trimmed) {
        out.push(Token {
            kind: TokenKind::FragmentMarker {
                placement: FragmentPlacement::WholeLine,
            },
            span: line.span,
            line: line.index,
        });
        return;
    }

    for sp in Fragment::find_all(&line.text) {
        out.push(Token {
            kind: TokenKind::FragmentMarker {
                placement: FragmentPlacement::Inline,
            },
            span: sp.offset(line.span.start),
            line: line.index,
        });
    }
}

fn close_side_by_side(open: &OpenSideBySide, end: usize, lines: &[LineRef], out: &mut Vec<Token>) {
    for (l, position) in block_lines(lines, open.start, end) {
        out.push(Token {
            kind: TokenKind::SideBySideLine { position },
            span: l.span,
            line: l.index,
        });
        if open.separators.contains(&l.index) {
            out.push(Token {
                kind: TokenKind::Separator,
                span: l.span,
                line: l.index,
            });
        }
    }
}

fn block_lines(
    lines: &[LineRef],
    start: usize,
    end: usize,
) -> impl Iterator<Item = (&LineRef, LinePosition)> {
    lines
        .iter()
        .skip(start)
        .take(end.saturating_sub(start) + 1)
        .map(move |l| (l, LinePosition::of(l.index, start, end)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        scan(&Document::from(text))
            .tokens
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn plain_text_produces_nothing() {
        let scan = scan(&Document::from("just\nsome text\n"));
        assert!(scan.tokens.is_empty());
        assert!(scan.dangling.is_empty());
    }

    #[test]
    fn step_threads_state_explicitly() {
        let lines = Document::from("@@@ a\nx\n@@@").lines();
        let mut out = vec![];

        let s1 = step(BlockParseState::default(), &lines[1], &lines, &mut out);
        assert!(s1.is_idle());

        let opened = BlockParseState {
            permission: Some(1),
            side_by_side: None,
        };
        let s2 = step(opened, &lines[2], &lines, &mut out);
        assert!(s2.is_idle());
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn second_opener_is_ignored_while_open() {
        let k = kinds("x\n@@@ a\n@@@ b\ny\n@@@");
        assert_eq!(
            k,
            vec![
                TokenKind::PermissionBlockLine {
                    position: LinePosition::First
                },
                TokenKind::PermissionBlockLine {
                    position: LinePosition::Middle
                },
                TokenKind::PermissionBlockLine {
                    position: LinePosition::Middle
                },
                TokenKind::PermissionBlockLine {
                    position: LinePosition::Last
                },
            ]
        );
    }

    #[test]
    fn nested_side_by_side_start_is_ignored() {
        let scan = scan(&Document::from(
            "##side-by-side-start\n##side-by-side-start\n##side-by-side-end",
        ));
        assert_eq!(scan.tokens.len(), 3);
        assert!(scan.dangling.is_empty());
    }

    #[test]
    fn blocks_of_different_kinds_interleave() {
        let scan = scan(&Document::from(
            "x\n@@@ teacher\n##side-by-side-start\n@@@\n##side-by-side-end",
        ));
        let permission = scan
            .tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::PermissionBlockLine { .. }))
            .count();
        let side = scan
            .tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::SideBySideLine { .. }))
            .count();
        assert_eq!(permission, 3);
        assert_eq!(side, 3);
    }

    #[test]
    fn unterminated_side_by_side_drops_its_separators() {
        let scan = scan(&Document::from("##side-by-side-start\nA\n##separator\nB"));
        assert!(scan.tokens.is_empty());
        assert_eq!(scan.dangling.len(), 1);
        assert_eq!(scan.dangling[0].start_line, 0);
    }

    #[test]
    fn separator_outside_block_is_plain_text() {
        assert!(kinds("##separator").is_empty());
    }

    #[test]
    fn global_directive_span_starts_at_marker() {
        let doc = Document::from("  @@@ teacher  \nbody");
        let scan = scan(&doc);
        assert_eq!(scan.tokens.len(), 1);
        assert_eq!(doc.slice(scan.tokens[0].span), "@@@ teacher  ");
    }

    #[test]
    fn malformed_directive_on_line_one_opens_a_block() {
        let scan = scan(&Document::from("@@@teacher\nsecret\n@@@"));
        assert_eq!(scan.tokens.len(), 3);
        assert!(matches!(
            scan.tokens[0].kind,
            TokenKind::PermissionBlockLine {
                position: LinePosition::First
            }
        ));
    }

    #[test]
    fn tokens_by_offset_reorders_block_lines() {
        let scan = scan(&Document::from("x\n@@@ a\nText ##fragment more\n@@@"));
        assert!(matches!(scan.tokens[0].kind, TokenKind::FragmentMarker { .. }));
        let sorted = scan.tokens_by_offset();
        assert!(matches!(sorted[0].kind, TokenKind::PermissionBlockLine { .. }));
        assert!(sorted.windows(2).all(|w| w[0].span.start <= w[1].span.start));
    }
}
