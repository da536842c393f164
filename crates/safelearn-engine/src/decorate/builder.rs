use crate::grammar::{FragmentPlacement, LinePosition, Token, TokenKind};

use super::{Action, ClassNames, Decoration, RenderMode};

/// Builds the decoration list for `tokens` in the given mode.
///
/// The result is stably sorted by `from`; ties keep token discovery order.
/// Nothing is merged or deduplicated, so callers must not feed tokens that
/// produce overlapping ranges of incompatible kinds.
pub fn build(tokens: &[Token], mode: RenderMode, classes: &ClassNames) -> Vec<Decoration> {
    let mut out = match mode {
        RenderMode::Edit => edit_decorations(tokens, classes),
        RenderMode::Preview => preview_decorations(tokens),
    };
    out.sort_by_key(|d| d.from);

    if mode == RenderMode::Preview {
        report_overlaps(&out);
    }
    out
}

fn edit_decorations(tokens: &[Token], classes: &ClassNames) -> Vec<Decoration> {
    let mut out: Vec<Decoration> = Vec::with_capacity(tokens.len());
    // Line and output index of the latest side-by-side line mark.
    let mut last_side: Option<(usize, usize)> = None;

    for t in tokens {
        match &t.kind {
            TokenKind::GlobalDirective { .. } => {
                out.push(Decoration::mark(t.span, &classes.global_directive));
            }
            TokenKind::FragmentMarker { placement } => match placement {
                FragmentPlacement::Inline => {
                    out.push(Decoration::mark(t.span, &classes.fragment_highlight));
                }
                FragmentPlacement::WholeLine => {
                    out.push(Decoration::mark(t.span.collapsed(), &classes.fragment_line));
                }
            },
            TokenKind::PermissionBlockLine { position } => {
                let class = match position {
                    LinePosition::First => {
                        format!("{} {}", classes.permission_block, classes.permission_block_start)
                    }
                    LinePosition::Middle => classes.permission_block.clone(),
                    LinePosition::Last => {
                        format!("{} {}", classes.permission_block, classes.permission_block_end)
                    }
                };
                out.push(Decoration::mark(t.span.collapsed(), class));
            }
            TokenKind::SideBySideLine { position } => {
                let class = match position {
                    LinePosition::First => &classes.side_by_side_start,
                    LinePosition::Middle => &classes.side_by_side_block,
                    LinePosition::Last => &classes.side_by_side_end,
                };
                out.push(Decoration::mark(t.span.collapsed(), class));
                last_side = Some((t.line, out.len() - 1));
            }
            TokenKind::Separator => {
                // A separator line is still a column line: one mark, two classes.
                match last_side {
                    Some((line, idx)) if line == t.line => {
                        if let Action::Mark { class } = &mut out[idx].action {
                            class.push(' ');
                            class.push_str(&classes.side_by_side_separator);
                        }
                    }
                    _ => out.push(Decoration::mark(
                        t.span.collapsed(),
                        &classes.side_by_side_separator,
                    )),
                }
            }
        }
    }
    out
}

fn preview_decorations(tokens: &[Token]) -> Vec<Decoration> {
    tokens
        .iter()
        .filter(|t| match &t.kind {
            TokenKind::PermissionBlockLine { position } | TokenKind::SideBySideLine { position } => {
                *position != LinePosition::Middle
            }
            TokenKind::GlobalDirective { .. }
            | TokenKind::FragmentMarker { .. }
            | TokenKind::Separator => true,
        })
        .map(|t| Decoration::replace(t.span))
        .collect()
}

fn report_overlaps(sorted: &[Decoration]) {
    let mut reach: Option<&Decoration> = None;
    for d in sorted {
        if let Some(prev) = reach {
            if prev.span().overlaps(d.span()) {
                log::debug!(
                    "overlapping replace decorations {}..{} and {}..{}",
                    prev.from,
                    prev.to,
                    d.from,
                    d.to
                );
            }
        }
        if reach.is_none_or(|prev| d.to > prev.to) {
            reach = Some(d);
        }
    }
}
