use crate::document::Span;

use super::kinds::{Fragment, PermissionBlock, SideBySide};

/// True when a whole trimmed text is nothing but markup.
///
/// Used on rendered elements, where source line boundaries may be gone:
/// a bare `@@@`, a global directive, a side-by-side delimiter, a separator or
/// a lone fragment marker.
pub fn is_marker_text(trimmed: &str) -> bool {
    PermissionBlock::closes(trimmed)
        || PermissionBlock::global_roles(trimmed).is_some()
        || SideBySide::markers().contains(&trimmed)
        || Fragment::is_whole_line(trimmed)
}

/// Inline markup occurrences inside a piece of rendered text.
///
/// Spans are local to `text`, sorted and non-overlapping. When two
/// candidates overlap the earlier (then longer) one wins.
pub fn find_inline_markers(text: &str) -> Vec<Span> {
    let mut found = PermissionBlock::find_inline(text);
    found.extend(Fragment::find_all(text));
    for marker in SideBySide::markers() {
        found.extend(
            text.match_indices(marker)
                .map(|(i, m)| Span::new(i, i + m.len())),
        );
    }

    found.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut out: Vec<Span> = Vec::with_capacity(found.len());
    for sp in found {
        match out.last() {
            Some(prev) if prev.overlaps(sp) => {}
            _ => out.push(sp),
        }
    }
    out
}
