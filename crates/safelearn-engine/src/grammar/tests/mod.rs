//! Document-level scanner tests.
//!
//! Each case renders the scan as one readable line per token, so the
//! expected output doubles as a description of the grammar.

use pretty_assertions::assert_eq;

use crate::document::Document;
use crate::grammar::{FragmentPlacement, LinePosition, TokenKind, scan};

fn describe(text: &str) -> Vec<String> {
    let doc = Document::from(text);
    scan(&doc)
        .tokens_by_offset()
        .into_iter()
        .map(|t| {
            let kind = match &t.kind {
                TokenKind::GlobalDirective { roles } => format!("GlobalDirective[{}]", roles.join(",")),
                TokenKind::FragmentMarker { placement } => match placement {
                    FragmentPlacement::Inline => "Fragment".to_string(),
                    FragmentPlacement::WholeLine => "FragmentLine".to_string(),
                },
                TokenKind::PermissionBlockLine { position } => format!("Permission({})", pos(*position)),
                TokenKind::SideBySideLine { position } => format!("SideBySide({})", pos(*position)),
                TokenKind::Separator => "Separator".to_string(),
            };
            format!("L{} {kind} {:?}", t.line + 1, doc.slice(t.span))
        })
        .collect()
}

fn pos(p: LinePosition) -> &'static str {
    match p {
        LinePosition::First => "first",
        LinePosition::Middle => "middle",
        LinePosition::Last => "last",
    }
}

#[test]
fn lone_fragment_is_a_whole_line_marker() {
    assert_eq!(describe("intro\n##fragment\nanswer"), vec![
        "L2 FragmentLine \"##fragment\""
    ]);
}

#[test]
fn inline_fragment_includes_trailing_space() {
    assert_eq!(describe("Text ##fragment more"), vec![
        "L1 Fragment \"##fragment \""
    ]);
}

#[test]
fn permission_block_after_line_one() {
    assert_eq!(describe("intro\n@@@ teacher, student\nsecret\n@@@"), vec![
        "L2 Permission(first) \"@@@ teacher, student\"",
        "L3 Permission(middle) \"secret\"",
        "L4 Permission(last) \"@@@\"",
    ]);
}

#[test]
fn global_directive_wins_on_line_one() {
    assert_eq!(describe("@@@ teacher, student\nsecret\n@@@"), vec![
        "L1 GlobalDirective[teacher,student] \"@@@ teacher, student\""
    ]);
}

#[test]
fn side_by_side_with_separator() {
    assert_eq!(
        describe("##side-by-side-start\nA\n##separator\nB\n##side-by-side-end"),
        vec![
            "L1 SideBySide(first) \"##side-by-side-start\"",
            "L2 SideBySide(middle) \"A\"",
            "L3 SideBySide(middle) \"##separator\"",
            "L3 Separator \"##separator\"",
            "L4 SideBySide(middle) \"B\"",
            "L5 SideBySide(last) \"##side-by-side-end\"",
        ]
    );
}

#[test]
fn unterminated_permission_block_emits_nothing() {
    let scan = scan(&Document::from("x\n@@@ role\nbody"));
    assert!(scan.tokens.is_empty());
    assert_eq!(scan.dangling.len(), 1);
}

#[test]
fn lone_directive_on_line_one_is_not_a_block() {
    let scan = scan(&Document::from("@@@ role"));
    assert!(scan.dangling.is_empty());
    assert_eq!(describe("@@@ role"), vec!["L1 GlobalDirective[role] \"@@@ role\""]);
}

#[test]
fn fragment_inside_permission_block() {
    assert_eq!(describe("x\n@@@ teacher\n##fragment \n@@@"), vec![
        "L2 Permission(first) \"@@@ teacher\"",
        "L3 FragmentLine \"##fragment \"",
        "L3 Permission(middle) \"##fragment \"",
        "L4 Permission(last) \"@@@\"",
    ]);
}

#[test]
fn indented_markers_are_recognized() {
    assert_eq!(describe("x\n  ##side-by-side-start\n  ##side-by-side-end"), vec![
        "L2 SideBySide(first) \"  ##side-by-side-start\"",
        "L3 SideBySide(last) \"  ##side-by-side-end\"",
    ]);
}

#[test]
fn crlf_documents_keep_exact_offsets() {
    assert_eq!(describe("x\r\n@@@ a\r\nbody\r\n@@@\r\n"), vec![
        "L2 Permission(first) \"@@@ a\"",
        "L3 Permission(middle) \"body\"",
        "L4 Permission(last) \"@@@\"",
    ]);
}

#[test]
fn mixed_case_side_by_side_is_plain_text() {
    assert!(describe("##Side-By-Side-Start\nA\n##Side-By-Side-End").is_empty());
}
