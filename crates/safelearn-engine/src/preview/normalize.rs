use crate::decorate::ClassNames;
use crate::grammar::{find_inline_markers, is_marker_text};

use super::dom::{Dom, DomError, NodeData, NodeId};

/// What a normalization pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Elements whose whole text was markup and got the hidden class.
    pub hidden_elements: usize,
    /// Inline markers wrapped in a new hidden `span`.
    pub wrapped_markers: usize,
}

impl NormalizeReport {
    pub fn is_noop(&self) -> bool {
        self.hidden_elements == 0 && self.wrapped_markers == 0
    }
}

/// Suppresses markup inside `container`.
///
/// Elements below the container whose trimmed text is nothing but markup get
/// the hidden class and are not descended into. Markup mixed with other text
/// is cut out of its text node into a hidden `span`. Only direct text children
/// are rewritten; element structure is never regenerated.
///
/// Hidden elements are terminal, so running this twice changes nothing the
/// second time.
pub fn normalize(
    dom: &mut Dom,
    container: NodeId,
    classes: &ClassNames,
) -> Result<NormalizeReport, DomError> {
    if !dom.contains(container) {
        return Err(DomError::UnknownNode(container));
    }
    let mut report = NormalizeReport::default();
    visit(dom, container, true, classes, &mut report)?;
    Ok(report)
}

fn visit(
    dom: &mut Dom,
    el: NodeId,
    is_root: bool,
    classes: &ClassNames,
    report: &mut NormalizeReport,
) -> Result<(), DomError> {
    if dom.has_class(el, &classes.hidden) {
        return Ok(());
    }

    if !is_root {
        let text = dom.text_content(el);
        let trimmed = text.trim();
        if !trimmed.is_empty() && is_marker_text(trimmed) {
            dom.add_class(el, &classes.hidden)?;
            report.hidden_elements += 1;
            return Ok(());
        }
    }

    // Snapshot: spans created while splitting are not visited.
    for child in dom.children(el).to_vec() {
        match dom.data(child) {
            Some(NodeData::Text(_)) => split_text(dom, child, classes, report)?,
            Some(NodeData::Element { .. }) => visit(dom, child, false, classes, report)?,
            None => {}
        }
    }
    Ok(())
}

/// Cuts every inline marker out of a text node:
/// `before`, `<span class=hidden>marker</span>`, `after`, ...
fn split_text(
    dom: &mut Dom,
    node: NodeId,
    classes: &ClassNames,
    report: &mut NormalizeReport,
) -> Result<(), DomError> {
    let text = match dom.data(node) {
        Some(NodeData::Text(t)) if !t.trim().is_empty() => t.clone(),
        _ => return Ok(()),
    };
    let markers = find_inline_markers(&text);
    let Some(first) = markers.first() else {
        return Ok(());
    };

    let mut anchor = node;
    for (i, m) in markers.iter().enumerate() {
        let span = dom.create_element("span");
        dom.add_class(span, &classes.hidden)?;
        let inner = dom.create_text(&text[m.start..m.end]);
        dom.append_child(span, inner)?;
        dom.insert_after(anchor, span)?;
        anchor = span;
        report.wrapped_markers += 1;

        let rest_end = markers.get(i + 1).map_or(text.len(), |next| next.start);
        if rest_end > m.end {
            let rest = dom.create_text(&text[m.end..rest_end]);
            dom.insert_after(anchor, rest)?;
            anchor = rest;
        }
    }

    if first.start == 0 {
        dom.remove(node)?;
    } else {
        dom.set_text(node, &text[..first.start])?;
    }
    Ok(())
}
