use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};

use super::dom::{Dom, NodeData, NodeId, is_void_tag};

/// Renders markdown into a fresh tree. Returns the tree and its `div` container.
pub fn render_markdown(text: &str) -> (Dom, NodeId) {
    let mut dom = Dom::new();
    let container = render_into(&mut dom, text);
    (dom, container)
}

/// Renders markdown into a new detached `div` inside an existing tree.
///
/// Adjacent text is coalesced into one text node, the way a browser parses
/// rendered HTML, so line boundaries of a paragraph are not preserved.
pub fn render_into(dom: &mut Dom, text: &str) -> NodeId {
    let container = dom.create_element("div");
    let mut stack = vec![container];

    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    for event in Parser::new_ext(text, options) {
        let current = *stack.last().unwrap_or(&container);
        // Image alt text arrives as content; void elements keep none of it.
        let in_void = dom.tag(current).is_some_and(is_void_tag);
        match event {
            Event::Start(_) if in_void => stack.push(current),
            Event::Start(tag) => {
                let el = dom.create_element(tag_name(&tag));
                append(dom, current, el);
                if matches!(tag, Tag::CodeBlock(_)) {
                    let code = dom.create_element("code");
                    append(dom, el, code);
                    stack.push(el);
                    stack.push(code);
                } else {
                    stack.push(el);
                }
            }
            Event::End(end) => {
                stack.pop();
                if matches!(end, pulldown_cmark::TagEnd::CodeBlock) {
                    stack.pop();
                }
                if stack.is_empty() {
                    stack.push(container);
                }
            }
            _ if in_void => {}
            Event::Text(t) | Event::Html(t) | Event::InlineHtml(t) => push_text(dom, current, &t),
            Event::Code(t) => {
                let code = dom.create_element("code");
                append(dom, current, code);
                push_text(dom, code, &t);
            }
            Event::SoftBreak => push_text(dom, current, "\n"),
            Event::HardBreak => {
                let br = dom.create_element("br");
                append(dom, current, br);
            }
            Event::Rule => {
                let hr = dom.create_element("hr");
                append(dom, current, hr);
            }
            _ => {}
        }
    }
    container
}

fn tag_name(tag: &Tag<'_>) -> &'static str {
    match tag {
        Tag::Paragraph => "p",
        Tag::Heading { level, .. } => match level {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
            HeadingLevel::H4 => "h4",
            HeadingLevel::H5 => "h5",
            HeadingLevel::H6 => "h6",
        },
        Tag::BlockQuote(_) => "blockquote",
        Tag::CodeBlock(_) => "pre",
        Tag::List(Some(_)) => "ol",
        Tag::List(None) => "ul",
        Tag::Item => "li",
        Tag::Emphasis => "em",
        Tag::Strong => "strong",
        Tag::Strikethrough => "del",
        Tag::Link { .. } => "a",
        Tag::Image { .. } => "img",
        Tag::Table(_) => "table",
        Tag::TableHead => "thead",
        Tag::TableRow => "tr",
        Tag::TableCell => "td",
        _ => "div",
    }
}

fn append(dom: &mut Dom, parent: NodeId, child: NodeId) {
    // Both nodes were just created in this tree, so this cannot fail.
    if let Err(e) = dom.append_child(parent, child) {
        log::warn!("preview render: {e}");
    }
}

fn push_text(dom: &mut Dom, parent: NodeId, text: &str) {
    if let Some(&last) = dom.children(parent).last() {
        if let Some(NodeData::Text(prev)) = dom.data(last) {
            let merged = format!("{prev}{text}");
            if dom.set_text(last, &merged).is_ok() {
                return;
            }
        }
    }
    let node = dom.create_text(text);
    append(dom, parent, node);
}
