use thiserror::Error;

/// Handle to a node in a [`Dom`] arena.
///
/// Slots are reused after [`Dom::remove`]; the stamp tells a handle to a
/// removed node apart from the node that took its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    stamp: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),

    #[error("node {0:?} is not a text node")]
    NotText(NodeId),

    #[error("node {0:?} has no parent")]
    Orphan(NodeId),

    #[error("inserting {child:?} under {parent:?} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element { tag: String, classes: Vec<String> },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    stamp: u32,
    node: Option<Node>,
}

/// A rendered preview tree: elements with class lists, and text nodes.
///
/// Nodes live in an arena. Detaching a node only removes it from its parent;
/// [`Dom::remove`] frees the whole subtree for reuse. Every mutation bumps
/// [`Dom::generation`], which lets observers tell their own writes apart from
/// someone else's.
#[derive(Debug, Clone, Default)]
pub struct Dom {
    slots: Vec<Slot>,
    free: Vec<usize>,
    generation: u64,
}

const VOID_TAGS: [&str; 3] = ["br", "hr", "img"];

/// Elements that never have content.
pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutation counter.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of live nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::Element {
            tag: tag.to_string(),
            classes: vec![],
        })
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::Text(text.to_string()))
    }

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.node(id).map(|n| &n.data)
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.data(id), Some(NodeData::Text(_)))
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.data(id)? {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// True if `id` is `root` or sits somewhere below it.
    pub fn is_within(&self, id: NodeId, root: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if n == root {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    /// Concatenated text of the node and all its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.data(id) {
            Some(NodeData::Text(t)) => out.push_str(t),
            Some(NodeData::Element { .. }) => {
                for &c in self.children(id) {
                    self.collect_text(c, out);
                }
            }
            None => {}
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        match self.data(id) {
            Some(NodeData::Element { classes, .. }) => classes.iter().any(|c| c == class),
            _ => false,
        }
    }

    /// Adds `class` to an element. Returns false if it was already present.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<bool, DomError> {
        let node = self.node_mut(id).ok_or(DomError::UnknownNode(id))?;
        let NodeData::Element { classes, .. } = &mut node.data else {
            return Err(DomError::NotAnElement(id));
        };
        if classes.iter().any(|c| c == class) {
            return Ok(false);
        }
        classes.push(class.to_string());
        self.generation += 1;
        Ok(true)
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        let node = self.node_mut(id).ok_or(DomError::UnknownNode(id))?;
        let NodeData::Text(t) = &mut node.data else {
            return Err(DomError::NotText(id));
        };
        *t = text.to_string();
        self.generation += 1;
        Ok(())
    }

    /// Appends `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_insert(parent, child)?;
        self.unlink(child);
        self.node_mut(parent)
            .ok_or(DomError::UnknownNode(parent))?
            .children
            .push(child);
        self.node_mut(child).ok_or(DomError::UnknownNode(child))?.parent = Some(parent);
        self.generation += 1;
        Ok(())
    }

    /// Inserts `node` directly after `reference` under the same parent.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> Result<(), DomError> {
        let parent = self
            .parent(reference)
            .ok_or(DomError::Orphan(reference))?;
        self.check_insert(parent, node)?;
        self.unlink(node);
        let siblings = &mut self
            .node_mut(parent)
            .ok_or(DomError::UnknownNode(parent))?
            .children;
        let at = siblings
            .iter()
            .position(|&c| c == reference)
            .map_or(siblings.len(), |i| i + 1);
        siblings.insert(at, node);
        self.node_mut(node).ok_or(DomError::UnknownNode(node))?.parent = Some(parent);
        self.generation += 1;
        Ok(())
    }

    /// Removes a node from its parent. The node and its subtree stay usable.
    pub fn detach(&mut self, id: NodeId) -> Result<(), DomError> {
        if !self.contains(id) {
            return Err(DomError::UnknownNode(id));
        }
        if self.unlink(id) {
            self.generation += 1;
        }
        Ok(())
    }

    /// Detaches `id` and frees it with its whole subtree. Handles to the
    /// removed nodes stop resolving. Returns how many nodes were freed.
    pub fn remove(&mut self, id: NodeId) -> Result<usize, DomError> {
        if !self.contains(id) {
            return Err(DomError::UnknownNode(id));
        }
        self.unlink(id);

        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let slot = &mut self.slots[next.index];
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                slot.stamp = slot.stamp.wrapping_add(1);
                self.free.push(next.index);
                freed += 1;
            }
        }
        self.generation += 1;
        Ok(freed)
    }

    /// Deterministic HTML serialization of a subtree.
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        match self.data(id) {
            Some(NodeData::Text(t)) => out.push_str(&html_escape::encode_text(t)),
            Some(NodeData::Element { tag, classes }) => {
                out.push('<');
                out.push_str(tag);
                if !classes.is_empty() {
                    out.push_str(" class=\"");
                    out.push_str(&html_escape::encode_double_quoted_attribute(
                        &classes.join(" "),
                    ));
                    out.push('"');
                }
                out.push('>');
                if is_void_tag(tag) {
                    return;
                }
                for &c in self.children(id) {
                    self.write_html(c, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            None => {}
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|s| s.stamp == id.stamp)
            .and_then(|s| s.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|s| s.stamp == id.stamp)
            .and_then(|s| s.node.as_mut())
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let node = Node {
            data,
            parent: None,
            children: vec![],
        };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId {
                    index,
                    stamp: slot.stamp,
                }
            }
            None => {
                self.slots.push(Slot {
                    stamp: 0,
                    node: Some(node),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    stamp: 0,
                }
            }
        }
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.contains(parent) {
            return Err(DomError::UnknownNode(parent));
        }
        if !self.contains(child) {
            return Err(DomError::UnknownNode(child));
        }
        if self.is_text(parent) {
            return Err(DomError::NotAnElement(parent));
        }
        if self.is_within(parent, child) {
            return Err(DomError::Cycle { parent, child });
        }
        Ok(())
    }

    fn unlink(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.node_mut(id).and_then(|n| n.parent.take()) else {
            return false;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != id);
        }
        true
    }
}
