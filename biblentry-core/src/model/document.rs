use std::collections::HashMap;

use crate::error::MarkupError;
use crate::surface::Surface;

use super::markup::{parse_fragment, write_fragment, Markup};
use super::{Affinity, Selection, TextRange};

/// Elements that structure a document rather than mark up text inside it
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "body", "blockquote", "li", "ul", "ol", "td", "h1", "h2", "h3", "h4", "h5", "h6",
];

const ROOT: NodeId = NodeId(0);

/// Index of a node in a [`MarkupDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Root,
    Element { tag: String, classes: Vec<String> },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// In-memory rich text: a tree of elements and text with a live selection.
///
/// Nodes live in an arena and refer to each other by [`NodeId`]. Removed
/// nodes are only unlinked, so ids handed out earlier never point at a
/// different node; a discarded subtree gives up its text and child lists.
/// Offsets everywhere are `char` offsets into the visible text.
#[derive(Debug, Clone)]
pub struct MarkupDocument {
    nodes: Vec<NodeData>,
    selection: Selection,
}

impl MarkupDocument {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            }],
            selection: Selection::caret(0),
        }
    }

    pub fn from_markup(nodes: Vec<Markup>) -> Self {
        let mut doc = Self::new();
        for (index, node) in nodes.into_iter().enumerate() {
            doc.attach(node, ROOT, index);
        }
        doc.normalize();
        doc
    }

    /// Parse an XHTML fragment such as a stored styled reference
    pub fn parse(fragment: &str) -> Result<Self, MarkupError> {
        Ok(Self::from_markup(parse_fragment(fragment)?))
    }

    /// Detached copy of the document's top-level nodes
    pub fn to_markup_nodes(&self) -> Vec<Markup> {
        self.nodes[ROOT.0]
            .children
            .iter()
            .map(|&child| self.detach_copy(child))
            .collect()
    }

    /// Serialize back to an XHTML fragment
    pub fn to_markup(&self) -> Result<String, MarkupError> {
        write_fragment(&self.to_markup_nodes())
    }

    fn detach_copy(&self, node: NodeId) -> Markup {
        let data = &self.nodes[node.0];
        match &data.kind {
            NodeKind::Text(text) => Markup::Text(text.clone()),
            NodeKind::Element { tag, classes } => Markup::Element {
                tag: tag.clone(),
                classes: classes.clone(),
                children: data.children.iter().map(|&c| self.detach_copy(c)).collect(),
            },
            NodeKind::Root => Markup::Element {
                tag: String::new(),
                classes: Vec::new(),
                children: data.children.iter().map(|&c| self.detach_copy(c)).collect(),
            },
        }
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Build `markup` as a subtree and link it under `parent` at `index`
    fn attach(&mut self, markup: Markup, parent: NodeId, index: usize) -> NodeId {
        let (kind, children) = match markup {
            Markup::Text(text) => (NodeKind::Text(text), Vec::new()),
            Markup::Element {
                tag,
                classes,
                children,
            } => (NodeKind::Element { tag, classes }, children),
        };
        let id = self.alloc(kind);
        self.insert_child(parent, index, id);
        for (i, child) in children.into_iter().enumerate() {
            self.attach(child, id, i);
        }
        id
    }

    fn unlink(&mut self, node: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.nodes[node.0].parent.take()?;
        let children = &mut self.nodes[parent.0].children;
        let index = children.iter().position(|&c| c == node)?;
        children.remove(index);
        Some((parent, index))
    }

    fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        while let Some(parent) = self.nodes[current.0].parent {
            current = parent;
        }
        current == ROOT
    }

    fn index_in_parent(&self, node: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.nodes[node.0].parent?;
        let index = self.nodes[parent.0].children.iter().position(|&c| c == node)?;
        Some((parent, index))
    }

    /// All attached nodes below `node` in document order
    fn preorder(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[node.0].children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.nodes[current.0].children.iter().rev().copied());
        }
        out
    }

    /// Drop the payload of a subtree that will never be reattached
    fn release(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let data = &mut self.nodes[current.0];
            stack.append(&mut data.children);
            if let NodeKind::Text(text) = &mut data.kind {
                *text = String::new();
            }
        }
    }

    /// Text range covered by every attached node
    fn extents(&self) -> HashMap<NodeId, TextRange> {
        let mut out = HashMap::new();
        let mut offset = 0;
        self.measure(ROOT, &mut offset, &mut out);
        out
    }

    fn measure(&self, node: NodeId, offset: &mut usize, out: &mut HashMap<NodeId, TextRange>) {
        let start = *offset;
        let data = &self.nodes[node.0];
        match &data.kind {
            NodeKind::Text(text) => *offset += text.chars().count(),
            _ => {
                for &child in &data.children {
                    self.measure(child, offset, out);
                }
            }
        }
        out.insert(node, TextRange::new(start, *offset));
    }

    /// Non-empty text nodes with their ranges, in document order
    fn text_nodes(&self) -> Vec<(NodeId, TextRange)> {
        let extents = self.extents();
        self.preorder(ROOT)
            .into_iter()
            .filter(|&n| matches!(self.nodes[n.0].kind, NodeKind::Text(_)))
            .filter_map(|n| extents.get(&n).map(|&r| (n, r)))
            .filter(|(_, r)| !r.is_collapsed())
            .collect()
    }

    /// Text node holding `offset`, resolved by `affinity` when it sits on a boundary
    fn text_node_at(&self, offset: usize, affinity: Affinity) -> Option<NodeId> {
        let nodes = self.text_nodes();
        let downstream = || {
            nodes
                .iter()
                .find(|(_, r)| r.start_offset <= offset && offset < r.end_offset)
        };
        let upstream = || {
            nodes
                .iter()
                .find(|(_, r)| r.start_offset < offset && offset <= r.end_offset)
        };
        let found = match affinity {
            Affinity::Downstream => downstream().or_else(upstream),
            Affinity::Upstream => upstream().or_else(downstream),
        };
        found
            .or_else(|| if offset == 0 { nodes.first() } else { nodes.last() })
            .map(|(n, _)| *n)
    }

    /// Make `offset` fall between two text nodes rather than inside one
    fn split_text(&mut self, offset: usize) {
        let Some((node, range)) = self
            .text_nodes()
            .into_iter()
            .find(|(_, r)| r.start_offset < offset && offset < r.end_offset)
        else {
            return;
        };
        let local = offset - range.start_offset;
        let right = match &mut self.nodes[node.0].kind {
            NodeKind::Text(text) => {
                let Some((byte, _)) = text.char_indices().nth(local) else {
                    return;
                };
                text.split_off(byte)
            }
            _ => return,
        };
        if let Some((parent, index)) = self.index_in_parent(node) {
            let id = self.alloc(NodeKind::Text(right));
            self.insert_child(parent, index + 1, id);
        }
    }

    /// Where a caret at `offset` would insert new content
    fn insertion_point(&mut self, offset: usize) -> (NodeId, usize) {
        self.split_text(offset);
        let nodes = self.text_nodes();
        let before = nodes.iter().find(|(_, r)| r.end_offset == offset);
        let after = nodes.iter().find(|(_, r)| r.start_offset == offset);
        match (before, after) {
            (Some((node, _)), _) => self
                .index_in_parent(*node)
                .map(|(p, i)| (p, i + 1))
                .unwrap_or((ROOT, 0)),
            (None, Some((node, _))) => self.index_in_parent(*node).unwrap_or((ROOT, 0)),
            (None, None) => (ROOT, self.nodes[ROOT.0].children.len()),
        }
    }

    fn common_ancestor(&self, a: NodeId, b: NodeId) -> NodeId {
        let mut chain = vec![a];
        let mut current = a;
        while let Some(parent) = self.nodes[current.0].parent {
            chain.push(parent);
            current = parent;
        }
        let mut current = b;
        loop {
            if chain.contains(&current) {
                return current;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return ROOT,
            }
        }
    }

    /// Drop empty text nodes and merge adjacent text siblings
    fn normalize(&mut self) {
        let mut parents = vec![ROOT];
        parents.extend(self.preorder(ROOT));
        for parent in parents {
            let children = std::mem::take(&mut self.nodes[parent.0].children);
            let mut kept: Vec<NodeId> = Vec::with_capacity(children.len());
            for child in children {
                let text = match &mut self.nodes[child.0].kind {
                    NodeKind::Text(text) => Some(std::mem::take(text)),
                    _ => None,
                };
                match (text, kept.last().copied()) {
                    (Some(text), _) if text.is_empty() => self.nodes[child.0].parent = None,
                    (Some(text), Some(prev)) => {
                        if let NodeKind::Text(prev_text) = &mut self.nodes[prev.0].kind {
                            prev_text.push_str(&text);
                            self.nodes[child.0].parent = None;
                        } else {
                            self.nodes[child.0].kind = NodeKind::Text(text);
                            kept.push(child);
                        }
                    }
                    (Some(text), None) => {
                        self.nodes[child.0].kind = NodeKind::Text(text);
                        kept.push(child);
                    }
                    (None, _) => kept.push(child),
                }
            }
            self.nodes[parent.0].children = kept;
        }
    }
}

impl Default for MarkupDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for MarkupDocument {
    type Node = NodeId;

    fn text(&self) -> String {
        self.preorder(ROOT)
            .into_iter()
            .filter_map(|n| match &self.nodes[n.0].kind {
                NodeKind::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamped(self.text_len());
    }

    fn set_range_content(&mut self, range: TextRange, content: Markup) {
        log::debug!(
            "Replacing {}..{} with {:?}",
            range.start_offset,
            range.end_offset,
            content.plain_text()
        );

        if range.is_collapsed() {
            let (parent, index) = self.insertion_point(range.start_offset);
            self.attach(content, parent, index);
            self.normalize();
            return;
        }

        self.split_text(range.start_offset);
        self.split_text(range.end_offset);
        let covered: Vec<NodeId> = self
            .text_nodes()
            .into_iter()
            .filter(|(_, r)| range.encloses(r))
            .map(|(n, _)| n)
            .collect();
        let (Some(&first), Some(&last)) = (covered.first(), covered.last()) else {
            let (parent, index) = self.insertion_point(range.start_offset);
            self.attach(content, parent, index);
            self.normalize();
            return;
        };

        let extents = self.extents();
        // Empty elements count as enclosed only strictly inside the range
        let enclosed = |n: NodeId| {
            extents.get(&n).is_some_and(|r| {
                if r.is_collapsed() {
                    range.start_offset < r.start_offset && r.start_offset < range.end_offset
                } else {
                    range.encloses(r)
                }
            })
        };
        let start_container = self.nodes[first.0].parent.unwrap_or(ROOT);
        let end_container = self.nodes[last.0].parent.unwrap_or(ROOT);
        let common = self.common_ancestor(start_container, end_container);

        // Insert at the start boundary, or just after the outermost element
        // that holds the start but not the end
        let insert_at = if start_container == common {
            self.index_in_parent(first)
        } else {
            let mut reference = start_container;
            while let Some(parent) = self.nodes[reference.0].parent {
                if parent == common {
                    break;
                }
                reference = parent;
            }
            self.index_in_parent(reference).map(|(p, i)| (p, i + 1))
        };

        // Outermost fully covered nodes below the common ancestor
        let mut doomed = Vec::new();
        let mut stack = vec![common];
        while let Some(node) = stack.pop() {
            for &child in &self.nodes[node.0].children {
                if enclosed(child) {
                    doomed.push(child);
                } else if extents.get(&child).is_some_and(|r| r.overlaps(&range)) {
                    stack.push(child);
                }
            }
        }

        if let Some((parent, index)) = insert_at {
            self.attach(content, parent, index);
        }
        for node in doomed {
            self.unlink(node);
            self.release(node);
        }
        self.normalize();
    }

    fn find_nodes_matching_class_prefix(&self, prefix: &str) -> Vec<NodeId> {
        self.preorder(ROOT)
            .into_iter()
            .filter(|&n| self.classes(n).iter().any(|c| c.starts_with(prefix)))
            .collect()
    }

    fn remove_node(&mut self, node: NodeId, keep_children: bool) {
        if node == ROOT || !self.is_attached(node) {
            return;
        }
        log::debug!(
            "Removing {:?} <{}> (keep children: {})",
            node,
            self.tag(node).unwrap_or(""),
            keep_children
        );
        let Some((parent, index)) = self.unlink(node) else {
            return;
        };
        if keep_children {
            let children = std::mem::take(&mut self.nodes[node.0].children);
            for (i, child) in children.into_iter().enumerate() {
                self.insert_child(parent, index + i, child);
            }
        } else {
            self.release(node);
        }
        self.normalize();
    }

    fn ancestors(&self, offset: usize, affinity: Affinity) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self
            .text_node_at(offset, affinity)
            .and_then(|n| self.nodes[n.0].parent);
        while let Some(node) = current {
            chain.push(node);
            current = self.nodes[node.0].parent;
        }
        if chain.is_empty() {
            chain.push(ROOT);
        }
        chain
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        self.preorder(node)
            .into_iter()
            .filter(|&n| matches!(self.nodes[n.0].kind, NodeKind::Element { .. }))
            .collect()
    }

    fn classes(&self, node: NodeId) -> &[String] {
        match &self.nodes[node.0].kind {
            NodeKind::Element { classes, .. } => classes.as_slice(),
            _ => &[],
        }
    }

    fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { tag, .. } => Some(tag.as_str()),
            _ => None,
        }
    }

    fn is_container(&self, node: NodeId) -> bool {
        match &self.nodes[node.0].kind {
            NodeKind::Root => true,
            NodeKind::Element { tag, .. } => {
                BLOCK_TAGS.contains(&tag.to_ascii_lowercase().as_str())
            }
            NodeKind::Text(_) => false,
        }
    }

    fn node_range(&self, node: NodeId) -> TextRange {
        self.extents()
            .get(&node)
            .copied()
            .unwrap_or(TextRange::caret(0))
    }
}
