use std::fmt;

use austin_web_protocol::FrameData;
use serde::Deserialize;

/// Index of a node inside a [`FrameTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub usize);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The parts of a frame the colorizer and labeler look at.
pub trait FrameInfo {
    /// Display name (function scope).
    fn name(&self) -> &str;
    /// Originating module, if resolved.
    fn file(&self) -> Option<&str>;
    /// Aggregated metric of the frame and its descendants.
    fn value(&self) -> u64;
    /// Identity of the node within its parent, used when `name` is empty.
    fn key(&self) -> &str {
        self.name()
    }
}

impl FrameInfo for FrameData {
    fn name(&self) -> &str {
        &self.name
    }

    fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    fn value(&self) -> u64 {
        self.value
    }
}

/// Parse a frame data blob of any depth.
///
/// Every frame nests an object and a `children` array, so serde_json's
/// default recursion limit would reject stacks deeper than about 64
/// frames. The limit is lifted and the stack grows on demand instead.
pub fn parse_frame_data(json: &str) -> Result<FrameData, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    let data = FrameData::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(data)
}

/// A single aggregated call-stack node.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameNode {
    /// Raw identity this node was merged under (e.g. `foo.py:foo:10`).
    pub key: String,
    pub name: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub value: u64,
    pub children: Vec<FrameId>,
    /// Enclosing frame. Non-owning: the tree arena owns every node.
    pub parent: Option<FrameId>,
}

impl FrameNode {
    pub fn new(key: impl Into<String>, name: impl Into<String>, file: Option<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            file,
            line: None,
            value: 0,
            children: Vec::new(),
            parent: None,
        }
    }
}

impl FrameInfo for FrameNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    fn value(&self) -> u64 {
        self.value
    }

    fn key(&self) -> &str {
        &self.key
    }
}

/// Rooted frame tree stored as an arena. The root is always `FrameId(0)`.
///
/// Built once (from a data blob or by the sample builder) and read-only
/// afterwards; all transient chart state lives in
/// [`ChartState`](crate::chart::ChartState).
#[derive(Debug, Clone)]
pub struct FrameTree {
    nodes: Vec<FrameNode>,
}

impl FrameTree {
    /// A tree holding only the synthetic `root` node.
    pub fn new_root() -> Self {
        Self {
            nodes: vec![FrameNode::new("root", "root", None)],
        }
    }

    pub fn from_data(data: &FrameData) -> Self {
        let mut root = FrameNode::new(data.name.clone(), data.name.clone(), data.file.clone());
        root.value = data.value;
        let mut tree = Self { nodes: vec![root] };

        let mut pending: Vec<(FrameId, &FrameData)> = vec![(tree.root(), data)];
        while let Some((id, frame)) = pending.pop() {
            for child in &frame.children {
                let mut node =
                    FrameNode::new(child.name.clone(), child.name.clone(), child.file.clone());
                node.value = child.value;
                let child_id = tree.push_child(id, node);
                pending.push((child_id, child));
            }
        }

        tracing::debug!(frames = tree.len(), "built frame tree from data");
        tree
    }

    /// Parse a JSON data blob and build the tree from it.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        parse_frame_data(json).map(|data| Self::from_data(&data))
    }

    pub fn root(&self) -> FrameId {
        FrameId(0)
    }

    pub fn node(&self, id: FrameId) -> Option<&FrameNode> {
        self.nodes.get(id.0)
    }

    pub fn parent(&self, id: FrameId) -> Option<FrameId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: FrameId) -> &[FrameId] {
        self.node(id).map_or(&[], |n| &n.children)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FrameId, &FrameNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (FrameId(i), n))
    }

    /// Number of edges between `id` and the root.
    pub fn depth(&self, id: FrameId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Number of levels in the tree (a lone root has height 1).
    pub fn height(&self) -> usize {
        let mut max = 0;
        let mut pending = vec![(self.root(), 1)];
        while let Some((id, level)) = pending.pop() {
            max = max.max(level);
            pending.extend(self.children(id).iter().map(|&c| (c, level + 1)));
        }
        max
    }

    pub fn to_data(&self) -> FrameData {
        self.subtree_data(self.root())
    }

    fn subtree_data(&self, id: FrameId) -> FrameData {
        let Some(node) = self.node(id) else {
            return FrameData::new("", 0);
        };
        FrameData {
            name: node.name.clone(),
            file: node.file.clone(),
            value: node.value,
            children: node
                .children
                .iter()
                .map(|&c| self.subtree_data(c))
                .collect(),
        }
    }

    pub(crate) fn push_child(&mut self, parent: FrameId, mut node: FrameNode) -> FrameId {
        let id = FrameId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(id);
        }
        id
    }

    pub(crate) fn add_value(&mut self, id: FrameId, value: u64) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.value = node.value.saturating_add(value);
        }
    }
}
