//! Arena-backed node forest for a compiled CSSX file.
//!
//! Every node lives in one `Vec` owned by [`Document`] and is addressed by
//! [`NodeId`]. Parent links are indices, so there are no ownership cycles
//! and a mixin body can be re-read without copying nodes around.

/// Index of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// What a statement line turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// An HTML element opener such as `div.card {`.
    Element { tag: String, class: Option<String> },

    /// A recognized HTML attribute declaration such as `--id: "main";`.
    ///
    /// `multiline_open` marks the empty-valued line that starts a
    /// multi-line value; it carries no value of its own.
    Attribute {
        name: String,
        value: String,
        is_event: bool,
        multiline_open: bool,
    },

    /// A `@mixin name(...) {` definition block.
    Mixin {
        name: String,
        params: Vec<(String, String)>,
    },

    /// Everything else: CSS declarations, rule openers, directives,
    /// text markers and lone `}` lines.
    Generic,
}

/// One node of the forest.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Statement text as written in the source.
    pub raw: String,
    pub kind: NodeKind,
    /// Attribute children in declaration order.
    pub attrs: Vec<NodeId>,
    /// Non-attribute children in declaration order.
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    /// Creation order within the compile; restores declaration order when a
    /// mixin body is re-linearized.
    pub source_index: usize,
    /// 1-based physical line in the file the statement came from.
    pub line: usize,
    /// Kept in the tree but never emitted (variables, mixins, includes).
    pub suppressed: bool,
    /// Produced by expanding an `@include`.
    pub expanded: bool,
}

impl TreeNode {
    pub fn new(raw: impl Into<String>, kind: NodeKind, line: usize) -> Self {
        Self {
            raw: raw.into(),
            kind,
            attrs: Vec::new(),
            children: Vec::new(),
            parent: None,
            source_index: 0,
            line,
            suppressed: false,
            expanded: false,
        }
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self.kind, NodeKind::Attribute { .. })
    }

    /// A lone `}`.
    pub fn is_block_close(&self) -> bool {
        self.raw.trim() == "}"
    }
}

/// A parsed CSSX file: the node arena plus the ids of its root nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a node and return its id. The node is not attached anywhere yet.
    pub fn alloc(&mut self, mut node: TreeNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.source_index = id.0;
        self.nodes.push(node);
        id
    }

    /// Attach `child` under `parent`, or as a root when there is no parent.
    /// Attribute nodes go to `attrs`, everything else to `children`.
    pub fn attach(&mut self, parent: Option<NodeId>, child: NodeId) {
        let Some(parent) = parent else {
            self.roots.push(child);
            return;
        };
        self.nodes[child.0].parent = Some(parent);
        if self.nodes[child.0].is_attribute() {
            self.nodes[parent.0].attrs.push(child);
        } else {
            self.nodes[parent.0].children.push(child);
        }
    }

    pub fn get(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids of every node in creation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Number of ancestors between `id` and its root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.get(id).parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.get(parent).parent;
        }
        depth
    }

    /// All nodes below `id` (attributes and children, any depth), excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.get(current);
            for &child in node.attrs.iter().chain(&node.children) {
                out.push(child);
                stack.push(child);
            }
        }
        out
    }
}
