use std::sync::Arc;

use str_indices::chars;

use crate::tree::{Branch, ChildVec, Node, Text, TextInfo, MAX_CHILDREN, MIN_CHILDREN};

/// A handle to a subtree: the unit of reference all the tree algorithms
/// pass around.
///
/// The handle pairs a node pointer with the metrics of the window it
/// exposes over that node.  Cloning is a refcount bump.  Two handles may
/// share one node while exposing different windows; this is how a leading
/// LF is "dropped" from a leaf without touching the leaf itself.
#[derive(Debug, Clone)]
pub(crate) struct Tree {
    info: TextInfo,
    child_count: usize,
    node: Arc<Node>,
}

impl Tree {
    /// An empty leaf.  Only the root of an empty rope is allowed to be one.
    pub fn empty() -> Tree {
        Tree::from_text(Text::new())
    }

    pub fn from_text(text: Text) -> Tree {
        let info = TextInfo::from_str(text.as_str());
        Tree {
            info,
            child_count: 0,
            node: Arc::new(Node::Leaf(text)),
        }
    }

    /// Builds a branch from child handles, computing the combined metrics.
    pub fn from_children(height: usize, children: ChildVec) -> Tree {
        debug_assert!(!children.is_empty());

        let mut info = children[0].info();
        for child in &children[1..] {
            info = info.concat(child.info());
        }
        let child_count = children.len();

        Tree {
            info,
            child_count,
            node: Arc::new(Node::Branch(Branch::from_children(height, children))),
        }
    }

    /// A handle exposing `info`'s window over an existing node.
    pub fn with_parts(info: TextInfo, child_count: usize, node: Arc<Node>) -> Tree {
        Tree {
            info,
            child_count,
            node,
        }
    }

    //---------------------------------------------------------
    // Queries.

    #[inline(always)]
    pub fn info(&self) -> TextInfo {
        self.info
    }

    #[inline(always)]
    pub fn char_count(&self) -> usize {
        self.info.chars
    }

    #[inline(always)]
    pub fn byte_count(&self) -> usize {
        self.info.bytes
    }

    #[inline(always)]
    pub fn child_count(&self) -> usize {
        self.child_count
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.node.height()
    }

    #[inline(always)]
    pub fn is_leaf(&self) -> bool {
        self.node.is_leaf()
    }

    /// Whether this node meets the minimum-fill invariant.
    #[inline(always)]
    pub fn is_saturated(&self) -> bool {
        self.is_leaf() || self.child_count >= MIN_CHILDREN
    }

    #[inline(always)]
    pub fn node(&self) -> &Node {
        &self.node
    }

    #[inline(always)]
    pub fn node_ptr(&self) -> &Arc<Node> {
        &self.node
    }

    /// The children this handle sees.  Must only be called on branches.
    #[inline(always)]
    pub fn children(&self) -> &[Tree] {
        match &*self.node {
            Node::Branch(branch) => &branch.children()[..self.child_count],
            Node::Leaf(_) => panic!("children() called on a leaf"),
        }
    }

    //---------------------------------------------------------
    // Leaf window access.  Must only be called on leaves.

    /// The visible window of this leaf's buffer.
    #[inline(always)]
    pub fn leaf_bytes(&self) -> &[u8] {
        match &*self.node {
            Node::Leaf(text) => {
                let start = self.info.dropped_bytes;
                let end = start + self.info.bytes;
                &text.as_bytes()[start..end]
            }
            Node::Branch(_) => panic!("leaf_bytes() called on a branch"),
        }
    }

    #[inline(always)]
    pub fn leaf_str(&self) -> &str {
        let bytes = self.leaf_bytes();
        debug_assert!(std::str::from_utf8(bytes).is_ok());

        // SAFETY: visible windows start and end on codepoint boundaries,
        // which the validator checks.
        unsafe { std::str::from_utf8_unchecked(bytes) }
    }

    /// Converts a char index within this leaf's window to a byte index.
    #[inline]
    pub fn leaf_byte_of_char(&self, char_idx: usize) -> usize {
        debug_assert!(char_idx <= self.info.chars);
        chars::to_byte_idx(self.leaf_str(), char_idx)
    }

    //---------------------------------------------------------
    // Debug validation.

    /// Checks that all leaves sit at the same depth and height fields
    /// agree with it.  Returns the subtree height.
    pub fn assert_balance(&self) -> usize {
        match &*self.node {
            Node::Leaf(_) => 1,
            Node::Branch(branch) => {
                let first = self.children()[0].assert_balance();
                for child in &self.children()[1..] {
                    assert_eq!(child.assert_balance(), first);
                }
                assert_eq!(branch.height(), first + 1);
                first + 1
            }
        }
    }

    /// Checks the minimum-fill invariant and that no leaf other than an
    /// empty root has an empty window.
    pub fn assert_node_fill(&self, is_root: bool) {
        match &*self.node {
            Node::Leaf(_) => {
                if !is_root {
                    assert!(self.info.bytes > 0);
                }
            }
            Node::Branch(branch) => {
                assert_eq!(self.child_count, branch.children().len());
                assert!(self.child_count <= MAX_CHILDREN);
                if is_root {
                    assert!(self.child_count >= 2);
                } else {
                    assert!(self.child_count >= MIN_CHILDREN);
                }
                for child in self.children() {
                    child.assert_node_fill(false);
                }
            }
        }
    }

    /// Checks that every handle's metrics describe its window exactly.
    pub fn assert_info_accuracy(&self) {
        match &*self.node {
            Node::Leaf(text) => {
                assert!(self.info.dropped_bytes + self.info.bytes <= text.len());
                let window = &text.as_bytes()[self.info.dropped_bytes..][..self.info.bytes];
                let window = std::str::from_utf8(window).expect("window splits a codepoint");
                let fresh = TextInfo::from_str(window);
                assert_eq!(self.info.bytes, fresh.bytes);
                assert_eq!(self.info.chars, fresh.chars);
                assert_eq!(self.info.line_breaks, fresh.line_breaks);
            }
            Node::Branch(_) => {
                let mut combined = self.children()[0].info();
                for child in &self.children()[1..] {
                    combined = combined.concat(child.info());
                }
                assert_eq!(self.info, combined);
                for child in self.children() {
                    child.assert_info_accuracy();
                }
            }
        }
    }
}

/// A subtree over `children`, collapsing a single child into itself so no
/// one-child branches are ever built.
pub(crate) fn branch_or_single(height: usize, children: &[Tree]) -> Tree {
    debug_assert!(!children.is_empty());

    if children.len() == 1 {
        children[0].clone()
    } else {
        Tree::from_children(height, children.iter().cloned().collect())
    }
}

/// Rebuilds a branch with one child handle swapped out.
pub(crate) fn replace_child(branch: &Tree, child_idx: usize, child: Tree) -> Tree {
    debug_assert!(child_idx < branch.child_count());
    debug_assert_eq!(child.height() + 1, branch.height());

    let mut children: ChildVec = branch.children().iter().cloned().collect();
    children[child_idx] = child;
    Tree::from_children(branch.height(), children)
}

//===========================================================================
