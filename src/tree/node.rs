use crate::tree::{ChildVec, Text, Tree, MAX_CHILDREN};

/// A tree node: either a leaf holding text or an internal branch holding
/// child subtrees.
///
/// Nodes are shared behind `Arc` and never mutated after they become
/// reachable from more than one handle; "modifying" operations build new
/// nodes.
#[derive(Debug)]
pub(crate) enum Node {
    Leaf(Text),
    Branch(Branch),
}

impl Node {
    /// 1-indexed distance to the leaf level.  Leaves are height 1.
    #[inline(always)]
    pub fn height(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Branch(branch) => branch.height(),
        }
    }

    #[inline(always)]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }
}

/// An internal node: an ordered sequence of up to `MAX_CHILDREN` subtrees.
///
/// A branch carries no aggregate metrics of its own.  The tree handle that
/// owns it does, and each child entry is itself a full handle.
#[derive(Debug)]
pub(crate) struct Branch {
    height: usize,
    children: ChildVec,
}

impl Branch {
    pub fn from_children(height: usize, children: ChildVec) -> Self {
        debug_assert!(!children.is_empty());
        debug_assert!(children.len() <= MAX_CHILDREN);
        debug_assert!(children.iter().all(|c| c.height() + 1 == height));

        Branch { height, children }
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    pub fn children(&self) -> &[Tree] {
        &self.children
    }
}
