mod concat;
mod edit;
mod navigate;
mod node;
mod split;
mod text;
mod text_info;
mod tree;

use smallvec::SmallVec;

#[cfg(not(any(test, feature = "small_chunks")))]
mod constants {
    pub(crate) const MAX_CHILDREN: usize = 4;
    pub(crate) const MAX_TEXT_SIZE: usize = 512;
}
#[cfg(any(test, feature = "small_chunks"))]
mod constants {
    pub(crate) const MAX_CHILDREN: usize = 4;
    pub(crate) const MAX_TEXT_SIZE: usize = 9;
}
pub(crate) use constants::{MAX_CHILDREN, MAX_TEXT_SIZE};

/// Minimum children per non-root branch.
pub(crate) const MIN_CHILDREN: usize = (MAX_CHILDREN + 1) / 2;

/// Largest insertion handled by a leaf edit.  Two bytes under the leaf
/// capacity, so a full CRLF pair can always be pulled into a leaf when a
/// seam is mended.
pub(crate) const MAX_EDIT_SIZE: usize = MAX_TEXT_SIZE - 2;

pub(crate) type ChildVec = SmallVec<[Tree; MAX_CHILDREN]>;

pub(crate) use concat::tree_concat;
pub(crate) use edit::{erase, finalize_edit, insert, mend_seam};
pub(crate) use navigate::{child_for_char_idx, navigate_to_leaf, navigate_upwards_passthrough};
pub(crate) use node::{Branch, Node};
pub(crate) use split::split;
pub(crate) use text::Text;
pub(crate) use text_info::TextInfo;
pub(crate) use tree::{branch_or_single, replace_child, Tree};
