//! Splitting a tree at a character position.

use crate::tree::concat::tree_concat;
use crate::tree::navigate::{child_for_char_idx, navigate_to_leaf};
use crate::tree::{branch_or_single, replace_child, Text, Tree};

/// The two sides of a split, plus the height of the subtree they were cut
/// from.  Either side may be absent when the cut falls on the subtree's
/// edge, and a returned side may be shorter than `height` when most of the
/// subtree went the other way.
#[derive(Debug)]
pub(crate) struct SplitResult {
    pub height: usize,
    pub left: Option<Tree>,
    pub right: Option<Tree>,
}

/// Splits `tree` at `char_idx`.
///
/// Implemented on the navigation skeleton: the leaf payload cuts one leaf
/// in two, and the ascend combinator rebuilds each visited branch into a
/// left and a right tree, concatenating the returned fragments with the
/// untouched siblings on each side.
pub(crate) fn split(tree: &Tree, char_idx: usize) -> SplitResult {
    debug_assert!(char_idx <= tree.char_count());

    navigate_to_leaf(
        tree,
        char_idx,
        &|branch: &Tree, idx| child_for_char_idx(branch.children(), idx),
        split_leaf_payload,
        &split_up_fn,
    )
}

fn split_leaf_payload(leaf: &Tree, char_idx: usize) -> SplitResult {
    let byte_idx = leaf.leaf_byte_of_char(char_idx);

    if byte_idx == 0 {
        // cut at the leaf's front: the whole leaf goes right, untouched
        SplitResult {
            height: 1,
            left: None,
            right: Some(leaf.clone()),
        }
    } else if byte_idx == leaf.byte_count() {
        SplitResult {
            height: 1,
            left: Some(leaf.clone()),
            right: None,
        }
    } else {
        let data = leaf.leaf_bytes();
        SplitResult {
            height: 1,
            left: Some(Tree::from_text(Text::from_pieces(&[&data[..byte_idx]]))),
            right: Some(Tree::from_text(Text::from_pieces(&[&data[byte_idx..]]))),
        }
    }
}

fn split_up_fn(branch: &Tree, split_idx: usize, result: SplitResult) -> SplitResult {
    let our_height = branch.height();
    debug_assert_eq!(our_height, result.height + 1);
    let children = branch.children();

    if split_idx == 0 {
        let right = match result.right {
            None => branch_or_single(our_height, &children[1..]),
            Some(right) if right.height() == result.height && right.is_saturated() => {
                // the fragment is a well-formed child; swap it in place
                replace_child(branch, 0, right)
            }
            Some(right) => {
                let rest = branch_or_single(our_height, &children[1..]);
                tree_concat(&right, &rest)
            }
        };
        SplitResult {
            height: our_height,
            left: result.left,
            right: Some(right),
        }
    } else if split_idx == children.len() - 1 {
        let left = match result.left {
            None => branch_or_single(our_height, &children[..split_idx]),
            Some(left) if left.height() == result.height && left.is_saturated() => {
                replace_child(branch, split_idx, left)
            }
            Some(left) => {
                let rest = branch_or_single(our_height, &children[..split_idx]);
                tree_concat(&rest, &left)
            }
        };
        SplitResult {
            height: our_height,
            left: Some(left),
            right: result.right,
        }
    } else {
        let left_part = branch_or_single(our_height, &children[..split_idx]);
        let right_part = branch_or_single(our_height, &children[split_idx + 1..]);

        let left = match result.left {
            None => left_part,
            Some(l) => tree_concat(&left_part, &l),
        };
        let right = match result.right {
            None => right_part,
            Some(r) => tree_concat(&r, &right_part),
        };

        SplitResult {
            height: our_height,
            left: Some(left),
            right: Some(right),
        }
    }
}

//===========================================================================
