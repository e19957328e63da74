//! The traversal skeleton shared by the editing algorithms.
//!
//! All edits follow the same shape: descend to one leaf guided by some
//! per-call state, transform it, then rebuild each visited branch on the
//! way back up.  `navigate_to_leaf` captures that shape; the callers
//! provide the three pieces as closures.

use crate::tree::Tree;

/// Descends `tree` to a single leaf and folds a result back to the top.
///
/// * `down_fn` picks which child of a branch to descend into and threads
///   the state through (e.g. rebasing a char index).
/// * `payload_fn` produces the result at the leaf.
/// * `up_fn` folds a child's result into a parent-level result, typically
///   rebuilding the branch around it.
pub(crate) fn navigate_to_leaf<D, R>(
    tree: &Tree,
    data: D,
    down_fn: &impl Fn(&Tree, D) -> (usize, D),
    payload_fn: impl FnOnce(&Tree, D) -> R,
    up_fn: &impl Fn(&Tree, usize, R) -> R,
) -> R {
    if tree.is_leaf() {
        payload_fn(tree, data)
    } else {
        let (child_idx, data) = down_fn(tree, data);
        let result = navigate_to_leaf(&tree.children()[child_idx], data, down_fn, payload_fn, up_fn);
        up_fn(tree, child_idx, result)
    }
}

/// The identity ascend combinator: the leaf result is the final result.
pub(crate) fn navigate_upwards_passthrough<R>(_branch: &Tree, _child_idx: usize, result: R) -> R {
    result
}

/// Descends along the leftmost spine.
pub(crate) fn navigate_to_front_leaf<R>(
    tree: &Tree,
    payload_fn: impl FnOnce(&Tree) -> R,
    up_fn: &impl Fn(&Tree, usize, R) -> R,
) -> R {
    navigate_to_leaf(
        tree,
        (),
        &|_branch: &Tree, _| (0, ()),
        |leaf, _| payload_fn(leaf),
        up_fn,
    )
}

/// Descends along the rightmost spine.
pub(crate) fn navigate_to_back_leaf<R>(
    tree: &Tree,
    payload_fn: impl FnOnce(&Tree) -> R,
    up_fn: &impl Fn(&Tree, usize, R) -> R,
) -> R {
    navigate_to_leaf(
        tree,
        (),
        &|branch: &Tree, _| (branch.child_count() - 1, ()),
        |leaf, _| payload_fn(leaf),
        up_fn,
    )
}

/// Picks the child containing `char_idx`, returning the child index and
/// the index rebased into that child.
///
/// A child's range is half-open: an index equal to a child's cumulative
/// end selects the *next* child.  The index must be strictly inside the
/// branch.
pub(crate) fn child_for_char_idx(children: &[Tree], char_idx: usize) -> (usize, usize) {
    let mut acc = 0;
    for (i, child) in children.iter().enumerate() {
        if char_idx < acc + child.char_count() {
            return (i, char_idx - acc);
        }
        acc += child.char_count();
    }
    debug_assert!(false, "char index out of bounds");
    (children.len() - 1, char_idx - acc)
}

/// Like [`child_for_char_idx`], but an index on a boundary selects the
/// child that *ends* there.  Used by edits so an append lands at the back
/// of the preceding leaf.
pub(crate) fn child_for_char_idx_within(children: &[Tree], char_idx: usize) -> (usize, usize) {
    let mut acc = 0;
    for (i, child) in children.iter().enumerate() {
        if char_idx <= acc + child.char_count() {
            return (i, char_idx - acc);
        }
        acc += child.char_count();
    }
    debug_assert!(false, "char index out of bounds");
    (children.len() - 1, char_idx - acc)
}

//===========================================================================
