//! Text edits: insertion with leaf redistribution, the CRLF seam-mending
//! protocol, and erasure.

use crate::str_utils::{
    find_internal_split_point, is_seam, next_break, prev_break, CR, LF,
};
use crate::tree::concat::tree_concat;
use crate::tree::navigate::{
    child_for_char_idx, child_for_char_idx_within, navigate_to_back_leaf, navigate_to_front_leaf,
    navigate_to_leaf, navigate_upwards_passthrough,
};
use crate::tree::{
    replace_child, ChildVec, Node, Text, Tree, MAX_CHILDREN, MAX_EDIT_SIZE, MAX_TEXT_SIZE,
};

/// Marks that an edit may have left half of a CRLF pair dangling at an
/// edge of the edited subtree: an LF at its front, a CR at its back, or
/// both.  The flags ride the ascent until a level with an adjacent sibling
/// can mend the pair, or are accepted at the rope boundary where a lone
/// CR or LF is harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Seam {
    pub left: bool,
    pub right: bool,
}

impl Seam {
    pub const NONE: Seam = Seam {
        left: false,
        right: false,
    };
}

/// The result of editing a subtree: a replacement node, possibly a second
/// node when the edit overflowed, and any unresolved seam flags.
#[derive(Debug, Clone)]
pub(crate) struct EditResult {
    pub left: Tree,
    pub right: Option<Tree>,
    pub seam: Seam,
}

impl EditResult {
    fn unchanged(leaf: &Tree) -> EditResult {
        EditResult {
            left: leaf.clone(),
            right: None,
            seam: Seam::NONE,
        }
    }
}

/// Collapses an edit result into a single tree, adding a new root level
/// when the edit split the old root.
pub(crate) fn finalize_edit(er: EditResult) -> Tree {
    match er.right {
        Some(right) => {
            debug_assert_eq!(er.left.height(), right.height());
            let height = er.left.height() + 1;
            Tree::from_children(height, [er.left, right].into_iter().collect())
        }
        None => er.left,
    }
}

//===========================================================================
// Insert.

/// Inserts `text` (at most `MAX_EDIT_SIZE` bytes) at `char_idx`.
///
/// Boundary positions resolve to the *preceding* leaf, so appending text
/// extends the leaf it follows.
pub(crate) fn insert(tree: &Tree, char_idx: usize, text: &str) -> EditResult {
    debug_assert!(text.len() <= MAX_EDIT_SIZE);
    debug_assert!(char_idx <= tree.char_count());

    navigate_to_leaf(
        tree,
        char_idx,
        &|branch: &Tree, idx| child_for_char_idx_within(branch.children(), idx),
        |leaf, idx| insert_small_text(leaf, idx, text),
        &stitch_upwards,
    )
}

/// Splices `text` into a single leaf, producing one leaf when the result
/// fits and a redistributed pair when it does not.
pub(crate) fn insert_small_text(leaf: &Tree, char_idx: usize, text: &str) -> EditResult {
    debug_assert!(leaf.is_leaf());
    debug_assert!(char_idx <= leaf.char_count());
    debug_assert!(text.len() <= MAX_EDIT_SIZE);

    if text.is_empty() {
        return EditResult::unchanged(leaf);
    }

    let ins = text.as_bytes();
    let mut seam = Seam::NONE;

    // an LF inserted at the very front of this leaf may belong to a CR at
    // the back of the previous leaf; a CR inserted at the very back may
    // pair with an LF at the front of the next leaf.  the text goes in
    // whole either way; mending relocates the LF only once a pair is
    // actually found straddling the boundary.
    if char_idx == 0 && ins[0] == LF {
        seam.left = true;
    }
    if char_idx == leaf.char_count() && ins[ins.len() - 1] == CR {
        seam.right = true;
    }

    let data = leaf.leaf_bytes();
    let byte_idx = leaf.leaf_byte_of_char(char_idx);

    if data.len() + ins.len() <= MAX_EDIT_SIZE {
        let text = Text::from_pieces(&[&data[..byte_idx], ins, &data[byte_idx..]]);
        EditResult {
            left: Tree::from_text(text),
            right: None,
            seam,
        }
    } else {
        let (left, right) = insert_and_redistribute(data, ins, byte_idx);
        EditResult {
            left,
            right: Some(right),
            seam,
        }
    }
}

/// Splices `ins` into `host` at `byte_idx` and cuts the result into two
/// balanced leaves at a break near the midpoint.
pub(crate) fn insert_and_redistribute(host: &[u8], ins: &[u8], byte_idx: usize) -> (Tree, Tree) {
    debug_assert!(!ins.is_empty());
    debug_assert!(byte_idx <= host.len());

    // lay the spliced text out flat so the split-point search sees the
    // post-insertion byte sequence
    let total = host.len() + ins.len();
    debug_assert!(total <= 2 * MAX_TEXT_SIZE);
    let mut combined = [0u8; 2 * MAX_TEXT_SIZE];
    combined[..byte_idx].copy_from_slice(&host[..byte_idx]);
    combined[byte_idx..byte_idx + ins.len()].copy_from_slice(ins);
    combined[byte_idx + ins.len()..total].copy_from_slice(&host[byte_idx..]);
    let combined = &combined[..total];

    let mut split_idx = find_internal_split_point(combined, total / 2);

    // a near-full pair plus multi-byte drift can push one half past the
    // leaf capacity; nudge to a neighbouring break
    while split_idx > MAX_TEXT_SIZE {
        split_idx = prev_break(combined, split_idx);
    }
    while total - split_idx > MAX_TEXT_SIZE {
        split_idx = next_break(combined, split_idx);
    }
    debug_assert!(split_idx <= MAX_TEXT_SIZE && total - split_idx <= MAX_TEXT_SIZE);

    let left = Tree::from_text(Text::from_pieces(&[&combined[..split_idx]]));
    let right = Tree::from_text(Text::from_pieces(&[&combined[split_idx..]]));
    (left, right)
}

//===========================================================================
// Stitching and seam mending.

/// The ascend combinator for edits: splices an edit result back into the
/// visited branch, mends any seam that has a sibling at this level, and
/// splits the branch when the children overflow.
pub(crate) fn stitch_upwards(branch: &Tree, child_idx: usize, er: EditResult) -> EditResult {
    let children = branch.children();
    let mut seam = Seam::NONE;

    // the replacement children for positions [lo, hi) of the original
    let mut lo = child_idx;
    let mut hi = child_idx + 1;
    let mut mid: ChildVec = std::iter::once(er.left).chain(er.right).collect();

    if er.seam.left {
        if child_idx == 0 {
            // no sibling here; try again one level up
            seam.left = true;
        } else if let Some((sibling, seamed)) = mend_seam(&children[child_idx - 1], &mid[0]) {
            lo -= 1;
            match seamed {
                Some(t) => mid[0] = t,
                None => {
                    mid.remove(0);
                }
            }
            mid.insert(0, sibling);
        }
    }
    if er.seam.right {
        if child_idx == children.len() - 1 {
            seam.right = true;
        } else {
            let last = mid.len() - 1;
            if let Some((seamed, sibling)) = mend_seam(&mid[last], &children[child_idx + 1]) {
                hi += 1;
                mid[last] = seamed;
                match sibling {
                    Some(s) => mid.push(s),
                    None => {}
                }
            }
        }
    }

    let expected_height = branch.height() - 1;
    let regular = mid
        .iter()
        .all(|t| t.height() == expected_height && t.is_saturated());
    let total = lo + mid.len() + (children.len() - hi);

    if regular && total >= 2 {
        let mut new_children: ChildVec = children[..lo].iter().cloned().collect();
        new_children.extend(mid);
        new_children.extend(children[hi..].iter().cloned());

        if new_children.len() <= MAX_CHILDREN {
            EditResult {
                left: Tree::from_children(branch.height(), new_children),
                right: None,
                seam,
            }
        } else {
            // standard B-tree split
            let split = (new_children.len() + 1) / 2;
            let right: ChildVec = new_children[split..].iter().cloned().collect();
            new_children.truncate(split);
            EditResult {
                left: Tree::from_children(branch.height(), new_children),
                right: Some(Tree::from_children(branch.height(), right)),
                seam,
            }
        }
    } else {
        // a mend emptied a child or regrew a subtree past its level;
        // concatenation rebuilds a well-formed tree from the pieces
        let mut acc: Option<Tree> = None;
        for part in children[..lo]
            .iter()
            .chain(mid.iter())
            .chain(children[hi..].iter())
        {
            acc = Some(match acc {
                None => part.clone(),
                Some(a) => tree_concat(&a, part),
            });
        }
        EditResult {
            left: acc.expect("edit removed every child of a branch"),
            right: None,
            seam,
        }
    }
}

/// The ascend combinator for single-leaf rewrites with no overflow: swap
/// the rebuilt child in, or pass a no-op through.
pub(crate) fn stitch_upwards_simple(
    branch: &Tree,
    child_idx: usize,
    child: Option<Tree>,
) -> Option<Tree> {
    child.map(|c| replace_child(branch, child_idx, c))
}

/// Mends a CRLF pair split across the boundary between two adjacent
/// subtrees: `left`'s last byte is CR and `right`'s first byte is LF.
///
/// The LF is relocated: appended to `left`'s back leaf and shifted off
/// `right`'s front leaf, so the pair lives in one leaf and counts as a
/// single line break.  Returns `None` when no split pair straddles the
/// boundary.  The mended right side is `None` in the degenerate case
/// where the LF was all that remained of it.
pub(crate) fn mend_seam(left: &Tree, right: &Tree) -> Option<(Tree, Option<Tree>)> {
    match (back_byte(left), front_byte(right)) {
        (Some(back), Some(front)) if is_seam(back, front) => {}
        _ => return None,
    }

    let new_left = finalize_edit(insert(left, left.char_count(), "\n"));
    let new_right = drop_front_lf(right);
    Some((new_left, new_right))
}

/// Shifts the leading LF off a tree's front leaf.
///
/// The common case moves the leaf's visible window forward by one byte,
/// sharing the leaf node with every other handle.  When the front leaf
/// holds nothing but the LF, the leaf is removed instead.  Returns `None`
/// when the whole tree was that one LF.
fn drop_front_lf(tree: &Tree) -> Option<Tree> {
    debug_assert_eq!(front_byte(tree), Some(LF));

    let via_window = navigate_to_front_leaf(
        tree,
        |leaf| {
            (leaf.byte_count() > 1).then(|| {
                Tree::with_parts(leaf.info().dropping_leading_lf(), 0, leaf.node_ptr().clone())
            })
        },
        &stitch_upwards_simple,
    );
    if let Some(t) = via_window {
        return Some(t);
    }

    // the front leaf was a lone LF
    let erased = erase(tree, 0, 1);
    match (erased.left, erased.right) {
        (None, None) => None,
        (Some(t), None) | (None, Some(t)) => Some(t),
        (Some(l), Some(r)) => Some(tree_concat(&l, &r)),
    }
}

fn front_byte(tree: &Tree) -> Option<u8> {
    if tree.byte_count() == 0 {
        return None;
    }
    Some(navigate_to_front_leaf(
        tree,
        |leaf| leaf.leaf_bytes()[0],
        &navigate_upwards_passthrough,
    ))
}

fn back_byte(tree: &Tree) -> Option<u8> {
    if tree.byte_count() == 0 {
        return None;
    }
    Some(navigate_to_back_leaf(
        tree,
        |leaf| leaf.leaf_bytes()[leaf.byte_count() - 1],
        &navigate_upwards_passthrough,
    ))
}

//===========================================================================
// Erase.

/// What remains of a subtree after erasing a range.  Both sides absent
/// means the range covered the whole subtree.
#[derive(Debug)]
pub(crate) struct EraseResult {
    pub left: Option<Tree>,
    pub right: Option<Tree>,
}

/// Erases the char range `[start, end)` from `tree`.
///
/// Leaves handle the four window cases directly.  A branch locates the
/// boundary children, recurses into them, drops everything in between,
/// and joins the survivors by concatenation, mending the cut in case it
/// brought a CR and an LF together across leaves.
pub(crate) fn erase(tree: &Tree, start: usize, end: usize) -> EraseResult {
    debug_assert!(start < end);
    debug_assert!(end <= tree.char_count());

    match tree.node() {
        Node::Leaf(_) => {
            let chars = tree.char_count();
            let data = tree.leaf_bytes();

            if start == 0 && end == chars {
                EraseResult {
                    left: None,
                    right: None,
                }
            } else if end == chars {
                let byte_idx = tree.leaf_byte_of_char(start);
                EraseResult {
                    left: Some(Tree::from_text(Text::from_pieces(&[&data[..byte_idx]]))),
                    right: None,
                }
            } else if start == 0 {
                let byte_idx = tree.leaf_byte_of_char(end);
                EraseResult {
                    left: None,
                    right: Some(Tree::from_text(Text::from_pieces(&[&data[byte_idx..]]))),
                }
            } else {
                let start_byte = tree.leaf_byte_of_char(start);
                let end_byte = tree.leaf_byte_of_char(end);
                let text = Text::from_pieces(&[&data[..start_byte], &data[end_byte..]]);
                EraseResult {
                    left: Some(Tree::from_text(text)),
                    right: None,
                }
            }
        }

        Node::Branch(_) => {
            let children = tree.children();
            let (start_child, start_rel) = child_for_char_idx(children, start);
            let (end_child, end_rel) = child_for_char_idx_within(children, end);

            // an erase strictly inside one child never reaches that
            // child's edges, so the cut is already mended below
            if start_child == end_child
                && start_rel > 0
                && end_rel < children[start_child].char_count()
            {
                let r = erase(&children[start_child], start_rel, end_rel);
                let mut parts = children[..start_child].to_vec();
                parts.extend(r.left);
                parts.extend(r.right);
                parts.extend(children[start_child + 1..].iter().cloned());
                return EraseResult {
                    left: fold_concat(&parts),
                    right: None,
                };
            }

            // pieces before and after the erased span; the junction
            // between the two lists is where the cut lands
            let mut before: Vec<Tree> = children[..start_child].to_vec();
            let mut after: Vec<Tree> = Vec::new();

            if start_child == end_child {
                let child = &children[start_child];
                if start_rel == 0 && end_rel == child.char_count() {
                    // the whole child goes
                } else if start_rel == 0 {
                    let r = erase(child, 0, end_rel);
                    after.extend(r.left);
                    after.extend(r.right);
                } else {
                    let r = erase(child, start_rel, child.char_count());
                    before.extend(r.left);
                    before.extend(r.right);
                }
            } else {
                let start_tree = &children[start_child];
                let end_tree = &children[end_child];

                if start_rel > 0 {
                    let r = erase(start_tree, start_rel, start_tree.char_count());
                    before.extend(r.left);
                    before.extend(r.right);
                }
                if end_rel < end_tree.char_count() {
                    let r = erase(end_tree, 0, end_rel);
                    after.extend(r.left);
                    after.extend(r.right);
                }
                // children strictly between the two are dropped
            }
            after.extend(children[end_child + 1..].iter().cloned());

            let left = fold_concat(&before);
            let right = fold_concat(&after);

            let combined = match (left, right) {
                (Some(l), Some(r)) => {
                    let (l, r) = match mend_seam(&l, &r) {
                        Some((l2, r2)) => (l2, r2),
                        None => (l, Some(r)),
                    };
                    Some(match r {
                        Some(r) => tree_concat(&l, &r),
                        None => l,
                    })
                }
                (Some(l), None) => Some(l),
                (None, Some(r)) => Some(r),
                (None, None) => None,
            };

            EraseResult {
                left: combined,
                right: None,
            }
        }
    }
}

fn fold_concat(parts: &[Tree]) -> Option<Tree> {
    let mut acc: Option<Tree> = None;
    for part in parts {
        acc = Some(match acc {
            None => part.clone(),
            Some(a) => tree_concat(&a, part),
        });
    }
    acc
}

//===========================================================================
