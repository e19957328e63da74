//! Joining subtrees of arbitrary heights.

use crate::tree::{branch_or_single, replace_child, ChildVec, Tree, MAX_CHILDREN};

/// Concatenates two subtrees, `left`'s text preceding `right`'s.
///
/// The trees may have different heights: the shorter one is carried down
/// the adjacent spine of the taller until the heights match, and the spine
/// is rebuilt on the way back out, merging or splitting nodes as needed.
/// The result always satisfies the tree invariants; its height is at most
/// one greater than the taller input.
pub(crate) fn tree_concat(left: &Tree, right: &Tree) -> Tree {
    use std::cmp::Ordering;

    match left.height().cmp(&right.height()) {
        Ordering::Equal => merge_trees(left, right),

        Ordering::Less => {
            let right_children = right.children();

            if left.is_saturated() && left.height() + 1 == right.height() {
                let (a, b) = insert_child(right, 0, left.clone());
                match b {
                    None => a,
                    Some(b) => merge_trees(&a, &b),
                }
            } else {
                let subtree = tree_concat(left, &right_children[0]);
                if subtree.height() + 1 == right.height() {
                    replace_child(right, 0, subtree)
                } else {
                    // the merge grew to the full height; fold the
                    // remaining children back in
                    let rest = branch_or_single(right.height(), &right_children[1..]);
                    tree_concat(&subtree, &rest)
                }
            }
        }

        Ordering::Greater => {
            let left_children = left.children();
            let last = left_children.len() - 1;

            if right.is_saturated() && right.height() + 1 == left.height() {
                let (a, b) = insert_child(left, left.child_count(), right.clone());
                match b {
                    None => a,
                    Some(b) => merge_trees(&a, &b),
                }
            } else {
                let subtree = tree_concat(&left_children[last], right);
                if subtree.height() + 1 == left.height() {
                    replace_child(left, last, subtree)
                } else {
                    let rest = branch_or_single(left.height(), &left_children[..last]);
                    tree_concat(&rest, &subtree)
                }
            }
        }
    }
}

/// Joins two subtrees of equal height under (or into) a common node.
fn merge_trees(left: &Tree, right: &Tree) -> Tree {
    debug_assert_eq!(left.height(), right.height());

    if left.is_leaf() {
        debug_assert!(right.is_leaf());
        return Tree::from_children(2, [left.clone(), right.clone()].into_iter().collect());
    }

    let height = left.height();
    let total = left.child_count() + right.child_count();

    if left.is_saturated() && right.is_saturated() {
        Tree::from_children(height + 1, [left.clone(), right.clone()].into_iter().collect())
    } else if total <= MAX_CHILDREN {
        // one side is underfull and everything fits in a single node
        let children: ChildVec = left
            .children()
            .iter()
            .chain(right.children())
            .cloned()
            .collect();
        Tree::from_children(height, children)
    } else {
        // redistribute the children across two nodes, left taking the
        // majority, and parent them
        let right_count = total / 2;
        let left_count = total - right_count;

        let all: ChildVec = left
            .children()
            .iter()
            .chain(right.children())
            .cloned()
            .collect();
        let new_left = Tree::from_children(height, all[..left_count].iter().cloned().collect());
        let new_right = Tree::from_children(height, all[left_count..].iter().cloned().collect());

        Tree::from_children(height + 1, [new_left, new_right].into_iter().collect())
    }
}

/// Inserts a child into a branch, splitting the branch in two when it
/// would exceed the branching factor.
pub(crate) fn insert_child(branch: &Tree, child_idx: usize, child: Tree) -> (Tree, Option<Tree>) {
    debug_assert!(child_idx <= branch.child_count());
    debug_assert_eq!(child.height() + 1, branch.height());

    let height = branch.height();
    let mut children: ChildVec = branch.children().iter().cloned().collect();
    children.insert(child_idx, child);

    if children.len() <= MAX_CHILDREN {
        (Tree::from_children(height, children), None)
    } else {
        let split = (children.len() + 1) / 2;
        let right: ChildVec = children[split..].iter().cloned().collect();
        children.truncate(split);
        (
            Tree::from_children(height, children),
            Some(Tree::from_children(height, right)),
        )
    }
}

//===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Text, Tree};

    fn leaf(text: &str) -> Tree {
        Tree::from_text(Text::from_str(text))
    }

    fn collect(tree: &Tree) -> String {
        fn walk(tree: &Tree, out: &mut String) {
            if tree.is_leaf() {
                out.push_str(tree.leaf_str());
            } else {
                for child in tree.children() {
                    walk(child, out);
                }
            }
        }
        let mut out = String::new();
        walk(tree, &mut out);
        out
    }

    fn validate(tree: &Tree) {
        tree.assert_balance();
        tree.assert_node_fill(true);
        tree.assert_info_accuracy();
    }

    #[test]
    fn merge_leaves_01() {
        let tree = tree_concat(&leaf("hello "), &leaf("world"));
        assert_eq!(collect(&tree), "hello world");
        assert_eq!(tree.height(), 2);
        validate(&tree);
    }

    #[test]
    fn concat_equal_heights_01() {
        let a = Tree::from_children(2, [leaf("ab"), leaf("cd")].into_iter().collect());
        let b = Tree::from_children(2, [leaf("ef"), leaf("gh")].into_iter().collect());
        let tree = tree_concat(&a, &b);
        assert_eq!(collect(&tree), "abcdefgh");
        validate(&tree);
    }

    #[test]
    fn concat_unequal_heights_01() {
        let a = Tree::from_children(
            2,
            [leaf("ab"), leaf("cd"), leaf("ef"), leaf("gh")]
                .into_iter()
                .collect(),
        );
        let b = leaf("ij");
        let tree = tree_concat(&a, &b);
        assert_eq!(collect(&tree), "abcdefghij");
        validate(&tree);

        let tree = tree_concat(&b, &a);
        assert_eq!(collect(&tree), "ijabcdefgh");
        validate(&tree);
    }

    #[test]
    fn concat_many_01() {
        let mut tree = leaf("x");
        for _ in 0..100 {
            tree = tree_concat(&tree, &leaf("x"));
        }
        assert_eq!(collect(&tree).len(), 101);
        validate(&tree);

        let mut tree = leaf("y");
        for _ in 0..100 {
            tree = tree_concat(&leaf("y"), &tree);
        }
        assert_eq!(collect(&tree).len(), 101);
        validate(&tree);
    }

    #[test]
    fn insert_child_split_01() {
        let full = Tree::from_children(
            2,
            [leaf("ab"), leaf("cd"), leaf("ef"), leaf("gh")]
                .into_iter()
                .collect(),
        );
        let (a, b) = insert_child(&full, 2, leaf("XY"));
        let b = b.expect("a full branch must split");
        assert_eq!(a.child_count(), 3);
        assert_eq!(b.child_count(), 2);
        assert_eq!(collect(&a) + &collect(&b), "abcdXYefgh");
    }
}
