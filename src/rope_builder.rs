use smallvec::SmallVec;

use crate::rope::Rope;
use crate::str_utils::{find_split_point, SplitBias};
use crate::tree::{Text, Tree, MAX_CHILDREN, MAX_TEXT_SIZE};

/// How many subtrees a builder level stages before rolling a node up to
/// the level above.
const MAX_STAGED: usize = MAX_CHILDREN + (MAX_CHILDREN + 1) / 2;

/// An efficient incremental `Rope` builder.
///
/// Feeding text chunks through `append()` and calling `finish()` runs in
/// time linear to the total text, unlike repeatedly inserting at the end
/// of a rope, and produces a balanced tree directly.
///
/// Internally this is a stack of levels, one per tree height.  Leaves are
/// carved off the input at CRLF-safe break points and staged at level 0;
/// whenever a level fills up, its first `MAX_CHILDREN` entries roll up
/// into a node staged one level higher.  `finish()` then collapses each
/// level in turn, splitting a too-wide level into two balanced nodes so
/// no branch ends up underfull.
///
/// # Example
/// ```
/// # use twine::RopeBuilder;
/// #
/// let mut builder = RopeBuilder::new();
///
/// builder.append("Hello ");
/// builder.append("world!\n");
/// builder.append("How's ");
/// builder.append("it goin");
/// builder.append("g?");
///
/// let rope = builder.finish();
///
/// assert_eq!(rope, "Hello world!\nHow's it going?");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RopeBuilder {
    levels: Vec<SmallVec<[Tree; MAX_STAGED]>>,
    buffer: String,
}

impl RopeBuilder {
    /// Creates a new `RopeBuilder`, ready for input.
    pub fn new() -> Self {
        RopeBuilder {
            levels: Vec::new(),
            buffer: String::new(),
        }
    }

    /// Appends `chunk` to the end of the in-progress `Rope`.
    ///
    /// The chunk can be as large or small as desired; full leaves are
    /// carved off as soon as enough text has accumulated.  A trailing CR
    /// is always held back with the pending text, so a CRLF pair arriving
    /// split across two chunks still lands in one leaf.
    pub fn append(&mut self, chunk: &str) {
        self.buffer.push_str(chunk);

        while self.buffer.len() > MAX_TEXT_SIZE {
            let idx = find_split_point(self.buffer.as_bytes(), MAX_TEXT_SIZE, SplitBias::HardLeft);
            debug_assert!(idx > 0 && idx <= MAX_TEXT_SIZE);

            let rest = self.buffer.split_off(idx);
            let leaf_text = std::mem::replace(&mut self.buffer, rest);
            self.push_leaf(&leaf_text);
        }
    }

    /// Finishes the build and returns the `Rope`.
    ///
    /// Note: this method consumes the builder.  To keep building other
    /// ropes with the same prefix, clone the builder before calling it.
    pub fn finish(mut self) -> Rope {
        if !self.buffer.is_empty() {
            let last = std::mem::take(&mut self.buffer);
            self.push_leaf(&last);
        }

        if self.levels.is_empty() {
            return Rope::new();
        }

        // roll the levels up from the bottom; the loop always terminates
        // at a level holding exactly one staged tree
        let mut level = 0;
        loop {
            let staged = std::mem::take(&mut self.levels[level]);
            let is_top = level == self.levels.len() - 1;

            if is_top && staged.len() == 1 {
                return Rope::from_root(staged.into_iter().next().unwrap());
            }

            if staged.len() <= MAX_CHILDREN {
                let node = Tree::from_children(level + 2, staged.into_iter().collect());
                self.stage(level + 1, node);
            } else {
                // too wide for one node: split into two balanced halves
                // so neither ends up underfull
                let left_count = (staged.len() + 1) / 2;
                let left = Tree::from_children(
                    level + 2,
                    staged[..left_count].iter().cloned().collect(),
                );
                let right = Tree::from_children(
                    level + 2,
                    staged[left_count..].iter().cloned().collect(),
                );
                self.stage(level + 1, left);
                self.stage(level + 1, right);
            }

            level += 1;
        }
    }

    //-----------------------------------------------------------------

    fn push_leaf(&mut self, text: &str) {
        debug_assert!(!text.is_empty() && text.len() <= MAX_TEXT_SIZE);
        self.stage(0, Tree::from_text(Text::from_str(text)));
    }

    fn stage(&mut self, level: usize, tree: Tree) {
        if level == self.levels.len() {
            self.levels.push(SmallVec::new());
        }

        if self.levels[level].len() == MAX_STAGED {
            // roll the leftmost MAX_CHILDREN into a node one level up,
            // keeping the rest staged here
            let rolled: SmallVec<[Tree; MAX_CHILDREN]> =
                self.levels[level].drain(..MAX_CHILDREN).collect();
            let node = Tree::from_children(level + 2, rolled.into_iter().collect());
            self.stage(level + 1, node);
        }

        self.levels[level].push(tree);
    }
}

//===========================================================================
