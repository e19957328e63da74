use crate::iter::{Chars, Chunks};
use crate::rope_builder::RopeBuilder;
use crate::str_utils::{CR, LF};
use crate::tree::{
    child_for_char_idx, erase, finalize_edit, insert, mend_seam, navigate_to_leaf,
    navigate_upwards_passthrough, split, tree_concat, Tree, MAX_EDIT_SIZE,
};

/// A persistent utf8 text rope.
///
/// A `Rope` is a handle onto an immutable B-tree of text: editing methods
/// build the handful of nodes along one spine and leave everything else
/// shared, so edits are O(log n) in time and memory and previously taken
/// clones are unaffected.  Cloning is an atomic refcount bump, which makes
/// a clone a cheap snapshot that can be sent to another thread.
///
/// Indexing is by char (codepoint).  Line breaks are tracked as a metric,
/// with a CRLF pair always counting as a single break; the tree keeps the
/// pair inside one leaf so no traversal ever sees it split.
#[derive(Clone)]
pub struct Rope {
    root: Tree,
}

impl Rope {
    //-----------------------------------------------------------------
    // Constructors.

    /// Creates an empty `Rope`.
    pub fn new() -> Rope {
        Rope {
            root: Tree::empty(),
        }
    }

    /// Creates a `Rope` from a string slice, in linear time.
    pub fn from_str(text: &str) -> Rope {
        let mut builder = RopeBuilder::new();
        builder.append(text);
        builder.finish()
    }

    pub(crate) fn from_root(root: Tree) -> Rope {
        Rope { root }
    }

    pub(crate) fn root(&self) -> &Tree {
        &self.root
    }

    //-----------------------------------------------------------------
    // Informational methods.

    /// Total number of bytes in the `Rope`.
    pub fn len_bytes(&self) -> usize {
        self.root.byte_count()
    }

    /// Total number of chars in the `Rope`.
    pub fn len_chars(&self) -> usize {
        self.root.char_count()
    }

    /// Whether the `Rope` holds no text at all.
    pub fn is_empty(&self) -> bool {
        self.len_bytes() == 0
    }

    /// Total number of line breaks in the `Rope`.  A CRLF pair counts as
    /// one break.
    pub fn len_line_breaks(&self) -> usize {
        self.root.info().line_breaks
    }

    /// Total number of lines in the `Rope`, i.e. line breaks plus one.
    pub fn len_lines(&self) -> usize {
        self.len_line_breaks() + 1
    }

    /// The char at `char_idx`.
    ///
    /// Panics if `char_idx` is out of bounds.
    pub fn char(&self, char_idx: usize) -> char {
        assert!(
            char_idx < self.len_chars(),
            "attempt to index past the end of the Rope: char index {}, Rope char length {}",
            char_idx,
            self.len_chars()
        );

        navigate_to_leaf(
            &self.root,
            char_idx,
            &|branch: &Tree, idx| child_for_char_idx(branch.children(), idx),
            |leaf: &Tree, idx| {
                let byte_idx = leaf.leaf_byte_of_char(idx);
                leaf.leaf_str()[byte_idx..].chars().next().unwrap()
            },
            &navigate_upwards_passthrough,
        )
    }

    //-----------------------------------------------------------------
    // Edit methods.
    //
    // These replace the rope's root handle; clones taken earlier keep
    // observing the text they were taken from.

    /// Inserts `text` at char index `char_idx`.
    ///
    /// Panics if `char_idx` is out of bounds.
    pub fn insert(&mut self, char_idx: usize, text: &str) {
        assert!(
            char_idx <= self.len_chars(),
            "attempt to insert past the end of the Rope: insertion point {}, Rope char length {}",
            char_idx,
            self.len_chars()
        );

        if text.is_empty() {
            return;
        }

        if text.len() <= MAX_EDIT_SIZE {
            self.root = finalize_edit(insert(&self.root, char_idx, text));
        } else {
            // a large insertion is bulk-built into its own tree and
            // spliced in by split + concatenation
            let middle = Rope::from_str(text).root;
            if self.is_empty() {
                self.root = middle;
            } else if char_idx == 0 {
                self.root = concat_mended(&middle, &self.root);
            } else if char_idx == self.len_chars() {
                self.root = concat_mended(&self.root, &middle);
            } else {
                let r = split(&self.root, char_idx);
                let left = r.left.expect("interior split always has a left side");
                let right = r.right.expect("interior split always has a right side");
                let joined = concat_mended(&left, &middle);
                self.root = concat_mended(&joined, &right);
            }
        }

        self.validate_after_edit();
    }

    /// Appends `text` at the end of the `Rope`.
    pub fn push_back(&mut self, text: &str) {
        self.insert(self.len_chars(), text);
    }

    /// Erases `char_count` chars starting at `char_idx`.
    ///
    /// Panics if the range is out of bounds.  Erasing everything leaves
    /// an empty rope.
    pub fn erase(&mut self, char_idx: usize, char_count: usize) {
        assert!(
            char_idx <= self.len_chars() && char_count <= self.len_chars() - char_idx,
            "attempt to erase past the end of the Rope: range [{}, {}), Rope char length {}",
            char_idx,
            char_idx + char_count,
            self.len_chars()
        );

        if char_count == 0 {
            return;
        }

        let r = erase(&self.root, char_idx, char_idx + char_count);
        self.root = match (r.left, r.right) {
            (None, None) => Tree::empty(),
            (Some(t), None) | (None, Some(t)) => t,
            (Some(l), Some(r)) => tree_concat(&l, &r),
        };

        self.validate_after_edit();
    }

    /// Splits the `Rope` at `char_idx`, returning the two sides.  `self`
    /// is unchanged.
    ///
    /// Panics if `char_idx` is out of bounds.
    pub fn split(&self, char_idx: usize) -> (Rope, Rope) {
        assert!(
            char_idx <= self.len_chars(),
            "attempt to split past the end of the Rope: split point {}, Rope char length {}",
            char_idx,
            self.len_chars()
        );

        if char_idx == 0 {
            return (Rope::new(), self.clone());
        }
        if char_idx == self.len_chars() {
            return (self.clone(), Rope::new());
        }

        let r = split(&self.root, char_idx);
        let left = Rope {
            root: r.left.expect("interior split always has a left side"),
        };
        let right = Rope {
            root: r.right.expect("interior split always has a right side"),
        };

        left.validate_after_edit();
        right.validate_after_edit();
        (left, right)
    }

    /// Appends another `Rope` to the end of this one, consuming it.
    pub fn append(&mut self, other: Rope) {
        if self.is_empty() {
            *self = other;
            return;
        }
        if other.is_empty() {
            return;
        }

        self.root = concat_mended(&self.root, &other.root);
        self.validate_after_edit();
    }

    //-----------------------------------------------------------------
    // Iteration.

    /// An iterator over the rope's leaf chunks, in order.
    pub fn chunks(&self) -> Chunks<'_> {
        Chunks::new(self)
    }

    /// An iterator over the rope's chars.
    pub fn chars(&self) -> Chars<'_> {
        Chars::new(self)
    }

    /// Invokes `f` on each leaf's visible text, in order.
    pub fn for_all_text(&self, mut f: impl FnMut(&str)) {
        for chunk in self.chunks() {
            f(chunk);
        }
    }

    //-----------------------------------------------------------------
    // Debugging.

    /// Checks every tree invariant, panicking on the first violation.
    ///
    /// This is for debugging; it walks the whole tree.  With the
    /// `validation` feature enabled it runs after every editing
    /// operation.
    pub fn assert_invariants(&self) {
        self.root.assert_balance();
        self.root.assert_node_fill(true);
        self.root.assert_info_accuracy();

        // no CRLF pair may be split across adjacent leaves
        let mut prev_ends_cr = false;
        for chunk in self.chunks() {
            let bytes = chunk.as_bytes();
            assert!(
                !(prev_ends_cr && bytes[0] == LF),
                "CRLF pair split across leaves"
            );
            prev_ends_cr = bytes[bytes.len() - 1] == CR;
        }
    }

    #[inline(always)]
    fn validate_after_edit(&self) {
        #[cfg(feature = "validation")]
        self.assert_invariants();
    }
}

/// Concatenates two trees, first mending a CRLF pair that would straddle
/// the junction.
fn concat_mended(left: &Tree, right: &Tree) -> Tree {
    match mend_seam(left, right) {
        Some((l, Some(r))) => tree_concat(&l, &r),
        Some((l, None)) => l,
        None => tree_concat(left, right),
    }
}

//===========================================================================
// Trait impls.

impl Default for Rope {
    fn default() -> Self {
        Rope::new()
    }
}

impl From<&str> for Rope {
    fn from(text: &str) -> Self {
        Rope::from_str(text)
    }
}

impl From<String> for Rope {
    fn from(text: String) -> Self {
        Rope::from_str(&text)
    }
}

impl std::fmt::Display for Rope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for chunk in self.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Rope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Rope(\"")?;
        for chunk in self.chunks() {
            write!(f, "{}", chunk.escape_debug())?;
        }
        f.write_str("\")")
    }
}

/// Equality is over the byte sequence, not the tree shape: two ropes with
/// different internal layouts compare equal when their text matches.
impl PartialEq<Rope> for Rope {
    fn eq(&self, other: &Rope) -> bool {
        if self.len_bytes() != other.len_bytes() {
            return false;
        }

        // zipper down both chunk sequences, comparing the overlap
        let mut chunks_a = self.chunks();
        let mut chunks_b = other.chunks();
        let mut a: &[u8] = &[];
        let mut b: &[u8] = &[];
        loop {
            if a.is_empty() {
                match chunks_a.next() {
                    Some(chunk) => a = chunk.as_bytes(),
                    None => break,
                }
            }
            if b.is_empty() {
                match chunks_b.next() {
                    Some(chunk) => b = chunk.as_bytes(),
                    None => break,
                }
            }

            let n = a.len().min(b.len());
            if a[..n] != b[..n] {
                return false;
            }
            a = &a[n..];
            b = &b[n..];
        }

        // byte lengths matched, so both streams are exhausted
        true
    }
}

impl Eq for Rope {}

impl PartialEq<str> for Rope {
    fn eq(&self, other: &str) -> bool {
        if self.len_bytes() != other.len() {
            return false;
        }
        let mut idx = 0;
        for chunk in self.chunks() {
            if !other.as_bytes()[idx..].starts_with(chunk.as_bytes()) {
                return false;
            }
            idx += chunk.len();
        }
        true
    }
}

impl PartialEq<&str> for Rope {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<Rope> for str {
    fn eq(&self, other: &Rope) -> bool {
        other == self
    }
}

impl PartialEq<Rope> for &str {
    fn eq(&self, other: &Rope) -> bool {
        other == *self
    }
}

impl PartialEq<String> for Rope {
    fn eq(&self, other: &String) -> bool {
        self == other.as_str()
    }
}

impl PartialEq<Rope> for String {
    fn eq(&self, other: &Rope) -> bool {
        other == self.as_str()
    }
}

//===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(rope: &Rope) -> String {
        let mut out = String::new();
        rope.for_all_text(|chunk| out.push_str(chunk));
        out
    }

    #[test]
    fn new_01() {
        let rope = Rope::new();
        assert_eq!(rope.len_chars(), 0);
        assert_eq!(rope.len_bytes(), 0);
        assert_eq!(rope.len_lines(), 1);
        assert!(rope.is_empty());
        rope.assert_invariants();
    }

    #[test]
    fn from_str_01() {
        let text = "Hello there!  How're you doing?\r\nIt's a fine day.\n";
        let rope = Rope::from_str(text);
        assert_eq!(rope, text);
        assert_eq!(rope.len_bytes(), text.len());
        assert_eq!(rope.len_chars(), text.chars().count());
        assert_eq!(rope.len_line_breaks(), 2);
        rope.assert_invariants();
    }

    #[test]
    fn front_insert_small_01() {
        // insert at the front of a small rope
        let mut rope = Rope::from_str("abcd");
        rope.insert(0, "XY");

        assert_eq!(rope, "XYabcd");
        assert_eq!(rope.len_chars(), 6);
        assert_eq!(rope.len_line_breaks(), 0);
        rope.assert_invariants();
    }

    #[test]
    fn crlf_preserved_at_seam_01() {
        // the pair arrives in two pieces; it must still count once and
        // live inside one leaf
        let mut rope = Rope::from_str("line1\r");
        rope.push_back("\nline2");

        assert_eq!(rope, "line1\r\nline2");
        assert_eq!(rope.len_line_breaks(), 1);
        rope.assert_invariants();
    }

    #[test]
    fn crlf_lf_after_trailing_cr_01() {
        let mut rope = Rope::from_str("foo\r");
        rope.insert(rope.len_chars(), "\nbar");

        assert_eq!(rope, "foo\r\nbar");
        assert_eq!(rope.len_line_breaks(), 1);
        rope.assert_invariants();
    }

    #[test]
    fn erase_across_leaves_01() {
        let mut rope = Rope::from_str(&"x".repeat(1000));
        rope.erase(100, 800);

        assert_eq!(rope.len_chars(), 200);
        assert_eq!(collect(&rope), "x".repeat(200));
        rope.assert_invariants();
    }

    #[test]
    fn erase_all_01() {
        // erasing the whole rope leaves an empty rope
        let mut rope = Rope::from_str("hello, world");
        rope.erase(0, 12);

        assert_eq!(rope.len_chars(), 0);
        assert_eq!(rope, "");
        rope.assert_invariants();
    }

    #[test]
    fn split_round_trip_01() {
        let rope = Rope::from_str("hello, world");
        let (left, right) = rope.split(7);

        assert_eq!(left, "hello, ");
        assert_eq!(right, "world");
        assert_eq!(left.len_chars(), 7);

        let mut joined = left;
        joined.append(right);
        assert_eq!(joined, rope);
        joined.assert_invariants();
    }

    #[test]
    fn large_insert_01() {
        // a large insertion takes the bulk-build path
        let big: String = "0123456789".repeat(1000);
        let mut rope = Rope::from_str("ab");
        rope.insert(1, &big);

        assert_eq!(rope.len_chars(), 10002);
        assert_eq!(collect(&rope), format!("a{}b", big));
        rope.assert_invariants();
    }

    #[test]
    fn large_insert_02() {
        // at the front and at the back
        let big: String = "abcdefgh".repeat(100);

        let mut rope = Rope::from_str("xy");
        rope.insert(0, &big);
        assert_eq!(collect(&rope), format!("{}xy", big));
        rope.assert_invariants();

        let mut rope = Rope::from_str("xy");
        rope.insert(2, &big);
        assert_eq!(collect(&rope), format!("xy{}", big));
        rope.assert_invariants();

        let mut rope = Rope::new();
        rope.insert(0, &big);
        assert_eq!(collect(&rope), big);
        rope.assert_invariants();
    }

    #[test]
    fn insert_fill_and_overflow_01() {
        // exactly fills a leaf's edit capacity
        let mut rope = Rope::from_str("abcde");
        rope.insert(5, "fg");
        assert_eq!(rope, "abcdefg");
        rope.assert_invariants();

        // one byte over forces a leaf split
        let mut rope = Rope::from_str("abcde");
        rope.insert(5, "fgh");
        assert_eq!(rope, "abcdefgh");
        rope.assert_invariants();
    }

    #[test]
    fn insert_multibyte_01() {
        // multi-byte codepoints pushed across the leaf capacity
        let mut rope = Rope::from_str("ああa");
        rope.insert(1, "いい");
        assert_eq!(rope, "あいいあa");
        assert_eq!(rope.len_chars(), 5);
        rope.assert_invariants();
    }

    #[test]
    fn insert_grows_root_01() {
        let mut rope = Rope::new();
        for i in 0..200 {
            let pos = (i * 7) % (rope.len_chars() + 1);
            rope.insert(pos, "hello");
            rope.assert_invariants();
        }
        assert_eq!(rope.len_chars(), 1000);
    }

    #[test]
    fn insert_empty_is_noop_01() {
        let mut rope = Rope::from_str("abc");
        let before = rope.clone();
        rope.insert(1, "");
        assert_eq!(rope, before);
    }

    #[test]
    fn erase_zero_is_noop_01() {
        let mut rope = Rope::from_str("abc");
        let before = rope.clone();
        rope.erase(1, 0);
        assert_eq!(rope, before);
    }

    #[test]
    fn empty_rope_ops_01() {
        let mut rope = Rope::new();
        rope.insert(0, "");
        rope.erase(0, 0);
        let (l, r) = rope.split(0);
        assert!(l.is_empty() && r.is_empty());

        let mut rope = Rope::new();
        rope.insert(0, "\n");
        assert_eq!(rope, "\n");
        assert_eq!(rope.len_line_breaks(), 1);
    }

    #[test]
    fn split_concat_all_positions_01() {
        let text = "The quick\r\nbrown fox\njumps over\r\nthe lazy dog.";
        let rope = Rope::from_str(text);

        for i in 0..=rope.len_chars() {
            let (left, right) = rope.split(i);
            assert_eq!(left.len_chars(), i);

            let mut joined = left;
            joined.append(right);
            assert_eq!(joined, rope);
            assert_eq!(joined.len_line_breaks(), rope.len_line_breaks());
            joined.assert_invariants();
        }
    }

    #[test]
    fn clones_are_snapshots_01() {
        let mut rope = Rope::from_str("aaaa");
        let snapshot = rope.clone();
        rope.insert(2, "bb");
        rope.erase(0, 1);

        assert_eq!(rope, "abbaa");
        assert_eq!(snapshot, "aaaa");
    }

    #[test]
    fn char_at_01() {
        let text = "abこd\r\ne";
        let rope = Rope::from_str(text);
        for (i, c) in text.chars().enumerate() {
            assert_eq!(rope.char(i), c);
        }
    }

    #[test]
    #[should_panic]
    fn char_out_of_bounds_01() {
        let rope = Rope::from_str("abc");
        let _ = rope.char(3);
    }

    #[test]
    #[should_panic]
    fn insert_out_of_bounds_01() {
        let mut rope = Rope::from_str("abc");
        rope.insert(4, "x");
    }

    #[test]
    #[should_panic]
    fn erase_out_of_bounds_01() {
        let mut rope = Rope::from_str("abc");
        rope.erase(2, 2);
    }

    #[test]
    fn eq_ignores_shape_01() {
        // same text, different construction history, different shapes
        let text = "The quick brown fox jumps over the lazy dog.";
        let bulk = Rope::from_str(text);

        let mut incremental = Rope::new();
        for c in text.chars() {
            let len = incremental.len_chars();
            incremental.insert(len, &c.to_string());
        }

        assert_eq!(bulk, incremental);
        assert_eq!(incremental, text);
    }

    #[test]
    fn round_trip_from_collected_01() {
        let mut rope = Rope::from_str("one\r\ntwo\r\nthree");
        rope.insert(4, "1.5\r\n");
        rope.erase(0, 2);

        let rebuilt = Rope::from_str(&collect(&rope));
        assert_eq!(rebuilt, rope);
        assert_eq!(rebuilt.len_line_breaks(), rope.len_line_breaks());
    }

    #[test]
    fn line_break_metric_matches_scan_01() {
        let mut rope = Rope::from_str("a\r\nb\rc\nd");
        assert_eq!(rope.len_line_breaks(), 3);

        rope.insert(2, "x");
        // the CR and LF are no longer a pair
        assert_eq!(rope, "a\rx\nb\rc\nd");
        assert_eq!(rope.len_line_breaks(), 4);

        rope.erase(2, 1);
        assert_eq!(rope, "a\r\nb\rc\nd");
        assert_eq!(rope.len_line_breaks(), 3);
        rope.assert_invariants();
    }

    #[test]
    fn display_and_debug_01() {
        let rope = Rope::from_str("ab\"c\n");
        assert_eq!(format!("{}", rope), "ab\"c\n");
        assert_eq!(format!("{:?}", rope), "Rope(\"ab\\\"c\\n\")");
    }
}
