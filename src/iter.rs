//! Iterators over a `Rope`'s contents.

use std::str::Chars as StrChars;

use crate::rope::Rope;
use crate::tree::Tree;

/// An iterator over a rope's leaf chunks, in order.
///
/// Each item is the visible window of one leaf, so concatenating the
/// items reproduces the rope's text exactly.  Empty windows (the root of
/// an empty rope) are skipped.
pub struct Chunks<'a> {
    stack: Vec<&'a Tree>,
}

impl<'a> Chunks<'a> {
    pub(crate) fn new(rope: &'a Rope) -> Chunks<'a> {
        Chunks {
            stack: vec![rope.root()],
        }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            let tree = self.stack.pop()?;
            if tree.is_leaf() {
                let text = tree.leaf_str();
                if !text.is_empty() {
                    return Some(text);
                }
            } else {
                for child in tree.children().iter().rev() {
                    self.stack.push(child);
                }
            }
        }
    }
}

/// An iterator over a rope's chars.
///
/// Codepoints are yielded by value; the iterator holds no position into
/// the rope that an edit elsewhere could invalidate.
pub struct Chars<'a> {
    chunks: Chunks<'a>,
    current: StrChars<'a>,
}

impl<'a> Chars<'a> {
    pub(crate) fn new(rope: &'a Rope) -> Chars<'a> {
        Chars {
            chunks: Chunks::new(rope),
            current: "".chars(),
        }
    }
}

impl<'a> Iterator for Chars<'a> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        loop {
            if let Some(c) = self.current.next() {
                return Some(c);
            }
            self.current = self.chunks.next()?.chars();
        }
    }
}

//===========================================================================

#[cfg(test)]
mod tests {
    use crate::Rope;

    #[test]
    fn chunks_01() {
        let text = "abcdefghijklmnopqrstuvwxyz0123456789";
        let rope = Rope::from_str(text);

        let collected: String = rope.chunks().collect();
        assert_eq!(collected, text);

        // small leaves under the test geometry
        for chunk in rope.chunks() {
            assert!(!chunk.is_empty());
        }
    }

    #[test]
    fn chunks_02() {
        let rope = Rope::new();
        assert_eq!(rope.chunks().count(), 0);
    }

    #[test]
    fn chars_01() {
        let text = "こんにちは、みんなさん！\r\nhello.";
        let rope = Rope::from_str(text);

        assert!(rope.chars().eq(text.chars()));
    }

    #[test]
    fn chars_02() {
        let rope = Rope::new();
        assert_eq!(rope.chars().next(), None);
    }
}
