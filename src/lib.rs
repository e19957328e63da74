//! Twine: a persistent text rope for Rust.
//!
//! A [`Rope`] stores utf8 text in a balanced B-tree whose leaves hold
//! small immutable buffers.  Insertion, erasure, splitting, and
//! concatenation at any char position run in logarithmic time, and every
//! edit shares all untouched nodes with the previous version, so cloning
//! a rope gives a cheap immutable snapshot.
//!
//! CRLF line endings get special care: a `"\r\n"` pair always counts as a
//! single line break and is never split across two leaves, no matter how
//! the text was assembled or edited.
//!
//! ```
//! use twine::Rope;
//!
//! let mut rope = Rope::from_str("Hello, world!");
//! rope.insert(7, "wide ");
//! rope.erase(0, 5);
//! assert_eq!(rope, ", wide world!");
//!
//! let (left, right) = rope.split(6);
//! assert_eq!(left, ", wide");
//! assert_eq!(right, " world!");
//! ```

#![allow(clippy::collapsible_if)]
#![allow(clippy::comparison_chain)]
#![allow(clippy::needless_return)]
#![allow(clippy::should_implement_trait)]

pub mod iter;
mod rope;
mod rope_builder;
mod str_utils;
mod tree;

pub use rope::Rope;
pub use rope_builder::RopeBuilder;
