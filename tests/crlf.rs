//! Randomized tests to try to catch CRLF seam errors.

use twine::Rope;

/// Line breaks as the rope should count them: CR, LF, or a CRLF pair as
/// one.
fn count_breaks(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut count = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == 0x0D {
            count += 1;
            if i + 1 < bytes.len() && bytes[i + 1] == 0x0A {
                i += 1;
            }
        } else if bytes[i] == 0x0A {
            count += 1;
        }
        i += 1;
    }
    count
}

fn collect(rope: &Rope) -> String {
    let mut out = String::new();
    rope.for_all_text(|chunk| out.push_str(chunk));
    out
}

fn assert_no_split_pair(rope: &Rope) {
    let mut prev_ends_cr = false;
    rope.for_all_text(|chunk| {
        assert!(
            !(prev_ends_cr && chunk.starts_with('\n')),
            "CRLF pair split across adjacent leaves"
        );
        prev_ends_cr = chunk.ends_with('\r');
    });
}

#[test]
fn crlf_inserts() {
    fastrand::seed(12345);
    let mut rope = Rope::new();

    // a bunch of random incoherent inserts of CRLF fragments
    for _ in 0..512 {
        let len = rope.len_chars().max(1);
        rope.insert(fastrand::usize(..len), "\r\n\r\n");
        rope.insert(fastrand::usize(..len), "\n\r\n\r");
        rope.insert(fastrand::usize(..len), "\r\n\r\n");
        rope.insert(fastrand::usize(..len), "こんいちは、");
        rope.insert(fastrand::usize(..len), "\n\r\n\r");
        rope.insert(fastrand::usize(..len), "\r\n\r\n");
        rope.insert(fastrand::usize(..len), "みんなさん！");

        rope.assert_invariants();
        assert_no_split_pair(&rope);
    }

    assert_eq!(rope.len_line_breaks(), count_breaks(&collect(&rope)));
}

#[test]
fn crlf_removals() {
    fastrand::seed(54321);
    let mut rope = Rope::new();

    for _ in 0..64 {
        let len = rope.len_chars().max(1);
        rope.insert(
            fastrand::usize(..len),
            "\r\n\r\n\r\n\r\nこんいちは、\n\r\n\r\n\rみんなさん！\r\n\r\n",
        );
    }

    // random incoherent removals
    while rope.len_chars() > 64 {
        let start = fastrand::usize(..rope.len_chars());
        let count = 9.min(rope.len_chars() - start);
        rope.erase(start, count);

        rope.assert_invariants();
        assert_no_split_pair(&rope);
        assert_eq!(rope.len_line_breaks(), count_breaks(&collect(&rope)));
    }
}

#[test]
fn crlf_push_back_fragments() {
    let mut rope = Rope::new();
    for i in 0..600 {
        match i % 4 {
            0 => rope.push_back("line\r"),
            1 => rope.push_back("\n"),
            2 => rope.push_back("\r\nmore text here\r"),
            _ => rope.push_back("\ntail"),
        }
    }

    rope.assert_invariants();
    assert_no_split_pair(&rope);
    assert_eq!(rope.len_line_breaks(), count_breaks(&collect(&rope)));
}

#[test]
fn crlf_split_then_append_mends() {
    let text = "aaa\r\nbbb\r\nccc\r\nddd\r\neee\r\n".repeat(40);
    let rope = Rope::from_str(&text);

    for char_idx in (1..rope.len_chars()).step_by(7) {
        let (left, right) = rope.split(char_idx);

        let mut joined = left;
        joined.append(right);

        joined.assert_invariants();
        assert_no_split_pair(&joined);
        assert_eq!(joined.len_line_breaks(), rope.len_line_breaks());
        assert_eq!(joined, rope);
    }
}
