//! A cloned rope is an immutable snapshot that can cross threads while
//! the original keeps being edited.

use std::thread;

use twine::Rope;

const TEXT: &str = "Hello there!  How're you doing?\r\nIt's a fine day, \
                    isn't it?\r\nAren't you glad we're alive?\r\n\
                    こんにちは、みんなさん！\n";

#[test]
fn clone_to_thread() {
    let mut rope = Rope::from_str(&TEXT.repeat(20));
    let snapshot = rope.clone();
    let expected = TEXT.repeat(20);

    let reader = thread::spawn(move || {
        // read the snapshot while the main thread edits its own handle
        for _ in 0..50 {
            snapshot.assert_invariants();
            assert_eq!(snapshot, expected);
        }
        snapshot
    });

    for i in 0..50 {
        let pos = (i * 31) % (rope.len_chars() + 1);
        rope.insert(pos, "edit!");
    }
    rope.erase(0, 100);
    rope.assert_invariants();

    let snapshot = reader.join().unwrap();
    assert_eq!(snapshot, TEXT.repeat(20));
    assert_ne!(snapshot, rope);
}

#[test]
fn snapshots_of_every_version() {
    let mut rope = Rope::new();
    let mut versions: Vec<(Rope, String)> = Vec::new();
    let mut model = String::new();

    for i in 0..100 {
        let chunk = format!("chunk{:03}\r\n", i);
        rope.push_back(&chunk);
        model.push_str(&chunk);
        versions.push((rope.clone(), model.clone()));
    }

    let handles: Vec<_> = versions
        .into_iter()
        .map(|(rope, expected)| {
            thread::spawn(move || {
                rope.assert_invariants();
                assert_eq!(rope, expected);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
