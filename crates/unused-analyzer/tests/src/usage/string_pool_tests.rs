use super::*;

#[test]
fn interning_is_idempotent() {
    let mut pool = StringPool::new();
    let first = pool.intern("a.cpp:1:1");
    let second = pool.intern("a.cpp:1:1");
    assert_eq!(first, second);
    assert_eq!(pool.len(), 1);
}

#[test]
fn handles_are_dense_and_in_insertion_order() {
    let mut pool = StringPool::new();
    let a = pool.intern("a");
    let b = pool.intern("b");
    let c = pool.intern("c");
    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
    assert_eq!(c.index(), 2);
    // Re-interning must not mint a new handle.
    assert_eq!(pool.intern("b").index(), 1);
    assert_eq!(pool.len(), 3);
}

#[test]
fn content_is_retrievable() {
    let mut pool = StringPool::new();
    let id = pool.intern("src/lib.cpp:10:4");
    assert_eq!(pool.get(id), "src/lib.cpp:10:4");
    assert!(pool.contains("src/lib.cpp:10:4"));
    assert!(!pool.contains("src/lib.cpp:10:5"));
}

#[test]
fn equality_is_byte_wise() {
    let mut pool = StringPool::new();
    let plain = pool.intern("a.cpp");
    let padded = pool.intern("a.cpp ");
    assert_ne!(plain, padded);
}

#[test]
fn iter_enumerates_every_handle_once() {
    let mut pool = StringPool::new();
    let ids = ["x", "y", "z"].map(|s| pool.intern(s));
    let collected: Vec<(StrId, &str)> = pool.iter().collect();
    assert_eq!(
        collected,
        vec![(ids[0], "x"), (ids[1], "y"), (ids[2], "z")]
    );
    assert!(pool.iter().count() == pool.len());
}

#[test]
fn empty_pool_behaves() {
    let pool = StringPool::new();
    assert!(pool.is_empty());
    assert_eq!(pool.iter().count(), 0);
}
