use super::*;

#[test]
fn test_intern_and_lookup() {
    let interner = StringInterner::new();

    let hello = interner.intern("hello");
    let world = interner.intern("world");
    let hello2 = interner.intern("hello");

    assert_eq!(hello, hello2);
    assert_ne!(hello, world);

    assert_eq!(interner.lookup(hello), "hello");
    assert_eq!(interner.lookup(world), "world");
}

#[test]
fn test_empty_string() {
    let interner = StringInterner::new();
    let empty = interner.intern("");
    assert_eq!(empty, Name::from_raw(0));
    assert_eq!(interner.lookup(empty), "");
}

#[test]
fn test_keywords_pre_interned() {
    let interner = StringInterner::new();
    let local = interner.intern("local");
    let function = interner.intern("function");
    let fresh = interner.intern("not_a_keyword");

    assert!(local.index() < fresh.index());
    assert!(function.index() < fresh.index());
    assert_eq!(interner.lookup(local), "local");
    assert_eq!(interner.lookup(function), "function");
}

#[test]
fn test_shared_interner_clones_share_table() {
    let interner = SharedInterner::new();
    let interner2 = interner.clone();

    let a = interner.intern("lib");
    let b = interner2.intern("lib");
    assert_eq!(a, b);
    assert_eq!(interner2.lookup(a), "lib");
}
