use super::*;

#[test]
fn intern_is_idempotent() {
    let interner = StringInterner::new();
    let a = interner.intern("writeln");
    let b = interner.intern("writeln");
    assert_eq!(a, b);
    assert_eq!(interner.lookup(a), "writeln");
}

#[test]
fn distinct_strings_get_distinct_names() {
    let interner = StringInterner::new();
    assert_ne!(interner.intern("std"), interner.intern("io"));
}

#[test]
fn empty_string_is_pre_interned() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.lookup(Name::EMPTY), "");
}

#[test]
fn get_does_not_insert() {
    let interner = StringInterner::new();
    let before = interner.len();
    assert_eq!(interner.get("never_seen"), None);
    assert_eq!(interner.len(), before);
}

#[test]
fn keywords_are_pre_interned() {
    let interner = StringInterner::new();
    assert!(interner.get("import").is_some());
    assert!(interner.get("static").is_some());
}

#[test]
fn shared_interner_clones_share_storage() {
    let shared = SharedInterner::new();
    let other = shared.clone();
    let name = shared.intern("shared");
    assert_eq!(other.lookup(name), "shared");
}

#[test]
fn dotted_joins_segments() {
    let interner = StringInterner::new();
    let path = [interner.intern("std"), interner.intern("io")];
    assert_eq!(crate::dotted(&interner, &path), "std.io");
}
