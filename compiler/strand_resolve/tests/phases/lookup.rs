//! Name lookup after both phases.

use pretty_assertions::assert_eq;
use strand_resolve::{ImportErrorKind, Resolved};

use crate::common::{find, Tree};

#[test]
fn plain_import_exposes_members() {
    let tree = Tree::new(&[("main.sd", "import std.io;"), ("std/io.sd", "fn say(x);")]);
    let (mut session, main) = tree.analyze("main.sd");

    assert_eq!(find(&mut session, main, "say").as_deref(), Some("function std.io.say"));
    assert_eq!(find(&mut session, main, "io.say").as_deref(), Some("function std.io.say"));
    assert_eq!(
        find(&mut session, main, "std.io.say").as_deref(),
        Some("function std.io.say")
    );
}

#[test]
fn static_import_requires_qualification() {
    let tree = Tree::new(&[("main.sd", "static import util;"), ("util.sd", "fn helper();")]);
    let (mut session, main) = tree.analyze("main.sd");

    assert_eq!(find(&mut session, main, "helper"), None);
    assert_eq!(
        find(&mut session, main, "util.helper").as_deref(),
        Some("function util.helper")
    );
}

#[test]
fn module_alias_replaces_module_name() {
    let tree = Tree::new(&[("main.sd", "import std.io as out;"), ("std/io.sd", "fn say(x);")]);
    let (mut session, main) = tree.analyze("main.sd");

    assert_eq!(find(&mut session, main, "out").as_deref(), Some("module std.io"));
    assert_eq!(find(&mut session, main, "io"), None);
    assert_eq!(find(&mut session, main, "std"), None);
    assert_eq!(find(&mut session, main, "say"), None);
}

#[test]
fn selective_import_binds_only_selected_names() {
    let tree = Tree::new(&[
        ("main.sd", "import util : helper, h = other;"),
        ("util.sd", "fn helper();\nfn other();\nfn third();"),
    ]);
    let (mut session, main) = tree.analyze("main.sd");
    assert!(!session.has_errors(), "{:?}", session.errors());

    assert_eq!(find(&mut session, main, "helper").as_deref(), Some("function util.helper"));
    assert_eq!(find(&mut session, main, "h").as_deref(), Some("function util.other"));
    assert_eq!(find(&mut session, main, "other"), None);
    assert_eq!(find(&mut session, main, "third"), None);
    assert_eq!(find(&mut session, main, "util"), None);
}

#[test]
fn private_imports_are_not_reexported() {
    let tree = Tree::new(&[
        ("main.sd", "import mid;"),
        ("mid.sd", "import leaf;\nfn m();"),
        ("leaf.sd", "fn deep();"),
    ]);
    let (mut session, main) = tree.analyze("main.sd");

    assert_eq!(find(&mut session, main, "m").as_deref(), Some("function mid.m"));
    assert_eq!(find(&mut session, main, "deep"), None);
    assert_eq!(find(&mut session, main, "mid.leaf"), None);
}

#[test]
fn public_imports_are_reexported() {
    let tree = Tree::new(&[
        ("main.sd", "import mid;"),
        ("mid.sd", "public import leaf;"),
        ("leaf.sd", "fn deep();"),
    ]);
    let (mut session, main) = tree.analyze("main.sd");

    assert_eq!(find(&mut session, main, "deep").as_deref(), Some("function leaf.deep"));
    assert_eq!(find(&mut session, main, "mid.leaf").as_deref(), Some("module leaf"));
}

#[test]
fn package_imports_stay_inside_the_package() {
    let tree = Tree::new(&[
        ("main.sd", "import lib.api;\nimport lib.peer;"),
        ("lib/api.sd", "package import lib.core;"),
        ("lib/peer.sd", "import lib.api;"),
        ("lib/core.sd", "fn inner();"),
    ]);
    let (mut session, main) = tree.analyze("main.sd");
    assert!(!session.has_errors(), "{:?}", session.errors());

    assert_eq!(find(&mut session, main, "inner"), None);
    assert_eq!(find(&mut session, main, "lib.api.inner"), None);

    let peer = session.cache().lookup("lib.peer").unwrap();
    assert_eq!(
        find(&mut session, peer, "inner").as_deref(),
        Some("function lib.core.inner")
    );
    assert_eq!(
        find(&mut session, peer, "lib.api.inner").as_deref(),
        Some("function lib.core.inner")
    );
}

#[test]
fn local_members_shadow_imported_ones() {
    let tree = Tree::new(&[("main.sd", "import util;\nlet v;"), ("util.sd", "let v;")]);
    let (mut session, main) = tree.analyze("main.sd");
    assert!(!session.has_errors());
    assert_eq!(find(&mut session, main, "v").as_deref(), Some("variable main.v"));
}

#[test]
fn overloads_merge_across_imports() {
    let tree = Tree::new(&[
        ("main.sd", "import one;\nimport two;"),
        ("one.sd", "fn f(a);"),
        ("two.sd", "fn f(a, b);"),
    ]);
    let (mut session, main) = tree.analyze("main.sd");
    let f = session.name("f");
    match session.search(main, f).unwrap() {
        Some(Resolved::Overloads(set)) => assert_eq!(set.len(), 2),
        other => panic!("expected an overload set, got {other:?}"),
    }
}

#[test]
fn ambiguous_variables_across_imports() {
    let tree = Tree::new(&[
        ("main.sd", "import one;\nimport two;"),
        ("one.sd", "let v;"),
        ("two.sd", "let v;"),
    ]);
    let (mut session, main) = tree.analyze("main.sd");
    let v = session.name("v");
    let err = session.search(main, v).unwrap_err();
    assert_eq!(err.kind, ImportErrorKind::ImportNameConflict);
    assert!(err.message.contains("ambiguous"));
}

#[test]
fn package_falls_back_to_its_own_module() {
    let tree = Tree::new(&[
        ("main.sd", "import std;\nimport std.io;"),
        ("std/package.sd", "fn version();"),
        ("std/io.sd", "fn say(x);"),
    ]);
    let (mut session, main) = tree.analyze("main.sd");

    assert_eq!(
        find(&mut session, main, "std.version").as_deref(),
        Some("function std.version")
    );
    assert_eq!(find(&mut session, main, "std.io").as_deref(), Some("module std.io"));
}

#[test]
fn cyclic_exposure_terminates() {
    let tree = Tree::new(&[
        ("a.sd", "public import b;\nfn fa();"),
        ("b.sd", "public import a;\nfn fb();"),
    ]);
    let (mut session, a) = tree.analyze("a.sd");

    assert_eq!(find(&mut session, a, "fb").as_deref(), Some("function b.fb"));
    assert_eq!(find(&mut session, a, "fa").as_deref(), Some("function a.fa"));
    let b = session.cache().lookup("b").unwrap();
    assert_eq!(find(&mut session, b, "fa").as_deref(), Some("function a.fa"));
}

#[test]
fn never_interned_names_are_not_found() {
    let tree = Tree::new(&[("main.sd", "fn f();")]);
    let (mut session, main) = tree.analyze("main.sd");
    assert_eq!(find(&mut session, main, "no_such_name_anywhere"), None);
}
