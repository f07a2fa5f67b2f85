//! Phase 2: binding members and imports into scopes.

use pretty_assertions::assert_eq;
use strand_resolve::{ImportErrorKind, LoadState, Resolved};

use crate::common::{error_kinds, find, Tree};

#[test]
fn analyze_marks_modules_integrated() {
    let tree = Tree::new(&[("main.sd", "import util;"), ("util.sd", "fn f();")]);
    let (session, _) = tree.analyze("main.sd");
    assert!(session
        .cache()
        .modules()
        .all(|m| m.state == LoadState::Integrated));
}

#[test]
fn functions_overload_within_a_module() {
    let tree = Tree::new(&[("main.sd", "fn f(a);\nfn f(a, b);")]);
    let (mut session, main) = tree.analyze("main.sd");
    assert!(!session.has_errors());

    let f = session.name("f");
    match session.search(main, f).unwrap() {
        Some(Resolved::Overloads(set)) => assert_eq!(set.len(), 2),
        other => panic!("expected an overload set, got {other:?}"),
    }
}

#[test]
fn non_functions_are_duplicate_declarations() {
    let tree = Tree::new(&[("main.sd", "let x;\nfn y();\nlet x;")]);
    let (session, _) = tree.analyze("main.sd");

    assert_eq!(
        error_kinds(&session),
        vec![ImportErrorKind::DuplicateDeclaration]
    );
    let err = &session.errors()[0];
    assert_eq!(err.related.len(), 1);
    assert_eq!(err.related[0].1, "previous declaration");
    assert_eq!(err.origin.as_deref(), Some(tree.path("main.sd").as_path()));
}

#[test]
fn function_and_variable_do_not_overload() {
    let tree = Tree::new(&[("main.sd", "fn x();\nlet x;")]);
    let (session, _) = tree.analyze("main.sd");
    assert_eq!(
        error_kinds(&session),
        vec![ImportErrorKind::DuplicateDeclaration]
    );
}

#[test]
fn module_alias_conflicting_with_member() {
    let tree = Tree::new(&[("main.sd", "import util as u;\nlet u;"), ("util.sd", "")]);
    let (session, _) = tree.analyze("main.sd");

    assert_eq!(error_kinds(&session), vec![ImportErrorKind::ImportNameConflict]);
    assert_eq!(session.errors()[0].code().as_str(), "E3003");
}

#[test]
fn selective_function_merges_with_local_overloads() {
    let tree = Tree::new(&[
        ("main.sd", "import util : f;\nfn f(a, b);"),
        ("util.sd", "fn f(a);"),
    ]);
    let (mut session, main) = tree.analyze("main.sd");
    assert!(!session.has_errors(), "{:?}", session.errors());

    let f = session.name("f");
    let found = session.search(main, f).unwrap().unwrap();
    assert_eq!(found.members().len(), 2);
}

#[test]
fn selective_variable_conflicts_with_local_function() {
    let tree = Tree::new(&[
        ("main.sd", "import util : v;\nfn v();"),
        ("util.sd", "let v;"),
    ]);
    let (session, _) = tree.analyze("main.sd");
    assert_eq!(error_kinds(&session), vec![ImportErrorKind::ImportNameConflict]);
}

#[test]
fn selective_conflict_through_reexport_is_reported() {
    // `b` is integrated after `main`, so the alias cannot be resolved
    // while `main` binds it.
    let tree = Tree::new(&[
        ("main.sd", "import b : x;\nfn x();"),
        ("b.sd", "public import c;"),
        ("c.sd", "public let x;"),
    ]);
    let (mut session, main) = tree.analyze("main.sd");

    assert_eq!(error_kinds(&session), vec![ImportErrorKind::ImportNameConflict]);
    let err = &session.errors()[0];
    assert_eq!(err.related.len(), 1);
    assert_eq!(err.related[0].1, "previously bound here");
    assert_eq!(err.origin.as_deref(), Some(tree.path("main.sd").as_path()));

    let x = session.name("x");
    let found = session.search(main, x).unwrap().unwrap();
    assert_eq!(found.members().len(), 1);
}

#[test]
fn selective_overload_through_reexport_is_kept() {
    let tree = Tree::new(&[
        ("main.sd", "import b : f;\nfn f(a, b);"),
        ("b.sd", "public import c;"),
        ("c.sd", "public fn f(a);"),
    ]);
    let (mut session, main) = tree.analyze("main.sd");
    assert!(!session.has_errors(), "{:?}", session.errors());

    let f = session.name("f");
    let found = session.search(main, f).unwrap().unwrap();
    assert_eq!(found.members().len(), 2);
}

#[test]
fn same_module_imported_twice_binds_once() {
    let tree = Tree::new(&[
        ("main.sd", "import std.io;\nstatic import std.io;\nimport std.fs;"),
        ("std/io.sd", "fn say(x);"),
        ("std/fs.sd", "fn open(p);"),
    ]);
    let (mut session, main) = tree.analyze("main.sd");
    assert!(!session.has_errors(), "{:?}", session.errors());
    assert_eq!(find(&mut session, main, "std").as_deref(), Some("package std"));
    assert_eq!(
        find(&mut session, main, "std.fs.open").as_deref(),
        Some("function std.fs.open")
    );
}

#[test]
fn unknown_selected_name_is_reported() {
    let tree = Tree::new(&[("main.sd", "import util : missing;"), ("util.sd", "fn f();")]);
    let (session, _) = tree.analyze("main.sd");

    assert_eq!(error_kinds(&session), vec![ImportErrorKind::SymbolNotFound]);
    let err = &session.errors()[0];
    assert!(err.message.contains("`missing`"));
    assert_eq!(err.origin.as_deref(), Some(tree.path("main.sd").as_path()));
}

#[test]
fn hidden_selected_name_mentions_visibility() {
    let tree = Tree::new(&[
        ("main.sd", "import util : hidden;"),
        ("util.sd", "private fn hidden();"),
    ]);
    let (session, _) = tree.analyze("main.sd");

    assert_eq!(error_kinds(&session), vec![ImportErrorKind::SymbolNotFound]);
    assert!(session.errors()[0]
        .notes
        .iter()
        .any(|n| n.contains("not visible")));
}

#[test]
fn circular_aliases_are_reported_once() {
    let tree = Tree::new(&[
        ("a.sd", "public import b : x;"),
        ("b.sd", "public import a : x;"),
    ]);
    let (mut session, a) = tree.analyze("a.sd");

    assert_eq!(error_kinds(&session), vec![ImportErrorKind::CircularAlias]);
    let x = session.name("x");
    assert_eq!(session.search(a, x).unwrap(), None);
}
