//! Phase 1: loading modules and resolving declarations to modules.

use pretty_assertions::assert_eq;
use strand_resolve::{ImportErrorKind, ImportRef, ImportState, LoadState};

use crate::common::{error_kinds, Tree};

#[test]
fn repeated_imports_parse_once() {
    let tree = Tree::new(&[
        ("main.sd", "import util;\nimport util;\nimport other;"),
        ("util.sd", "fn f();"),
        ("other.sd", "import util;"),
    ]);
    let (mut session, calls) = tree.counted_session();
    let main = session.load_root(&tree.path("main.sd")).unwrap();

    assert_eq!(calls.get(), 3);
    let first = session.cache().import(ImportRef { module: main, index: 0 }).resolved_module();
    let second = session.cache().import(ImportRef { module: main, index: 1 }).resolved_module();
    assert_eq!(first, second);

    let again = session.load_module("util").unwrap();
    assert_eq!(Some(again), first);
    assert_eq!(calls.get(), 3);
    assert!(!session.has_errors());
}

#[test]
fn loading_an_import_twice_is_a_no_op() {
    let tree = Tree::new(&[("main.sd", "import util;"), ("util.sd", "fn f();")]);
    let (mut session, calls) = tree.counted_session();
    let main = session.load_root(&tree.path("main.sd")).unwrap();
    let import = ImportRef { module: main, index: 0 };
    let before = session.cache().import(import).state();

    session.load_import(import).unwrap();
    assert_eq!(session.cache().import(import).state(), before);
    assert_eq!(calls.get(), 2);
}

#[test]
fn circular_imports_terminate() {
    let tree = Tree::new(&[
        ("a.sd", "import b;\nfn fa();"),
        ("b.sd", "import a;\nfn fb();"),
    ]);
    let mut session = tree.session();
    let a = session.load_root(&tree.path("a.sd")).unwrap();

    assert!(!session.has_errors(), "{:?}", session.errors());
    assert_eq!(session.cache().len(), 2);
    let b = session.cache().lookup("b").unwrap();
    assert_eq!(
        session.cache().import(ImportRef { module: b, index: 0 }).resolved_module(),
        Some(a)
    );
    assert!(session
        .cache()
        .modules()
        .all(|m| m.state == LoadState::Loaded));
}

#[test]
fn root_uses_header_name() {
    let tree = Tree::new(&[("src/entry.sd", "module app.main;\nimport util;"), ("util.sd", "")]);
    let mut session = tree.session();
    let main = session.load_root(&tree.path("src/entry.sd")).unwrap();
    assert_eq!(session.cache().module(main).path, "app.main");
    assert_eq!(session.cache().lookup("app.main"), Some(main));
}

#[test]
fn missing_module_is_reported_and_siblings_continue() {
    let tree = Tree::new(&[("main.sd", "import nowhere;\nimport util;"), ("util.sd", "")]);
    let mut session = tree.session();
    let main = session.load_root(&tree.path("main.sd")).unwrap();

    assert_eq!(error_kinds(&session), vec![ImportErrorKind::ModuleNotFound]);
    let err = &session.errors()[0];
    assert!(err.span.is_some());
    assert_eq!(err.origin.as_deref(), Some(tree.path("main.sd").as_path()));
    assert_eq!(
        session.cache().import(ImportRef { module: main, index: 0 }).state(),
        ImportState::Failed
    );
    assert!(session
        .cache()
        .import(ImportRef { module: main, index: 1 })
        .resolved_module()
        .is_some());
}

#[test]
fn header_must_match_import_path() {
    let tree = Tree::new(&[("main.sd", "import util;"), ("util.sd", "module other;")]);
    let mut session = tree.session();
    session.load_root(&tree.path("main.sd")).unwrap();
    assert_eq!(error_kinds(&session), vec![ImportErrorKind::ModuleNameMismatch]);
    assert!(session.errors()[0].message.contains("`other`"));
}

#[test]
fn syntax_errors_are_nested() {
    let tree = Tree::new(&[("main.sd", "import broken;"), ("broken.sd", "import ;")]);
    let mut session = tree.session();
    session.load_root(&tree.path("main.sd")).unwrap();

    assert_eq!(error_kinds(&session), vec![ImportErrorKind::ParseFailure]);
    let nested = session.errors()[0].nested.as_ref().unwrap();
    assert_eq!(nested.file, tree.path("broken.sd"));
    assert_eq!(nested.source, "import ;");
    assert!(!nested.diagnostics.is_empty());
}

#[test]
fn broken_module_is_parsed_once() {
    let tree = Tree::new(&[
        ("main.sd", "import broken;\nimport other;"),
        ("other.sd", "import broken;"),
        ("broken.sd", "import ;"),
    ]);
    let (mut session, calls) = tree.counted_session();
    session.load_root(&tree.path("main.sd")).unwrap();

    assert_eq!(calls.get(), 3);
    assert_eq!(
        error_kinds(&session),
        vec![ImportErrorKind::ParseFailure, ImportErrorKind::ParseFailure]
    );
    let with_nested = session.errors().iter().filter(|e| e.nested.is_some()).count();
    assert_eq!(with_nested, 1);
}

#[test]
fn unparsable_root_is_returned() {
    let tree = Tree::new(&[("main.sd", "fn (;")]);
    let mut session = tree.session();
    let err = session.load_root(&tree.path("main.sd")).unwrap_err();
    assert_eq!(err.kind, ImportErrorKind::ParseFailure);
    assert_eq!(err.origin.as_deref(), Some(tree.path("main.sd").as_path()));
}

#[test]
fn duplicate_selective_names_fail_the_import() {
    let tree = Tree::new(&[
        ("main.sd", "import util : x = f, x = g;"),
        ("util.sd", "fn f();\nfn g();"),
    ]);
    let mut session = tree.session();
    let main = session.load_root(&tree.path("main.sd")).unwrap();

    assert_eq!(
        error_kinds(&session),
        vec![ImportErrorKind::DuplicateImportBinding]
    );
    assert_eq!(session.errors()[0].code().as_str(), "E3002");
    assert_eq!(session.errors()[0].related.len(), 1);
    assert_eq!(session.cache().alias_count(), 0);
    assert_eq!(
        session.cache().import(ImportRef { module: main, index: 0 }).state(),
        ImportState::Failed
    );
}

#[test]
fn package_module_and_member_module_share_a_package() {
    let tree = Tree::new(&[
        ("main.sd", "import std;\nimport std.io;"),
        ("std/package.sd", "fn version();"),
        ("std/io.sd", "fn say(x);"),
    ]);
    let (session, _) = tree.analyze("main.sd");
    assert!(!session.has_errors(), "{:?}", session.errors());
    assert_eq!(session.cache().len(), 3);
}
