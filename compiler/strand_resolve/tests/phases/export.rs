//! Dependency records and JSON built from a loaded tree.

use pretty_assertions::assert_eq;
use strand_resolve::export::{
    dependency_records, escape_path, import_json, to_json, DependencyRecord,
};

use crate::common::Tree;

#[test]
fn one_record_per_resolved_import() {
    let tree = Tree::new(&[
        (
            "main.sd",
            "public static import std.io : say = writeln, flush;\nimport nowhere;\nimport util;",
        ),
        ("std/io.sd", "fn writeln(x);\nfn flush();"),
        ("util.sd", ""),
    ]);
    let (session, main) = tree.analyze("main.sd");
    let records = dependency_records(session.cache(), main, session.interner());

    assert_eq!(records.len(), 2);
    let main_file = escape_path(&tree.path("main.sd").display().to_string());
    let io_file = escape_path(&tree.path("std/io.sd").display().to_string());
    assert_eq!(
        records[0].to_line(),
        format!("main ({main_file}) : public : static : std.io ({io_file}) : say = writeln, flush")
    );
    assert_eq!(
        records[1].to_line(),
        format!(
            "main ({main_file}) : private : plain : util ({})",
            escape_path(&tree.path("util.sd").display().to_string())
        )
    );

    for record in &records {
        assert_eq!(DependencyRecord::parse_line(&record.to_line()).as_ref(), Ok(record));
    }
}

#[test]
fn paths_with_spaces_survive_a_record() {
    let tree = Tree::new(&[
        ("my project/main.sd", "import util;"),
        ("util.sd", ""),
    ]);
    let mut session = tree.session();
    let main = session.load_root(&tree.path("my project/main.sd")).unwrap();
    let records = dependency_records(session.cache(), main, session.interner());

    let line = records[0].to_line();
    let parsed = DependencyRecord::parse_line(&line).unwrap();
    assert_eq!(
        parsed.importer_file,
        tree.path("my project/main.sd").display().to_string()
    );
}

#[test]
fn json_lists_every_import() {
    let tree = Tree::new(&[
        ("main.sd", "fn f();\nimport util as u;\nimport nowhere : a;"),
        ("util.sd", ""),
    ]);
    let (session, main) = tree.analyze("main.sd");
    let imports = import_json(session.cache(), main, session.interner());

    assert_eq!(imports.len(), 2);
    assert_eq!(imports[0].name, "util");
    assert_eq!(imports[0].line, 2);
    assert_eq!(imports[0].alias.as_deref(), Some("u"));
    assert_eq!(imports[0].module.as_deref(), Some("util"));
    assert_eq!(imports[1].module, None);
    assert_eq!(imports[1].selective.len(), 1);

    let json: serde_json::Value = serde_json::from_str(&to_json(&imports).unwrap()).unwrap();
    assert_eq!(json[0]["kind"], "import");
    assert_eq!(json[0]["protection"], "private");
    assert_eq!(json[0]["static"], false);
    assert!(json[1].get("file").is_none());
}
