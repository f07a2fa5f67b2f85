use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use strand_ir::StringInterner;

fn first_import(source: &str, interner: &StringInterner) -> ImportDecl {
    let output = strand_parse::parse_source(source, interner);
    assert!(!output.has_errors(), "{source}");
    output.module.imports[0].clone()
}

#[test]
fn render_keeps_static_and_bindings() {
    let interner = StringInterner::new();
    let decl = first_import("static import a.b.c : x = y, z;", &interner);
    assert_eq!(
        render_import(&decl, &interner),
        "static import a.b.c : x = y, z;"
    );
}

#[test]
fn render_omits_private_keeps_others() {
    let interner = StringInterner::new();
    let private = first_import("private import std.io;", &interner);
    assert_eq!(render_import(&private, &interner), "import std.io;");

    let public = first_import("public import std.io as io2;", &interner);
    assert_eq!(render_import(&public, &interner), "public import std.io as io2;");
}

#[test]
fn rendered_text_parses_to_same_meaning() {
    let interner = StringInterner::new();
    for source in [
        "static import a.b.c : x = y, z;",
        "package import util as u;",
        "public static import core.mem : alloc;",
    ] {
        let decl = first_import(source, &interner);
        let again = first_import(&render_import(&decl, &interner), &interner);
        assert!(decl.same_meaning(&again), "{source}");
    }
}

fn record() -> DependencyRecord {
    DependencyRecord {
        importer: "app.main".into(),
        importer_file: "src/my app/main.sd".into(),
        visibility: Visibility::Public,
        is_static: true,
        imported: "std.io".into(),
        imported_file: "C:\\lib\\std(1)\\io.sdi".into(),
        bindings: vec![
            BindingPair {
                local: "say".into(),
                source: "writeln".into(),
            },
            BindingPair {
                local: "flush".into(),
                source: "flush".into(),
            },
        ],
    }
}

#[test]
fn record_line_layout() {
    assert_eq!(
        record().to_line(),
        "app.main (src/my\\sapp/main.sd) : public : static : \
         std.io (C\\:\\\\lib\\\\std\\(1\\)\\\\io.sdi) : say = writeln, flush"
    );
}

#[test]
fn record_line_reads_back() {
    let rec = record();
    assert_eq!(DependencyRecord::parse_line(&rec.to_line()), Ok(rec));

    let plain = DependencyRecord {
        is_static: false,
        visibility: Visibility::Private,
        bindings: Vec::new(),
        ..record()
    };
    assert_eq!(DependencyRecord::parse_line(&plain.to_line()), Ok(plain));
}

#[test]
fn malformed_lines_are_rejected() {
    assert_eq!(
        DependencyRecord::parse_line("a (a.sd) : public"),
        Err(RecordError::FieldCount(2))
    );
    assert_eq!(
        DependencyRecord::parse_line("a (a.sd) : open : static : b (b.sd)"),
        Err(RecordError::Visibility("open".into()))
    );
    assert_eq!(
        DependencyRecord::parse_line("a (a.sd) : public : yes : b (b.sd)"),
        Err(RecordError::StaticFlag("yes".into()))
    );
    assert_eq!(
        DependencyRecord::parse_line("a a.sd : public : plain : b (b.sd)"),
        Err(RecordError::ModuleField("a a.sd".into()))
    );
}

#[test]
fn unescape_rejects_unknown_and_dangling() {
    assert_eq!(unescape_path("a\\q"), Err(RecordError::Escape('q')));
    assert_eq!(unescape_path("a\\"), Err(RecordError::DanglingEscape));
}

#[test]
fn escaped_field_has_no_separators() {
    let escaped = escape_path("a b:(c)\t\n");
    assert!(!escaped.contains(' '));
    assert!(!escaped.contains('\n'));
    assert_eq!(escaped, "a\\sb\\:\\(c\\)\\t\\n");
}

#[test]
fn other_whitespace_uses_unicode_escapes() {
    let path = "a\u{b}b\u{c}c\u{85}d\u{3000}e";
    let escaped = escape_path(path);
    assert_eq!(escaped, "a\\u{b}b\\u{c}c\\u{85}d\\u{3000}e");
    assert!(!escaped.chars().any(char::is_whitespace));
    assert_eq!(unescape_path(&escaped).as_deref(), Ok(path));
}

#[test]
fn unescape_rejects_malformed_unicode() {
    assert_eq!(unescape_path("a\\u85"), Err(RecordError::Unicode(String::new())));
    assert_eq!(unescape_path("a\\u{zz}"), Err(RecordError::Unicode("zz".into())));
    assert_eq!(unescape_path("a\\u{d800}"), Err(RecordError::Unicode("d800".into())));
    assert_eq!(unescape_path("a\\u{85"), Err(RecordError::Unicode("85".into())));
}

proptest! {
    #[test]
    fn escape_round_trips(path in "\\PC*") {
        prop_assert_eq!(unescape_path(&escape_path(&path)), Ok(path));
    }

    #[test]
    fn escape_round_trips_whitespace(
        path in "[ \t\r\n\u{b}\u{c}\u{85}\u{2028}:()\\\\a-z]{0,24}"
    ) {
        let escaped = escape_path(&path);
        prop_assert!(!escaped.chars().any(char::is_whitespace));
        prop_assert_eq!(unescape_path(&escaped), Ok(path));
    }
}
