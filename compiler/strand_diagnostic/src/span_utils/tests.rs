use pretty_assertions::assert_eq;

use super::LineOffsetTable;

#[test]
fn single_line() {
    let src = "import std.io;";
    let table = LineOffsetTable::build(src);
    assert_eq!(table.line_count(), 1);
    assert_eq!(table.offset_to_line_col(src, 7), (1, 8));
    assert_eq!(table.line_text(src, 1), Some("import std.io;"));
}

#[test]
fn multiple_lines() {
    let src = "module a;\r\nimport b;\nfn f();";
    let table = LineOffsetTable::build(src);
    assert_eq!(table.line_count(), 3);
    assert_eq!(table.line_from_offset(0), 1);
    assert_eq!(table.line_from_offset(11), 2);
    assert_eq!(table.offset_to_line_col(src, 21), (3, 1));
    assert_eq!(table.line_text(src, 1), Some("module a;"));
    assert_eq!(table.line_text(src, 2), Some("import b;"));
    assert_eq!(table.line_text(src, 4), None);
}

#[test]
fn columns_count_characters() {
    let src = "// é\nimport x;";
    let table = LineOffsetTable::build(src);
    // 'é' is two bytes; the newline sits at byte 5.
    assert_eq!(table.offset_to_line_col(src, 5), (1, 5));
}

#[test]
fn offset_past_end_clamps() {
    let src = "ab";
    let table = LineOffsetTable::build(src);
    assert_eq!(table.offset_to_line_col(src, 100), (1, 3));
    assert_eq!(table.line_start_offset(0), None);
}
