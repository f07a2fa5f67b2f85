//! Plain-text rendering of diagnostics against their source file.
//!
//! ```text
//! error[E3001]: module `std.missing` not found
//!   --> src/main.sd:3:1
//!    |
//!  3 | import std.missing;
//!    | ^^^^^^^^^^^^^^^^^^^ not found in any search root
//!    = note: searched: lib
//! ```

use std::fmt::Write as _;

use strand_ir::Span;

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, Label};

/// A source file a diagnostic is reported against.
#[derive(Clone, Debug)]
pub struct SourceFile<'a> {
    pub path: &'a str,
    pub text: &'a str,
    table: LineOffsetTable,
}

impl<'a> SourceFile<'a> {
    pub fn new(path: &'a str, text: &'a str) -> Self {
        SourceFile {
            path,
            text,
            table: LineOffsetTable::build(text),
        }
    }

    fn location(&self, span: Span) -> (u32, u32) {
        self.table.offset_to_line_col(self.text, span.start)
    }
}

/// Render one diagnostic. `source` is `None` when the file is unknown
/// (the diagnostic then falls back to its byte spans).
pub fn render(diag: &Diagnostic, source: Option<&SourceFile<'_>>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}[{}]: {}", diag.severity, diag.code, diag.message);

    let gutter = source.map_or(1, |src| {
        let max_line = diag
            .labels
            .iter()
            .filter(|l| !l.is_cross_file())
            .map(|l| src.location(l.span).0)
            .max()
            .unwrap_or(1);
        max_line.to_string().len()
    });
    let pad = " ".repeat(gutter);

    for label in &diag.labels {
        render_label(&mut out, label, source, &pad);
    }
    for note in &diag.notes {
        let _ = writeln!(out, "{pad} = note: {note}");
    }
    for suggestion in &diag.suggestions {
        let _ = writeln!(out, "{pad} = help: {suggestion}");
    }
    out
}

fn render_label(out: &mut String, label: &Label, source: Option<&SourceFile<'_>>, pad: &str) {
    if let Some(file) = &label.file {
        let _ = writeln!(out, "{pad}::: {file} @ {}: {}", label.span, label.message);
        return;
    }
    let Some(src) = source else {
        let _ = writeln!(out, "{pad}--> {}: {}", label.span, label.message);
        return;
    };

    let (line, col) = src.location(label.span);
    let arrow = if label.is_primary { "-->" } else { ":::" };
    let _ = writeln!(out, "{pad}{arrow} {}:{line}:{col}", src.path);

    let Some(text) = src.table.line_text(src.text, line) else {
        return;
    };
    let _ = writeln!(out, "{pad} |");
    let _ = writeln!(out, "{line:>width$} | {text}", width = pad.len());

    let line_chars = text.chars().count();
    let start_col = (col as usize).saturating_sub(1);
    let span_chars = src
        .text
        .get(label.span.start as usize..label.span.end as usize)
        .map_or(1, |s| s.chars().take_while(|c| *c != '\n').count())
        .max(1)
        .min(line_chars.saturating_sub(start_col).max(1));
    let marker = if label.is_primary { '^' } else { '-' };
    let _ = writeln!(
        out,
        "{pad} | {}{} {}",
        " ".repeat(start_col),
        marker.to_string().repeat(span_chars),
        label.message
    );
}

/// Render many diagnostics, separated by blank lines, followed by a summary
/// line when any of them is an error.
pub fn render_all(diags: &[Diagnostic], source: Option<&SourceFile<'_>>) -> String {
    let mut out = String::new();
    for diag in diags {
        out.push_str(&render(diag, source));
        out.push('\n');
    }
    let errors = diags.iter().filter(|d| d.is_error()).count();
    if errors > 0 {
        let plural = if errors == 1 { "" } else { "s" };
        let _ = writeln!(out, "error: aborting due to {errors} previous error{plural}");
    }
    out
}
