//! Import export: canonical declaration text, dependency records and JSON.
//!
//! A dependency record is one line per resolved import:
//!
//! ```text
//! app.main (src/app/main.sd) : private : static : std.io (lib/std/io.sd) : say = writeln, flush
//! ```
//!
//! Fields are separated by ` : `. Every field is escaped with
//! [`escape_path`], so the only raw spaces, colons and parentheses on a
//! line are the separators themselves.

use std::fmt::Write as _;

use serde::Serialize;
use strand_diagnostic::span_utils::LineOffsetTable;
use strand_ir::{ImportDecl, StringLookup, Visibility};

use crate::symbol::ModuleId;
use crate::ModuleCache;

/// Render a declaration back to source text.
///
/// Private is the default visibility and is left implicit.
pub fn render_import<I: StringLookup + ?Sized>(decl: &ImportDecl, interner: &I) -> String {
    let mut out = String::new();
    if decl.visibility != Visibility::Private {
        out.push_str(decl.visibility.keyword());
        out.push(' ');
    }
    if decl.is_static {
        out.push_str("static ");
    }
    out.push_str("import ");
    for (i, segment) in decl.path().enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(interner.lookup(segment));
    }
    if let Some(alias) = decl.module_alias {
        let _ = write!(out, " as {}", interner.lookup(alias));
    }
    for (i, binding) in decl.bindings.iter().enumerate() {
        out.push_str(if i == 0 { " : " } else { ", " });
        if let Some(local) = binding.alias {
            let _ = write!(out, "{} = ", interner.lookup(local));
        }
        out.push_str(interner.lookup(binding.name));
    }
    out.push(';');
    out
}

/// One `local = source` pair of a dependency record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BindingPair {
    pub local: String,
    pub source: String,
}

/// One import of one module, as build tooling sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DependencyRecord {
    pub importer: String,
    pub importer_file: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub imported: String,
    pub imported_file: String,
    pub bindings: Vec<BindingPair>,
}

/// Why a dependency line could not be read back.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("expected 4 or 5 fields separated by ` : `, found {0}")]
    FieldCount(usize),
    #[error("expected `name (file)`, found `{0}`")]
    ModuleField(String),
    #[error("unknown visibility `{0}`")]
    Visibility(String),
    #[error("expected `static` or `plain`, found `{0}`")]
    StaticFlag(String),
    #[error("malformed binding `{0}`")]
    Binding(String),
    #[error("invalid escape sequence `\\{0}`")]
    Escape(char),
    #[error("malformed unicode escape `\\u{{{0}}}`")]
    Unicode(String),
    #[error("dangling `\\` at end of field")]
    DanglingEscape,
}

impl DependencyRecord {
    pub fn to_line(&self) -> String {
        let mut line = format!(
            "{} ({}) : {} : {} : {} ({})",
            escape_path(&self.importer),
            escape_path(&self.importer_file),
            self.visibility.keyword(),
            if self.is_static { "static" } else { "plain" },
            escape_path(&self.imported),
            escape_path(&self.imported_file),
        );
        for (i, pair) in self.bindings.iter().enumerate() {
            line.push_str(if i == 0 { " : " } else { ", " });
            if pair.local != pair.source {
                let _ = write!(line, "{} = ", escape_path(&pair.local));
            }
            line.push_str(&escape_path(&pair.source));
        }
        line
    }

    pub fn parse_line(line: &str) -> Result<Self, RecordError> {
        let fields: Vec<&str> = line.split(" : ").collect();
        if !(4..=5).contains(&fields.len()) {
            return Err(RecordError::FieldCount(fields.len()));
        }
        let (importer, importer_file) = parse_module_field(fields[0])?;
        let visibility = parse_visibility(fields[1])
            .ok_or_else(|| RecordError::Visibility(fields[1].to_string()))?;
        let is_static = match fields[2] {
            "static" => true,
            "plain" => false,
            other => return Err(RecordError::StaticFlag(other.to_string())),
        };
        let (imported, imported_file) = parse_module_field(fields[3])?;

        let mut bindings = Vec::new();
        if let Some(list) = fields.get(4) {
            for item in list.split(", ") {
                let pair = match item.split_once(" = ") {
                    Some((local, source)) => BindingPair {
                        local: unescape_path(local)?,
                        source: unescape_path(source)?,
                    },
                    None if !item.is_empty() => {
                        let name = unescape_path(item)?;
                        BindingPair {
                            local: name.clone(),
                            source: name,
                        }
                    }
                    None => return Err(RecordError::Binding(item.to_string())),
                };
                bindings.push(pair);
            }
        }

        Ok(DependencyRecord {
            importer,
            importer_file,
            visibility,
            is_static,
            imported,
            imported_file,
            bindings,
        })
    }
}

fn parse_module_field(field: &str) -> Result<(String, String), RecordError> {
    let malformed = || RecordError::ModuleField(field.to_string());
    let (name, rest) = field.split_once(" (").ok_or_else(malformed)?;
    let file = rest.strip_suffix(')').ok_or_else(malformed)?;
    Ok((unescape_path(name)?, unescape_path(file)?))
}

fn parse_visibility(text: &str) -> Option<Visibility> {
    match text {
        "public" => Some(Visibility::Public),
        "private" => Some(Visibility::Private),
        "package" => Some(Visibility::Package),
        "protected" => Some(Visibility::Protected),
        _ => None,
    }
}

/// Escape a path for a dependency record.
///
/// Backslashes and record separators (`:`, `(`, `)`) get a backslash. Space,
/// tab, newline and carriage return become two-character escapes; any other
/// whitespace becomes `\u{hex}`. An escaped field never contains raw
/// whitespace.
pub fn escape_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            ':' => out.push_str("\\:"),
            ',' => out.push_str("\\,"),
            '=' => out.push_str("\\="),
            ' ' => out.push_str("\\s"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c.is_whitespace() => {
                let _ = write!(out, "\\u{{{:x}}}", u32::from(c));
            }
            _ => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape_path`].
pub fn unescape_path(escaped: &str) -> Result<String, RecordError> {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let next = chars.next().ok_or(RecordError::DanglingEscape)?;
        out.push(match next {
            '\\' | '(' | ')' | ':' | ',' | '=' => next,
            's' => ' ',
            't' => '\t',
            'n' => '\n',
            'r' => '\r',
            'u' => unescape_unicode(&mut chars)?,
            other => return Err(RecordError::Escape(other)),
        });
    }
    Ok(out)
}

/// The `{hex}` tail of a `\u{hex}` escape.
fn unescape_unicode(chars: &mut std::str::Chars<'_>) -> Result<char, RecordError> {
    if chars.next() != Some('{') {
        return Err(RecordError::Unicode(String::new()));
    }
    let mut digits = String::new();
    for c in chars.by_ref() {
        if c == '}' {
            return u32::from_str_radix(&digits, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or(RecordError::Unicode(digits));
        }
        digits.push(c);
    }
    Err(RecordError::Unicode(digits))
}

/// Dependency records for every resolved import of `module`, in source
/// order. Imports that failed to resolve have no target and are skipped.
pub fn dependency_records<I: StringLookup + ?Sized>(
    cache: &ModuleCache,
    module: ModuleId,
    interner: &I,
) -> Vec<DependencyRecord> {
    let importer = cache.module(module);
    importer
        .imports
        .iter()
        .filter_map(|import| {
            let target = cache.module(import.resolved_module()?);
            Some(DependencyRecord {
                importer: importer.path.clone(),
                importer_file: importer.file().display().to_string(),
                visibility: import.prot(),
                is_static: import.syntax.is_static,
                imported: target.path.clone(),
                imported_file: target.file().display().to_string(),
                bindings: import
                    .syntax
                    .bindings
                    .iter()
                    .map(|b| BindingPair {
                        local: interner.lookup(b.local_name()).to_string(),
                        source: interner.lookup(b.name).to_string(),
                    })
                    .collect(),
            })
        })
        .collect()
}

/// JSON description of one import declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImportJson {
    pub kind: &'static str,
    /// Dotted path as written.
    pub name: String,
    pub line: u32,
    pub protection: Visibility,
    #[serde(rename = "static")]
    pub is_static: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Resolved module path and file; absent when resolution failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selective: Vec<BindingPair>,
}

pub fn import_json<I: StringLookup + ?Sized>(
    cache: &ModuleCache,
    module: ModuleId,
    interner: &I,
) -> Vec<ImportJson> {
    let data = cache.module(module);
    let lines = LineOffsetTable::build(&data.source);
    data.imports
        .iter()
        .map(|import| {
            let syntax = &import.syntax;
            let target = import.resolved_module().map(|id| cache.module(id));
            let path: Vec<_> = syntax.path().collect();
            ImportJson {
                kind: import.kind(),
                name: strand_ir::dotted(interner, &path),
                line: lines.line_from_offset(syntax.span.start),
                protection: import.prot(),
                is_static: syntax.is_static,
                alias: syntax
                    .module_alias
                    .map(|a| interner.lookup(a).to_string()),
                module: target.map(|t| t.path.clone()),
                file: target.map(|t| t.file().display().to_string()),
                selective: syntax
                    .bindings
                    .iter()
                    .map(|b| BindingPair {
                        local: interner.lookup(b.local_name()).to_string(),
                        source: interner.lookup(b.name).to_string(),
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Pretty-printed JSON array.
pub fn to_json<T: Serialize>(items: &[T]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(items)
}

#[cfg(test)]
mod tests;
