//! Import resolution errors.
//!
//! Errors are collected rather than failing fast: a failing declaration is
//! marked and resolution continues with its siblings so the driver can
//! report every problem in one pass.

use std::fmt;
use std::path::PathBuf;

use strand_diagnostic::{Diagnostic, ErrorCode};
use strand_ir::Span;

/// Structured error kind for programmatic matching.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ImportErrorKind {
    /// No search root contains the module.
    ModuleNotFound,
    /// Two selective bindings of one declaration share a local name.
    DuplicateImportBinding,
    /// An imported name collides with an incompatible binding.
    ImportNameConflict,
    /// An alias chain leads back to itself.
    CircularAlias,
    /// A selected name does not exist in the imported module.
    SymbolNotFound,
    /// The module file exists but could not be read.
    SourceUnreadable,
    /// The file's `module` header names a different module.
    ModuleNameMismatch,
    /// Two non-overloadable declarations of one module share a name.
    DuplicateDeclaration,
    /// The imported module has syntax errors.
    ParseFailure,
}

impl ImportErrorKind {
    pub fn code(self) -> ErrorCode {
        match self {
            ImportErrorKind::ModuleNotFound => ErrorCode::E3001,
            ImportErrorKind::DuplicateImportBinding => ErrorCode::E3002,
            ImportErrorKind::ImportNameConflict => ErrorCode::E3003,
            ImportErrorKind::CircularAlias => ErrorCode::E3004,
            ImportErrorKind::SymbolNotFound => ErrorCode::E3005,
            ImportErrorKind::SourceUnreadable => ErrorCode::E3006,
            ImportErrorKind::ModuleNameMismatch => ErrorCode::E3007,
            ImportErrorKind::DuplicateDeclaration => ErrorCode::E3008,
            ImportErrorKind::ParseFailure => ErrorCode::E3009,
        }
    }
}

/// Parser diagnostics carried by a [`ImportErrorKind::ParseFailure`],
/// together with the file they point into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NestedDiagnostics {
    pub file: PathBuf,
    pub source: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// An error encountered during import resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportError {
    pub kind: ImportErrorKind,
    /// Human-readable error message with context.
    pub message: String,
    /// Source span of the offending declaration, if known.
    pub span: Option<Span>,
    /// File of the module the span points into.
    pub origin: Option<PathBuf>,
    /// Related sites in the same file, e.g. the earlier of two bindings.
    pub related: Vec<(Span, String)>,
    pub notes: Vec<String>,
    pub nested: Option<Box<NestedDiagnostics>>,
}

impl ImportError {
    /// Create an error without a source span.
    #[cold]
    pub fn new(kind: ImportErrorKind, message: impl Into<String>) -> Self {
        ImportError {
            kind,
            message: message.into(),
            span: None,
            origin: None,
            related: Vec::new(),
            notes: Vec::new(),
            nested: None,
        }
    }

    /// Create an error with a source span.
    #[cold]
    pub fn with_span(kind: ImportErrorKind, message: impl Into<String>, span: Span) -> Self {
        let mut err = Self::new(kind, message);
        err.span = Some(span);
        err
    }

    /// Attach `span` unless the error already points somewhere.
    #[must_use]
    pub fn or_span(mut self, span: Span) -> Self {
        self.span.get_or_insert(span);
        self
    }

    /// Attach the file the error is reported in, unless already set.
    #[must_use]
    pub fn or_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        if self.origin.is_none() {
            self.origin = Some(origin.into());
        }
        self
    }

    #[must_use]
    pub fn with_related(mut self, span: Span, message: impl Into<String>) -> Self {
        self.related.push((span, message.into()));
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    #[must_use]
    pub fn with_nested(mut self, nested: NestedDiagnostics) -> Self {
        self.nested = Some(Box::new(nested));
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code()).with_message(&self.message);
        if let Some(span) = self.span {
            diag = diag.with_label(span, label_text(self.kind));
        }
        for (span, text) in &self.related {
            diag = diag.with_secondary_label(*span, text);
        }
        for note in &self.notes {
            diag = diag.with_note(note);
        }
        if let Some(nested) = &self.nested {
            let count = nested.diagnostics.len();
            diag = diag.with_note(format!(
                "{count} syntax error{} in {}",
                if count == 1 { "" } else { "s" },
                nested.file.display()
            ));
        }
        diag
    }
}

fn label_text(kind: ImportErrorKind) -> &'static str {
    match kind {
        ImportErrorKind::ModuleNotFound => "not found in any search root",
        ImportErrorKind::DuplicateImportBinding => "bound again here",
        ImportErrorKind::ImportNameConflict => "conflicting import",
        ImportErrorKind::CircularAlias => "alias cycle starts here",
        ImportErrorKind::SymbolNotFound => "no such symbol",
        ImportErrorKind::SourceUnreadable => "imported here",
        ImportErrorKind::ModuleNameMismatch => "imported under this name",
        ImportErrorKind::DuplicateDeclaration => "redeclared here",
        ImportErrorKind::ParseFailure => "imported here",
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ImportError {}
