//! The parser collaborator.
//!
//! The module cache talks to the parser only through [`ModuleParser`], so
//! tests can count or fake parses without touching the file system.

use strand_diagnostic::Diagnostic;
use strand_ir::{ModuleAst, StringInterner};

use crate::path_resolver::SourceLocation;

/// A successfully parsed module together with its source text.
#[derive(Clone, Debug, Default)]
pub struct ParsedModule {
    pub ast: ModuleAst,
    pub source: String,
}

/// Why a module could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseFailure {
    /// The file could not be read.
    Unreadable(String),
    /// The file has syntax errors.
    Syntax {
        source: String,
        diagnostics: Vec<Diagnostic>,
    },
}

pub trait ModuleParser {
    fn parse(
        &mut self,
        location: &SourceLocation,
        interner: &StringInterner,
    ) -> Result<ParsedModule, ParseFailure>;
}

/// Reads the file and runs the Strand lexer and parser.
#[derive(Clone, Copy, Debug, Default)]
pub struct SourceParser;

impl ModuleParser for SourceParser {
    fn parse(
        &mut self,
        location: &SourceLocation,
        interner: &StringInterner,
    ) -> Result<ParsedModule, ParseFailure> {
        let source = std::fs::read_to_string(&location.path)
            .map_err(|e| ParseFailure::Unreadable(e.to_string()))?;
        let output = strand_parse::parse_source(&source, interner);
        if output.has_errors() {
            let diagnostics = output.diagnostics(&source);
            return Err(ParseFailure::Syntax {
                source,
                diagnostics,
            });
        }
        Ok(ParsedModule {
            ast: output.module,
            source,
        })
    }
}
