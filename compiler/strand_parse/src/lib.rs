//! Recursive descent parser for Strand module files.
//!
//! Produces a [`ModuleAst`] holding the module header, import declarations
//! and member declarations. Errors are collected; the parser resynchronizes
//! at the next `;` so one pass reports every syntax error in a file.

mod cursor;
mod error;
mod grammar;

pub use cursor::Cursor;
pub use error::ParseError;

use strand_diagnostic::Diagnostic;
use strand_ir::{ModuleAst, StringInterner, TokenKind, TokenList};
use strand_lexer::LexError;

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    errors: Vec<ParseError>,
}

/// Output of parsing one file.
#[derive(Clone, Debug, Default)]
pub struct ParseOutput {
    pub module: ModuleAst,
    pub lex_errors: Vec<LexError>,
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.lex_errors.is_empty() || !self.errors.is_empty()
    }

    /// Lexer and parser errors as diagnostics, in source order.
    pub fn diagnostics(&self, source: &str) -> Vec<Diagnostic> {
        let mut diags: Vec<Diagnostic> = self
            .lex_errors
            .iter()
            .map(|e| e.to_diagnostic(source))
            .chain(self.errors.iter().map(ParseError::to_diagnostic))
            .collect();
        diags.sort_by_key(|d| d.primary_span().map_or(0, |s| s.start));
        diags
    }
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens, interner),
            errors: Vec::new(),
        }
    }

    /// Record an error and resynchronize.
    ///
    /// Errors sitting on an `Error` token were already reported by the lexer.
    fn recover(&mut self, error: ParseError) {
        if self.cursor.current_kind() != TokenKind::Error {
            self.errors.push(error);
        }
        self.cursor.synchronize();
    }

    /// Parse a whole module.
    pub fn parse_module(mut self) -> (ModuleAst, Vec<ParseError>) {
        let mut module = ModuleAst::default();

        if self.cursor.check(TokenKind::Module) {
            match self.parse_module_header() {
                Ok(header) => module.header = Some(header),
                Err(e) => self.recover(e),
            }
        }

        while !self.cursor.is_at_end() {
            let before = self.cursor.position();
            if let Err(e) = self.parse_item(&mut module) {
                self.recover(e);
            }
            if self.cursor.position() == before {
                self.cursor.advance();
            }
        }

        (module, self.errors)
    }
}

/// Parse an already-lexed token stream.
pub fn parse(tokens: &TokenList, interner: &StringInterner) -> ParseOutput {
    let (module, errors) = Parser::new(tokens, interner).parse_module();
    ParseOutput {
        module,
        lex_errors: Vec::new(),
        errors,
    }
}

/// Lex and parse source text.
pub fn parse_source(source: &str, interner: &StringInterner) -> ParseOutput {
    let lexed = strand_lexer::lex(source, interner);
    let mut output = parse(&lexed.tokens, interner);
    output.lex_errors = lexed.errors;
    output
}
