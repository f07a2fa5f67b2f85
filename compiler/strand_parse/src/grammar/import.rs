//! Import declarations.
//!
//! ```text
//! import  := 'import' target { ',' target } [ ':' binding { ',' binding } ] ';'
//! target  := dotted [ 'as' ident ]
//! binding := ident [ '=' ident ]
//! ```

use strand_diagnostic::ErrorCode;
use strand_ir::{ImportDecl, Name, SelectiveBinding, Span, TokenKind};

use super::ParsedAttrs;
use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse one import statement into one declaration per target.
    pub(crate) fn parse_import(
        &mut self,
        attrs: ParsedAttrs,
    ) -> Result<Vec<ImportDecl>, ParseError> {
        let import_span = self.cursor.expect(TokenKind::Import)?.span;
        let start = attrs.start.unwrap_or(import_span);
        let visibility = attrs.visibility.map(|(v, _)| v).unwrap_or_default();
        let is_static = attrs.is_static.is_some();

        let mut decls = Vec::new();
        // Alias span of the most recent target.
        let mut alias_span: Option<Span>;
        loop {
            let (mut path, path_span) = self.parse_dotted()?;
            let mut span = path_span;
            let module_alias = if self.cursor.eat(TokenKind::As) {
                let (alias, s) = self.cursor.expect_ident()?;
                span = span.merge(s);
                alias_span = Some(s);
                Some(alias)
            } else {
                alias_span = None;
                None
            };
            let module = path.pop().unwrap_or(Name::EMPTY);
            decls.push(ImportDecl {
                packages: path,
                module,
                module_alias,
                is_static,
                visibility,
                bindings: Vec::new(),
                span,
            });
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }

        if self.cursor.eat(TokenKind::Colon) {
            let bindings = self.parse_bindings()?;
            if let Some(alias_span) = alias_span {
                return Err(ParseError::new(
                    ErrorCode::E1005,
                    "a module alias cannot be combined with selective bindings",
                    alias_span,
                )
                .with_context("module alias here")
                .with_help("alias individual names instead: `import a.b : local = name;`"));
            }
            if let (Some(last), Some(end)) = (decls.last_mut(), bindings.last()) {
                last.span = last.span.merge(end.span);
                last.bindings = bindings;
            }
        }

        self.cursor.expect(TokenKind::Semicolon)?;

        // A single-target statement owns its attributes and terminator.
        if let [only] = decls.as_mut_slice() {
            only.span = start.merge(self.cursor.previous_span());
        }
        Ok(decls)
    }

    fn parse_bindings(&mut self) -> Result<Vec<SelectiveBinding>, ParseError> {
        let mut bindings = Vec::new();
        loop {
            let (first, first_span) = self.cursor.expect_ident()?;
            let binding = if self.cursor.eat(TokenKind::Eq) {
                let (source, source_span) = self.cursor.expect_ident()?;
                SelectiveBinding {
                    name: source,
                    alias: Some(first),
                    span: first_span.merge(source_span),
                }
            } else {
                SelectiveBinding {
                    name: first,
                    alias: None,
                    span: first_span,
                }
            };
            bindings.push(binding);
            if !self.cursor.eat(TokenKind::Comma) {
                return Ok(bindings);
            }
        }
    }
}
