//! Grammar productions.
//!
//! ```text
//! module    := [ 'module' dotted ';' ] { item }
//! item      := { attribute } ( import | member )
//! attribute := 'public' | 'private' | 'package' | 'protected' | 'static'
//! ```

mod import;
mod member;

use strand_diagnostic::ErrorCode;
use strand_ir::{ModuleAst, ModuleDecl, Name, Span, TokenKind, Visibility};

use crate::{ParseError, Parser};

/// Attributes preceding an item.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ParsedAttrs {
    pub visibility: Option<(Visibility, Span)>,
    pub is_static: Option<Span>,
    pub start: Option<Span>,
}

impl Parser<'_> {
    pub(crate) fn parse_module_header(&mut self) -> Result<ModuleDecl, ParseError> {
        let start = self.cursor.expect(TokenKind::Module)?.span;
        let (mut segments, _) = self.parse_dotted()?;
        self.cursor.expect(TokenKind::Semicolon)?;
        let name = segments.pop().unwrap_or(Name::EMPTY);
        Ok(ModuleDecl {
            packages: segments,
            name,
            span: start.merge(self.cursor.previous_span()),
        })
    }

    pub(crate) fn parse_item(&mut self, module: &mut ModuleAst) -> Result<(), ParseError> {
        if self.cursor.check(TokenKind::Module) {
            let span = self.cursor.current_span();
            // Parse it anyway so recovery resumes after the header.
            let _ = self.parse_module_header();
            return Err(ParseError::new(
                ErrorCode::E1007,
                "`module` header must be the first declaration in a file",
                span,
            )
            .with_context("misplaced header"));
        }

        let attrs = self.parse_attributes()?;
        match self.cursor.current_kind() {
            TokenKind::Import => {
                let decls = self.parse_import(attrs)?;
                module.imports.extend(decls);
                Ok(())
            }
            TokenKind::Fn | TokenKind::Let | TokenKind::Type => {
                let member = self.parse_member(attrs)?;
                module.members.push(member);
                Ok(())
            }
            found => Err(ParseError::unexpected(
                "`import`, `fn`, `let` or `type`",
                found,
                self.cursor.current_span(),
            )
            .with_context("expected a declaration")),
        }
    }

    fn parse_attributes(&mut self) -> Result<ParsedAttrs, ParseError> {
        let mut attrs = ParsedAttrs::default();
        loop {
            let span = self.cursor.current_span();
            let visibility = match self.cursor.current_kind() {
                TokenKind::Public => Visibility::Public,
                TokenKind::Private => Visibility::Private,
                TokenKind::Package => Visibility::Package,
                TokenKind::Protected => Visibility::Protected,
                TokenKind::Static => {
                    self.cursor.advance();
                    attrs.start.get_or_insert(span);
                    attrs.is_static = Some(span);
                    continue;
                }
                _ => return Ok(attrs),
            };
            self.cursor.advance();
            attrs.start.get_or_insert(span);
            if let Some((prev, prev_span)) = attrs.visibility {
                if prev != visibility {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        format!("conflicting visibility `{visibility}` after `{prev}`"),
                        span,
                    )
                    .with_help(format!(
                        "`{prev}` was already given at {prev_span}; keep only one"
                    )));
                }
            }
            attrs.visibility = Some((visibility, span));
        }
    }

    /// `ident { '.' ident }`
    pub(crate) fn parse_dotted(&mut self) -> Result<(Vec<Name>, Span), ParseError> {
        let (first, start) = self.cursor.expect_ident()?;
        let mut segments = vec![first];
        let mut end = start;
        while self.cursor.eat(TokenKind::Dot) {
            let (name, span) = self.cursor.expect_ident()?;
            segments.push(name);
            end = span;
        }
        Ok((segments, start.merge(end)))
    }
}
