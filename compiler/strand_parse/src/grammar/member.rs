//! Member declarations: `fn f(a, b);`, `let x;`, `type T;`.

use strand_diagnostic::ErrorCode;
use strand_ir::{Member, MemberKind, TokenKind, Visibility};

use super::ParsedAttrs;
use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_member(&mut self, attrs: ParsedAttrs) -> Result<Member, ParseError> {
        let keyword = self.cursor.advance();
        let start = attrs.start.unwrap_or(keyword.span);
        let (name, _) = self.cursor.expect_ident()?;

        let kind = match keyword.kind {
            TokenKind::Fn => {
                self.cursor.expect(TokenKind::LParen)?;
                let mut arity = 0u32;
                if !self.cursor.check(TokenKind::RParen) {
                    loop {
                        self.cursor.expect_ident()?;
                        arity += 1;
                        if !self.cursor.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.cursor.expect(TokenKind::RParen)?;
                MemberKind::Function { arity }
            }
            TokenKind::Let => MemberKind::Variable,
            _ => MemberKind::Type,
        };
        self.cursor.expect(TokenKind::Semicolon)?;

        if let Some(static_span) = attrs.is_static {
            // The member is well-formed; keep parsing after reporting.
            self.errors.push(
                ParseError::new(
                    ErrorCode::E1006,
                    format!("`static` is not allowed on a {}", kind.kind_str()),
                    static_span,
                )
                .with_context("only imports can be static"),
            );
        }

        Ok(Member {
            name,
            kind,
            visibility: attrs.visibility.map_or(Visibility::Public, |(v, _)| v),
            span: start.merge(self.cursor.previous_span()),
        })
    }
}
