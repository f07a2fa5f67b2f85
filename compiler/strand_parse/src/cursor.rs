//! Token cursor for navigating the token stream.

use strand_diagnostic::ErrorCode;
use strand_ir::{Name, Span, StringInterner, Token, TokenKind, TokenList};

use crate::ParseError;

/// Cursor over a [`TokenList`].
///
/// Invariant: the list ends with `Eof` and the position never moves past it.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    interner: &'a StringInterner,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Cursor {
            tokens: tokens.as_slice(),
            interner,
            pos: 0,
        }
    }

    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.tokens
            .get(self.pos)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(Span::DUMMY, |t| t.span)
    }

    /// Span of the most recently consumed token.
    pub fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or_else(|| self.current_span(), |t| t.span)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Consume the current token. `Eof` is never consumed.
    pub fn advance(&mut self) -> Token {
        let token = Token::new(self.current_kind(), self.current_span());
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it matches `kind`.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::unexpected(
                &format!("`{}`", kind.display_name()),
                self.current_kind(),
                self.current_span(),
            ))
        }
    }

    pub fn expect_ident(&mut self) -> Result<(Name, Span), ParseError> {
        if let TokenKind::Ident(name) = self.current_kind() {
            let span = self.advance().span;
            Ok((name, span))
        } else {
            let found = self.current_kind();
            let mut err = ParseError::new(
                ErrorCode::E1002,
                format!("expected identifier, found {}", found.display_name()),
                self.current_span(),
            );
            if is_keyword(found) {
                err = err.with_help(format!(
                    "`{}` is a keyword and cannot be used as a name",
                    found.display_name()
                ));
            }
            Err(err)
        }
    }

    /// Skip to just past the next `;`, or to the next token that can start
    /// an item, whichever comes first.
    pub fn synchronize(&mut self) {
        while !self.is_at_end() {
            let kind = self.current_kind();
            if kind == TokenKind::Semicolon {
                self.advance();
                return;
            }
            if kind.starts_item() || kind == TokenKind::Module {
                return;
            }
            self.advance();
        }
    }
}

fn is_keyword(kind: TokenKind) -> bool {
    kind.starts_item() || matches!(kind, TokenKind::Module | TokenKind::As)
}
