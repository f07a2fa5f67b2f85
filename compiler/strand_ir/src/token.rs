//! Tokens produced by the lexer.

use crate::{Name, Span};

/// Token kinds of the Strand module grammar.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // Keywords
    Module,
    Import,
    Static,
    Public,
    Private,
    Package,
    Protected,
    As,
    Fn,
    Let,
    Type,

    /// Identifier (interned).
    Ident(Name),

    // Punctuation
    Dot,
    Comma,
    Colon,
    Semicolon,
    Eq,
    LParen,
    RParen,

    /// Character sequence the lexer could not classify.
    Error,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Human-readable name used in parse errors.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Module => "module",
            TokenKind::Import => "import",
            TokenKind::Static => "static",
            TokenKind::Public => "public",
            TokenKind::Private => "private",
            TokenKind::Package => "package",
            TokenKind::Protected => "protected",
            TokenKind::As => "as",
            TokenKind::Fn => "fn",
            TokenKind::Let => "let",
            TokenKind::Type => "type",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Eq => "=",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of file",
        }
    }

    /// Whether this token can start a top-level item.
    pub fn starts_item(&self) -> bool {
        matches!(
            self,
            TokenKind::Import
                | TokenKind::Static
                | TokenKind::Public
                | TokenKind::Private
                | TokenKind::Package
                | TokenKind::Protected
                | TokenKind::Fn
                | TokenKind::Let
                | TokenKind::Type
        )
    }
}

/// A token with its source span.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Lexer output. Always terminated by a single [`TokenKind::Eof`] token.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }
}
