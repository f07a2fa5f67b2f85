//! Lexer for Strand module files using logos.
//!
//! Produces a [`TokenList`] terminated by `Eof`. Identifiers are interned
//! on the way out. Comments and whitespace are dropped. Characters the
//! lexer cannot classify become `Error` tokens and are also reported as
//! [`LexError`]s, so the parser never has to describe them again.

use logos::Logos;
use strand_diagnostic::{Diagnostic, ErrorCode};
use strand_ir::{Span, StringInterner, Token, TokenKind, TokenList};

/// Raw token from logos (before interning).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,
    #[regex(r"/\*([^*]|\*+[^*/])*\**")]
    UnterminatedBlockComment,

    #[token("module")]
    Module,
    #[token("import")]
    Import,
    #[token("static")]
    Static,
    #[token("public")]
    Public,
    #[token("private")]
    Private,
    #[token("package")]
    Package,
    #[token("protected")]
    Protected,
    #[token("as")]
    As,
    #[token("fn")]
    Fn,
    #[token("let")]
    Let,
    #[token("type")]
    Type,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("=")]
    Eq,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
}

/// What went wrong while lexing.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum LexErrorKind {
    InvalidCharacter,
    UnterminatedComment,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    pub fn to_diagnostic(&self, source: &str) -> Diagnostic {
        match self.kind {
            LexErrorKind::InvalidCharacter => {
                let text = source
                    .get(self.span.to_range())
                    .unwrap_or_default();
                Diagnostic::error(ErrorCode::E0001)
                    .with_message(format!("invalid character `{}`", text.escape_debug()))
                    .with_label(self.span, "not valid here")
            }
            LexErrorKind::UnterminatedComment => Diagnostic::error(ErrorCode::E0002)
                .with_message("unterminated block comment")
                .with_label(Span::point(self.span.start), "comment starts here")
                .with_suggestion("close the comment with `*/`"),
        }
    }
}

/// Result of lexing one file.
#[derive(Clone, Debug, Default)]
pub struct LexOutput {
    pub tokens: TokenList,
    pub errors: Vec<LexError>,
}

impl LexOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Lex source code into tokens, interning identifiers.
pub fn lex(source: &str, interner: &StringInterner) -> LexOutput {
    let mut out = LexOutput::default();
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        let span = Span::from_range(logos.span());

        match token_result {
            Ok(RawToken::LineComment | RawToken::BlockComment) => {}
            Ok(RawToken::UnterminatedBlockComment) => {
                out.errors.push(LexError {
                    kind: LexErrorKind::UnterminatedComment,
                    span,
                });
            }
            Ok(raw) => {
                let kind = convert_token(raw, logos.slice(), interner);
                out.tokens.push(Token::new(kind, span));
            }
            Err(()) => {
                // Adjacent invalid characters collapse into one error.
                if let Some(last) = out.errors.last_mut() {
                    if last.kind == LexErrorKind::InvalidCharacter && last.span.end == span.start {
                        last.span = last.span.merge(span);
                        continue;
                    }
                }
                out.tokens.push(Token::new(TokenKind::Error, span));
                out.errors.push(LexError {
                    kind: LexErrorKind::InvalidCharacter,
                    span,
                });
            }
        }
    }

    let eof = u32::try_from(source.len()).unwrap_or(u32::MAX);
    out.tokens.push(Token::new(TokenKind::Eof, Span::point(eof)));
    out
}

fn convert_token(raw: RawToken, slice: &str, interner: &StringInterner) -> TokenKind {
    match raw {
        RawToken::Module => TokenKind::Module,
        RawToken::Import => TokenKind::Import,
        RawToken::Static => TokenKind::Static,
        RawToken::Public => TokenKind::Public,
        RawToken::Private => TokenKind::Private,
        RawToken::Package => TokenKind::Package,
        RawToken::Protected => TokenKind::Protected,
        RawToken::As => TokenKind::As,
        RawToken::Fn => TokenKind::Fn,
        RawToken::Let => TokenKind::Let,
        RawToken::Type => TokenKind::Type,
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),
        RawToken::Dot => TokenKind::Dot,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Eq => TokenKind::Eq,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        // Filtered out by `lex` before conversion.
        RawToken::LineComment | RawToken::BlockComment | RawToken::UnterminatedBlockComment => {
            TokenKind::Error
        }
    }
}
