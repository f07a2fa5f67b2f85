//! Strand IR - shared front-end data types.
//!
//! This crate holds the data every front-end phase agrees on:
//! - Spans for source locations
//! - Names for interned identifiers
//! - Tokens and `TokenList` for lexer output
//! - The module-level syntax tree (`ModuleAst`, `ImportDecl`, `Member`)
//!
//! Identifiers are interned once (`Name(u32)`) so that path comparison,
//! hashing and scope lookups never touch string contents.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod interner;
mod name;
mod span;
mod token;

pub use ast::{
    ImportDecl, Member, MemberKind, ModuleAst, ModuleDecl, SelectiveBinding, Visibility,
};
pub use interner::{SharedInterner, StringInterner, StringLookup};
pub use name::Name;
pub use span::Span;
pub use token::{Token, TokenKind, TokenList};

/// Join interned path segments with `.` (e.g. `[std, io]` → `"std.io"`).
pub fn dotted<I: StringLookup + ?Sized>(interner: &I, segments: &[Name]) -> String {
    let mut out = String::new();
    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(interner.lookup(*seg));
    }
    out
}
