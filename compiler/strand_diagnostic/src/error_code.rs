//! Error codes for all front-end diagnostics.
//!
//! The first digit names the phase that produced the diagnostic.

use std::fmt;

/// Error codes for all front-end diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
/// - E3xxx: Import resolution errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Invalid character in source
    E0001,
    /// Unterminated block comment
    E0002,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected identifier
    E1002,
    /// Expected `;`
    E1003,
    /// Expected item declaration
    E1004,
    /// Module alias combined with selective bindings
    E1005,
    /// `static` on a non-import declaration
    E1006,
    /// Misplaced `module` header
    E1007,

    // Import Resolution Errors (E3xxx)
    /// Module not found in any search root
    E3001,
    /// Two selective bindings share a local name
    E3002,
    /// Imported name conflicts with an existing binding
    E3003,
    /// Alias chain refers back to itself
    E3004,
    /// Selected symbol does not exist in the imported module
    E3005,
    /// Module source file could not be read
    E3006,
    /// Declared module name differs from the import path
    E3007,
    /// Two non-overloadable declarations share a name
    E3008,
    /// Imported module failed to parse
    E3009,
}

impl ErrorCode {
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E0001,
        ErrorCode::E0002,
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E1006,
        ErrorCode::E1007,
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E3004,
        ErrorCode::E3005,
        ErrorCode::E3006,
        ErrorCode::E3007,
        ErrorCode::E3008,
        ErrorCode::E3009,
    ];

    /// Get the string representation of this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E3006 => "E3006",
            ErrorCode::E3007 => "E3007",
            ErrorCode::E3008 => "E3008",
            ErrorCode::E3009 => "E3009",
        }
    }

    /// One-line description used by `--explain`-style listings.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "invalid character in source",
            ErrorCode::E0002 => "unterminated block comment",
            ErrorCode::E1001 => "unexpected token",
            ErrorCode::E1002 => "expected identifier",
            ErrorCode::E1003 => "expected `;`",
            ErrorCode::E1004 => "expected item declaration",
            ErrorCode::E1005 => "module alias cannot be combined with selective bindings",
            ErrorCode::E1006 => "`static` is only valid on imports",
            ErrorCode::E1007 => "`module` header must be the first declaration",
            ErrorCode::E3001 => "module not found",
            ErrorCode::E3002 => "duplicate selective import binding",
            ErrorCode::E3003 => "imported name conflicts with an existing binding",
            ErrorCode::E3004 => "circular alias",
            ErrorCode::E3005 => "selected symbol not found in module",
            ErrorCode::E3006 => "module source could not be read",
            ErrorCode::E3007 => "module name mismatch",
            ErrorCode::E3008 => "duplicate declaration",
            ErrorCode::E3009 => "imported module failed to parse",
        }
    }

    /// Check if this is a lexer error (E0xxx range).
    pub fn is_lexer_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    /// Check if this is a parser/syntax error (E1xxx range).
    pub fn is_parser_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is an import resolution error (E3xxx range).
    pub fn is_import_error(&self) -> bool {
        self.as_str().starts_with("E3")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
