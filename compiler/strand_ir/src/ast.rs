//! Module-level syntax tree.
//!
//! Only what import resolution consumes is modelled: the optional
//! `module a.b;` header, import declarations, and member declarations
//! (functions, variables, types) that imports can expose.

use crate::{Name, Span};
use std::fmt;

/// Protection level of a declaration or import.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(
    feature = "cache",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Visibility {
    /// Accessible only within the declaring module (default for imports).
    #[default]
    Private,
    /// Accessible from modules in the same package.
    Package,
    /// Accessible only within the declaring module; Strand has no class
    /// hierarchy for `protected` to widen access to.
    Protected,
    /// Accessible from every module.
    Public,
}

impl Visibility {
    /// Source keyword for this level.
    pub fn keyword(self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Package => "package",
            Visibility::Protected => "protected",
            Visibility::Public => "public",
        }
    }

    /// Returns true if this is public visibility.
    pub fn is_public(self) -> bool {
        matches!(self, Visibility::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One `local = source` pair of a selective import.
///
/// `import std.io : say = writeln, flush;` produces
/// `{ name: writeln, alias: Some(say) }` and `{ name: flush, alias: None }`.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct SelectiveBinding {
    /// Name looked up inside the imported module.
    pub name: Name,
    /// Local name, when different from `name`.
    pub alias: Option<Name>,
    pub span: Span,
}

impl SelectiveBinding {
    /// The name this binding introduces into the importing scope.
    pub fn local_name(&self) -> Name {
        self.alias.unwrap_or(self.name)
    }
}

/// A single import target as written in source.
///
/// A statement `import a.b, c.d : x;` yields two `ImportDecl`s; the
/// selective list belongs to the last one.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ImportDecl {
    /// Package chain, e.g. `[std]` for `std.io`.
    pub packages: Vec<Name>,
    /// Leaf module identifier, e.g. `io` for `std.io`.
    pub module: Name,
    /// Whole-module alias: `import std.io as io2;`.
    pub module_alias: Option<Name>,
    /// `static import`: members reachable only through qualification.
    pub is_static: bool,
    pub visibility: Visibility,
    /// Selective bindings in source order; empty imports the whole module.
    pub bindings: Vec<SelectiveBinding>,
    pub span: Span,
}

impl ImportDecl {
    /// Full path segments: packages followed by the module name.
    pub fn path(&self) -> impl Iterator<Item = Name> + '_ {
        self.packages
            .iter()
            .copied()
            .chain(std::iter::once(self.module))
    }

    /// Leftmost path segment (the root used for fully qualified lookups).
    pub fn root_name(&self) -> Name {
        self.packages.first().copied().unwrap_or(self.module)
    }

    pub fn is_selective(&self) -> bool {
        !self.bindings.is_empty()
    }

    /// Semantic equality, ignoring spans.
    pub fn same_meaning(&self, other: &ImportDecl) -> bool {
        self.packages == other.packages
            && self.module == other.module
            && self.module_alias == other.module_alias
            && self.is_static == other.is_static
            && self.visibility == other.visibility
            && self.bindings.len() == other.bindings.len()
            && self
                .bindings
                .iter()
                .zip(&other.bindings)
                .all(|(a, b)| a.name == b.name && a.alias == b.alias)
    }
}

/// Kind of a member declaration.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum MemberKind {
    /// `fn name(a, b);`. Functions sharing a name form one overload set
    /// whatever their arity.
    Function { arity: u32 },
    /// `let name;`
    Variable,
    /// `type Name;`
    Type,
}

impl MemberKind {
    pub fn is_overloadable(self) -> bool {
        matches!(self, MemberKind::Function { .. })
    }

    pub fn kind_str(self) -> &'static str {
        match self {
            MemberKind::Function { .. } => "function",
            MemberKind::Variable => "variable",
            MemberKind::Type => "type",
        }
    }
}

/// A member declaration that imports can expose.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct Member {
    pub name: Name,
    pub kind: MemberKind,
    pub visibility: Visibility,
    pub span: Span,
}

/// `module a.b.c;` header.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ModuleDecl {
    pub packages: Vec<Name>,
    pub name: Name,
    pub span: Span,
}

/// Parsed contents of one source file.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct ModuleAst {
    pub header: Option<ModuleDecl>,
    pub imports: Vec<ImportDecl>,
    pub members: Vec<Member>,
}
