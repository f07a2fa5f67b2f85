//! Symbol identities.
//!
//! Modules, packages, aliases, imports and members live in arenas owned by
//! the [`ModuleCache`](crate::ModuleCache). Everything else refers to them
//! by index, so cross references never own what they point at.

use smallvec::SmallVec;
use strand_ir::{static_assert_size, Name, Visibility};

use crate::ModuleCache;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn from_index(index: usize) -> Self {
                $name(u32::try_from(index).unwrap_or(u32::MAX))
            }

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

arena_id!(
    /// Index of a loaded module.
    ModuleId
);
arena_id!(
    /// Index of a package node. `PackageId::ROOT` is the unnamed root.
    PackageId
);
arena_id!(
    /// Index of an alias created for one selective binding.
    AliasId
);

impl PackageId {
    pub const ROOT: PackageId = PackageId(0);
}

/// The `index`-th import declaration of `module`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ImportRef {
    pub module: ModuleId,
    pub index: u32,
}

/// The `index`-th member declaration of `module`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct MemberRef {
    pub module: ModuleId,
    pub index: u32,
}

static_assert_size!(MemberRef, 8);

/// A node of the package tree: either a sub-package or a module.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Entity {
    Package(PackageId),
    Module(ModuleId),
}

/// Any symbol the resolver knows about.
///
/// Every variant answers the same questions ([`name`](Self::name),
/// [`kind`](Self::kind), [`protection`](Self::protection)); lookup inside a
/// symbol goes through `Session::search_in`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SymbolRef {
    Module(ModuleId),
    Package(PackageId),
    Member(MemberRef),
    Alias(AliasId),
    Import(ImportRef),
}

impl SymbolRef {
    pub fn name(self, cache: &ModuleCache) -> Name {
        match self {
            SymbolRef::Module(id) => cache.module(id).name,
            SymbolRef::Package(id) => cache.package(id).name,
            SymbolRef::Member(member) => cache.member(member).name,
            SymbolRef::Alias(id) => cache.alias(id).name,
            SymbolRef::Import(import) => {
                let decl = &cache.import(import).syntax;
                decl.module_alias.unwrap_or(decl.module)
            }
        }
    }

    pub fn kind(self, cache: &ModuleCache) -> &'static str {
        match self {
            SymbolRef::Module(_) => "module",
            SymbolRef::Package(_) => "package",
            SymbolRef::Member(member) => cache.member(member).kind.kind_str(),
            SymbolRef::Alias(_) => "alias",
            SymbolRef::Import(_) => "import",
        }
    }

    /// Declared protection. Modules and packages are always public.
    pub fn protection(self, cache: &ModuleCache) -> Visibility {
        match self {
            SymbolRef::Module(_) | SymbolRef::Package(_) => Visibility::Public,
            SymbolRef::Member(member) => cache.member(member).visibility,
            SymbolRef::Alias(id) => cache.import(cache.alias(id).import).prot(),
            SymbolRef::Import(import) => cache.import(import).prot(),
        }
    }

    /// Whether another symbol of the same name may join this one in an
    /// overload set. Only functions overload; imports never do.
    pub fn is_overloadable(self, cache: &ModuleCache) -> bool {
        match self {
            SymbolRef::Member(member) => cache.member(member).kind.is_overloadable(),
            _ => false,
        }
    }
}

/// Result of a name lookup. Aliases and imports are always looked through.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Resolved {
    Module(ModuleId),
    Package(PackageId),
    Member(MemberRef),
    /// Two or more functions sharing the name, in declaration order.
    Overloads(SmallVec<[MemberRef; 2]>),
}

impl Resolved {
    pub fn as_symbol(&self) -> Option<SymbolRef> {
        match self {
            Resolved::Module(id) => Some(SymbolRef::Module(*id)),
            Resolved::Package(id) => Some(SymbolRef::Package(*id)),
            Resolved::Member(member) => Some(SymbolRef::Member(*member)),
            Resolved::Overloads(_) => None,
        }
    }

    /// Members this result stands for; empty for modules and packages.
    pub fn members(&self) -> SmallVec<[MemberRef; 2]> {
        match self {
            Resolved::Member(member) => smallvec::smallvec![*member],
            Resolved::Overloads(set) => set.clone(),
            Resolved::Module(_) | Resolved::Package(_) => SmallVec::new(),
        }
    }

    pub fn is_module(&self) -> bool {
        matches!(self, Resolved::Module(_))
    }
}
