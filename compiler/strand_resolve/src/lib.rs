//! Import resolution for Strand.
//!
//! Resolution runs in two phases over a single [`Session`]:
//!
//! 1. **Loading** ([`Session::load_root`], [`Session::load_import`]) maps
//!    each `import a.b.c;` to a file through the [`ModulePathResolver`],
//!    parses it once into the [`ModuleCache`], binds selective aliases and
//!    recurses into the imported module's own imports. Modules are
//!    registered before their imports are followed, so cycles terminate.
//! 2. **Integration** ([`Session::analyze`]) declares members, then binds
//!    every import into its module's scope. After that, lookups such as
//!    [`Session::search`] and [`Session::resolve_alias`] see the final
//!    picture.
//!
//! Errors never abort a phase. They are collected on the session with the
//! file they belong to; see [`Session::errors`].
//!
//! The [`export`] module turns resolved imports back into text for
//! dependency tracking and tooling.

mod alias;
mod cache;
pub mod config;
mod error;
pub mod export;
mod integrate;
mod loader;
mod lookup;
mod module;
mod parser;
mod path_resolver;
mod scope;
mod session;
mod stack;
mod symbol;

pub use alias::{bind_aliases, AliasData, AliasState};
pub use cache::{CacheLookup, ModuleCache};
pub use config::{ConfigError, ResolverConfig};
pub use error::{ImportError, ImportErrorKind, NestedDiagnostics};
pub use module::{ImportDeclaration, ImportState, LoadState, ModuleData, PackageData};
pub use parser::{ModuleParser, ParseFailure, ParsedModule, SourceParser};
pub use path_resolver::{ModulePathResolver, SourceLocation};
pub use scope::{Binding, BindingTarget, Compatibility, InsertOutcome, Scope};
pub use session::Session;
pub use symbol::{
    AliasId, Entity, ImportRef, MemberRef, ModuleId, PackageId, Resolved, SymbolRef,
};

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{ImportRef, ModuleId};
    strand_ir::static_assert_size!(ModuleId, 4);
    strand_ir::static_assert_size!(ImportRef, 8);
}
