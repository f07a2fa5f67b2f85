//! Module, package and import declaration records.

use std::path::Path;

use rustc_hash::FxHashMap;
use strand_ir::{ImportDecl, ModuleAst, Name, Visibility};

use crate::path_resolver::SourceLocation;
use crate::scope::Scope;
use crate::symbol::{AliasId, Entity, ModuleId, PackageId};

/// Progress of a module through the two resolution phases.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LoadState {
    /// Registered and parsed; its own imports are still being loaded.
    /// Lookups that reach it see the identity but not a finished scope.
    Loading,
    /// Phase 1 finished for every import.
    Loaded,
    /// Phase 2 finished: the scope holds members and import bindings.
    Integrated,
}

/// One loaded module.
#[derive(Debug)]
pub struct ModuleData {
    pub id: ModuleId,
    /// Canonical dotted path, e.g. `std.io`.
    pub path: String,
    pub packages: Vec<Name>,
    pub name: Name,
    pub location: SourceLocation,
    pub source: String,
    pub ast: ModuleAst,
    /// One entry per `ast.imports` entry, same order.
    pub imports: Vec<ImportDeclaration>,
    pub(crate) scope: Scope,
    /// Package the module belongs to. For a package module this is the
    /// package it represents.
    pub parent: PackageId,
    pub state: LoadState,
}

impl ModuleData {
    pub fn file(&self) -> &Path {
        &self.location.path
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

/// A node of the package tree.
#[derive(Debug)]
pub struct PackageData {
    pub id: PackageId,
    pub name: Name,
    pub parent: Option<PackageId>,
    pub(crate) children: FxHashMap<Name, Entity>,
    /// The package's own module (`pkg/package.sd`), if one was loaded.
    pub package_module: Option<ModuleId>,
}

impl PackageData {
    pub fn child(&self, name: Name) -> Option<Entity> {
        self.children.get(&name).copied()
    }
}

/// Resolution state of an import declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ImportState {
    /// Phase 1 has not run yet.
    Unresolved,
    Resolved {
        module: ModuleId,
        /// Leftmost entity of the path: the root package, or the module
        /// itself for a package-less path.
        package: Entity,
    },
    /// Phase 1 failed; the error was reported once.
    Failed,
}

/// One import declaration of a module, plus what resolution learned.
#[derive(Clone, Debug)]
pub struct ImportDeclaration {
    pub syntax: ImportDecl,
    state: ImportState,
    alias_decls: Vec<AliasId>,
}

impl ImportDeclaration {
    pub fn new(syntax: ImportDecl) -> Self {
        ImportDeclaration {
            syntax,
            state: ImportState::Unresolved,
            alias_decls: Vec::new(),
        }
    }

    /// A fresh, unresolved declaration with the same syntax.
    pub fn syntax_copy(&self) -> ImportDeclaration {
        ImportDeclaration::new(self.syntax.clone())
    }

    pub fn kind(&self) -> &'static str {
        "import"
    }

    pub fn prot(&self) -> Visibility {
        self.syntax.visibility
    }

    pub fn state(&self) -> ImportState {
        self.state
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self.state, ImportState::Unresolved)
    }

    pub fn resolved_module(&self) -> Option<ModuleId> {
        match self.state {
            ImportState::Resolved { module, .. } => Some(module),
            _ => None,
        }
    }

    pub fn resolved_package(&self) -> Option<Entity> {
        match self.state {
            ImportState::Resolved { package, .. } => Some(package),
            _ => None,
        }
    }

    /// Aliases created for the selective bindings, in binding order.
    pub fn alias_decls(&self) -> &[AliasId] {
        &self.alias_decls
    }

    /// Name the whole module is bound under, if it is bound at all.
    pub fn local_name(&self) -> Option<Name> {
        if self.syntax.is_selective() {
            None
        } else {
            Some(self.syntax.module_alias.unwrap_or(self.syntax.module))
        }
    }

    /// Record the phase 1 result. The resolved module is set at most once.
    pub(crate) fn resolve(&mut self, module: ModuleId, package: Entity, aliases: Vec<AliasId>) {
        if self.is_unresolved() {
            self.state = ImportState::Resolved { module, package };
            self.alias_decls = aliases;
        }
    }

    pub(crate) fn fail(&mut self) {
        if self.is_unresolved() {
            self.state = ImportState::Failed;
        }
    }
}
