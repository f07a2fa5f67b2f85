//! The module cache: one arena for every module, package and alias of a
//! session.
//!
//! A module is registered *before* its own imports are loaded. A nested
//! request for a module that is still loading gets back the registered
//! identity ([`CacheLookup::Loading`]) instead of parsing it again, which
//! is what lets circular imports terminate.

use rustc_hash::FxHashMap;
use strand_ir::{dotted, Member, Name, StringInterner};
use tracing::{debug, trace};

use crate::alias::AliasData;
use crate::error::NestedDiagnostics;
use crate::module::{ImportDeclaration, LoadState, ModuleData, PackageData};
use crate::parser::{ModuleParser, ParseFailure, ParsedModule};
use crate::path_resolver::{ModulePathResolver, SourceLocation};
use crate::scope::Scope;
use crate::symbol::{AliasId, Entity, ImportRef, MemberRef, ModuleId, PackageId};
use crate::{ImportError, ImportErrorKind};

/// Outcome of [`ModuleCache::get_or_load`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CacheLookup {
    /// Already loaded earlier.
    Cached(ModuleId),
    /// Registered but its imports are still loading (an import cycle).
    Loading(ModuleId),
    /// Parsed and registered by this call; its imports are not loaded yet.
    Fresh(ModuleId),
}

impl CacheLookup {
    pub fn id(self) -> ModuleId {
        match self {
            CacheLookup::Cached(id) | CacheLookup::Loading(id) | CacheLookup::Fresh(id) => id,
        }
    }
}

#[derive(Debug)]
pub struct ModuleCache {
    modules: Vec<ModuleData>,
    packages: Vec<PackageData>,
    aliases: Vec<AliasData>,
    by_path: FxHashMap<String, ModuleId>,
    /// Paths that failed to load, so they are never parsed twice.
    failed: FxHashMap<String, ImportError>,
}

impl Default for ModuleCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleCache {
    pub fn new() -> Self {
        ModuleCache {
            modules: Vec::new(),
            packages: vec![PackageData {
                id: PackageId::ROOT,
                name: Name::EMPTY,
                parent: None,
                children: FxHashMap::default(),
                package_module: None,
            }],
            aliases: Vec::new(),
            by_path: FxHashMap::default(),
            failed: FxHashMap::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Loaded modules in registration order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleData> {
        self.modules.iter()
    }

    pub fn module(&self, id: ModuleId) -> &ModuleData {
        &self.modules[id.index()]
    }

    pub(crate) fn module_mut(&mut self, id: ModuleId) -> &mut ModuleData {
        &mut self.modules[id.index()]
    }

    pub fn package(&self, id: PackageId) -> &PackageData {
        &self.packages[id.index()]
    }

    pub fn alias(&self, id: AliasId) -> &AliasData {
        &self.aliases[id.index()]
    }

    pub(crate) fn alias_mut(&mut self, id: AliasId) -> &mut AliasData {
        &mut self.aliases[id.index()]
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    pub fn import(&self, import: ImportRef) -> &ImportDeclaration {
        &self.module(import.module).imports[import.index as usize]
    }

    pub(crate) fn import_mut(&mut self, import: ImportRef) -> &mut ImportDeclaration {
        &mut self.module_mut(import.module).imports[import.index as usize]
    }

    pub fn member(&self, member: MemberRef) -> &Member {
        &self.module(member.module).ast.members[member.index as usize]
    }

    /// Look a module up by canonical dotted path.
    pub fn lookup(&self, path: &str) -> Option<ModuleId> {
        self.by_path.get(path).copied()
    }

    pub fn child(&self, package: PackageId, name: Name) -> Option<Entity> {
        self.package(package).child(name)
    }

    /// Return the module at `packages.module`, parsing and registering it
    /// if this is the first request for that path.
    #[tracing::instrument(level = "debug", skip_all, fields(path = tracing::field::Empty))]
    pub fn get_or_load(
        &mut self,
        packages: &[Name],
        module: Name,
        resolver: &ModulePathResolver,
        parser: &mut dyn ModuleParser,
        interner: &StringInterner,
    ) -> Result<CacheLookup, ImportError> {
        let mut segments = packages.to_vec();
        segments.push(module);
        let path = dotted(interner, &segments);
        tracing::Span::current().record("path", path.as_str());

        if let Some(&id) = self.by_path.get(&path) {
            return Ok(match self.module(id).state {
                LoadState::Loading => {
                    trace!("module is still loading");
                    CacheLookup::Loading(id)
                }
                LoadState::Loaded | LoadState::Integrated => {
                    trace!("cache hit");
                    CacheLookup::Cached(id)
                }
            });
        }
        if let Some(err) = self.failed.get(&path) {
            // Nested parser diagnostics are reported with the first failure.
            let mut err = err.clone();
            err.nested = None;
            return Err(err);
        }

        let result = resolver
            .resolve(packages, module, interner)
            .and_then(|location| {
                let parsed = parse_module(&path, &location, parser, interner)?;
                self.register(packages, module, location, parsed, interner)
            });
        match result {
            Ok(id) => Ok(CacheLookup::Fresh(id)),
            Err(err) => {
                self.failed.insert(path, err.clone());
                Err(err)
            }
        }
    }

    /// Register an already parsed module. Returns the existing id when the
    /// path is taken.
    pub fn register(
        &mut self,
        packages: &[Name],
        name: Name,
        location: SourceLocation,
        parsed: ParsedModule,
        interner: &StringInterner,
    ) -> Result<ModuleId, ImportError> {
        let mut segments = packages.to_vec();
        segments.push(name);
        let path = dotted(interner, &segments);
        if let Some(&id) = self.by_path.get(&path) {
            return Ok(id);
        }

        let id = ModuleId::from_index(self.modules.len());
        let container = self.package_for(packages, interner)?;
        let parent = if location.is_package_module {
            let pkg = self.child_package(container, name, interner)?;
            self.packages[pkg.index()].package_module = Some(id);
            pkg
        } else {
            match self.child(container, name) {
                Some(Entity::Package(_)) => {
                    return Err(ImportError::new(
                        ImportErrorKind::ImportNameConflict,
                        format!("module `{path}` conflicts with a package of the same name"),
                    )
                    .with_note(format!("file: {}", location.path.display())));
                }
                Some(Entity::Module(existing)) => return Ok(existing),
                None => {}
            }
            self.packages[container.index()]
                .children
                .insert(name, Entity::Module(id));
            container
        };

        debug!(path = %path, file = %location.path.display(), "registered module");
        let imports = parsed
            .ast
            .imports
            .iter()
            .cloned()
            .map(ImportDeclaration::new)
            .collect();
        self.by_path.insert(path.clone(), id);
        self.modules.push(ModuleData {
            id,
            path,
            packages: packages.to_vec(),
            name,
            location,
            source: parsed.source,
            ast: parsed.ast,
            imports,
            scope: Scope::new(),
            parent,
            state: LoadState::Loading,
        });
        Ok(id)
    }

    pub(crate) fn mark_loaded(&mut self, id: ModuleId) {
        let module = self.module_mut(id);
        if module.state == LoadState::Loading {
            module.state = LoadState::Loaded;
        }
    }

    pub(crate) fn push_alias(&mut self, make: impl FnOnce(AliasId) -> AliasData) -> AliasId {
        let id = AliasId::from_index(self.aliases.len());
        self.aliases.push(make(id));
        id
    }

    /// Walk (creating as needed) the package chain.
    fn package_for(
        &mut self,
        packages: &[Name],
        interner: &StringInterner,
    ) -> Result<PackageId, ImportError> {
        let mut current = PackageId::ROOT;
        for &segment in packages {
            current = self.child_package(current, segment, interner)?;
        }
        Ok(current)
    }

    fn child_package(
        &mut self,
        parent: PackageId,
        name: Name,
        interner: &StringInterner,
    ) -> Result<PackageId, ImportError> {
        match self.child(parent, name) {
            Some(Entity::Package(id)) => Ok(id),
            Some(Entity::Module(module)) => Err(ImportError::new(
                ImportErrorKind::ImportNameConflict,
                format!(
                    "`{}` is a module, not a package",
                    interner.lookup(name)
                ),
            )
            .with_note(format!(
                "module `{}` was loaded from {}",
                self.module(module).path,
                self.module(module).file().display()
            ))),
            None => {
                let id = PackageId::from_index(self.packages.len());
                self.packages.push(PackageData {
                    id,
                    name,
                    parent: Some(parent),
                    children: FxHashMap::default(),
                    package_module: None,
                });
                self.packages[parent.index()]
                    .children
                    .insert(name, Entity::Package(id));
                Ok(id)
            }
        }
    }
}

pub(crate) fn parse_module(
    path: &str,
    location: &SourceLocation,
    parser: &mut dyn ModuleParser,
    interner: &StringInterner,
) -> Result<ParsedModule, ImportError> {
    debug!(file = %location.path.display(), "parsing module");
    parser.parse(location, interner).map_err(|failure| match failure {
        ParseFailure::Unreadable(reason) => ImportError::new(
            ImportErrorKind::SourceUnreadable,
            format!(
                "cannot read module `{path}` from {}: {reason}",
                location.path.display()
            ),
        ),
        ParseFailure::Syntax {
            source,
            diagnostics,
        } => ImportError::new(
            ImportErrorKind::ParseFailure,
            format!("module `{path}` has syntax errors"),
        )
        .with_nested(NestedDiagnostics {
            file: location.path.clone(),
            source,
            diagnostics,
        }),
    })
}
