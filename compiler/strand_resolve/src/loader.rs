//! Phase 1: resolve every import declaration to a module.
//!
//! Loading is depth first. A freshly parsed module is registered in the
//! cache and its own imports are loaded before the importing declaration
//! is marked resolved. A module reached again while it is still loading is
//! returned as-is, so import cycles terminate.

use std::ffi::OsStr;
use std::path::Path;

use strand_ir::{dotted, ImportDecl, Name};
use tracing::{debug, instrument};

use crate::alias::bind_aliases;
use crate::cache::{parse_module, CacheLookup};
use crate::path_resolver::SourceLocation;
use crate::stack::ensure_sufficient_stack;
use crate::symbol::{Entity, ImportRef, ModuleId, PackageId};
use crate::{ImportError, ImportErrorKind, Session};

impl Session {
    /// Load a file as a root compilation unit, then load everything it
    /// imports.
    ///
    /// The module is registered under its `module` header, or under the
    /// file stem when it has none. Errors in imported modules are collected
    /// in [`Session::errors`]; only a failure to load the root itself is
    /// returned.
    #[instrument(level = "debug", skip_all, fields(file = %file.display()))]
    pub fn load_root(&mut self, file: &Path) -> Result<ModuleId, ImportError> {
        let location = SourceLocation::file(file);
        let display = file.display().to_string();
        let parsed = parse_module(&display, &location, self.parser.as_mut(), &self.interner)
            .map_err(|e| e.or_origin(file))?;

        let (packages, name) = match &parsed.ast.header {
            Some(header) => (header.packages.clone(), header.name),
            None => {
                let stem = file.file_stem().and_then(OsStr::to_str).ok_or_else(|| {
                    ImportError::new(
                        ImportErrorKind::SourceUnreadable,
                        format!("cannot derive a module name from {display}"),
                    )
                })?;
                (Vec::new(), self.interner.intern(stem))
            }
        };

        let id = self
            .cache
            .register(&packages, name, location, parsed, &self.interner)
            .map_err(|e| e.or_origin(file))?;
        self.load_module_imports(id);
        Ok(id)
    }

    /// Load a module by dotted path (`std.io`) through the search roots.
    pub fn load_module(&mut self, path: &str) -> Result<ModuleId, ImportError> {
        let mut segments: Vec<Name> = path.split('.').map(|s| self.interner.intern(s)).collect();
        let module = segments.pop().unwrap_or(Name::EMPTY);
        let lookup = self.cache.get_or_load(
            &segments,
            module,
            &self.resolver,
            self.parser.as_mut(),
            &self.interner,
        )?;
        if let CacheLookup::Fresh(id) = lookup {
            self.load_module_imports(id);
        }
        Ok(lookup.id())
    }

    /// Run phase 1 over every import of `id`, recording failures and
    /// carrying on with the siblings.
    fn load_module_imports(&mut self, id: ModuleId) {
        let count = self.cache.module(id).imports.len();
        for index in 0..count {
            let import = ImportRef {
                module: id,
                index: u32::try_from(index).unwrap_or(u32::MAX),
            };
            if let Err(err) = self.load_import(import) {
                self.report(id, err);
            }
        }
        self.cache.mark_loaded(id);
    }

    /// Phase 1 for one declaration. Calling it again is a no-op.
    #[instrument(
        level = "debug",
        skip_all,
        fields(module = import.module.index(), index = import.index)
    )]
    pub fn load_import(&mut self, import: ImportRef) -> Result<(), ImportError> {
        let decl = self.cache.import(import);
        if !decl.is_unresolved() {
            return Ok(());
        }
        let span = decl.syntax.span;
        let syntax = decl.syntax.clone();

        match self.resolve_import(import, &syntax) {
            Ok(module) => {
                debug!(module = %self.cache.module(module).path, "import resolved");
                Ok(())
            }
            Err(err) => {
                self.cache.import_mut(import).fail();
                Err(err.or_span(span))
            }
        }
    }

    fn resolve_import(
        &mut self,
        import: ImportRef,
        syntax: &ImportDecl,
    ) -> Result<ModuleId, ImportError> {
        let lookup = self.cache.get_or_load(
            &syntax.packages,
            syntax.module,
            &self.resolver,
            self.parser.as_mut(),
            &self.interner,
        )?;
        match lookup {
            CacheLookup::Fresh(id) => {
                ensure_sufficient_stack(|| self.load_module_imports(id));
            }
            CacheLookup::Loading(id) => {
                debug!(
                    module = %self.cache.module(id).path,
                    "import cycle; using module still loading"
                );
            }
            CacheLookup::Cached(_) => {}
        }
        let module = lookup.id();

        self.check_module_name(module, syntax)?;
        let package = self.leftmost_entity(module, syntax)?;
        let aliases = bind_aliases(&mut self.cache, import, module, &self.interner)?;
        self.cache
            .import_mut(import)
            .resolve(module, package, aliases);
        Ok(module)
    }

    /// A `module x.y;` header must match the path the module was imported by.
    fn check_module_name(&self, module: ModuleId, syntax: &ImportDecl) -> Result<(), ImportError> {
        let data = self.cache.module(module);
        let Some(header) = &data.ast.header else {
            return Ok(());
        };
        if header.packages == syntax.packages && header.name == syntax.module {
            return Ok(());
        }
        let mut declared = header.packages.clone();
        declared.push(header.name);
        Err(ImportError::new(
            ImportErrorKind::ModuleNameMismatch,
            format!(
                "module `{}` declares itself as `{}`",
                data.path,
                dotted(&*self.interner, &declared)
            ),
        )
        .with_note(format!("declared in {}", data.file().display())))
    }

    /// Walk the package path left to right; the first segment is the entity
    /// used as the root of fully qualified lookups.
    fn leftmost_entity(
        &self,
        module: ModuleId,
        syntax: &ImportDecl,
    ) -> Result<Entity, ImportError> {
        let mut current = PackageId::ROOT;
        let mut leftmost = None;
        for (i, &segment) in syntax.packages.iter().enumerate() {
            match self.cache.child(current, segment) {
                Some(Entity::Package(next)) => {
                    leftmost.get_or_insert(next);
                    current = next;
                }
                _ => {
                    return Err(ImportError::new(
                        ImportErrorKind::ModuleNotFound,
                        format!(
                            "package `{}` not found",
                            dotted(&*self.interner, &syntax.packages[..=i])
                        ),
                    ));
                }
            }
        }
        Ok(leftmost.map_or(Entity::Module(module), Entity::Package))
    }
}
