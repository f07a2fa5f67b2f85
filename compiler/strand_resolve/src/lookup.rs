//! Name lookup through module scopes.
//!
//! Lookup in a module checks its own bindings (members, aliases, module
//! and package names) first. Only when none of those match does it descend
//! into the modules exposed by plain imports. Results from several places
//! merge when they are all functions; anything else is ambiguous.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use strand_ir::{dotted, Name, Span, Visibility};
use tracing::trace;

use crate::alias::AliasState;
use crate::scope::{Binding, BindingTarget};
use crate::stack::ensure_sufficient_stack;
use crate::symbol::{AliasId, Entity, ModuleId, Resolved, SymbolRef};
use crate::{ImportError, ImportErrorKind, Session};

/// Lookup results gathered from several bindings.
#[derive(Default)]
struct Candidates {
    items: SmallVec<[Resolved; 2]>,
}

impl Candidates {
    fn add(&mut self, resolved: Resolved) {
        if !self.items.contains(&resolved) {
            self.items.push(resolved);
        }
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Session {
    /// Look `name` up from inside `module`. `Ok(None)` means not found,
    /// and the caller may continue in an outer scope.
    pub fn search(
        &mut self,
        module: ModuleId,
        name: Name,
    ) -> Result<Option<Resolved>, ImportError> {
        let mut visited = FxHashSet::default();
        self.search_module(module, name, module, &mut visited)
    }

    /// Look up a dotted path (`io.writeln`, `std.io.writeln`) from inside
    /// `module`.
    pub fn search_qualified(
        &mut self,
        module: ModuleId,
        path: &[Name],
    ) -> Result<Option<Resolved>, ImportError> {
        let Some((&first, rest)) = path.split_first() else {
            return Ok(None);
        };
        let Some(mut current) = self.search(module, first)? else {
            return Ok(None);
        };
        for &segment in rest {
            let Some(symbol) = current.as_symbol() else {
                return Ok(None);
            };
            match self.search_in(symbol, segment, module)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// [`search_qualified`](Self::search_qualified) on dotted text. Names
    /// that were never interned cannot be bound anywhere.
    pub fn lookup_path(
        &mut self,
        module: ModuleId,
        path: &str,
    ) -> Result<Option<Resolved>, ImportError> {
        let mut segments = Vec::new();
        for text in path.split('.') {
            match self.interner.get(text) {
                Some(name) => segments.push(name),
                None => return Ok(None),
            }
        }
        self.search_qualified(module, &segments)
    }

    /// Look `name` up inside `symbol` on behalf of module `from`.
    pub fn search_in(
        &mut self,
        symbol: SymbolRef,
        name: Name,
        from: ModuleId,
    ) -> Result<Option<Resolved>, ImportError> {
        match symbol {
            SymbolRef::Module(module) => {
                let mut visited = FxHashSet::default();
                self.search_module(module, name, from, &mut visited)
            }
            SymbolRef::Package(package) => match self.cache.child(package, name) {
                Some(Entity::Package(child)) => Ok(Some(Resolved::Package(child))),
                Some(Entity::Module(child)) => Ok(Some(Resolved::Module(child))),
                None => match self.cache.package(package).package_module {
                    Some(own) => self.search_in(SymbolRef::Module(own), name, from),
                    None => Ok(None),
                },
            },
            SymbolRef::Member(_) => Ok(None),
            SymbolRef::Alias(alias) => match self.resolve_alias(alias)? {
                Some(resolved) => match resolved.as_symbol() {
                    Some(inner) => self.search_in(inner, name, from),
                    None => Ok(None),
                },
                None => Ok(None),
            },
            SymbolRef::Import(import) => match self.cache.import(import).resolved_module() {
                Some(module) => self.search_in(SymbolRef::Module(module), name, from),
                None => Ok(None),
            },
        }
    }

    fn search_module(
        &mut self,
        module: ModuleId,
        name: Name,
        from: ModuleId,
        visited: &mut FxHashSet<ModuleId>,
    ) -> Result<Option<Resolved>, ImportError> {
        if !visited.insert(module) {
            return Ok(None);
        }

        let mut found = Candidates::default();
        let bindings: SmallVec<[Binding; 2]> = self
            .cache
            .module(module)
            .scope
            .lookup(name)
            .map(|b| b.iter().copied().collect())
            .unwrap_or_default();
        for binding in bindings {
            if !self.binding_visible(module, &binding, from) {
                continue;
            }
            let resolved = match binding.target {
                BindingTarget::Member(member) => Some(Resolved::Member(member)),
                BindingTarget::Module(id) => Some(Resolved::Module(id)),
                BindingTarget::Package(id) => Some(Resolved::Package(id)),
                BindingTarget::Alias(alias) => self.resolve_alias(alias)?,
            };
            if let Some(resolved) = resolved {
                found.add(resolved);
            }
        }
        if !found.is_empty() {
            return self.combine(found, name);
        }

        let exposed = self.cache.module(module).scope.exposed().to_vec();
        for import in exposed {
            let decl = self.cache.import(import);
            if !self.visible(module, decl.prot(), from) {
                continue;
            }
            let Some(target) = decl.resolved_module() else {
                continue;
            };
            let nested =
                ensure_sufficient_stack(|| self.search_module(target, name, from, visited));
            if let Some(resolved) = nested? {
                found.add(resolved);
            }
        }
        self.combine(found, name)
    }

    /// Merge candidates: functions join one overload set, anything else
    /// must be unique.
    fn combine(&self, found: Candidates, name: Name) -> Result<Option<Resolved>, ImportError> {
        let mut items = found.items;
        if items.len() <= 1 {
            return Ok(items.pop());
        }

        let mut members = SmallVec::<[_; 2]>::new();
        let mut all_functions = true;
        for item in &items {
            let set = item.members();
            all_functions &= !set.is_empty()
                && set
                    .iter()
                    .all(|m| self.cache.member(*m).kind.is_overloadable());
            for member in set {
                if !members.contains(&member) {
                    members.push(member);
                }
            }
        }
        if all_functions {
            return Ok(Some(if members.len() == 1 {
                Resolved::Member(members[0])
            } else {
                Resolved::Overloads(members)
            }));
        }

        let kinds: Vec<&str> = items
            .iter()
            .map(|item| item.as_symbol().map_or("overload set", |s| s.kind(&self.cache)))
            .collect();
        Err(ImportError::new(
            ImportErrorKind::ImportNameConflict,
            format!(
                "`{}` is ambiguous: it refers to a {}",
                self.interner.lookup(name),
                kinds.join(" and a ")
            ),
        ))
    }

    /// Resolve an alias on first use.
    ///
    /// Before phase 2 has finished everywhere, a miss may only mean the
    /// target scope is incomplete, so nothing is cached until then.
    pub fn resolve_alias(&mut self, alias: AliasId) -> Result<Option<Resolved>, ImportError> {
        let data = self.cache.alias(alias);
        match &data.state {
            AliasState::Resolved(resolved) => return Ok(Some(resolved.clone())),
            AliasState::Failed => return Ok(None),
            AliasState::Resolving => {
                return Err(ImportError::with_span(
                    ImportErrorKind::CircularAlias,
                    format!(
                        "import alias `{}` refers to itself",
                        self.interner.lookup(data.name)
                    ),
                    data.span,
                )
                .with_note("the selected names import each other in a cycle")
                .or_origin(self.cache.module(data.import.module).file()));
            }
            AliasState::Unresolved => {}
        }

        let (source, target, span) = (data.source, data.target, data.span);
        let owner = data.import.module;
        trace!(alias = self.interner.lookup(data.name), "resolving alias");
        self.cache.alias_mut(alias).state = AliasState::Resolving;

        let mut visited = FxHashSet::default();
        let result = self.search_module(target, source, owner, &mut visited);

        let (state, outcome) = match result {
            Ok(Some(resolved)) => (AliasState::Resolved(resolved.clone()), Ok(Some(resolved))),
            Ok(None) if self.integrated => (
                AliasState::Failed,
                Err(self.symbol_not_found(source, target, owner, span)),
            ),
            Ok(None) => (AliasState::Unresolved, Ok(None)),
            Err(err) => (AliasState::Failed, Err(err)),
        };
        self.cache.alias_mut(alias).state = if self.integrated {
            state
        } else {
            AliasState::Unresolved
        };
        outcome
    }

    fn symbol_not_found(
        &self,
        source: Name,
        target: ModuleId,
        owner: ModuleId,
        span: Span,
    ) -> ImportError {
        let module = self.cache.module(target);
        let name = self.interner.lookup(source);
        let mut err = ImportError::with_span(
            ImportErrorKind::SymbolNotFound,
            format!("module `{}` has no member `{name}`", module.path),
            span,
        )
        .or_origin(self.cache.module(owner).file());
        if module.scope.lookup(source).is_some() {
            err = err.with_note(format!("`{name}` exists but is not visible from here"));
        }
        err
    }

    fn binding_visible(&self, owner: ModuleId, binding: &Binding, from: ModuleId) -> bool {
        let visibility = match (binding.via, binding.target) {
            (Some(import), _) => self.cache.import(import).prot(),
            (None, BindingTarget::Member(member)) => self.cache.member(member).visibility,
            (None, _) => Visibility::Public,
        };
        self.visible(owner, visibility, from)
    }

    /// Whether something declared in `owner` with `visibility` can be seen
    /// from `from`. Imports follow the same rule, so a private import is
    /// never re-exported.
    fn visible(&self, owner: ModuleId, visibility: Visibility, from: ModuleId) -> bool {
        if owner == from {
            return true;
        }
        match visibility {
            Visibility::Public => true,
            Visibility::Package => {
                self.cache.module(owner).parent == self.cache.module(from).parent
            }
            Visibility::Private | Visibility::Protected => false,
        }
    }

    /// Human-readable path of a lookup result, for drivers and logs.
    pub fn describe(&self, resolved: &Resolved) -> String {
        match resolved {
            Resolved::Module(id) => format!("module {}", self.cache.module(*id).path),
            Resolved::Package(id) => {
                let mut segments = Vec::new();
                let mut current = Some(*id);
                while let Some(pkg) = current {
                    let data = self.cache.package(pkg);
                    if data.parent.is_some() {
                        segments.push(data.name);
                    }
                    current = data.parent;
                }
                segments.reverse();
                format!("package {}", dotted(&*self.interner, &segments))
            }
            Resolved::Member(member) => {
                let data = self.cache.member(*member);
                format!(
                    "{} {}.{}",
                    data.kind.kind_str(),
                    self.cache.module(member.module).path,
                    self.interner.lookup(data.name)
                )
            }
            Resolved::Overloads(set) => {
                let parts: Vec<String> = set
                    .iter()
                    .map(|m| self.describe(&Resolved::Member(*m)))
                    .collect();
                format!("overloads [{}]", parts.join(", "))
            }
        }
    }
}
