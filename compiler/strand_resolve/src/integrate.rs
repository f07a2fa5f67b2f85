//! Phase 2: publish members and imports into module scopes.
//!
//! Runs only after phase 1 has loaded every reachable module. Members of
//! every module are declared first, then imports are bound, so a selective
//! import can see the target's members regardless of module order.

use smallvec::SmallVec;
use strand_ir::{Name, Span};
use tracing::{instrument, trace};

use crate::module::LoadState;
use crate::scope::{Binding, BindingTarget, Compatibility, InsertOutcome};
use crate::symbol::{AliasId, Entity, ImportRef, MemberRef, ModuleId, Resolved};
use crate::{ImportError, ImportErrorKind, Session};

impl Session {
    /// Run phase 2 over every module loaded so far, then check that every
    /// selective binding names something.
    #[instrument(level = "debug", skip_all)]
    pub fn analyze(&mut self) {
        let pending: Vec<ModuleId> = self
            .cache
            .modules()
            .filter(|m| m.state == LoadState::Loaded)
            .map(|m| m.id)
            .collect();

        for &id in &pending {
            self.declare_members(id);
        }
        for &id in &pending {
            let mut errors = Vec::new();
            for index in 0..self.cache.module(id).imports.len() {
                let import = ImportRef {
                    module: id,
                    index: u32::try_from(index).unwrap_or(u32::MAX),
                };
                self.bind_import(import, &mut errors);
            }
            for err in errors {
                self.report(id, err);
            }
        }
        for &id in &pending {
            self.cache.module_mut(id).state = LoadState::Integrated;
        }

        self.integrated = true;
        self.validate_aliases();
        self.check_deferred();
    }

    /// Insert a module's own members into its scope. Functions overload;
    /// any other repeated name is a duplicate declaration.
    fn declare_members(&mut self, id: ModuleId) {
        let members = self.cache.module(id).ast.members.clone();
        let mut errors = Vec::new();
        for (index, member) in members.iter().enumerate() {
            let binding = Binding {
                target: BindingTarget::Member(MemberRef {
                    module: id,
                    index: u32::try_from(index).unwrap_or(u32::MAX),
                }),
                via: None,
                site: member.span,
            };
            let overloadable = member.kind.is_overloadable();
            let result = self
                .cache
                .module_mut(id)
                .scope
                .insert(member.name, binding, |_, old| {
                    let old_overloadable = match old.target {
                        BindingTarget::Member(m) => members
                            .get(m.index as usize)
                            .is_some_and(|o| o.kind.is_overloadable()),
                        _ => false,
                    };
                    if overloadable && old_overloadable {
                        Compatibility::Overload
                    } else {
                        Compatibility::Conflict
                    }
                });
            if let Err(old) = result {
                errors.push(
                    ImportError::with_span(
                        ImportErrorKind::DuplicateDeclaration,
                        format!(
                            "`{}` is declared more than once",
                            self.interner.lookup(member.name)
                        ),
                        member.span,
                    )
                    .with_related(old.site, "previous declaration")
                    .with_note("only functions may share a name"),
                );
            }
        }
        for err in errors {
            self.report(id, err);
        }
    }

    /// Bind one resolved import into its module's scope.
    ///
    /// - selective: each alias under its local name, nothing else
    /// - `as alias`: the module under the alias only
    /// - `static`: the root package and the module name, qualification only
    /// - plain: as `static`, and the module's members become visible
    ///   unqualified
    pub fn bind_import(&mut self, import: ImportRef, errors: &mut Vec<ImportError>) {
        let decl = self.cache.import(import);
        let Some(target) = decl.resolved_module() else {
            return;
        };
        let syntax = decl.syntax.clone();
        let package = decl.resolved_package();
        let aliases = decl.alias_decls().to_vec();
        let owner = import.module;
        let via = Some(import);

        if syntax.is_selective() {
            for alias in aliases {
                let data = self.cache.alias(alias);
                let (name, site) = (data.name, data.span);
                let binding = Binding {
                    target: BindingTarget::Alias(alias),
                    via,
                    site,
                };
                self.bind_name(owner, name, binding, errors);
            }
            return;
        }

        // `import std;` naming `std/package.sd` binds the package, whose
        // lookups fall back to that module.
        let data = self.cache.module(target);
        let module_target = if data.location.is_package_module {
            BindingTarget::Package(data.parent)
        } else {
            BindingTarget::Module(target)
        };
        let module_binding = Binding {
            target: module_target,
            via,
            site: syntax.span,
        };
        if let Some(alias) = syntax.module_alias {
            self.bind_name(owner, alias, module_binding, errors);
            return;
        }

        if let Some(Entity::Package(root)) = package {
            let root_binding = Binding {
                target: BindingTarget::Package(root),
                via,
                site: syntax.span,
            };
            self.bind_name(owner, syntax.root_name(), root_binding, errors);
        }
        self.bind_name(owner, syntax.module, module_binding, errors);

        if !syntax.is_static {
            self.cache.module_mut(owner).scope.expose(import);
        }
    }

    fn bind_name(
        &mut self,
        owner: ModuleId,
        name: Name,
        binding: Binding,
        errors: &mut Vec<ImportError>,
    ) {
        let existing: SmallVec<[Binding; 2]> = self
            .cache
            .module(owner)
            .scope
            .lookup(name)
            .map(|b| b.iter().copied().collect())
            .unwrap_or_default();
        let verdicts: SmallVec<[Option<Compatibility>; 2]> = existing
            .iter()
            .map(|old| self.compatibility(old.target, binding.target))
            .collect();
        if verdicts.iter().any(Option::is_none) && !self.deferred.contains(&(owner, name)) {
            self.deferred.push((owner, name));
        }

        // Undecided pairs are merged for now and checked again by
        // `check_deferred` once every module is integrated.
        let result = self
            .cache
            .module_mut(owner)
            .scope
            .insert(name, binding, |i, _| match verdicts.get(i) {
                Some(Some(verdict)) => *verdict,
                Some(None) => Compatibility::Overload,
                None => Compatibility::Conflict,
            });
        match result {
            Ok(InsertOutcome::Inserted) => {}
            Ok(outcome) => trace!(name = self.interner.lookup(name), ?outcome, "binding merged"),
            Err(old) => errors.push(self.name_conflict(name, binding.site, old.site)),
        }
    }

    fn name_conflict(&self, name: Name, site: Span, previous: Span) -> ImportError {
        ImportError::with_span(
            ImportErrorKind::ImportNameConflict,
            format!(
                "import of `{}` conflicts with an existing binding",
                self.interner.lookup(name)
            ),
            site,
        )
        .with_related(previous, "previously bound here")
    }

    /// Decide whether two bindings of one name can coexist. `None` while an
    /// alias among them cannot be resolved yet.
    fn compatibility(&mut self, old: BindingTarget, new: BindingTarget) -> Option<Compatibility> {
        if old == new {
            return Some(Compatibility::Same);
        }
        let a = self.binding_resolution(old)?;
        let b = self.binding_resolution(new)?;
        if a == b {
            return Some(Compatibility::Same);
        }
        let (ma, mb) = (a.members(), b.members());
        let all_functions = ma
            .iter()
            .chain(mb.iter())
            .all(|m| self.cache.member(*m).kind.is_overloadable());
        Some(if !ma.is_empty() && !mb.is_empty() && all_functions {
            Compatibility::Overload
        } else {
            Compatibility::Conflict
        })
    }

    /// Re-check names whose bindings were merged undecided. A binding that
    /// conflicts with an earlier one is dropped and reported. Aliases that
    /// still do not resolve were already reported by `validate_aliases`.
    fn check_deferred(&mut self) {
        for (owner, name) in std::mem::take(&mut self.deferred) {
            let bindings: SmallVec<[Binding; 2]> = self
                .cache
                .module(owner)
                .scope
                .lookup(name)
                .map(|b| b.iter().copied().collect())
                .unwrap_or_default();
            let mut kept: SmallVec<[Binding; 2]> = SmallVec::new();
            for binding in bindings {
                let clash = kept.iter().copied().find(|old| {
                    self.compatibility(old.target, binding.target) == Some(Compatibility::Conflict)
                });
                match clash {
                    Some(old) => {
                        self.cache.module_mut(owner).scope.remove(name, &binding);
                        let err = self.name_conflict(name, binding.site, old.site);
                        self.report(owner, err);
                    }
                    None => kept.push(binding),
                }
            }
        }
    }

    fn binding_resolution(&mut self, target: BindingTarget) -> Option<Resolved> {
        match target {
            BindingTarget::Member(member) => Some(Resolved::Member(member)),
            BindingTarget::Module(module) => Some(Resolved::Module(module)),
            BindingTarget::Package(package) => Some(Resolved::Package(package)),
            BindingTarget::Alias(alias) => self.resolve_alias(alias).ok().flatten(),
        }
    }

    /// Resolve every alias not used yet, reporting the ones that fail.
    fn validate_aliases(&mut self) {
        for index in 0..self.cache.alias_count() {
            let alias = AliasId::from_index(index);
            if let Err(err) = self.resolve_alias(alias) {
                let owner = self.cache.alias(alias).import.module;
                self.report(owner, err);
            }
        }
    }
}
