//! Module scopes.
//!
//! A scope maps names to one or more bindings. Several bindings under one
//! name form an overload set; whether a new binding may join is decided by
//! the caller, which knows how to resolve aliases.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use strand_ir::{Name, Span};

use crate::symbol::{AliasId, ImportRef, MemberRef, ModuleId, PackageId};

/// What a binding points at.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BindingTarget {
    Member(MemberRef),
    Alias(AliasId),
    Module(ModuleId),
    Package(PackageId),
}

/// One name binding.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Binding {
    pub target: BindingTarget,
    /// Import that introduced the binding; `None` for own members.
    pub via: Option<ImportRef>,
    /// Declaration site in the scope owner's file.
    pub site: Span,
}

/// How a new binding relates to an existing one of the same name.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Compatibility {
    /// Both denote the same entity.
    Same,
    /// Both may coexist in one overload set.
    Overload,
    Conflict,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum InsertOutcome {
    /// The name was new.
    Inserted,
    /// The binding joined an existing overload set.
    Merged,
    /// An equivalent binding was already there.
    AlreadyPresent,
}

#[derive(Clone, Debug, Default)]
pub struct Scope {
    entries: FxHashMap<Name, SmallVec<[Binding; 1]>>,
    /// Plain imports whose members are visible unqualified.
    exposed: Vec<ImportRef>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: Name) -> Option<&[Binding]> {
        self.entries.get(&name).map(SmallVec::as_slice)
    }

    /// Insert `binding` under `name`.
    ///
    /// `classify` is asked about every existing binding (by position). On
    /// conflict nothing is inserted and the conflicting binding is returned.
    pub fn insert(
        &mut self,
        name: Name,
        binding: Binding,
        mut classify: impl FnMut(usize, &Binding) -> Compatibility,
    ) -> Result<InsertOutcome, Binding> {
        let Some(existing) = self.entries.get_mut(&name) else {
            self.entries.insert(name, smallvec::smallvec![binding]);
            return Ok(InsertOutcome::Inserted);
        };

        let mut outcome = InsertOutcome::Merged;
        for (i, old) in existing.iter().enumerate() {
            match classify(i, old) {
                Compatibility::Conflict => return Err(*old),
                Compatibility::Same => outcome = InsertOutcome::AlreadyPresent,
                Compatibility::Overload => {}
            }
        }
        if outcome == InsertOutcome::Merged {
            existing.push(binding);
        }
        Ok(outcome)
    }

    /// Drop one binding of `name`.
    pub fn remove(&mut self, name: Name, binding: &Binding) {
        if let Some(existing) = self.entries.get_mut(&name) {
            existing.retain(|b| b != binding);
            if existing.is_empty() {
                self.entries.remove(&name);
            }
        }
    }

    /// Expose a plain import's members for unqualified lookup.
    pub fn expose(&mut self, import: ImportRef) {
        if !self.exposed.contains(&import) {
            self.exposed.push(import);
        }
    }

    pub fn exposed(&self) -> &[ImportRef] {
        &self.exposed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bound names in no particular order.
    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.entries.keys().copied()
    }
}
