//! Selective-import aliases.
//!
//! `import std.io : say = writeln;` creates one alias `say` that forwards
//! to `writeln` inside `std.io`. Looking `writeln` up is deferred until the
//! alias is first used, because the target module's scope may not be
//! complete when the alias is created.

use rustc_hash::FxHashMap;
use strand_ir::{Name, Span, StringInterner};
use tracing::trace;

use crate::symbol::{AliasId, ImportRef, ModuleId, Resolved};
use crate::{ImportError, ImportErrorKind, ModuleCache};

/// Lazy resolution state of an alias.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum AliasState {
    Unresolved,
    /// Resolution is in progress; reaching this state again is a cycle.
    Resolving,
    Resolved(Resolved),
    /// Resolution failed and the error was reported.
    Failed,
}

/// One alias declaration generated from a selective binding.
#[derive(Clone, Debug)]
pub struct AliasData {
    pub id: AliasId,
    /// Local name in the importing module.
    pub name: Name,
    /// Name looked up in the imported module.
    pub source: Name,
    pub import: ImportRef,
    /// Imported module the alias forwards into.
    pub target: ModuleId,
    pub span: Span,
    pub(crate) state: AliasState,
}

impl AliasData {
    pub fn kind(&self) -> &'static str {
        "alias"
    }

    pub fn state(&self) -> &AliasState {
        &self.state
    }

    pub fn resolved(&self) -> Option<&Resolved> {
        match &self.state {
            AliasState::Resolved(resolved) => Some(resolved),
            _ => None,
        }
    }
}

/// Create one alias per selective binding of `import`, forwarding into
/// `target`.
///
/// Local names must be pairwise distinct; otherwise nothing is created and
/// [`ImportErrorKind::DuplicateImportBinding`] is returned.
pub fn bind_aliases(
    cache: &mut ModuleCache,
    import: ImportRef,
    target: ModuleId,
    interner: &StringInterner,
) -> Result<Vec<AliasId>, ImportError> {
    let bindings = cache.import(import).syntax.bindings.clone();

    let mut seen: FxHashMap<Name, Span> = FxHashMap::default();
    for binding in &bindings {
        let local = binding.local_name();
        if let Some(&first) = seen.get(&local) {
            return Err(ImportError::with_span(
                ImportErrorKind::DuplicateImportBinding,
                format!(
                    "`{}` is bound more than once in this import",
                    interner.lookup(local)
                ),
                binding.span,
            )
            .with_related(first, "first bound here")
            .with_note("each selective binding needs its own local name"));
        }
        seen.insert(local, binding.span);
    }

    let ids = bindings
        .iter()
        .map(|binding| {
            cache.push_alias(|id| AliasData {
                id,
                name: binding.local_name(),
                source: binding.name,
                import,
                target,
                span: binding.span,
                state: AliasState::Unresolved,
            })
        })
        .collect::<Vec<_>>();
    trace!(count = ids.len(), "aliases created");
    Ok(ids)
}
