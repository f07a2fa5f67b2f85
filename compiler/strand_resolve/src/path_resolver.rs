//! Module path to file resolution.
//!
//! `a.b.c` is probed as `<root>/a/b/c.<ext>` and then as
//! `<root>/a/b/c/<package_module>.<ext>`, for every root in order and every
//! extension in order. The first existing file wins. Resolution is a pure
//! function of the configuration and the file system.

use std::path::PathBuf;

use strand_ir::{dotted, Name, StringLookup};

use crate::config::ResolverConfig;
use crate::{ImportError, ImportErrorKind};

/// Where a module's source lives.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub path: PathBuf,
    /// The file is a package's own module (`std/package.sd` for `std`).
    pub is_package_module: bool,
}

impl SourceLocation {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        SourceLocation {
            path: path.into(),
            is_package_module: false,
        }
    }
}

/// Maps package/module paths onto source files.
#[derive(Clone, Debug, Default)]
pub struct ModulePathResolver {
    config: ResolverConfig,
}

impl ModulePathResolver {
    pub fn new(config: ResolverConfig) -> Self {
        ModulePathResolver { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Every location probed for `packages.module`, in probe order.
    pub fn candidates<I: StringLookup + ?Sized>(
        &self,
        packages: &[Name],
        module: Name,
        interner: &I,
    ) -> Vec<SourceLocation> {
        let mut relative = PathBuf::new();
        for package in packages {
            relative.push(interner.lookup(*package));
        }
        let stem = interner.lookup(module);

        let mut out = Vec::with_capacity(self.config.search_roots.len() * 4);
        for root in &self.config.search_roots {
            let dir = root.join(&relative);
            for ext in &self.config.source_extensions {
                out.push(SourceLocation::file(dir.join(format!("{stem}.{ext}"))));
            }
            for ext in &self.config.source_extensions {
                out.push(SourceLocation {
                    path: dir
                        .join(stem)
                        .join(format!("{}.{ext}", self.config.package_module)),
                    is_package_module: true,
                });
            }
        }
        out
    }

    /// Resolve to the first existing candidate.
    pub fn resolve<I: StringLookup + ?Sized>(
        &self,
        packages: &[Name],
        module: Name,
        interner: &I,
    ) -> Result<SourceLocation, ImportError> {
        if let Some(found) = self
            .candidates(packages, module, interner)
            .into_iter()
            .find(|c| c.path.is_file())
        {
            tracing::trace!(path = %found.path.display(), "module file found");
            return Ok(found);
        }

        let mut segments = packages.to_vec();
        segments.push(module);
        let name = dotted(interner, &segments);
        let mut err = ImportError::new(
            ImportErrorKind::ModuleNotFound,
            format!("module `{name}` not found"),
        );
        err = if self.config.search_roots.is_empty() {
            err.with_note("no import search roots are configured")
                .with_note("add one with `-I <dir>` or STRAND_IMPORT_PATH")
        } else {
            let roots: Vec<String> = self
                .config
                .search_roots
                .iter()
                .map(|r| r.display().to_string())
                .collect();
            err.with_note(format!("searched: {}", roots.join(", ")))
        };
        Err(err)
    }
}

#[cfg(test)]
mod tests;
