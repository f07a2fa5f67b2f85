//! Resolver configuration: search roots and file naming.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Environment variable holding extra import search roots, in the
/// platform's path-list syntax (`:` on Unix, `;` on Windows).
pub const IMPORT_PATH_VAR: &str = "STRAND_IMPORT_PATH";

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("import search root `{}` is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("no source extensions configured")]
    NoExtensions,
    #[error("invalid source extension `{0}`: give it without a leading `.`")]
    InvalidExtension(String),
    #[error("package module name must be a plain identifier, got `{0}`")]
    InvalidPackageModule(String),
}

/// How module paths map onto files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Ordered import search roots; the first root containing a match wins.
    pub search_roots: Vec<PathBuf>,
    /// Extensions probed in order within each root. Interface files first.
    pub source_extensions: Vec<String>,
    /// File stem of a package's own module (`std/package.sd`).
    pub package_module: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            search_roots: Vec::new(),
            source_extensions: vec!["sdi".to_string(), "sd".to_string()],
            package_module: "package".to_string(),
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_roots.push(root.into());
        self
    }

    #[must_use]
    pub fn with_roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_roots.extend(roots.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Append roots from `STRAND_IMPORT_PATH`, if set.
    #[must_use]
    pub fn with_env_roots(self) -> Self {
        match std::env::var_os(IMPORT_PATH_VAR) {
            Some(value) => self.with_path_list(&value),
            None => self,
        }
    }

    /// Append roots from a platform path list. Empty entries are skipped.
    #[must_use]
    pub fn with_path_list(self, value: &OsStr) -> Self {
        let roots: Vec<PathBuf> = std::env::split_paths(value)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        self.with_roots(roots)
    }

    /// Check that every root exists and the naming settings are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }
        for ext in &self.source_extensions {
            if ext.is_empty() || ext.starts_with('.') || ext.contains(['/', '\\']) {
                return Err(ConfigError::InvalidExtension(ext.clone()));
            }
        }
        if !is_identifier(&self.package_module) {
            return Err(ConfigError::InvalidPackageModule(self.package_module.clone()));
        }
        for root in &self.search_roots {
            if !Path::is_dir(root) {
                return Err(ConfigError::NotADirectory(root.clone()));
            }
        }
        Ok(())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
