//! The resolution session.
//!
//! A [`Session`] owns the module cache, the path resolver and the parser
//! for one compilation. Every component reaches shared state through it;
//! dropping the session drops every module.

use std::path::Path;

use strand_ir::{Name, SharedInterner};

use crate::config::ResolverConfig;
use crate::parser::{ModuleParser, SourceParser};
use crate::path_resolver::ModulePathResolver;
use crate::symbol::ModuleId;
use crate::{ImportError, ModuleCache};

pub struct Session {
    pub(crate) interner: SharedInterner,
    pub(crate) resolver: ModulePathResolver,
    pub(crate) cache: ModuleCache,
    pub(crate) parser: Box<dyn ModuleParser>,
    pub(crate) errors: Vec<ImportError>,
    /// Phase 2 has run over every loaded module, so a failed alias lookup
    /// is final.
    pub(crate) integrated: bool,
    /// Names bound while one of their aliases could not be resolved yet.
    pub(crate) deferred: Vec<(ModuleId, Name)>,
}

impl Session {
    /// Session reading modules from disk with the Strand parser.
    pub fn new(config: ResolverConfig, interner: SharedInterner) -> Self {
        Self::with_parser(config, interner, Box::new(SourceParser))
    }

    pub fn with_parser(
        config: ResolverConfig,
        interner: SharedInterner,
        parser: Box<dyn ModuleParser>,
    ) -> Self {
        Session {
            interner,
            resolver: ModulePathResolver::new(config),
            cache: ModuleCache::new(),
            parser,
            errors: Vec::new(),
            integrated: false,
            deferred: Vec::new(),
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn resolver(&self) -> &ModulePathResolver {
        &self.resolver
    }

    pub fn cache(&self) -> &ModuleCache {
        &self.cache
    }

    /// Intern `text`.
    pub fn name(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    /// Errors collected so far, in discovery order.
    pub fn errors(&self) -> &[ImportError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn take_errors(&mut self) -> Vec<ImportError> {
        std::mem::take(&mut self.errors)
    }

    /// Record an error raised while processing `module`.
    pub(crate) fn report(&mut self, module: ModuleId, error: ImportError) {
        tracing::debug!(kind = ?error.kind, message = %error.message, "import error");
        let origin = self.cache.module(module).file().to_path_buf();
        self.errors.push(error.or_origin(origin));
    }

    /// File of `module`.
    pub fn file(&self, module: ModuleId) -> &Path {
        self.cache.module(module).file()
    }
}
