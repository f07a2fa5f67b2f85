//! Shared fixtures: a module tree on disk and sessions over it.

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use strand_ir::{SharedInterner, StringInterner};
use strand_resolve::{
    ImportErrorKind, ModuleId, ModuleParser, ParseFailure, ParsedModule, ResolverConfig,
    Resolved, Session, SourceLocation, SourceParser,
};
use tempfile::TempDir;

/// A temporary directory holding `.sd` files; the directory is the only
/// search root.
pub struct Tree {
    dir: TempDir,
}

impl Tree {
    pub fn new(files: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        for (rel, text) in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, text).unwrap();
        }
        Tree { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn config(&self) -> ResolverConfig {
        ResolverConfig::new().with_root(self.root())
    }

    pub fn session(&self) -> Session {
        Session::new(self.config(), SharedInterner::new())
    }

    /// Session whose parser counts how many files it parsed.
    pub fn counted_session(&self) -> (Session, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let parser = CountingParser {
            calls: Rc::clone(&calls),
        };
        let session = Session::with_parser(self.config(), SharedInterner::new(), Box::new(parser));
        (session, calls)
    }

    /// Load `rel` as the root module and run phase 2.
    pub fn analyze(&self, rel: &str) -> (Session, ModuleId) {
        let mut session = self.session();
        let id = session.load_root(&self.path(rel)).unwrap();
        session.analyze();
        (session, id)
    }
}

struct CountingParser {
    calls: Rc<Cell<usize>>,
}

impl ModuleParser for CountingParser {
    fn parse(
        &mut self,
        location: &SourceLocation,
        interner: &StringInterner,
    ) -> Result<ParsedModule, ParseFailure> {
        self.calls.set(self.calls.get() + 1);
        SourceParser.parse(location, interner)
    }
}

pub fn error_kinds(session: &Session) -> Vec<ImportErrorKind> {
    session.errors().iter().map(|e| e.kind).collect()
}

/// Look up dotted `path` from `module` and describe the result.
pub fn find(session: &mut Session, module: ModuleId, path: &str) -> Option<String> {
    let resolved: Option<Resolved> = session.lookup_path(module, path).unwrap();
    resolved.map(|r| session.describe(&r))
}
