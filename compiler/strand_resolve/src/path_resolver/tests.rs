use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use strand_ir::StringInterner;

use super::{ModulePathResolver, SourceLocation};
use crate::config::ResolverConfig;
use crate::ImportErrorKind;

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "").unwrap();
}

#[test]
fn dotted_path_maps_to_directories() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("std/io.sd"));
    let interner = StringInterner::new();
    let resolver = ModulePathResolver::new(ResolverConfig::new().with_root(dir.path()));

    let found = resolver
        .resolve(&[interner.intern("std")], interner.intern("io"), &interner)
        .unwrap();
    assert_eq!(found, SourceLocation::file(dir.path().join("std/io.sd")));
}

#[test]
fn interface_file_is_preferred() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("m.sd"));
    touch(&dir.path().join("m.sdi"));
    let interner = StringInterner::new();
    let resolver = ModulePathResolver::new(ResolverConfig::new().with_root(dir.path()));

    let found = resolver.resolve(&[], interner.intern("m"), &interner).unwrap();
    assert_eq!(found.path, dir.path().join("m.sdi"));
}

#[test]
fn first_root_wins() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    touch(&first.path().join("m.sd"));
    touch(&second.path().join("m.sdi"));
    let interner = StringInterner::new();
    let resolver = ModulePathResolver::new(
        ResolverConfig::new()
            .with_root(first.path())
            .with_root(second.path()),
    );

    let found = resolver.resolve(&[], interner.intern("m"), &interner).unwrap();
    assert_eq!(found.path, first.path().join("m.sd"));
}

#[test]
fn package_module_fallback() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("std/package.sd"));
    let interner = StringInterner::new();
    let resolver = ModulePathResolver::new(ResolverConfig::new().with_root(dir.path()));

    let found = resolver.resolve(&[], interner.intern("std"), &interner).unwrap();
    assert!(found.is_package_module);
    assert_eq!(found.path, dir.path().join("std/package.sd"));
}

#[test]
fn missing_module_lists_roots() {
    let dir = tempfile::tempdir().unwrap();
    let interner = StringInterner::new();
    let resolver = ModulePathResolver::new(ResolverConfig::new().with_root(dir.path()));

    let err = resolver
        .resolve(&[interner.intern("a")], interner.intern("b"), &interner)
        .unwrap_err();
    assert_eq!(err.kind, ImportErrorKind::ModuleNotFound);
    assert_eq!(err.message, "module `a.b` not found");
    assert_eq!(err.notes, vec![format!("searched: {}", dir.path().display())]);
}

#[test]
fn candidate_order() {
    let interner = StringInterner::new();
    let resolver = ModulePathResolver::new(ResolverConfig::new().with_root("r"));
    let paths: Vec<_> = resolver
        .candidates(&[interner.intern("p")], interner.intern("m"), &interner)
        .into_iter()
        .map(|c| c.path.to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(
        paths,
        vec![
            "r/p/m.sdi",
            "r/p/m.sd",
            "r/p/m/package.sdi",
            "r/p/m/package.sd"
        ]
    );
}
