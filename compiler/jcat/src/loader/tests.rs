use std::fs;

use super::*;
use jcat_ir::ExprKind;
use jcat_resolve::ImportErrorKind;
use pretty_assertions::assert_eq;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap_or_else(|e| panic!("mkdir failed: {e}"));
    }
    fs::write(&path, contents).unwrap_or_else(|e| panic!("write failed: {e}"));
    path
}

fn tempdir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir failed: {e}"))
}

fn importer(search_paths: Vec<PathBuf>) -> FileImporter {
    FileImporter::new(SharedInterner::new(), LoaderConfig { search_paths })
}

fn import_err(loader: &FileImporter, from: &Path, target: &str) -> ImportError {
    match loader.resolve_import(from, target) {
        Ok(imported) => panic!("expected {target:?} to fail, got {}", imported.path.display()),
        Err(e) => e,
    }
}

#[test]
fn test_normalize_path() {
    let cases = [
        ("a/./b/../c.libsonnet", "a/c.libsonnet"),
        ("./main.libsonnet", "main.libsonnet"),
        ("../lib/x.libsonnet", "../lib/x.libsonnet"),
        ("a/../../x", "../x"),
        ("/root/../x", "/x"),
        ("/../x", "/x"),
    ];
    for (input, expected) in cases {
        assert_eq!(normalize_path(Path::new(input)), PathBuf::from(expected), "input: {input}");
    }
}

#[test]
fn test_loader_config_priority() {
    let config = LoaderConfig::new(
        &[PathBuf::from("first"), PathBuf::from("second")],
        std::env::join_paths(["env_a", "env_b"]).ok().as_deref(),
    );
    assert_eq!(
        config.search_paths,
        vec![
            PathBuf::from("second"),
            PathBuf::from("first"),
            PathBuf::from("env_a"),
            PathBuf::from("env_b"),
        ]
    );
}

#[test]
fn test_loader_config_without_env() {
    let config = LoaderConfig::new(&[PathBuf::from("only")], None);
    assert_eq!(config.search_paths, vec![PathBuf::from("only")]);
}

#[test]
fn test_candidates_order() {
    let loader = importer(vec![PathBuf::from("vendor"), PathBuf::from("lib")]);
    assert_eq!(
        loader.candidates(Path::new("src/main.libsonnet"), "util.libsonnet"),
        vec![
            PathBuf::from("src/util.libsonnet"),
            PathBuf::from("vendor/util.libsonnet"),
            PathBuf::from("lib/util.libsonnet"),
        ]
    );
    assert_eq!(
        loader.candidates(Path::new("src/main.libsonnet"), "../util.libsonnet")[0],
        PathBuf::from("util.libsonnet")
    );
}

#[test]
fn test_candidates_absolute_target_skips_search_paths() {
    let loader = importer(vec![PathBuf::from("vendor")]);
    let target = if cfg!(windows) { "C:\\abs\\x.libsonnet" } else { "/abs/x.libsonnet" };
    assert_eq!(
        loader.candidates(Path::new("main.libsonnet"), target),
        vec![PathBuf::from(target)]
    );
}

#[test]
fn test_resolve_relative_to_importing_file() {
    let dir = tempdir();
    write(dir.path(), "sub/lib.libsonnet", "{ f: function(x) 0 }");
    let main = write(dir.path(), "sub/main.libsonnet", "{}");

    let loader = importer(vec![]);
    let imported = loader
        .resolve_import(&main, "lib.libsonnet")
        .unwrap_or_else(|e| panic!("import failed: {e}"));
    assert_eq!(imported.path, normalize_path(&dir.path().join("sub/lib.libsonnet")));
    assert!(matches!(imported.root.kind, ExprKind::Object { .. }));
}

#[test]
fn test_resolve_from_search_path() {
    let dir = tempdir();
    write(dir.path(), "vendor/k.libsonnet", "{ k: 1 }");
    let main = write(dir.path(), "app/main.libsonnet", "{}");

    let loader = importer(vec![dir.path().join("vendor")]);
    let imported = loader
        .resolve_import(&main, "k.libsonnet")
        .unwrap_or_else(|e| panic!("import failed: {e}"));
    assert_eq!(imported.path, normalize_path(&dir.path().join("vendor/k.libsonnet")));
}

#[test]
fn test_local_file_wins_over_search_path() {
    let dir = tempdir();
    write(dir.path(), "vendor/k.libsonnet", "{ vendored: 1 }");
    write(dir.path(), "app/k.libsonnet", "{ local_copy: 1 }");
    let main = write(dir.path(), "app/main.libsonnet", "{}");

    let loader = importer(vec![dir.path().join("vendor")]);
    let imported = loader
        .resolve_import(&main, "k.libsonnet")
        .unwrap_or_else(|e| panic!("import failed: {e}"));
    assert_eq!(imported.path, normalize_path(&dir.path().join("app/k.libsonnet")));
}

#[test]
fn test_earlier_search_path_wins() {
    let dir = tempdir();
    write(dir.path(), "high/k.libsonnet", "{}");
    write(dir.path(), "low/k.libsonnet", "{}");
    let main = write(dir.path(), "main.libsonnet", "{}");

    let loader = importer(vec![dir.path().join("high"), dir.path().join("low")]);
    let imported = loader
        .resolve_import(&main, "k.libsonnet")
        .unwrap_or_else(|e| panic!("import failed: {e}"));
    assert_eq!(imported.path, normalize_path(&dir.path().join("high/k.libsonnet")));
}

#[test]
fn test_import_not_found() {
    let dir = tempdir();
    let main = write(dir.path(), "main.libsonnet", "{}");

    let loader = importer(vec![]);
    let err = import_err(&loader, &main, "nope.libsonnet");
    assert_eq!(err.kind, ImportErrorKind::NotFound);
    assert_eq!(err.target, "nope.libsonnet");
    assert_eq!(err.file, main);
    assert!(err.to_string().starts_with("couldn't open import \"nope.libsonnet\""));
}

#[test]
fn test_import_parse_error_is_located() {
    let dir = tempdir();
    write(dir.path(), "bad.libsonnet", "{\n  a: ,\n}");
    let main = write(dir.path(), "main.libsonnet", "{}");

    let loader = importer(vec![]);
    let err = import_err(&loader, &main, "bad.libsonnet");
    assert_eq!(err.kind, ImportErrorKind::Parse);

    let (at, span) = err.location.clone().unwrap_or_else(|| panic!("no location: {err:?}"));
    assert_eq!(at, normalize_path(&dir.path().join("bad.libsonnet")));
    assert_eq!(
        loader.line_col(&at, span),
        Some(LineCol { line: 2, column: 6 })
    );
}

#[test]
fn test_cache_shares_parsed_tree() {
    let dir = tempdir();
    write(dir.path(), "lib.libsonnet", "{ f: function(x) 0 }");
    let main = write(dir.path(), "main.libsonnet", "{}");

    let loader = importer(vec![]);
    let first = loader
        .resolve_import(&main, "lib.libsonnet")
        .unwrap_or_else(|e| panic!("import failed: {e}"));
    let second = loader
        .resolve_import(&main, "./lib.libsonnet")
        .unwrap_or_else(|e| panic!("import failed: {e}"));
    assert!(Arc::ptr_eq(&first.root, &second.root));
    assert_eq!(loader.loaded_count(), 1);
}

#[test]
fn test_load_root_normalizes_path() {
    let dir = tempdir();
    write(dir.path(), "main.libsonnet", "{ a: 1 }");

    let loader = importer(vec![]);
    let (root, path) = loader
        .load_root(&dir.path().join("./x/../main.libsonnet"))
        .unwrap_or_else(|e| panic!("load failed: {e}"));
    assert_eq!(path, normalize_path(&dir.path().join("main.libsonnet")));
    assert!(matches!(root.kind, ExprKind::Object { .. }));
}

#[test]
fn test_load_root_missing() {
    let dir = tempdir();
    let loader = importer(vec![]);
    let err = match loader.load_root(&dir.path().join("main.libsonnet")) {
        Ok((_, path)) => panic!("expected a missing file, loaded {}", path.display()),
        Err(e) => e,
    };
    assert_eq!(err.kind, ImportErrorKind::NotFound);
}
