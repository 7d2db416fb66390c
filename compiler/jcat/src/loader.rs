//! File-system import loader.
//!
//! Resolves `import "target"` the way the Jsonnet reference tools do: first
//! relative to the directory of the importing file, then in each library
//! search path in priority order. Parsed files are cached by resolved path
//! and their source text is kept so spans can be mapped back to
//! `line:column` for diagnostics.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use jcat_ir::{Expr, LineCol, LineIndex, SharedInterner, Span};
use jcat_resolve::{ImportError, ImportResolver, ImportedFile};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// Environment variable holding extra library search paths.
pub const JSONNET_PATH_VAR: &str = "JSONNET_PATH";

/// Library search paths, highest priority first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoaderConfig {
    pub search_paths: Vec<PathBuf>,
}

impl LoaderConfig {
    /// Combine `-J` flags with a `JSONNET_PATH` value.
    ///
    /// Later `-J` flags win over earlier ones, and every `-J` flag wins over
    /// `JSONNET_PATH`, whose entries are searched left to right.
    pub fn new(jpaths: &[PathBuf], jsonnet_path: Option<&OsStr>) -> Self {
        let mut search_paths: Vec<PathBuf> = jpaths.iter().rev().cloned().collect();
        if let Some(value) = jsonnet_path {
            let entries = std::env::split_paths(value).filter(|p| !p.as_os_str().is_empty());
            search_paths.extend(entries);
        }
        LoaderConfig { search_paths }
    }

    /// `-J` flags plus `JSONNET_PATH` from the process environment.
    pub fn from_env(jpaths: &[PathBuf]) -> Self {
        let jsonnet_path = std::env::var_os(JSONNET_PATH_VAR);
        Self::new(jpaths, jsonnet_path.as_deref())
    }
}

/// Parsed roots and line tables, keyed by normalized path.
#[derive(Default)]
struct Cache {
    roots: FxHashMap<PathBuf, Arc<Expr>>,
    /// Kept for every file read, including ones that failed to parse.
    line_indexes: FxHashMap<PathBuf, LineIndex>,
}

/// Loads and parses Jsonnet files from disk.
pub struct FileImporter {
    interner: SharedInterner,
    config: LoaderConfig,
    cache: Mutex<Cache>,
}

impl FileImporter {
    pub fn new(interner: SharedInterner, config: LoaderConfig) -> Self {
        FileImporter {
            interner,
            config,
            cache: Mutex::new(Cache::default()),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load the entry file. Returns its root expression and the normalized
    /// path it is known by, which must be used as the root scope's file so
    /// imports of it are recognised as cycles.
    pub fn load_root(&self, path: &Path) -> Result<(Arc<Expr>, PathBuf), ImportError> {
        let target = path.display().to_string();
        let normalized = normalize_path(path);
        if !normalized.is_file() {
            return Err(ImportError::not_found(&target, path, &[normalized]));
        }
        let root = self.load(&normalized, &target, path)?;
        Ok((root, normalized))
    }

    /// Map `span` in an already loaded file to a line and column.
    pub fn line_col(&self, file: &Path, span: Span) -> Option<LineCol> {
        let cache = self.cache.lock();
        cache
            .line_indexes
            .get(file)
            .map(|index| index.line_col(span.start))
    }

    /// Number of distinct files loaded so far.
    pub fn loaded_count(&self) -> usize {
        self.cache.lock().roots.len()
    }

    /// Paths tried for `target` imported from `current_file`, in order.
    pub fn candidates(&self, current_file: &Path, target: &str) -> Vec<PathBuf> {
        let current_dir = current_file.parent().unwrap_or(Path::new(""));
        let mut candidates = Vec::with_capacity(self.config.search_paths.len() + 1);
        candidates.push(normalize_path(&current_dir.join(target)));
        if Path::new(target).is_relative() {
            candidates.extend(
                self.config
                    .search_paths
                    .iter()
                    .map(|dir| normalize_path(&dir.join(target))),
            );
        }
        candidates
    }

    fn load(&self, path: &Path, target: &str, importer: &Path) -> Result<Arc<Expr>, ImportError> {
        if let Some(root) = self.cache.lock().roots.get(path) {
            trace!(path = %path.display(), "import cache hit");
            return Ok(Arc::clone(root));
        }

        let source =
            std::fs::read_to_string(path).map_err(|e| ImportError::io(target, importer, &e))?;
        let parsed = jcat_parse::parse(&source, &self.interner);

        let mut cache = self.cache.lock();
        cache
            .line_indexes
            .insert(path.to_owned(), LineIndex::new(&source));
        let root = match parsed {
            Ok(root) => Arc::new(root),
            Err(e) => {
                return Err(ImportError::parse(
                    target,
                    importer,
                    e.kind.to_string(),
                    path.to_owned(),
                    e.span,
                ))
            }
        };
        debug!(path = %path.display(), bytes = source.len(), "loaded");
        cache.roots.insert(path.to_owned(), Arc::clone(&root));
        Ok(root)
    }
}

impl ImportResolver for FileImporter {
    #[tracing::instrument(level = "debug", skip(self, current_file), fields(from = %current_file.display()))]
    fn resolve_import(
        &self,
        current_file: &Path,
        target: &str,
    ) -> Result<ImportedFile, ImportError> {
        let candidates = self.candidates(current_file, target);
        let Some(path) = candidates.iter().find(|path| path.is_file()) else {
            return Err(ImportError::not_found(target, current_file, &candidates));
        };
        let root = self.load(path, target, current_file)?;
        Ok(ImportedFile {
            root,
            path: path.clone(),
        })
    }
}

/// Resolve `.` and `..` components without touching the file system.
///
/// A leading `..` that cannot be popped is kept, so `../lib.libsonnet`
/// stays relative to the working directory's parent.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let poppable = matches!(
                    result.components().next_back(),
                    Some(Component::Normal(_))
                );
                if poppable {
                    result.pop();
                } else if !result.has_root() {
                    result.push(component);
                }
            }
            _ => result.push(component),
        }
    }
    result
}

#[cfg(test)]
mod tests;
