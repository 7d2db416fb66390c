//! Import resolution boundary.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use jcat_ir::Expr;

use crate::ImportError;

/// A parsed imported file.
#[derive(Clone, Debug)]
pub struct ImportedFile {
    /// Root expression of the file.
    pub root: Arc<Expr>,
    /// Path the import resolved to. Becomes the current file while the
    /// root is resolved, so imports inside it are found relative to it.
    pub path: PathBuf,
}

/// Loads the file an `import` expression refers to.
///
/// Implementations decide how `target` maps to a file (relative to
/// `current_file`, search paths, an in-memory table) and may cache parsed
/// trees. The same `(current_file, target)` pair must resolve to the same
/// file for the duration of a run.
pub trait ImportResolver {
    fn resolve_import(&self, current_file: &Path, target: &str)
        -> Result<ImportedFile, ImportError>;
}

impl<T: ImportResolver + ?Sized> ImportResolver for &T {
    fn resolve_import(
        &self,
        current_file: &Path,
        target: &str,
    ) -> Result<ImportedFile, ImportError> {
        (**self).resolve_import(current_file, target)
    }
}
