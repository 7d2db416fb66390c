//! Resolution and import errors.
//!
//! Every error here is fatal: resolution stops at the first one and no
//! partial catalog is returned. Fields that cannot be located and
//! unsupported expression kinds are not errors; they become
//! `CatalogValue::Absent` and `CatalogValue::Opaque`.

use std::fmt;
use std::path::{Path, PathBuf};

use jcat_ir::Span;

/// Why an import could not be loaded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ImportErrorKind {
    /// No candidate path exists.
    NotFound,
    /// The file exists but could not be read.
    Io,
    /// The file was read but does not parse.
    Parse,
}

/// Failure reported by an [`ImportResolver`](crate::ImportResolver).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportError {
    pub kind: ImportErrorKind,
    pub message: String,
    /// The import target as written in the source.
    pub target: String,
    /// The file containing the import.
    pub file: PathBuf,
    /// Location of the failure inside the imported file, for parse errors.
    pub location: Option<(PathBuf, Span)>,
}

impl ImportError {
    #[cold]
    pub fn not_found(target: &str, file: &Path, tried: &[PathBuf]) -> Self {
        let tried = tried
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        ImportError {
            kind: ImportErrorKind::NotFound,
            message: format!("no match locally or in the library search paths (tried {tried})"),
            target: target.to_owned(),
            file: file.to_owned(),
            location: None,
        }
    }

    #[cold]
    pub fn io(target: &str, file: &Path, err: &std::io::Error) -> Self {
        ImportError {
            kind: ImportErrorKind::Io,
            message: err.to_string(),
            target: target.to_owned(),
            file: file.to_owned(),
            location: None,
        }
    }

    #[cold]
    pub fn parse(
        target: &str,
        file: &Path,
        message: impl Into<String>,
        at: PathBuf,
        span: Span,
    ) -> Self {
        ImportError {
            kind: ImportErrorKind::Parse,
            message: message.into(),
            target: target.to_owned(),
            file: file.to_owned(),
            location: Some((at, span)),
        }
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ImportErrorKind::NotFound => {
                write!(f, "couldn't open import {:?}: {}", self.target, self.message)
            }
            ImportErrorKind::Io => {
                write!(f, "couldn't read import {:?}: {}", self.target, self.message)
            }
            ImportErrorKind::Parse => {
                write!(f, "couldn't parse import {:?}: {}", self.target, self.message)
            }
        }
    }
}

impl std::error::Error for ImportError {}

/// A fatal resolution failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveError {
    /// A variable with no binding in scope.
    UnknownIdentifier {
        name: String,
        file: PathBuf,
        span: Span,
    },
    /// The import loader failed.
    Import(ImportError),
    /// A file imports itself, directly or through other files.
    ImportCycle { chain: Vec<PathBuf> },
    /// Resolution nested deeper than the configured limit.
    DepthExceeded {
        limit: usize,
        file: PathBuf,
        span: Span,
    },
}

impl ResolveError {
    #[cold]
    pub fn unknown_identifier(name: &str, file: &Path, span: Span) -> Self {
        ResolveError::UnknownIdentifier {
            name: name.to_owned(),
            file: file.to_owned(),
            span,
        }
    }

    #[cold]
    pub fn depth_exceeded(limit: usize, file: &Path, span: Span) -> Self {
        ResolveError::DepthExceeded {
            limit,
            file: file.to_owned(),
            span,
        }
    }

    /// The file and span this error points at, when it has one.
    pub fn location(&self) -> Option<(&Path, Span)> {
        match self {
            ResolveError::UnknownIdentifier { file, span, .. }
            | ResolveError::DepthExceeded { file, span, .. } => Some((file.as_path(), *span)),
            ResolveError::Import(err) => err
                .location
                .as_ref()
                .map(|(at, span)| (at.as_path(), *span)),
            ResolveError::ImportCycle { .. } => None,
        }
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::UnknownIdentifier { name, .. } => {
                write!(f, "unknown variable: {name}")
            }
            ResolveError::Import(err) => write!(f, "{err}"),
            ResolveError::ImportCycle { chain } => {
                f.write_str("import cycle: ")?;
                for (i, path) in chain.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" -> ")?;
                    }
                    write!(f, "{}", path.display())?;
                }
                Ok(())
            }
            ResolveError::DepthExceeded { limit, .. } => {
                write!(f, "max resolution depth of {limit} exceeded")
            }
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Import(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ImportError> for ResolveError {
    fn from(err: ImportError) -> Self {
        ResolveError::Import(err)
    }
}
