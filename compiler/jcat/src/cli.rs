//! Command-line interface.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use jcat_ir::{LineCol, SharedInterner, Span};
use jcat_resolve::{CatalogValue, ImportError, ResolveConfig, ResolveError, Resolver};
use tracing::debug;

use crate::loader::{FileImporter, LoaderConfig};
use crate::present::{self, ColorMode, OutputFormat, PresentOptions};

/// List the functions a Jsonnet library exports.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "jcat", version, about)]
pub struct Cli {
    /// Entry file.
    #[arg(value_name = "FILE", default_value = "main.libsonnet")]
    pub file: PathBuf,

    /// Add a library search directory (later directories take priority).
    #[arg(short = 'J', long = "jpath", value_name = "DIR")]
    pub jpath: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Also list fields that are neither functions nor objects.
    #[arg(long)]
    pub show_opaque: bool,

    /// Give up after this many nested resolution steps.
    #[arg(long, value_name = "N", default_value_t = ResolveConfig::DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Do not predefine `std`.
    #[arg(long)]
    pub no_std: bool,
}

impl Cli {
    pub fn resolve_config(&self) -> ResolveConfig {
        ResolveConfig {
            max_depth: self.max_depth,
            bind_std: !self.no_std,
        }
    }
}

/// `file:line:column` of an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub file: PathBuf,
    pub line_col: LineCol,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line_col)
    }
}

/// Anything that stops a run.
#[derive(Debug)]
pub enum CliError {
    /// The entry file could not be read or parsed.
    Load {
        error: ImportError,
        location: Option<Location>,
    },
    Resolve {
        error: ResolveError,
        location: Option<Location>,
    },
    /// The entry file does not evaluate to an object literal.
    NotAnObject { file: PathBuf, found: String },
    Output(io::Error),
}

impl CliError {
    pub fn location(&self) -> Option<&Location> {
        match self {
            CliError::Load { location, .. } | CliError::Resolve { location, .. } => {
                location.as_ref()
            }
            CliError::NotAnObject { .. } | CliError::Output(_) => None,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Load { error, .. } => write!(f, "{error}"),
            CliError::Resolve { error, .. } => write!(f, "{error}"),
            CliError::NotAnObject { file, found } => write!(
                f,
                "{} does not evaluate to an object (found {found})",
                file.display()
            ),
            CliError::Output(err) => write!(f, "couldn't write output: {err}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Load { error, .. } => Some(error),
            CliError::Resolve { error, .. } => Some(error),
            CliError::Output(err) => Some(err),
            CliError::NotAnObject { .. } => None,
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Output(err)
    }
}

/// Load, resolve and print the catalog of `cli.file` to `out`.
///
/// `is_tty` says whether `out` is a terminal, for `--color auto`.
pub fn run(cli: &Cli, out: &mut dyn Write, is_tty: bool) -> Result<(), CliError> {
    let interner = SharedInterner::new();
    let loader = FileImporter::new(interner.clone(), LoaderConfig::from_env(&cli.jpath));
    debug!(search_paths = ?loader.config().search_paths, "loader configured");

    let (root, file) = loader.load_root(&cli.file).map_err(|error| CliError::Load {
        location: error
            .location
            .as_ref()
            .and_then(|(at, span)| locate(&loader, at, *span)),
        error,
    })?;

    let catalog = Resolver::new(&loader, &interner)
        .with_config(cli.resolve_config())
        .resolve_file(&root, &file)
        .map_err(|error| CliError::Resolve {
            location: error
                .location()
                .and_then(|(at, span)| locate(&loader, at, span)),
            error,
        })?;
    debug!(files = loader.loaded_count(), "resolution finished");

    if catalog.as_namespace().is_none() {
        return Err(CliError::NotAnObject {
            file,
            found: describe(&catalog).to_owned(),
        });
    }

    match cli.format {
        OutputFormat::Text => {
            let options = PresentOptions {
                colors: cli.color.should_use_colors(is_tty),
                show_opaque: cli.show_opaque,
            };
            present::render_text(&catalog, options, out)?;
        }
        OutputFormat::Json => present::render_json(&catalog, out)?,
    }
    out.flush()?;
    Ok(())
}

fn locate(loader: &FileImporter, file: &Path, span: Span) -> Option<Location> {
    loader.line_col(file, span).map(|line_col| Location {
        file: file.to_owned(),
        line_col,
    })
}

fn describe(value: &CatalogValue) -> &str {
    match value {
        CatalogValue::Signature { .. } => "a function",
        CatalogValue::Namespace(_) => "an object",
        CatalogValue::Opaque { tag } => tag,
        CatalogValue::Absent => "a missing field",
    }
}
