//! jcat: list the functions a Jsonnet library exports.
//!
//! Reads an entry file (by default `main.libsonnet`), resolves its object
//! tree through locals and imports, and prints one `fn` line per function
//! field:
//!
//! ```text
//! $ jcat lib.libsonnet
//! fn util.join(sep, parts)
//! fn util.strings.pad(s, width, char)
//! ```
//!
//! - [`loader`]: file-system `ImportResolver` with Jsonnet search paths
//! - [`present`]: text and JSON renderers
//! - [`cli`]: argument parsing and the top-level pipeline
//! - [`tracing_setup`]: `JCAT_LOG` subscriber

pub mod cli;
pub mod loader;
pub mod present;
pub mod tracing_setup;

pub use cli::{run, Cli, CliError};
pub use loader::{FileImporter, LoaderConfig};
pub use present::{ColorMode, OutputFormat, PresentOptions};
