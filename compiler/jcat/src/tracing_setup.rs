//! Tracing subscriber setup.
//!
//! Off unless `JCAT_LOG` or `RUST_LOG` is set. `JCAT_LOG` takes the same
//! directives as `RUST_LOG` and wins when both are set. `JCAT_LOG_FORMAT`
//! picks the output:
//!
//! ```bash
//! JCAT_LOG=debug jcat lib.libsonnet                       # flat text
//! JCAT_LOG=jcat_resolve=trace JCAT_LOG_FORMAT=tree jcat   # indented spans
//! JCAT_LOG=debug JCAT_LOG_FORMAT=json jcat                # one JSON object per event
//! ```
//!
//! Everything goes to stderr so the catalog on stdout stays clean.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

pub const LOG_VAR: &str = "JCAT_LOG";
pub const LOG_FORMAT_VAR: &str = "JCAT_LOG_FORMAT";

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    /// Hierarchical output via `tracing-tree`.
    Tree,
    Json,
}

impl LogFormat {
    /// Parse a `JCAT_LOG_FORMAT` value; unknown values fall back to text.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "tree" => LogFormat::Tree,
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }

    fn from_env() -> Self {
        std::env::var(LOG_FORMAT_VAR)
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }
}

fn build_filter() -> EnvFilter {
    match std::env::var(LOG_VAR) {
        Ok(directives) => EnvFilter::builder().parse_lossy(directives),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global subscriber if logging was requested.
pub fn init_tracing() {
    if std::env::var_os(LOG_VAR).is_none() && std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_writer(std::io::stderr)
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
