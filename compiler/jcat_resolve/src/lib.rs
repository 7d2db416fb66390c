//! Callable-catalog resolution for Jsonnet libraries.
//!
//! Walks a parsed expression tree under an explicit lexical [`Scope`],
//! following variables, field indexing and imports, and flattens nested
//! object literals into a [`CatalogValue`] tree whose leaves are function
//! signatures.
//!
//! ```text
//! Expr ──► Resolver::resolve_file ──► CatalogValue
//!             │  ▲
//!             ▼  │
//!        ImportResolver (imported Expr + resolved path)
//! ```
//!
//! Nothing is evaluated: arithmetic, calls, conditionals and comprehensions
//! resolve to opaque placeholders tagged with their kind.

mod catalog;
mod error;
mod import;
mod locate;
mod resolver;
mod scope;

pub use catalog::CatalogValue;
pub use error::{ImportError, ImportErrorKind, ResolveError};
pub use import::{ImportResolver, ImportedFile};
pub use locate::locate;
pub use resolver::{ResolveConfig, Resolver};
pub use scope::Scope;
