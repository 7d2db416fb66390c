//! jcat IR - Expression tree types
//!
//! This crate contains the data structures shared by the jcat parser,
//! resolver and front end:
//! - Spans for source locations, and a line index to turn them into
//!   `line:column` pairs
//! - Names for interned identifiers
//! - The expression tree (`Expr`, `ExprKind`) produced by the parser
//!
//! # Design Philosophy
//!
//! - **Intern Identifiers**: Strings → Name(u32), compared in O(1)
//! - **Model Only What Is Read**: the tree carries structure for local
//!   bindings, objects, functions, imports, variables and indexing. Every
//!   other construct collapses into `ExprKind::Other` with a kind tag.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod interner;
mod line_index;
mod name;
mod span;

pub use ast::{Bind, Expr, ExprKind, Field, FieldName, OpaqueKind, Params};
pub use interner::{SharedInterner, StringInterner};
pub use line_index::{LineCol, LineIndex};
pub use name::Name;
pub use span::Span;
