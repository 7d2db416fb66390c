//! Expression tree.
//!
//! The parser builds one `Expr` tree per source file. Only the shapes the
//! resolver walks have structure: local bindings, object literals,
//! function definitions, imports, variable references and field indexing.
//! Everything else is kept as `ExprKind::Other` carrying an [`OpaqueKind`]
//! tag, so an unsupported construct can still be named in the catalog.

use std::fmt;

use crate::{Name, Span};

/// An expression node with its source location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[inline]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// Shorthand for an opaque node.
    #[inline]
    pub fn opaque(kind: OpaqueKind, span: Span) -> Self {
        Expr {
            kind: ExprKind::Other(kind),
            span,
        }
    }

    /// The kind tag used in diagnostics and opaque catalog entries.
    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }
}

/// Expression variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprKind {
    /// `local a = x, b = y; body`
    Local { binds: Vec<Bind>, body: Box<Expr> },
    /// `{ local l = x, name: body, ... }`
    ///
    /// Object-level locals are visible to every field of the literal.
    Object { fields: Vec<Field>, locals: Vec<Bind> },
    /// `function(a, b, c=1) body`, also `name(a):: body` and
    /// `local name(a) = body`. The body is not retained.
    Function { params: Params },
    /// `import "file"`
    Import { file: String },
    /// Variable reference.
    Var(Name),
    /// `target.field` or `target["field"]`.
    Index { target: Box<Expr>, field: Name },
    /// Any construct the resolver does not model.
    Other(OpaqueKind),
}

impl ExprKind {
    /// Human-readable kind tag.
    pub fn tag(&self) -> &'static str {
        match self {
            ExprKind::Local { .. } => "Local",
            ExprKind::Object { .. } => "Object",
            ExprKind::Function { .. } => "Function",
            ExprKind::Import { .. } => "Import",
            ExprKind::Var(_) => "Var",
            ExprKind::Index { .. } => "Index",
            ExprKind::Other(kind) => kind.tag(),
        }
    }
}

/// One `name = body` binding of a `local` construct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bind {
    pub name: Name,
    pub body: Expr,
    pub span: Span,
}

/// One field of an object literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: FieldName,
    pub body: Expr,
    pub span: Span,
}

/// Field key of an object literal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldName {
    /// `name:`, `"name":` or `["name"]:`.
    Fixed(Name),
    /// `[expr]:` where `expr` is not a string literal.
    Computed,
}

impl FieldName {
    /// The fixed name, if the key has one.
    #[inline]
    pub fn fixed(self) -> Option<Name> {
        match self {
            FieldName::Fixed(name) => Some(name),
            FieldName::Computed => None,
        }
    }
}

/// Parameter names of a function definition, split the way they were
/// declared: parameters without a default first, then those with one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    pub required: Vec<Name>,
    pub optional: Vec<Name>,
}

impl Params {
    /// Required parameters in order, then optional parameters in order.
    pub fn iter(&self) -> impl Iterator<Item = Name> + '_ {
        self.required.iter().chain(&self.optional).copied()
    }
}

/// Constructs parsed for validity but not modelled structurally.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpaqueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    ArrayComprehension,
    ObjectComprehension,
    /// Function call `f(x)`.
    Apply,
    /// Object extension `base { ... }`.
    ApplyBrace,
    Binary,
    Unary,
    Conditional,
    SelfRef,
    Dollar,
    SuperIndex,
    InSuper,
    Error,
    Assert,
    /// `importstr "file"`
    ImportStr,
    /// `importbin "file"`
    ImportBin,
    /// `target[expr]` with a non-literal index.
    ComputedIndex,
    /// `target[a:b:c]`
    Slice,
    /// The predefined `std` library object.
    Std,
}

impl OpaqueKind {
    /// Stable tag shown for opaque catalog entries.
    pub fn tag(self) -> &'static str {
        match self {
            OpaqueKind::Null => "LiteralNull",
            OpaqueKind::Boolean => "LiteralBoolean",
            OpaqueKind::Number => "LiteralNumber",
            OpaqueKind::String => "LiteralString",
            OpaqueKind::Array => "Array",
            OpaqueKind::ArrayComprehension => "ArrayComp",
            OpaqueKind::ObjectComprehension => "ObjectComp",
            OpaqueKind::Apply => "Apply",
            OpaqueKind::ApplyBrace => "ApplyBrace",
            OpaqueKind::Binary => "Binary",
            OpaqueKind::Unary => "Unary",
            OpaqueKind::Conditional => "Conditional",
            OpaqueKind::SelfRef => "Self",
            OpaqueKind::Dollar => "Dollar",
            OpaqueKind::SuperIndex => "SuperIndex",
            OpaqueKind::InSuper => "InSuper",
            OpaqueKind::Error => "Error",
            OpaqueKind::Assert => "Assert",
            OpaqueKind::ImportStr => "ImportStr",
            OpaqueKind::ImportBin => "ImportBin",
            OpaqueKind::ComputedIndex => "Index",
            OpaqueKind::Slice => "Slice",
            OpaqueKind::Std => "Std",
        }
    }
}

impl fmt::Display for OpaqueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests;
