//! Field lookup inside object literals.

use jcat_ir::{Expr, ExprKind, FieldName, Name};

/// Find the body bound to `field` in the object literal `expr` evaluates to,
/// looking through any `local` wrappers.
///
/// Purely structural: variables, imports and other indirections are not
/// followed, and computed field names never match. The first field with a
/// matching fixed name wins.
pub fn locate(expr: &Expr, field: Name) -> Option<&Expr> {
    let mut current = expr;
    loop {
        match &current.kind {
            ExprKind::Local { body, .. } => current = body,
            ExprKind::Object { fields, .. } => {
                return fields
                    .iter()
                    .find(|f| f.name == FieldName::Fixed(field))
                    .map(|f| &f.body);
            }
            _ => return None,
        }
    }
}
