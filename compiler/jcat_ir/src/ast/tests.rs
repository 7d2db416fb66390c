use super::*;
use crate::StringInterner;
use pretty_assertions::assert_eq;

#[test]
fn test_params_iter_required_then_optional() {
    let interner = StringInterner::new();
    let [a, b, c] = ["a", "b", "c"].map(|s| interner.intern(s));

    let params = Params {
        required: vec![a, b],
        optional: vec![c],
    };

    assert_eq!(params.iter().collect::<Vec<_>>(), vec![a, b, c]);
    assert_eq!(Params::default().iter().count(), 0);
}

#[test]
fn test_field_name_fixed() {
    let interner = StringInterner::new();
    let name = interner.intern("add");
    assert_eq!(FieldName::Fixed(name).fixed(), Some(name));
    assert_eq!(FieldName::Computed.fixed(), None);
}

#[test]
fn test_tags() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let var = Expr::new(ExprKind::Var(x), Span::new(0, 1));
    assert_eq!(var.tag(), "Var");

    let num = Expr::opaque(OpaqueKind::Number, Span::new(0, 1));
    assert_eq!(num.tag(), "LiteralNumber");
    assert_eq!(OpaqueKind::SelfRef.to_string(), "Self");
}
