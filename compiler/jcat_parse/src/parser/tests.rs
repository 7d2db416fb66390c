use super::*;
use crate::{parse, tokenize, ParseErrorKind};
use pretty_assertions::assert_eq;

fn parse_ok(source: &str, interner: &StringInterner) -> Expr {
    parse(source, interner).unwrap_or_else(|e| panic!("parse failed for {source:?}: {e}"))
}

fn parse_err(source: &str) -> ParseError {
    let interner = StringInterner::new();
    match parse(source, &interner) {
        Ok(expr) => panic!("expected a parse error for {source:?}, got {expr:?}"),
        Err(e) => e,
    }
}

fn field_names(expr: &Expr, interner: &StringInterner) -> Vec<&'static str> {
    match &expr.kind {
        ExprKind::Object { fields, .. } => fields
            .iter()
            .map(|f| match f.name {
                FieldName::Fixed(name) => interner.lookup(name),
                FieldName::Computed => "<computed>",
            })
            .collect(),
        other => panic!("expected an object, got {other:?}"),
    }
}

fn param_names(expr: &Expr, interner: &StringInterner) -> (Vec<&'static str>, Vec<&'static str>) {
    match &expr.kind {
        ExprKind::Function { params } => (
            params.required.iter().map(|n| interner.lookup(*n)).collect(),
            params.optional.iter().map(|n| interner.lookup(*n)).collect(),
        ),
        other => panic!("expected a function, got {other:?}"),
    }
}

#[test]
fn test_object_fields_in_order() {
    let interner = StringInterner::new();
    let expr = parse_ok(r#"{ a: 1, "b": 2, ["c"]: 3, d:: 4, e::: 5, f+: {} }"#, &interner);
    assert_eq!(field_names(&expr, &interner), vec!["a", "b", "c", "d", "e", "f"]);
}

#[test]
fn test_object_computed_field_name() {
    let interner = StringInterner::new();
    let expr = parse_ok(r#"{ [std.join("", ["a", "b"])]: 1, plain: 2 }"#, &interner);
    assert_eq!(field_names(&expr, &interner), vec!["<computed>", "plain"]);
}

#[test]
fn test_object_locals_and_asserts() {
    let interner = StringInterner::new();
    let expr = parse_ok(
        "{ local x = 1, assert x == 1 : 'bad', y: x, local z(a) = a, }",
        &interner,
    );
    let ExprKind::Object { fields, locals } = &expr.kind else {
        panic!("expected an object, got {expr:?}");
    };
    assert_eq!(fields.len(), 1);
    let local_names: Vec<_> = locals.iter().map(|b| interner.lookup(b.name)).collect();
    assert_eq!(local_names, vec!["x", "z"]);
    assert!(matches!(locals[1].body.kind, ExprKind::Function { .. }));
}

#[test]
fn test_method_field_becomes_function() {
    let interner = StringInterner::new();
    let expr = parse_ok("{ add(a, b=1, c=2):: a + b }", &interner);
    let ExprKind::Object { fields, .. } = &expr.kind else {
        panic!("expected an object, got {expr:?}");
    };
    assert_eq!(
        param_names(&fields[0].body, &interner),
        (vec!["a"], vec!["b", "c"])
    );
}

#[test]
fn test_function_params_split_by_default() {
    let interner = StringInterner::new();
    let expr = parse_ok("function(x, y, z=3, w={ a: 1 }) x", &interner);
    assert_eq!(param_names(&expr, &interner), (vec!["x", "y"], vec!["z", "w"]));
}

#[test]
fn test_function_without_params() {
    let interner = StringInterner::new();
    let expr = parse_ok("function() 42", &interner);
    assert_eq!(param_names(&expr, &interner), (vec![], vec![]));
}

#[test]
fn test_local_binds() {
    let interner = StringInterner::new();
    let expr = parse_ok("local a = 1, f(x) = x; { a: a }", &interner);
    let ExprKind::Local { binds, body } = &expr.kind else {
        panic!("expected a local, got {expr:?}");
    };
    let names: Vec<_> = binds.iter().map(|b| interner.lookup(b.name)).collect();
    assert_eq!(names, vec!["a", "f"]);
    assert_eq!(binds[0].body.kind, ExprKind::Other(OpaqueKind::Number));
    assert_eq!(param_names(&binds[1].body, &interner), (vec!["x"], vec![]));
    assert_eq!(field_names(body, &interner), vec!["a"]);
}

#[test]
fn test_import_forms() {
    let interner = StringInterner::new();
    assert_eq!(
        parse_ok(r#"import "lib.libsonnet""#, &interner).kind,
        ExprKind::Import {
            file: "lib.libsonnet".into()
        }
    );
    assert_eq!(
        parse_ok(r#"importstr "a.txt""#, &interner).kind,
        ExprKind::Other(OpaqueKind::ImportStr)
    );
    assert_eq!(
        parse_ok(r#"importbin "a.bin""#, &interner).kind,
        ExprKind::Other(OpaqueKind::ImportBin)
    );
}

#[test]
fn test_index_chain() {
    let interner = StringInterner::new();
    let expr = parse_ok(r#"a.b["c"]"#, &interner);
    let ExprKind::Index { target, field } = &expr.kind else {
        panic!("expected an index, got {expr:?}");
    };
    assert_eq!(interner.lookup(*field), "c");
    let ExprKind::Index { target, field } = &target.kind else {
        panic!("expected an inner index, got {target:?}");
    };
    assert_eq!(interner.lookup(*field), "b");
    assert_eq!(target.kind, ExprKind::Var(interner.intern("a")));
}

#[test]
fn test_index_of_parenthesized_import() {
    let interner = StringInterner::new();
    let expr = parse_ok(r#"(import "lib").fn"#, &interner);
    let ExprKind::Index { target, field } = &expr.kind else {
        panic!("expected an index, got {expr:?}");
    };
    assert_eq!(interner.lookup(*field), "fn");
    assert_eq!(
        target.kind,
        ExprKind::Import {
            file: "lib".into()
        }
    );
}

#[test]
fn test_import_binds_looser_than_index() {
    let interner = StringInterner::new();
    let expr = parse_ok(r#"import "lib" + {}"#, &interner);
    assert_eq!(expr.kind, ExprKind::Other(OpaqueKind::Binary));
}

#[test]
fn test_computed_index_and_slice() {
    let interner = StringInterner::new();
    assert_eq!(
        parse_ok("a[0]", &interner).kind,
        ExprKind::Other(OpaqueKind::ComputedIndex)
    );
    assert_eq!(
        parse_ok("a[1:2]", &interner).kind,
        ExprKind::Other(OpaqueKind::Slice)
    );
    assert_eq!(
        parse_ok("a[::2]", &interner).kind,
        ExprKind::Other(OpaqueKind::Slice)
    );
    assert_eq!(
        parse_ok("a[:]", &interner).kind,
        ExprKind::Other(OpaqueKind::Slice)
    );
}

#[test]
fn test_opaque_kinds() {
    let interner = StringInterner::new();
    let cases = [
        ("null", OpaqueKind::Null),
        ("true", OpaqueKind::Boolean),
        ("'s'", OpaqueKind::String),
        ("1.5", OpaqueKind::Number),
        ("[1, 2]", OpaqueKind::Array),
        ("[x for x in [1] if x > 0]", OpaqueKind::ArrayComprehension),
        ("{ [k]: 1 for k in ['a'] }", OpaqueKind::ObjectComprehension),
        ("f(1, two=2) tailstrict", OpaqueKind::Apply),
        ("base { a: 1 }", OpaqueKind::ApplyBrace),
        ("1 + 2 * 3", OpaqueKind::Binary),
        ("-x", OpaqueKind::Unary),
        ("if a then b else c", OpaqueKind::Conditional),
        ("if a then b", OpaqueKind::Conditional),
        ("self", OpaqueKind::SelfRef),
        ("$", OpaqueKind::Dollar),
        ("super.x", OpaqueKind::SuperIndex),
        ("super['x']", OpaqueKind::SuperIndex),
        ("'x' in super", OpaqueKind::InSuper),
        ("error 'boom'", OpaqueKind::Error),
        ("assert true : 'msg'; 1", OpaqueKind::Assert),
    ];
    for (source, kind) in cases {
        assert_eq!(
            parse_ok(source, &interner).kind,
            ExprKind::Other(kind),
            "source: {source}"
        );
    }
}

#[test]
fn test_function_body_extends_right() {
    let interner = StringInterner::new();
    let expr = parse_ok("{ f: function(x) x + 1, g: 2 }", &interner);
    assert_eq!(field_names(&expr, &interner), vec!["f", "g"]);
}

#[test]
fn test_spans_cover_source() {
    let interner = StringInterner::new();
    let source = "local x = 1; { a: x }";
    let expr = parse_ok(source, &interner);
    assert_eq!(expr.span, Span::new(0, 21));
    let ExprKind::Local { binds, body } = &expr.kind else {
        panic!("expected a local, got {expr:?}");
    };
    assert_eq!(binds[0].span, Span::new(6, 11));
    assert_eq!(body.span, Span::new(13, 21));
}

#[test]
fn test_nested_parens_deep() {
    let interner = StringInterner::new();
    let source = format!("{}1{}", "(".repeat(2_000), ")".repeat(2_000));
    assert_eq!(
        parse_ok(&source, &interner).kind,
        ExprKind::Other(OpaqueKind::Number)
    );
}

#[test]
fn test_error_trailing_tokens() {
    let err = parse_err("{} {} }");
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            expected: "end of file",
            found: "`}`".into(),
        }
    );
}

#[test]
fn test_error_missing_semicolon() {
    let err = parse_err("local x = 1 x");
    assert!(
        matches!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                expected: "`;` after local bindings",
                ..
            }
        ),
        "got {err:?}"
    );
    assert_eq!(err.span, Span::new(12, 13));
}

#[test]
fn test_error_missing_field_separator() {
    let err = parse_err("{ a 1 }");
    assert!(
        matches!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                expected: "`:`, `::` or `:::`",
                ..
            }
        ),
        "got {err:?}"
    );
}

#[test]
fn test_error_import_needs_string() {
    let err = parse_err("import foo");
    assert!(
        matches!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                expected: "string literal",
                ..
            }
        ),
        "got {err:?}"
    );
}

#[test]
fn test_error_empty_input() {
    let err = parse_err("");
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            expected: "expression",
            found: "end of file".into(),
        }
    );
}

#[test]
fn test_missing_eof_token_is_supplied() {
    let interner = StringInterner::new();

    let err = match Parser::new(Vec::new(), &interner).parse_file() {
        Ok(expr) => panic!("expected an error, got {expr:?}"),
        Err(e) => e,
    };
    assert_eq!(
        err.kind,
        ParseErrorKind::UnexpectedToken {
            expected: "expression",
            found: "end of file".into(),
        }
    );

    let mut tokens = tokenize("{ f(x):: x }").unwrap_or_else(|e| panic!("tokenize failed: {e}"));
    tokens.pop();
    let expr = Parser::new(tokens, &interner)
        .parse_file()
        .unwrap_or_else(|e| panic!("parse failed: {e}"));
    assert_eq!(field_names(&expr, &interner), vec!["f"]);
}

#[test]
fn test_error_duplicate_field() {
    let err = parse_err("{ a: 1, b: 2, 'a': 3 }");
    assert_eq!(err.kind, ParseErrorKind::DuplicateField("a".into()));
    assert_eq!(err.span, Span::new(14, 20));
}

#[test]
fn test_duplicate_check_is_per_object() {
    let interner = StringInterner::new();
    let expr = parse_ok("{ a: { a: 1 }, b: { a: 2 } }", &interner);
    assert_eq!(field_names(&expr, &interner), vec!["a", "b"]);
}
