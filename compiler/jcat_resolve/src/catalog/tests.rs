use super::*;
use pretty_assertions::assert_eq;

fn namespace<const N: usize>(entries: [(&str, CatalogValue); N]) -> CatalogValue {
    CatalogValue::Namespace(
        entries
            .into_iter()
            .map(|(name, value)| (name.to_owned(), value))
            .collect(),
    )
}

#[test]
fn test_signature_constructor() {
    assert_eq!(
        CatalogValue::signature(["a", "b"]),
        CatalogValue::Signature {
            params: vec!["a".to_owned(), "b".to_owned()]
        }
    );
    assert_eq!(
        CatalogValue::signature(Vec::<String>::new()),
        CatalogValue::Signature { params: vec![] }
    );
}

#[test]
fn test_get_path() {
    let catalog = namespace([
        ("add", CatalogValue::signature(["a", "b"])),
        ("nested", namespace([("sub", CatalogValue::signature(["x"]))])),
    ]);

    assert_eq!(
        catalog.get_path(&["nested", "sub"]),
        Some(&CatalogValue::signature(["x"]))
    );
    assert_eq!(catalog.get_path(&[]), Some(&catalog));
    assert_eq!(catalog.get_path(&["nested", "missing"]), None);
    assert_eq!(catalog.get_path(&["add", "a"]), None);
}

#[test]
fn test_signature_count() {
    let catalog = namespace([
        ("add", CatalogValue::signature(["a", "b"])),
        ("value", CatalogValue::opaque("LiteralNumber")),
        ("gone", CatalogValue::Absent),
        (
            "nested",
            namespace([
                ("sub", CatalogValue::signature(["x"])),
                ("empty", namespace([])),
            ]),
        ),
    ]);
    assert_eq!(catalog.signature_count(), 2);
}

#[test]
fn test_namespace_iterates_sorted() {
    let catalog = namespace([
        ("zeta", CatalogValue::Absent),
        ("alpha", CatalogValue::Absent),
        ("mid", CatalogValue::Absent),
    ]);
    let names: Vec<_> = catalog
        .as_namespace()
        .map(|entries| entries.keys().map(String::as_str).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);
}

#[test]
fn test_is_absent() {
    assert!(CatalogValue::Absent.is_absent());
    assert!(!CatalogValue::opaque("Apply").is_absent());
    assert!(CatalogValue::opaque("Apply").as_namespace().is_none());
}
