//! Catalog values produced by resolution.

use std::collections::BTreeMap;

/// What an expression resolves to, as far as the catalog is concerned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogValue {
    /// A function definition: parameter names, required before optional.
    Signature { params: Vec<String> },
    /// An object literal: field name to catalog value.
    Namespace(BTreeMap<String, CatalogValue>),
    /// A construct the resolver does not model, tagged with its kind.
    Opaque { tag: String },
    /// An indexed field that could not be located.
    Absent,
}

impl CatalogValue {
    /// Signature with the given parameter names.
    pub fn signature<I, S>(params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CatalogValue::Signature {
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Opaque placeholder with the given kind tag.
    pub fn opaque(tag: impl Into<String>) -> Self {
        CatalogValue::Opaque { tag: tag.into() }
    }

    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, CatalogValue::Absent)
    }

    /// The entries of a namespace.
    pub fn as_namespace(&self) -> Option<&BTreeMap<String, CatalogValue>> {
        match self {
            CatalogValue::Namespace(entries) => Some(entries),
            _ => None,
        }
    }

    /// Follow a dotted path of namespace entries.
    ///
    /// `value.get_path(&["a", "b"])` is the entry `b` of namespace `a`.
    pub fn get_path(&self, path: &[&str]) -> Option<&CatalogValue> {
        path.iter()
            .try_fold(self, |value, segment| value.as_namespace()?.get(*segment))
    }

    /// Number of signatures in this value and every nested namespace.
    pub fn signature_count(&self) -> usize {
        match self {
            CatalogValue::Signature { .. } => 1,
            CatalogValue::Namespace(entries) => {
                entries.values().map(CatalogValue::signature_count).sum()
            }
            CatalogValue::Opaque { .. } | CatalogValue::Absent => 0,
        }
    }
}

#[cfg(feature = "serde")]
mod serialize {
    use serde::ser::{Serialize, SerializeMap, Serializer};

    use super::CatalogValue;

    /// `{"kind": "signature", "params": [...]}`, `{"kind": "namespace",
    /// "members": {...}}` or `{"kind": "opaque", "tag": "..."}`. Absent
    /// members are left out of namespaces; a bare absent value is `null`.
    impl Serialize for CatalogValue {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                CatalogValue::Signature { params } => {
                    let mut map = serializer.serialize_map(Some(2))?;
                    map.serialize_entry("kind", "signature")?;
                    map.serialize_entry("params", params)?;
                    map.end()
                }
                CatalogValue::Namespace(entries) => {
                    let mut map = serializer.serialize_map(Some(2))?;
                    map.serialize_entry("kind", "namespace")?;
                    map.serialize_entry("members", &Members(entries))?;
                    map.end()
                }
                CatalogValue::Opaque { tag } => {
                    let mut map = serializer.serialize_map(Some(2))?;
                    map.serialize_entry("kind", "opaque")?;
                    map.serialize_entry("tag", tag)?;
                    map.end()
                }
                CatalogValue::Absent => serializer.serialize_none(),
            }
        }
    }

    struct Members<'a>(&'a std::collections::BTreeMap<String, CatalogValue>);

    impl Serialize for Members<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let present = self.0.iter().filter(|(_, value)| !value.is_absent());
            let mut map = serializer.serialize_map(None)?;
            for (name, value) in present {
                map.serialize_entry(name, value)?;
            }
            map.end()
        }
    }
}

#[cfg(test)]
mod tests;
