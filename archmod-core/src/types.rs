use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

// ── Typed name wrappers ────────────────────────────────────────────

macro_rules! typed_name {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(name: &str) -> Self {
                Self(name.to_string())
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                Self(name)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

typed_name!(
    /// Name of a class, the unit of clustering.
    ClassName
);
typed_name!(
    /// Fully-qualified method name, conventionally `Class.method`.
    MethodName
);

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn lookup_by_str() {
        let mut owners: HashMap<MethodName, ClassName> = HashMap::new();
        owners.insert("Order.total".into(), "Order".into());
        assert_eq!(owners.get("Order.total").map(ClassName::as_str), Some("Order"));
        assert!(owners.get("Order.tax").is_none());
    }

    #[test]
    fn ordering_is_lexicographic() {
        let map: BTreeMap<ClassName, u8> = [("b".into(), 2), ("a".into(), 1), ("B".into(), 0)]
            .into_iter()
            .collect();
        let keys: Vec<&str> = map.keys().map(ClassName::as_str).collect();
        assert_eq!(keys, ["B", "a", "b"]);
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&ClassName::from("Invoice")).unwrap();
        assert_eq!(json, "\"Invoice\"");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn display_matches_inner(name in ".*") {
            let class = ClassName::from(name.as_str());
            prop_assert_eq!(class.to_string(), name);
        }
    }
}
