// Method-level call graph supplied by the extraction collaborator.
//
// Each caller method maps to the ordered list of methods it invokes, and a
// separate owner table resolves methods to their declaring class. Methods
// without an owner are unresolved and excluded from every metric.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::InputError;
use crate::types::{ClassName, MethodName};

/// Caller → callees mapping plus the method → class lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallGraph {
    #[serde(default)]
    pub calls: BTreeMap<MethodName, Vec<MethodName>>,
    #[serde(default)]
    pub owners: HashMap<MethodName, ClassName>,
}

/// A caller → callee method edge with both endpoints resolved to classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCall<'a> {
    pub caller: &'a MethodName,
    pub caller_class: &'a ClassName,
    pub callee: &'a MethodName,
    pub callee_class: &'a ClassName,
}

impl ResolvedCall<'_> {
    /// True when the call crosses a class boundary.
    pub fn is_cross_class(&self) -> bool {
        self.caller_class != self.callee_class
    }
}

/// Size summary of a call graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallGraphStats {
    pub methods: usize,
    pub edges: usize,
    pub resolved_edges: usize,
    pub cross_class_edges: usize,
    pub unresolved_edges: usize,
    pub classes: usize,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a call graph document: `{"calls": {...}, "owners": {...}}`.
    pub fn from_json_str(json: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a call graph document from disk.
    pub fn load(path: &Path) -> Result<Self, InputError> {
        let content = std::fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Register a declared method, giving it an owner and an (empty) call list.
    pub fn declare_method(&mut self, method: impl Into<MethodName>, class: impl Into<ClassName>) {
        let method = method.into();
        self.owners.insert(method.clone(), class.into());
        self.calls.entry(method).or_default();
    }

    /// Record one call site. Repeated calls are kept as separate edges.
    pub fn add_call(&mut self, caller: impl Into<MethodName>, callee: impl Into<MethodName>) {
        self.calls
            .entry(caller.into())
            .or_default()
            .push(callee.into());
    }

    pub fn class_of(&self, method: &str) -> Option<&ClassName> {
        self.owners.get(method)
    }

    /// Every caller → callee method edge, duplicates included.
    pub fn edges(&self) -> impl Iterator<Item = (&MethodName, &MethodName)> {
        self.calls
            .iter()
            .flat_map(|(caller, callees)| callees.iter().map(move |callee| (caller, callee)))
    }

    /// Edges whose endpoints both resolve to a class.
    pub fn resolved_edges(&self) -> impl Iterator<Item = ResolvedCall<'_>> {
        self.edges().filter_map(|(caller, callee)| {
            let caller_class = self.owners.get(caller)?;
            let callee_class = self.owners.get(callee)?;
            Some(ResolvedCall {
                caller,
                caller_class,
                callee,
                callee_class,
            })
        })
    }

    /// Every resolved class that appears as a caller or a callee.
    pub fn classes(&self) -> BTreeSet<&ClassName> {
        let mut classes = BTreeSet::new();
        for (caller, callees) in &self.calls {
            if let Some(class) = self.owners.get(caller) {
                classes.insert(class);
            }
            for callee in callees {
                if let Some(class) = self.owners.get(callee) {
                    classes.insert(class);
                }
            }
        }
        classes
    }

    pub fn stats(&self) -> CallGraphStats {
        let mut stats = CallGraphStats {
            methods: self.calls.len(),
            classes: self.classes().len(),
            ..CallGraphStats::default()
        };

        for (caller, callee) in self.edges() {
            stats.edges += 1;
            match (self.owners.get(caller), self.owners.get(callee)) {
                (Some(from), Some(to)) => {
                    stats.resolved_edges += 1;
                    if from != to {
                        stats.cross_class_edges += 1;
                    }
                }
                _ => {
                    debug!(%caller, %callee, "Unresolved call edge excluded from metrics");
                    stats.unresolved_edges += 1;
                }
            }
        }

        stats
    }
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn shop_graph() -> CallGraph {
        let mut cg = CallGraph::new();
        cg.declare_method("Cart.checkout", "Cart");
        cg.declare_method("Cart.items", "Cart");
        cg.declare_method("Payment.charge", "Payment");
        cg.add_call("Cart.checkout", "Cart.items");
        cg.add_call("Cart.checkout", "Payment.charge");
        cg.add_call("Cart.checkout", "Payment.charge");
        cg.add_call("Cart.checkout", "Logger.log"); // no owner
        cg
    }

    #[test]
    fn declare_creates_empty_call_list() {
        let mut cg = CallGraph::new();
        cg.declare_method("A.f", "A");
        assert_eq!(cg.calls.get("A.f").map(Vec::len), Some(0));
        assert_eq!(cg.class_of("A.f").map(ClassName::as_str), Some("A"));
    }

    #[test]
    fn resolved_edges_skip_unknown_methods() {
        let cg = shop_graph();
        assert_eq!(cg.edges().count(), 4);

        let resolved: Vec<_> = cg.resolved_edges().collect();
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved.iter().filter(|c| c.is_cross_class()).count(), 2);
    }

    #[test]
    fn classes_include_callee_only_classes() {
        let mut cg = CallGraph::new();
        cg.owners.insert("Store.save".into(), "Store".into());
        cg.declare_method("Repo.put", "Repo");
        cg.add_call("Repo.put", "Store.save");

        let classes: Vec<&str> = cg.classes().into_iter().map(ClassName::as_str).collect();
        assert_eq!(classes, ["Repo", "Store"]);
    }

    #[test]
    fn stats_count_unresolved() {
        let stats = shop_graph().stats();
        assert_eq!(stats.methods, 3);
        assert_eq!(stats.edges, 4);
        assert_eq!(stats.resolved_edges, 3);
        assert_eq!(stats.cross_class_edges, 2);
        assert_eq!(stats.unresolved_edges, 1);
        assert_eq!(stats.classes, 2);
    }

    #[test]
    fn parses_json_document() {
        let json = r#"{
            "calls": { "A.f": ["B.g"], "B.g": ["A.f"] },
            "owners": { "A.f": "A", "B.g": "B" }
        }"#;
        let cg = CallGraph::from_json_str(json).unwrap();
        assert_eq!(cg.edges().count(), 2);
        assert_eq!(cg.class_of("B.g").map(ClassName::as_str), Some("B"));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let cg = CallGraph::from_json_str("{}").unwrap();
        assert_eq!(cg, CallGraph::new());
    }

    #[test]
    fn malformed_json_is_input_error() {
        let err = CallGraph::from_json_str("{\"calls\": 3}").unwrap_err();
        assert!(matches!(err, InputError::Json(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CallGraph::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, InputError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }
}
