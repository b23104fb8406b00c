// Class coupling metrics derived from a method-level call graph.
//
// Metrics cast counts to f64 ratios.
#![allow(clippy::cast_precision_loss)]

use std::collections::BTreeMap;

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::call_graph::CallGraph;
use crate::error::CouplingError;
use crate::types::ClassName;

// ── Coupling graph ──────────────────────────────────────────────────

/// Directed, integer-weighted class → class graph of cross-class calls.
///
/// Every class reachable from the call graph is a key, including classes
/// with no outgoing calls (they map to an empty weight table). Self-loops
/// are never stored and a missing entry means weight 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CouplingGraph {
    weights: BTreeMap<ClassName, BTreeMap<ClassName, u64>>,
}

/// One positive-weight edge of a [`CouplingGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouplingEdge {
    pub from: ClassName,
    pub to: ClassName,
    pub weight: u64,
}

impl CouplingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `class` a key, with no outgoing weights if it is new.
    pub fn ensure_class(&mut self, class: &ClassName) {
        if !self.weights.contains_key(class) {
            self.weights.insert(class.clone(), BTreeMap::new());
        }
    }

    /// Count one `from → to` call. Self-calls are ignored.
    pub fn record_call(&mut self, from: &ClassName, to: &ClassName) {
        if from == to {
            self.ensure_class(from);
            return;
        }
        self.ensure_class(to);
        self.ensure_class(from);
        if let Some(outgoing) = self.weights.get_mut(from) {
            *outgoing.entry(to.clone()).or_insert(0) += 1;
        }
    }

    /// Weight of the directed `from → to` entry, 0 when absent.
    pub fn weight(&self, from: &str, to: &str) -> u64 {
        self.weights
            .get(from)
            .and_then(|outgoing| outgoing.get(to))
            .copied()
            .unwrap_or(0)
    }

    /// Outgoing weights of `class`, `None` when the class is unknown.
    pub fn outgoing(&self, class: &str) -> Option<&BTreeMap<ClassName, u64>> {
        self.weights.get(class)
    }

    pub fn contains(&self, class: &str) -> bool {
        self.weights.contains_key(class)
    }

    /// All classes, sorted.
    pub fn classes(&self) -> impl Iterator<Item = &ClassName> {
        self.weights.keys()
    }

    pub fn class_count(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Positive-weight edges, sorted by (from, to).
    pub fn edges(&self) -> impl Iterator<Item = (&ClassName, &ClassName, u64)> {
        self.weights.iter().flat_map(|(from, outgoing)| {
            outgoing
                .iter()
                .filter(|&(_, &w)| w > 0)
                .map(move |(to, &w)| (from, to, w))
        })
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    /// Sum of all weights, i.e. the number of resolved cross-class calls.
    pub fn total_weight(&self) -> u64 {
        self.edges().map(|(_, _, w)| w).sum()
    }

    /// Owned edge list for serialization.
    pub fn edge_list(&self) -> Vec<CouplingEdge> {
        self.edges()
            .map(|(from, to, weight)| CouplingEdge {
                from: from.clone(),
                to: to.clone(),
                weight,
            })
            .collect()
    }

    /// Classes with no outgoing and no incoming weight.
    pub fn isolated_classes(&self) -> Vec<&ClassName> {
        let mut touched: std::collections::BTreeSet<&ClassName> = std::collections::BTreeSet::new();
        for (from, to, _) in self.edges() {
            touched.insert(from);
            touched.insert(to);
        }
        self.classes().filter(|c| !touched.contains(c)).collect()
    }

    /// A petgraph `DiGraph` with one node per class (isolated ones included)
    /// and one edge per positive weight. Node indices follow sorted class order.
    pub fn to_digraph(&self) -> DiGraph<ClassName, u64> {
        let mut graph = DiGraph::with_capacity(self.class_count(), self.edge_count());
        let mut index: BTreeMap<&ClassName, NodeIndex> = BTreeMap::new();

        for class in self.classes() {
            index.insert(class, graph.add_node(class.clone()));
        }
        for (from, to, weight) in self.edges() {
            if let (Some(&src), Some(&tgt)) = (index.get(from), index.get(to)) {
                graph.add_edge(src, tgt, weight);
            }
        }

        graph
    }
}

// ── Calculator ─────────────────────────────────────────────────────

/// Computes coupling metrics over a borrowed [`CallGraph`].
#[derive(Debug, Clone, Copy)]
pub struct CouplingCalculator<'a> {
    call_graph: &'a CallGraph,
}

impl<'a> CouplingCalculator<'a> {
    pub fn new(call_graph: &'a CallGraph) -> Self {
        Self { call_graph }
    }

    /// Directional coupling ratio of `class_a → class_b`.
    ///
    /// Number of resolved `class_a → class_b` call edges divided by the number
    /// of resolved cross-class call edges in the whole graph. Returns `0.0`
    /// when the graph has no cross-class edges. An empty class name is a
    /// contract violation.
    pub fn pairwise_coupling(&self, class_a: &str, class_b: &str) -> Result<f64, CouplingError> {
        if class_a.is_empty() {
            return Err(CouplingError::MissingClass("first"));
        }
        if class_b.is_empty() {
            return Err(CouplingError::MissingClass("second"));
        }

        let mut relation_count = 0u64;
        let mut total_relations = 0u64;

        for call in self.call_graph.resolved_edges() {
            if call.caller_class.as_str() == class_a && call.callee_class.as_str() == class_b {
                relation_count += 1;
            }
            if call.is_cross_class() {
                total_relations += 1;
            }
        }

        if total_relations == 0 {
            return Ok(0.0);
        }
        Ok(relation_count as f64 / total_relations as f64)
    }

    /// Build the weighted class coupling graph.
    pub fn weighted_coupling(&self) -> CouplingGraph {
        let mut graph = CouplingGraph::new();

        for class in self.call_graph.classes() {
            graph.ensure_class(class);
        }
        for call in self.call_graph.resolved_edges() {
            graph.record_call(call.caller_class, call.callee_class);
        }

        graph
    }
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn ping_pong() -> CallGraph {
        let mut cg = CallGraph::new();
        cg.declare_method("A.f", "A");
        cg.declare_method("B.g", "B");
        cg.add_call("A.f", "B.g");
        cg.add_call("B.g", "A.f");
        cg
    }

    #[test]
    fn ping_pong_coupling_graph() {
        let cg = ping_pong();
        let graph = CouplingCalculator::new(&cg).weighted_coupling();

        assert_eq!(graph.class_count(), 2);
        assert_eq!(graph.weight("A", "B"), 1);
        assert_eq!(graph.weight("B", "A"), 1);
        assert_eq!(graph.total_weight(), 2);
    }

    #[test]
    fn ping_pong_pairwise_is_half() {
        let cg = ping_pong();
        let calc = CouplingCalculator::new(&cg);
        // 1 A→B edge out of 2 cross-class edges
        assert!((calc.pairwise_coupling("A", "B").unwrap() - 0.5).abs() < f64::EPSILON);
        assert!((calc.pairwise_coupling("B", "A").unwrap() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn pairwise_is_directional() {
        let mut cg = CallGraph::new();
        cg.declare_method("A.f", "A");
        cg.declare_method("B.g", "B");
        cg.declare_method("C.h", "C");
        cg.add_call("A.f", "B.g");
        cg.add_call("A.f", "B.g");
        cg.add_call("A.f", "B.g");
        cg.add_call("C.h", "A.f");

        let calc = CouplingCalculator::new(&cg);
        assert!((calc.pairwise_coupling("A", "B").unwrap() - 0.75).abs() < 1e-12);
        assert_eq!(calc.pairwise_coupling("B", "A").unwrap(), 0.0);
        assert!((calc.pairwise_coupling("C", "A").unwrap() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn pairwise_rejects_empty_names() {
        let cg = ping_pong();
        let calc = CouplingCalculator::new(&cg);
        assert_eq!(
            calc.pairwise_coupling("", "B"),
            Err(CouplingError::MissingClass("first"))
        );
        assert_eq!(
            calc.pairwise_coupling("A", ""),
            Err(CouplingError::MissingClass("second"))
        );
    }

    #[test]
    fn no_cross_class_edges_is_zero() {
        let mut cg = CallGraph::new();
        cg.declare_method("A.f", "A");
        cg.declare_method("A.g", "A");
        cg.add_call("A.f", "A.g");

        let calc = CouplingCalculator::new(&cg);
        assert_eq!(calc.pairwise_coupling("A", "A").unwrap(), 0.0);
        assert_eq!(calc.pairwise_coupling("A", "Missing").unwrap(), 0.0);
    }

    #[test]
    fn unresolved_edges_are_skipped() {
        let mut cg = ping_pong();
        cg.add_call("A.f", "Ghost.boo");
        cg.add_call("Ghost.boo", "B.g");

        let calc = CouplingCalculator::new(&cg);
        let graph = calc.weighted_coupling();
        assert!(!graph.contains("Ghost"));
        assert_eq!(graph.total_weight(), 2);
        assert!((calc.pairwise_coupling("A", "B").unwrap() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn isolated_and_callee_only_classes_are_keys() {
        let mut cg = CallGraph::new();
        cg.declare_method("Main.run", "Main");
        cg.declare_method("Util.noop", "Util");
        cg.owners.insert("Store.save".into(), "Store".into());
        cg.add_call("Main.run", "Store.save");
        cg.add_call("Util.noop", "Util.noop");

        let graph = CouplingCalculator::new(&cg).weighted_coupling();
        let classes: Vec<&str> = graph.classes().map(ClassName::as_str).collect();
        assert_eq!(classes, ["Main", "Store", "Util"]);
        assert_eq!(graph.outgoing("Store").map(BTreeMap::len), Some(0));
        assert_eq!(graph.outgoing("Util").map(BTreeMap::len), Some(0));
        assert_eq!(graph.isolated_classes(), [&ClassName::from("Util")]);
    }

    #[test]
    fn digraph_keeps_isolated_nodes() {
        let mut graph = CouplingGraph::new();
        graph.record_call(&"A".into(), &"B".into());
        graph.record_call(&"A".into(), &"B".into());
        graph.ensure_class(&"C".into());

        let dg = graph.to_digraph();
        assert_eq!(dg.node_count(), 3);
        assert_eq!(dg.edge_count(), 1);
        let edge = dg.edge_indices().next().unwrap();
        assert_eq!(dg[edge], 2);
    }

    #[test]
    fn edge_list_serializes() {
        let mut graph = CouplingGraph::new();
        graph.record_call(&"A".into(), &"B".into());
        let json = serde_json::to_value(graph.edge_list()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "from": "A", "to": "B", "weight": 1 }])
        );
    }

    // ── Properties ─────────────────────────────────────────────────

    fn arb_call_graph() -> impl Strategy<Value = CallGraph> {
        // Methods m0..m11 spread over classes C0..C4; m10 and m11 stay unresolved.
        let calls = prop::collection::vec((0usize..12, 0usize..12), 0..60);
        calls.prop_map(|pairs| {
            let mut cg = CallGraph::new();
            for m in 0..10 {
                cg.declare_method(format!("C{}.m{m}", m % 5), format!("C{}", m % 5));
            }
            for (caller, callee) in pairs {
                let name = |m: usize| {
                    if m < 10 {
                        format!("C{}.m{m}", m % 5)
                    } else {
                        format!("X.m{m}")
                    }
                };
                cg.add_call(name(caller), name(callee));
            }
            cg
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn coupling_stays_in_unit_interval(cg in arb_call_graph(), a in 0usize..5, b in 0usize..5) {
            let calc = CouplingCalculator::new(&cg);
            let value = calc.pairwise_coupling(&format!("C{a}"), &format!("C{b}")).unwrap();
            prop_assert!((0.0..=1.0).contains(&value));
        }

        #[test]
        fn graph_has_no_self_loops(cg in arb_call_graph()) {
            let graph = CouplingCalculator::new(&cg).weighted_coupling();
            for (from, to, _) in graph.edges() {
                prop_assert_ne!(from, to);
            }
        }

        #[test]
        fn total_weight_counts_cross_class_calls(cg in arb_call_graph()) {
            let graph = CouplingCalculator::new(&cg).weighted_coupling();
            let cross = cg.resolved_edges().filter(|c| c.is_cross_class()).count() as u64;
            prop_assert_eq!(graph.total_weight(), cross);
        }

        #[test]
        fn every_resolved_class_is_a_key(cg in arb_call_graph()) {
            let graph = CouplingCalculator::new(&cg).weighted_coupling();
            prop_assert_eq!(graph.class_count(), cg.classes().len());
        }
    }
}
