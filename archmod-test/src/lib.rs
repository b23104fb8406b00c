// Integration test utilities and call graph fixtures for archmod.

use std::path::{Path, PathBuf};

use archmod_core::call_graph::CallGraph;

/// Builder for call graph fixtures: `class("A", &["f", "g"])` declares
/// `A.f` and `A.g`, `call("A.f", "B.g", n)` records `n` call sites.
#[derive(Debug, Default)]
pub struct CallGraphBuilder {
    graph: CallGraph,
}

impl CallGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn class(mut self, class: &str, methods: &[&str]) -> Self {
        for method in methods {
            self.graph.declare_method(format!("{class}.{method}"), class);
        }
        self
    }

    #[must_use]
    pub fn call(mut self, caller: &str, callee: &str, times: usize) -> Self {
        for _ in 0..times {
            self.graph.add_call(caller, callee);
        }
        self
    }

    pub fn build(self) -> CallGraph {
        self.graph
    }
}

/// `A.f → B.g` and back.
pub fn ping_pong() -> CallGraph {
    CallGraphBuilder::new()
        .class("A", &["f"])
        .class("B", &["g"])
        .call("A.f", "B.g", 1)
        .call("B.g", "A.f", 1)
        .build()
}

/// Three classes that only call themselves.
pub fn isolated_trio() -> CallGraph {
    CallGraphBuilder::new()
        .class("A", &["f", "g"])
        .class("B", &["h"])
        .class("C", &["i"])
        .call("A.f", "A.g", 2)
        .call("B.h", "B.h", 1)
        .build()
}

/// A and B coupled with weight 10 in total; C has no cross-class calls.
pub fn strong_pair_with_loner() -> CallGraph {
    CallGraphBuilder::new()
        .class("A", &["f"])
        .class("B", &["g"])
        .class("C", &["h"])
        .call("A.f", "B.g", 6)
        .call("B.g", "A.f", 4)
        .build()
}

/// A small layered application: a UI layer, a persistence layer, and a
/// billing layer, plus a logger everyone calls and one unresolved library call.
pub fn layered_shop() -> CallGraph {
    CallGraphBuilder::new()
        .class("CartView", &["render", "onClick"])
        .class("CartController", &["add", "checkout"])
        .class("OrderRepo", &["save", "find"])
        .class("Database", &["exec"])
        .class("Billing", &["charge"])
        .class("PaymentGateway", &["send"])
        .class("Logger", &["info"])
        .call("CartView.onClick", "CartController.add", 3)
        .call("CartController.add", "CartView.render", 3)
        .call("CartController.checkout", "Billing.charge", 1)
        .call("CartController.checkout", "OrderRepo.save", 1)
        .call("OrderRepo.save", "Database.exec", 4)
        .call("OrderRepo.find", "Database.exec", 2)
        .call("Billing.charge", "PaymentGateway.send", 5)
        .call("Billing.charge", "Logger.info", 1)
        .call("PaymentGateway.send", "Http.post", 1)
        .build()
}

/// A call graph written to a temporary JSON file.
#[derive(Debug)]
pub struct CallGraphFile {
    pub dir: tempfile::TempDir,
    pub path: PathBuf,
}

impl CallGraphFile {
    pub fn write(graph: &CallGraph) -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("call_graph.json");
        std::fs::write(&path, serde_json::to_string_pretty(graph)?)?;
        Ok(Self { dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_declares_qualified_methods() {
        let cg = CallGraphBuilder::new()
            .class("A", &["f", "g"])
            .call("A.f", "A.g", 2)
            .build();
        assert_eq!(cg.class_of("A.g").map(|c| c.as_str()), Some("A"));
        assert_eq!(cg.edges().count(), 2);
    }

    #[test]
    fn fixture_file_roundtrips() {
        let file = CallGraphFile::write(&layered_shop()).unwrap();
        let loaded = CallGraph::load(file.path()).unwrap();
        assert_eq!(loaded, layered_shop());
    }
}
