// Graphviz DOT export of a class coupling graph.

use std::fmt::Write;

use petgraph::visit::EdgeRef;

use crate::coupling::CouplingGraph;
use crate::error::RenderError;

/// Options for [`render_dot`].
#[derive(Debug, Clone)]
pub struct DotOptions {
    /// Graph name in the `digraph <name> {` header.
    pub name: String,
    /// Emit a bare node statement for every class without edges.
    pub include_isolated: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            name: "G".to_string(),
            include_isolated: true,
        }
    }
}

/// Render `graph` as a DOT digraph with one labelled edge per positive weight.
pub fn render_dot(graph: &CouplingGraph, options: &DotOptions) -> Result<String, RenderError> {
    let digraph = graph.to_digraph();
    let mut out = String::new();
    writeln!(out, "digraph {} {{", options.name)?;

    if options.include_isolated {
        for node in digraph.node_indices() {
            if digraph.neighbors_undirected(node).next().is_none() {
                writeln!(out, "    \"{}\";", escape(digraph[node].as_str()))?;
            }
        }
    }

    for edge in digraph.edge_references() {
        writeln!(
            out,
            "    \"{}\" -> \"{}\" [label=\"{}\"];",
            escape(digraph[edge.source()].as_str()),
            escape(digraph[edge.target()].as_str()),
            edge.weight()
        )?;
    }

    writeln!(out, "}}")?;
    Ok(out)
}

fn escape(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}
