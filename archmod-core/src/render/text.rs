// Plain-text listings for console output.

use std::fmt::Write;

use crate::analyze::ClusteringOutcome;
use crate::analyze::modules::ModuleCoupling;
use crate::cluster::ClusterStore;
use crate::coupling::CouplingGraph;
use crate::error::RenderError;
use crate::types::ClassName;

/// One `A --(w)--> B` line per edge; classes with no outgoing weight get
/// `A --(0)--> No calls`.
pub fn render_coupling_graph(graph: &CouplingGraph) -> Result<String, RenderError> {
    let mut out = String::new();
    for class in graph.classes() {
        let outgoing = graph.outgoing(class.as_str());
        match outgoing.filter(|o| o.values().any(|&w| w > 0)) {
            Some(outgoing) => {
                for (to, weight) in outgoing.iter().filter(|&(_, &w)| w > 0) {
                    writeln!(out, "{class} --({weight})--> {to}")?;
                }
            }
            None => writeln!(out, "{class} --(0)--> No calls")?,
        }
    }
    Ok(out)
}

/// One line per merge step, followed by the stop reason.
pub fn render_steps(outcome: &ClusteringOutcome) -> Result<String, RenderError> {
    let mut out = String::new();
    for step in &outcome.steps {
        write!(
            out,
            "Step {}: merged {} and {} (coupling {}, size {})",
            step.step, step.absorbed, step.kept, step.coupling, step.merged_size
        )?;
        if let Some(average) = step.average {
            write!(out, ", average {average:.4}")?;
        }
        writeln!(out)?;
    }
    writeln!(out, "Stopped: {}", outcome.stop)?;
    Ok(out)
}

/// Numbered cluster listing, optionally with each cluster's average coupling.
pub fn render_partition(
    title: &str,
    clusters: &ClusterStore,
    averages: Option<&[ModuleCoupling]>,
) -> Result<String, RenderError> {
    let mut out = String::new();
    writeln!(out, "{title} ({} total):", clusters.len())?;
    for (i, (key, members)) in clusters.iter().enumerate() {
        write!(out, "  {} {}: [{}]", title_singular(title), i + 1, join(members))?;
        if let Some(average) = averages
            .and_then(|all| all.iter().find(|m| &m.key == key))
            .map(|m| m.average)
        {
            write!(out, " average coupling {average:.4}")?;
        }
        writeln!(out)?;
    }
    Ok(out)
}

fn title_singular(title: &str) -> &str {
    title.strip_suffix('s').unwrap_or(title)
}

fn join<'a>(members: impl IntoIterator<Item = &'a ClassName>) -> String {
    members
        .into_iter()
        .map(ClassName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
