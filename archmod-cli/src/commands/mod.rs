pub mod analyze;
pub mod cluster;
pub mod coupling;
pub mod graph;
pub mod modules;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};

use archmod_core::call_graph::CallGraph;
use archmod_core::config::ArchmodConfig;
use archmod_core::coupling::{CouplingCalculator, CouplingGraph};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Directional coupling ratio between two classes
    Coupling(coupling::CouplingArgs),
    /// Print the weighted class coupling graph
    Graph(graph::GraphArgs),
    /// Hierarchical clustering until coupling runs out
    Cluster(cluster::ClusterArgs),
    /// Bounded module identification
    Modules(modules::ModulesArgs),
    /// Full analysis: coupling graph, clusters, and modules
    Analyze(analyze::AnalyzeArgs),
}

pub fn run(cmd: Command, quiet: bool) -> anyhow::Result<()> {
    match cmd {
        Command::Coupling(args) => coupling::run(&args),
        Command::Graph(args) => graph::run(&args),
        Command::Cluster(args) => cluster::run(&args, quiet),
        Command::Modules(args) => modules::run(&args, quiet),
        Command::Analyze(args) => analyze::run(&args, quiet),
    }
}

/// Input options shared by every subcommand.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Call graph JSON file: {"calls": {...}, "owners": {...}}
    pub input: PathBuf,

    /// Configuration file (TOML)
    #[arg(long, env = "ARCHMOD_CONFIG")]
    pub config: Option<PathBuf>,
}

impl InputArgs {
    pub fn load_call_graph(&self) -> anyhow::Result<CallGraph> {
        load_call_graph(&self.input)
    }

    pub fn load_config(&self) -> anyhow::Result<ArchmodConfig> {
        match &self.config {
            Some(path) => ArchmodConfig::load(path)
                .with_context(|| format!("Cannot load config: {}", path.display())),
            None => Ok(ArchmodConfig::default()),
        }
    }

    pub fn coupling_graph(&self) -> anyhow::Result<CouplingGraph> {
        let call_graph = self.load_call_graph()?;
        Ok(CouplingCalculator::new(&call_graph).weighted_coupling())
    }
}

pub fn load_call_graph(path: &Path) -> anyhow::Result<CallGraph> {
    CallGraph::load(path).with_context(|| format!("Cannot read call graph: {}", path.display()))
}

/// Output format for result listings.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// Print to stdout, or write to `output` when given.
pub fn emit(content: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => archmod_core::render::write_output(path, content)
            .with_context(|| format!("Cannot write output: {}", path.display())),
        None => {
            print!("{content}");
            Ok(())
        }
    }
}
