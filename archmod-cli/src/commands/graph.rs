use std::path::PathBuf;

use clap::Args;

use archmod_core::render::dot::{DotOptions, render_dot};
use archmod_core::render::text::render_coupling_graph;

use super::{InputArgs, emit};

#[derive(Args, Debug)]
pub struct GraphArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format: text, json, dot
    #[arg(long, default_value = "text", value_parser = ["text", "json", "dot"])]
    pub format: String,

    /// Leave classes without edges out of DOT output
    #[arg(long)]
    pub no_isolated: bool,

    /// Write to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &GraphArgs) -> anyhow::Result<()> {
    let config = args.input.load_config()?;
    let graph = args.input.coupling_graph()?;

    let content = match args.format.as_str() {
        "json" => {
            let json = serde_json::json!({
                "classes": graph.classes().collect::<Vec<_>>(),
                "edges": graph.edge_list(),
            });
            format!("{}\n", serde_json::to_string_pretty(&json)?)
        }
        "dot" => {
            let options = DotOptions {
                include_isolated: config.output.include_isolated && !args.no_isolated,
                ..DotOptions::default()
            };
            render_dot(&graph, &options)?
        }
        _ => render_coupling_graph(&graph)?,
    };

    emit(&content, args.output.as_deref())
}
