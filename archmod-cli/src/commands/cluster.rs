use clap::Args;

use archmod_core::observer::{FanoutObserver, IndicatifObserver, MergeObserver, TracingObserver};
use archmod_core::pipeline;
use archmod_core::render::text::{render_partition, render_steps};

use super::{Format, InputArgs};

#[derive(Args, Debug)]
pub struct ClusterArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Stop after this many merges
    #[arg(long)]
    pub step_budget: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: Format,
}

pub fn run(args: &ClusterArgs, quiet: bool) -> anyhow::Result<()> {
    let mut config = args.input.load_config()?;
    if args.step_budget.is_some() {
        config.analysis.step_budget = args.step_budget;
    }
    config.validate()?;
    let graph = args.input.coupling_graph()?;

    let tracing_observer = TracingObserver::new("cluster");
    let spinner = if quiet {
        IndicatifObserver::hidden()
    } else {
        IndicatifObserver::new("clustering")
    };
    let observers: Vec<&dyn MergeObserver> = vec![&tracing_observer, &spinner];
    let observer = FanoutObserver::new(observers);

    let (outcome, clusters) = pipeline::cluster(&graph, &config, &observer)?;

    match args.format {
        Format::Json => {
            let json = serde_json::json!({
                "outcome": outcome,
                "clusters": clusters.partition(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Format::Text => {
            print!("{}", render_steps(&outcome)?);
            println!();
            print!("{}", render_partition("Clusters", &clusters, None)?);
        }
    }
    Ok(())
}
