use clap::Args;

use archmod_core::observer::{FanoutObserver, IndicatifObserver, MergeObserver, TracingObserver};
use archmod_core::pipeline;
use archmod_core::render::text::{render_partition, render_steps};

use super::{Format, InputArgs};

#[derive(Args, Debug)]
pub struct ModulesArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Minimum average intra-module coupling a merge must keep
    #[arg(long)]
    pub min_coupling: Option<f64>,

    /// Class count for the module bound (default: classes in the graph)
    #[arg(long)]
    pub total_classes: Option<usize>,

    /// Stop after this many merges
    #[arg(long)]
    pub step_budget: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: Format,
}

pub fn run(args: &ModulesArgs, quiet: bool) -> anyhow::Result<()> {
    let mut config = args.input.load_config()?;
    if let Some(min) = args.min_coupling {
        config.analysis.min_coupling_average = min;
    }
    if args.total_classes.is_some() {
        config.analysis.total_classes = args.total_classes;
    }
    if args.step_budget.is_some() {
        config.analysis.step_budget = args.step_budget;
    }
    config.validate()?;
    let graph = args.input.coupling_graph()?;

    let tracing_observer = TracingObserver::new("modules");
    let spinner = if quiet {
        IndicatifObserver::hidden()
    } else {
        IndicatifObserver::new("identifying modules")
    };
    let observers: Vec<&dyn MergeObserver> = vec![&tracing_observer, &spinner];
    let observer = FanoutObserver::new(observers);

    let (report, modules) = pipeline::identify_modules(&graph, &config, &observer)?;

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text => {
            println!(
                "Module bound: {} (min average coupling {})",
                report.max_modules, report.min_coupling_average
            );
            print!("{}", render_steps(&report.outcome)?);
            println!();
            print!(
                "{}",
                render_partition("Modules", &modules, Some(report.modules.as_slice()))?
            );
        }
    }
    Ok(())
}
