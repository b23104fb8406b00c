use std::path::PathBuf;

use clap::Args;

use archmod_core::observer::TracingObserver;
use archmod_core::pipeline::run_analysis;
use archmod_core::render::dot::{DotOptions, render_dot};
use archmod_core::render::text::{render_coupling_graph, render_partition, render_steps};

use super::{Format, InputArgs, emit};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Minimum average intra-module coupling a merge must keep
    #[arg(long)]
    pub min_coupling: Option<f64>,

    /// Also write the coupling graph as DOT to this file
    #[arg(long)]
    pub dot: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: Format,
}

pub fn run(args: &AnalyzeArgs, quiet: bool) -> anyhow::Result<()> {
    let mut config = args.input.load_config()?;
    if let Some(min) = args.min_coupling {
        config.analysis.min_coupling_average = min;
    }
    let call_graph = args.input.load_call_graph()?;

    let analysis = run_analysis(&call_graph, &config, &TracingObserver::new("analyze"))?;
    let report = &analysis.report;

    if let Some(path) = &args.dot {
        let options = DotOptions {
            include_isolated: config.output.include_isolated,
            ..DotOptions::default()
        };
        emit(&render_dot(&analysis.coupling_graph, &options)?, Some(path))?;
        if !quiet {
            eprintln!("Wrote {}", path.display());
        }
    }

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(report)?),
        Format::Text => {
            println!(
                "{} classes, {} call edges ({} cross-class, {} unresolved)",
                report.classes.len(),
                report.stats.edges,
                report.stats.cross_class_edges,
                report.stats.unresolved_edges
            );
            println!();
            println!("Weighted coupling graph:");
            print!("{}", render_coupling_graph(&analysis.coupling_graph)?);
            println!();
            println!("Hierarchical clustering:");
            print!("{}", render_steps(&report.hierarchical.outcome)?);
            print!("{}", render_partition("Clusters", &analysis.clusters, None)?);
            println!();
            println!(
                "Module identification (bound {}, min average coupling {}):",
                report.modules.max_modules, report.modules.min_coupling_average
            );
            print!("{}", render_steps(&report.modules.outcome)?);
            let averages = report.modules.modules.as_slice();
            print!(
                "{}",
                render_partition("Modules", &analysis.modules, Some(averages))?
            );
        }
    }
    Ok(())
}
