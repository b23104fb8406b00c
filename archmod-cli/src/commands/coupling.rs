use clap::Args;
use tracing::warn;

use archmod_core::coupling::CouplingCalculator;

use super::{Format, InputArgs};

#[derive(Args, Debug)]
pub struct CouplingArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Calling class
    #[arg(long)]
    pub from: String,

    /// Called class
    #[arg(long)]
    pub to: String,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: Format,
}

pub fn run(args: &CouplingArgs) -> anyhow::Result<()> {
    let call_graph = args.input.load_call_graph()?;
    let value = CouplingCalculator::new(&call_graph).pairwise_coupling(&args.from, &args.to)?;

    let classes = call_graph.classes();
    for name in [&args.from, &args.to] {
        if !classes.iter().any(|c| c.as_str() == name.as_str()) {
            warn!(class = %name, "Class does not appear in the call graph");
        }
    }

    match args.format {
        Format::Json => {
            let json = serde_json::json!({
                "from": args.from,
                "to": args.to,
                "coupling": value,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Format::Text => println!("Coupling({}, {}) = {value}", args.from, args.to),
    }
    Ok(())
}
