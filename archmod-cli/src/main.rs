use clap::Parser;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "archmod",
    version,
    about = "Recover candidate modules from a call graph by coupling-driven clustering"
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Classify an error into a process exit code.
///
/// Exit codes:
///   0  — success
///   1  — general/unknown error
///   2  — configuration error
///   3  — input not found or unreadable
///   4  — invalid argument
fn classify_exit_code(err: &anyhow::Error) -> i32 {
    let msg = format!("{err:#}");
    let lower = msg.to_lowercase();

    if lower.contains("cannot read call graph") {
        3 // input error
    } else if lower.contains("config") {
        2 // config error
    } else if lower.contains("cannot be empty") || lower.contains("unknown class") {
        4 // invalid argument
    } else {
        1 // general error
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (_, 0) => "warn",
        (_, 1) => "info",
        (_, 2) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    match commands::run(cli.command, cli.quiet) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(classify_exit_code(&e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_config() {
        let err = anyhow::anyhow!("Cannot load config: Config file not found: archmod.toml");
        assert_eq!(classify_exit_code(&err), 2);
    }

    #[test]
    fn exit_code_input() {
        let err = anyhow::anyhow!("Cannot read call graph: missing.json");
        assert_eq!(classify_exit_code(&err), 3);

        let err = anyhow::anyhow!("Cannot read call graph: config.json: Malformed call graph JSON");
        assert_eq!(classify_exit_code(&err), 3);
    }

    #[test]
    fn exit_code_invalid_argument() {
        let err = anyhow::anyhow!("Class name cannot be empty (first argument)");
        assert_eq!(classify_exit_code(&err), 4);
    }

    #[test]
    fn exit_code_general() {
        let err = anyhow::anyhow!("Something unexpected happened");
        assert_eq!(classify_exit_code(&err), 1);
    }
}
