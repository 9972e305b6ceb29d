use anyhow::Context;
use clap::Parser;
use portsweep::cli::Cli;
use portsweep::output;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Help and version keep clap's own handling.
        Err(e) if !e.use_stderr() => e.exit(),
        // clap already prefixes its message with "error:".
        Err(e) => {
            print!("{}", e.render());
            return;
        }
    };
    init_logging(cli.verbose);

    if let Err(e) = run(&cli).await {
        output::print_error(&format!("{:#}", e));
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    cli.execute()
        .await
        .with_context(|| format!("scan of {} failed", cli.host))
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "portsweep=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
