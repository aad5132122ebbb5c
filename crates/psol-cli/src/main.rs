use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

mod cli;
mod dispatch;

use cli::PsolCli;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = PsolCli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let code = dispatch::dispatch_command(&cli.command)?;
    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

/// Logs go to stderr; stdout is reserved for output the build rules consume.
fn init_tracing(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_env("PSOL_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
