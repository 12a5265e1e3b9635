mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meetcal")]
#[command(about = "Generate or update an .ics calendar from a schedule of monthly meetings")]
struct Cli {
    /// YAML file with the meeting types and their per-month topics
    schedule: PathBuf,

    /// .ics file to read and update (printed to stdout when omitted)
    #[arg(long)]
    ics: Option<PathBuf>,

    /// Report what would change without writing the calendar
    #[arg(long, requires = "ics")]
    dry_run: bool,

    /// Log more (-v for info, -vv for debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    commands::generate::run(&cli.schedule, cli.ics.as_deref(), cli.dry_run, cli.verbose > 0)
}

/// Logs go to stderr; stdout may carry the generated calendar.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
