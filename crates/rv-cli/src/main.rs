use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{ExitStatus, ResolveArgs};

mod commands;
mod logging;

#[derive(Parser)]
#[command(author, version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Do not print any output.
    #[arg(global = true, long, short, conflicts_with = "verbose")]
    quiet: bool,

    /// Use verbose output.
    #[arg(global = true, long, short, conflicts_with = "quiet")]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a manifest against a knowledge graph into a pinned install script.
    Resolve(ResolveCommandArgs),
}

#[derive(clap::Args)]
struct ResolveCommandArgs {
    /// Path to the requirements manifest.
    manifest: PathBuf,

    /// Path to the knowledge graph JSON document.
    #[clap(long)]
    graph: PathBuf,

    /// Path to the available-interpreter catalog (one version per line).
    #[clap(long)]
    catalog: PathBuf,

    /// Where to write the resolved install script.
    #[clap(long, default_value = "install_script.txt")]
    output: PathBuf,

    /// Prefer newer versions when the hard constraints leave a choice.
    #[clap(long)]
    prefer_newest: bool,

    /// Prefer fewer optional packages when the hard constraints leave a choice.
    #[clap(long)]
    minimize_packages: bool,

    /// Wall-clock budget for the solver, in milliseconds.
    #[clap(long)]
    timeout_ms: Option<u64>,
}

fn inner() -> Result<ExitStatus> {
    let cli = Cli::parse();
    if !cli.quiet {
        logging::setup_logging()?;
    }

    match cli.command {
        Commands::Resolve(args) => commands::resolve(ResolveArgs {
            manifest: args.manifest,
            graph: args.graph,
            catalog: args.catalog,
            output: args.output,
            prefer_newest: args.prefer_newest,
            minimize_packages: args.minimize_packages,
            timeout_ms: args.timeout_ms,
        }),
    }
}

fn main() -> ExitCode {
    match inner() {
        Ok(status) => status.into(),
        Err(err) => {
            #[allow(clippy::print_stderr)]
            {
                let mut causes = err.chain();
                eprintln!("error: {}", causes.next().unwrap());
                for cause in causes {
                    eprintln!("  Caused by: {cause}");
                }
            }
            ExitCode::from(2)
        }
    }
}
