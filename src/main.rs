//! episeq CLI: episode logs to Driver/Commander instruction sequences.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "episeq",
    version,
    about = "Translate multi-agent episode logs into compact Driver/Commander instruction sequences"
)]
struct Cli {
    /// Debug-level logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: episeq::cli::Commands,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = episeq::cli::dispatch(cli.command, cli.verbose) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
