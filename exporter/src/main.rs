//! script_exporter - run shell scripts as Prometheus probes

use clap::Parser;

use script_exporter::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
