//! CLI entry point for the tile jigsaw solver

use clap::Parser;
use env_logger::{Builder, Env};
use tilestitch::io::cli::{Cli, FileProcessor};

fn main() -> tilestitch::Result<()> {
    let cli = Cli::parse();
    Builder::from_env(Env::default().default_filter_or(cli.log_filter()))
        .format_timestamp_millis()
        .init();

    let mut processor = FileProcessor::new(cli);
    processor.process()
}
