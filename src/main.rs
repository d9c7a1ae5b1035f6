//! CLI entry point for the connector tile puzzle generator

use clap::Parser;
use pipeloop::io::cli::{Cli, CommandProcessor};
use pipeloop::io::logging::init_logger;

fn main() -> pipeloop::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);
    let mut processor = CommandProcessor::new(cli);
    processor.process()
}
