//! sb3pack CLI - Batch packaging of Scratch projects into standalone web
//! pages.

mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    logging::init_tracing(cli.verbose);

    let formatter = output::formatter_for(&cli);
    let show_progress = !cli.json && !cli.quiet && progress::CliProgress::should_show();

    match &cli.command {
        None => commands::pack::execute(&cli.pack, &*formatter, show_progress),
        Some(cli::Commands::Pack(args)) => {
            commands::pack::execute(args, &*formatter, show_progress)
        }
        Some(cli::Commands::List(args)) => commands::list::execute(args, &*formatter),
        Some(cli::Commands::Completion(args)) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    }
}
