//! User-facing output for the pack and list commands.
//!
//! Diagnostics go through `tracing`; everything meant for the person running
//! the batch goes through an [`OutputFormatter`].

mod formatter;
mod human;
mod json;

pub use formatter::OutputFormatter;

use crate::cli::Cli;
use human::HumanFormatter;
use json::JsonFormatter;

/// Picks the formatter selected by the global output flags.
pub fn formatter_for(cli: &Cli) -> Box<dyn OutputFormatter> {
    if cli.json {
        Box::new(JsonFormatter)
    } else {
        Box::new(HumanFormatter::new(cli.verbose, cli.quiet))
    }
}
