//! List command implementation.

use crate::cli::ListArgs;
use crate::error::convert_pack_error;
use crate::output::OutputFormatter;
use anyhow::Result;
use sb3pack_core::discover;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let sources = discover(&args.source, &args.extension)
        .map_err(|e| convert_pack_error(e, &args.source))?;

    formatter.format_discovered(&args.source, &sources)
}
