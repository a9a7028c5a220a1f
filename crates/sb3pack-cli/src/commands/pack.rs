//! Pack command implementation.

use crate::cli::PackArgs;
use crate::error::batch_failure;
use crate::error::convert_pack_error;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use anyhow::bail;
use sb3pack_core::BatchConfig;
use sb3pack_core::CommandPackager;
use sb3pack_core::FailurePolicy;
use sb3pack_core::discover;
use sb3pack_core::run_batch;
use std::time::Duration;
use tracing::debug;

pub fn execute(
    args: &PackArgs,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let config = batch_config(args);

    let sources = discover(&config.source_root, &config.extension)
        .map_err(|e| convert_pack_error(e, &config.source_root))?;

    if sources.is_empty() {
        bail!(
            "No .{} files found under '{}'",
            config.extension.trim_start_matches('.'),
            config.source_root.display()
        );
    }

    let packager = CommandPackager::new(&args.packager)
        .map_err(|e| convert_pack_error(e, &config.source_root))?
        .with_args(&args.packager_args)
        .with_timeout(Duration::from_secs(args.timeout));
    debug!(
        program = %args.packager,
        preset = %config.preset,
        layout = %config.layout,
        "starting batch"
    );

    let report = {
        let mut progress = CliProgress::new(formatter, sources.len(), show_progress);
        run_batch(&sources, &config, &packager, &mut progress)
    };

    formatter.format_batch_report(&report)?;

    if !report.is_success() {
        return Err(batch_failure(&report));
    }

    Ok(())
}

fn batch_config(args: &PackArgs) -> BatchConfig {
    let mut config = BatchConfig::new(&args.source)
        .with_layout(args.layout)
        .with_preset(args.preset)
        .with_failure_policy(FailurePolicy::from_continue_on_error(!args.fail_fast))
        .with_rename_primary_page(!args.keep_index)
        .with_clean(args.clean)
        .with_extension(&args.extension);

    if let Some(dest) = &args.dest {
        config = config.with_dest_root(dest);
    }

    config
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use sb3pack_core::OutputLayout;
    use sb3pack_core::Preset;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_converts_in_place() {
        let cli = Cli::try_parse_from(["sb3pack"]).unwrap();
        let config = batch_config(&cli.pack);

        assert_eq!(config.source_root, PathBuf::from("."));
        assert_eq!(config.dest_root(), PathBuf::from(".").as_path());
        assert_eq!(config.layout, OutputLayout::Mirrored);
        assert_eq!(config.preset, Preset::ZipResizable);
        assert_eq!(config.failure_policy, FailurePolicy::Continue);
        assert!(config.rename_primary_page);
        assert!(!config.clean);
    }

    #[test]
    fn test_flags_map_to_config() {
        let cli = Cli::try_parse_from([
            "sb3pack",
            "in",
            "out",
            "--layout",
            "flat",
            "--fail-fast",
            "--keep-index",
            "--clean",
            "--extension",
            ".sb2",
        ])
        .unwrap();
        let config = batch_config(&cli.pack);

        assert_eq!(config.dest_root(), PathBuf::from("out").as_path());
        assert_eq!(config.layout, OutputLayout::FlatFolder);
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
        assert!(!config.rename_primary_page);
        assert!(config.clean);
        assert_eq!(config.extension, ".sb2");
    }
}
