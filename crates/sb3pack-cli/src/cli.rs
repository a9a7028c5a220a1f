//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use sb3pack_core::OutputLayout;
use sb3pack_core::Preset;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sb3pack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Packaging options used when no subcommand is given
    #[command(flatten)]
    pub pack: PackArgs,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Package every project under SOURCE (the default command)
    Pack(PackArgs),
    /// List the projects that would be packaged
    List(ListArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct PackArgs {
    /// Directory searched for projects
    #[arg(value_name = "SOURCE", default_value = ".")]
    pub source: PathBuf,

    /// Output directory (default: next to each project)
    #[arg(value_name = "DEST")]
    pub dest: Option<PathBuf>,

    /// Output layout: flat, single or mirrored
    #[arg(long, default_value = "mirrored", value_parser = parse_layout)]
    pub layout: OutputLayout,

    /// Packager preset: zip-resizable, zip, html or html-resizable
    #[arg(long, default_value = "zip-resizable", value_parser = parse_preset)]
    pub preset: Preset,

    /// Stop at the first project that fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Remove existing output folders before writing
    #[arg(long)]
    pub clean: bool,

    /// Keep the generated index.html instead of renaming it after the project
    #[arg(long)]
    pub keep_index: bool,

    /// Extension of project files
    #[arg(long, default_value = "sb3")]
    pub extension: String,

    /// Packager bridge program
    #[arg(
        long,
        value_name = "PROGRAM",
        env = "SB3PACK_PACKAGER",
        default_value = "sb3-packager-bridge"
    )]
    pub packager: String,

    /// Extra argument for the packager bridge (can be repeated)
    #[arg(long = "packager-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub packager_args: Vec<String>,

    /// Seconds to wait for the packager on each project
    #[arg(
        long,
        value_name = "SECS",
        default_value = "300",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Directory searched for projects
    #[arg(value_name = "SOURCE", default_value = ".")]
    pub source: PathBuf,

    /// Extension of project files
    #[arg(long, default_value = "sb3")]
    pub extension: String,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

fn parse_layout(s: &str) -> Result<OutputLayout, String> {
    s.parse()
}

fn parse_preset(s: &str) -> Result<Preset, String> {
    s.parse().map_err(|e: sb3pack_core::preset::UnknownPreset| e.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_packs_current_directory() {
        let cli = Cli::try_parse_from(["sb3pack"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.pack.source, PathBuf::from("."));
        assert!(cli.pack.dest.is_none());
        assert_eq!(cli.pack.layout, OutputLayout::Mirrored);
        assert_eq!(cli.pack.preset, Preset::ZipResizable);
        assert!(!cli.pack.fail_fast);
        assert_eq!(cli.pack.timeout, 300);
    }

    #[test]
    fn test_pack_subcommand() {
        let cli = Cli::try_parse_from([
            "sb3pack",
            "pack",
            "sb3",
            "dist",
            "--layout",
            "single",
            "--preset",
            "html",
            "--fail-fast",
            "--packager-arg",
            "-c",
        ])
        .unwrap();
        let Some(Commands::Pack(args)) = cli.command else {
            panic!("expected pack subcommand");
        };
        assert_eq!(args.dest, Some(PathBuf::from("dist")));
        assert_eq!(args.layout, OutputLayout::SingleFile);
        assert_eq!(args.preset, Preset::Html);
        assert!(args.fail_fast);
        assert_eq!(args.packager_args, vec!["-c"]);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Cli::try_parse_from(["sb3pack", "--layout", "tree"]).is_err());
        assert!(Cli::try_parse_from(["sb3pack", "--preset", "pdf"]).is_err());
        assert!(Cli::try_parse_from(["sb3pack", "--timeout", "0"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["sb3pack", "-q", "-v"]).is_err());
    }
}
