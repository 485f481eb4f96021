// CLI module - command-line argument parsing and handlers
//
// Running without a subcommand (or with `run`) starts the chat. Flags override
// the loaded configuration for this run only.
//
// Subcommands for configuration management:
// - config --show: Display effective configuration
// - config --path: Show config file path
// - config --reset: Regenerate config file with defaults

use crate::channel::Channel;
use crate::config::{Config, VERSION};
use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// Tabbed chat - routes tabletop chat into WORLD, OOC, GAME and MESSAGES tabs
#[derive(Debug, Parser)]
#[command(name = "tabbed-chat")]
#[command(version = VERSION)]
#[command(about = "Tabbed chat router for virtual tabletop sessions", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the chat (default)
    Run(RunArgs),

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// Per-run overrides
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Replay host signals from a JSONL transcript
    #[arg(long, value_name = "FILE", conflicts_with = "demo")]
    pub transcript: Option<PathBuf>,

    /// Play the scripted demo session
    #[arg(long)]
    pub demo: bool,

    /// User id of the viewer
    #[arg(long, value_name = "ID")]
    pub viewer: Option<String>,

    /// View as game master (sees every whisper)
    #[arg(long)]
    pub gm: bool,

    /// Tab selected at startup: world, ooc, game, messages
    #[arg(long, value_name = "TAB", value_parser = parse_tab)]
    pub tab: Option<Channel>,
}

fn parse_tab(s: &str) -> Result<Channel, String> {
    Channel::parse(s).ok_or_else(|| format!("unknown tab '{}' (world, ooc, game, messages)", s))
}

impl RunArgs {
    /// Apply flags on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.transcript {
            config.transcript = Some(path.clone());
            config.demo_mode = false;
        }
        if self.demo {
            config.demo_mode = true;
        }
        if let Some(viewer) = &self.viewer {
            config.viewer_id = viewer.clone();
        }
        if self.gm {
            config.privileged = true;
        }
        if let Some(tab) = self.tab {
            config.initial_tab = tab;
        }
    }
}

/// Handle CLI commands
///
/// Returns the run flags if the chat should start, `None` if a config
/// command was handled.
pub fn handle_cli() -> Result<Option<RunArgs>> {
    dispatch(Cli::parse())
}

fn dispatch(cli: Cli) -> Result<Option<RunArgs>> {
    match cli.command {
        Some(Commands::Config { show, reset, path }) => {
            if path {
                handle_config_path()?;
            } else if show {
                handle_config_show()?;
            } else if reset {
                handle_config_reset()?;
            } else {
                // No flag provided, show help
                println!("Usage: tabbed-chat config [--show|--reset|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --path    Show config file path");
            }
            Ok(None)
        }
        Some(Commands::Run(args)) => Ok(Some(args)),
        None => Ok(Some(cli.run)),
    }
}

fn config_path() -> Result<PathBuf> {
    Config::config_path().ok_or_else(|| anyhow!("Could not determine config path"))
}

fn handle_config_path() -> Result<()> {
    println!("{}", config_path()?.display());
    Ok(())
}

fn handle_config_show() -> Result<()> {
    let config = Config::load()?;

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());
    println!();

    // Show source info
    let path = config_path()?;
    if path.exists() {
        println!("# Source: {}", path.display());
    } else {
        println!("# Source: defaults (no config file)");
    }
    Ok(())
}

fn handle_config_reset() -> Result<()> {
    let path = config_path()?;

    // Confirm if file exists
    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .context("Failed to read confirmation")?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating directory {}", parent.display()))?;
    }

    std::fs::write(&path, Config::default().to_toml())
        .with_context(|| format!("Error writing config {}", path.display()))?;

    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tabbed-chat").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_bare_invocation_runs() {
        let args = dispatch(parse(&[])).unwrap().unwrap();
        assert!(args.transcript.is_none());
        assert!(!args.demo);
    }

    #[test]
    fn test_run_flags_with_and_without_subcommand() {
        for argv in [
            vec!["--viewer", "u2", "--gm", "--tab", "messages"],
            vec!["run", "--viewer", "u2", "--gm", "--tab", "messages"],
        ] {
            let args = dispatch(parse(&argv)).unwrap().unwrap();
            let mut config = Config::default();
            args.apply(&mut config);

            assert_eq!(config.viewer_id, "u2");
            assert!(config.privileged);
            assert_eq!(config.initial_tab, Channel::Messages);
        }
    }

    #[test]
    fn test_transcript_turns_off_demo() {
        let args = dispatch(parse(&["--transcript", "night.jsonl"])).unwrap().unwrap();
        let mut config = Config {
            demo_mode: true,
            ..Config::default()
        };
        args.apply(&mut config);

        assert!(!config.demo_mode);
        assert_eq!(config.transcript, Some(PathBuf::from("night.jsonl")));
    }

    #[test]
    fn test_conflicting_sources_rejected() {
        let result = Cli::try_parse_from(["tabbed-chat", "--demo", "--transcript", "x.jsonl"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_tab_rejected() {
        let result = Cli::try_parse_from(["tabbed-chat", "--tab", "combat"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_subcommand_parses() {
        let cli = parse(&["config", "--path"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config { path: true, .. })
        ));
    }
}
