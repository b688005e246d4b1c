//! Binary entrypoint for the quickswitch native-messaging host.
use std::{
    path::{Path, PathBuf},
    process::{self, ExitCode},
    sync::Arc,
};

use clap::{Parser, Subcommand};
use quickswitch::HostOptions;
use quickswitch_recency::JsonFileStore;
use ron::ser::{PrettyConfig, to_string_pretty};
use tokio::io;
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(
    name = "quickswitch",
    about = "Native-messaging host for the quickswitch browser extension",
    version,
    args_conflicts_with_subcommands = true
)]
/// Command-line interface for the `quickswitch` binary.
struct Cli {
    /// Optional subcommand.
    #[command(subcommand)]
    command: Option<Command>,

    /// Optional path to the config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Where to keep the recency snapshot (overrides the config file)
    #[arg(long, value_name = "PATH")]
    state: Option<PathBuf>,

    /// Picker command line, e.g. "rofi -dmenu -i" (overrides the config file)
    #[arg(long, value_name = "CMD")]
    picker: Option<String>,

    /// Logging controls
    #[command(flatten)]
    log: logging::LogArgs,

    /// Launch arguments passed by the browser (extension origin, or the
    /// manifest path and extension id).
    #[arg(value_name = "ORIGIN")]
    origin: Vec<String>,

    /// Parent window handle some browsers pass on Windows.
    #[arg(long, hide = true)]
    parent_window: Option<String>,
}

#[derive(Subcommand, Debug)]
/// Top-level CLI subcommands.
enum Command {
    /// Load and validate the configuration then exit.
    Check {
        /// Path to configuration file to check (defaults to ~/.quickswitch/config.ron)
        path: Option<PathBuf>,

        /// Dump the effective configuration as RON to stdout
        #[arg(long)]
        dump: bool,
    },
}

/// Split a picker command line into the program and its arguments.
fn split_command(line: &str) -> Option<(String, Vec<String>)> {
    let mut words = line.split_whitespace().map(str::to_string);
    let command = words.next()?;
    Some((command, words.collect()))
}

fn check(path: Option<&Path>, dump: bool) -> ExitCode {
    let cfg = match config::load(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e.pretty());
            return ExitCode::FAILURE;
        }
    };
    if !dump {
        println!("OK");
        return ExitCode::SUCCESS;
    }
    match to_string_pretty(&cfg, PrettyConfig::default()) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {e}");
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.log);

    if let Some(Command::Check { path, dump }) = &cli.command {
        let explicit = path.as_deref().or(cli.config.as_deref());
        return check(explicit, *dump);
    }

    let mut cfg = match config::load(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e.pretty());
            process::exit(1);
        }
    };
    if let Some((command, args)) = cli.picker.as_deref().and_then(split_command) {
        cfg.picker = config::Picker { command, args };
    }
    let state_path = cli.state.clone().unwrap_or_else(|| cfg.state_path());
    debug!(origin = ?cli.origin, state = %state_path.display(), "starting host");
    info!(picker = %cfg.picker.command, "quickswitch host running");

    let options = HostOptions {
        config: cfg,
        store: Arc::new(JsonFileStore::new(state_path)),
        picker: None,
    };
    match quickswitch::run(io::stdin(), io::stdout(), options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("host exited with error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picker_command_line_is_split() {
        assert_eq!(
            split_command("rofi  -dmenu -i"),
            Some(("rofi".to_string(), vec!["-dmenu".to_string(), "-i".to_string()]))
        );
        assert_eq!(split_command("   "), None);
    }

    #[test]
    fn browser_launch_arguments_are_accepted() {
        let cli = Cli::parse_from(["quickswitch", "chrome-extension://abc/"]);
        assert_eq!(cli.origin, ["chrome-extension://abc/"]);
        assert!(cli.command.is_none());

        let cli = Cli::parse_from(["quickswitch", "--parent-window=0", "chrome-extension://abc/"]);
        assert_eq!(cli.parent_window.as_deref(), Some("0"));

        let cli = Cli::parse_from(["quickswitch", "/lib/qs.json", "qs@example.org"]);
        assert_eq!(cli.origin.len(), 2);
    }

    #[test]
    fn check_subcommand_parses() {
        let cli = Cli::parse_from(["quickswitch", "check", "--dump", "/tmp/c.ron"]);
        match cli.command {
            Some(Command::Check { path, dump }) => {
                assert!(dump);
                assert_eq!(path, Some(PathBuf::from("/tmp/c.ron")));
            }
            None => panic!("expected check"),
        }
    }
}
