use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils;

#[derive(Parser)]
#[command(
    name = "coding-tracker",
    version = "1.0",
    about = "Track time spent coding"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

fn parse_timestamp(s: &str) -> Result<String, String> {
    utils::parse_timestamp(s)
        .map(|_| s.to_string())
        .map_err(|_| format!("'{s}' does not match yyyy-MM-dd HH:mm:ss"))
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set config values
    Set {
        /// Path to the database
        #[arg(long)]
        database_path: Option<PathBuf>,
    },
    /// Show the current config
    Show,
    /// Reset the config to the default
    Reset,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Add a finished session; missing times are prompted for")]
    Add {
        #[arg(short, long, value_parser = parse_timestamp)]
        start: Option<String>,
        #[arg(short, long, value_parser = parse_timestamp)]
        end: Option<String>,
    },
    #[command(alias = "timed", about = "Time a session live (alias: timed)")]
    Start,
    #[command(alias = "ls", about = "List all sessions (alias: ls)")]
    List,
    #[command(about = "Open the interactive menu (default)")]
    Menu,
    Config {
        #[command(subcommand, help = "View config options")]
        command: ConfigCommand,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["coding-tracker"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn add_validates_timestamps() {
        let cli = Cli::try_parse_from([
            "coding-tracker",
            "add",
            "--start",
            "2024-01-01 10:00:00",
            "--end",
            "2024-01-01 11:00:00",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Add { start: Some(_), end: Some(_) })));

        assert!(Cli::try_parse_from(["coding-tracker", "add", "--start", "10am"]).is_err());
    }

    #[test]
    fn timed_is_an_alias_for_start() {
        let cli = Cli::try_parse_from(["coding-tracker", "timed"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Start)));
    }
}
