use std::{env, io, process};

use clap::Parser;
use cli::{Cli, Commands, ConfigCommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::{commands::session::TICK_INTERVAL, config::Config, db::SessionStore};

mod cli;
mod commands;
mod config;
mod db;
mod error;
mod models;
mod utils;
mod views;

fn main() {
    init_logging();

    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();

    let command = match cli.command {
        Some(Commands::Config { command }) => {
            handle_config(config, command);
            return;
        }
        Some(command) => command,
        None => Commands::Menu,
    };

    let mut store = SessionStore::new(&config);
    if let Err(err) = store.open() {
        error!(error = %err, path = %store.path().display(), "Failed to initialize the database");
        process::exit(1);
    }
    info!(path = %store.path().display(), "Database ready");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let result = match command {
        Commands::Add { start, end } => {
            commands::entry::add_session(&store, &mut input, &mut output, start, end).map(|_| ())
        }
        Commands::Start => {
            commands::session::run_timed_session(&store, &mut input, &mut output, TICK_INTERVAL)
                .map(|_| ())
        }
        Commands::List => views::display_sessions(&mut output, &store.get_all()).map_err(Into::into),
        Commands::Menu => commands::menu::run_menu(&store, &mut input, &mut output, TICK_INTERVAL),
        Commands::Config { .. } => Ok(()),
    };

    store.close();

    if let Err(err) = result {
        error!(error = %err, "Command failed");
        process::exit(1);
    }
}

fn handle_config(config: Config, command: ConfigCommand) {
    let updated = match command {
        ConfigCommand::Show => {
            println!("database_path = {}", config.database_path.display());
            return;
        }
        ConfigCommand::Set { database_path } => Config {
            database_path: database_path.unwrap_or(config.database_path),
        },
        ConfigCommand::Reset => Config::default(),
    };

    match updated.save() {
        Ok(path) => println!("Saved config to {}", path.display()),
        Err(err) => {
            error!(error = %err, "Failed to save config");
            process::exit(1);
        }
    }
}

fn init_logging() {
    let debug_enabled = env::var("CODING_TRACKER_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
