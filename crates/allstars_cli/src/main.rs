//! Command-line front end for the All Stars card store.
//!
//! # Responsibility
//! - Resolve the store location and open (migrating) the store.
//! - Dispatch one card or roster command and print the result.
//!
//! # Invariants
//! - A migration failure at startup is fatal.
//! - Card operation failures are reported and exit non-zero, never panic.

use allstars_core::{
    default_log_level, init_logging, Card, CardService, PersistenceResult, Store, StoreConfig,
};
use clap::{Parser, Subcommand};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "allstars", version, about = "Manage All Stars player cards")]
struct Cli {
    /// Support directory holding `allstars.sqlite` (defaults to the environment).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error. Only meaningful with `--log-dir`.
    #[arg(long, global = true, requires = "log_dir")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the roster grouped by section.
    Team,
    /// List every card.
    List,
    /// Create a random card for a team member.
    Create { team_member_id: i64 },
    /// Re-roll every rating of a card.
    Update { card_id: i64 },
    /// Delete a card.
    Delete { card_id: i64 },
    /// Show applied migration steps.
    Migrations,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let config = match &cli.data_dir {
        Some(dir) => StoreConfig::new(dir),
        None => StoreConfig::from_env(),
    };
    let store = match Store::open(config.db_path()) {
        Ok(store) => store,
        Err(err) => {
            error!("event=cli_start module=cli status=error error={err}");
            eprintln!("unable to open card store at {}: {err}", config.db_path().display());
            return ExitCode::FAILURE;
        }
    };

    let outcome = run(&store, cli.command);
    if let Err(err) = store.close() {
        eprintln!("warning: store did not close cleanly: {err}");
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(store: &Store, command: Command) -> PersistenceResult<()> {
    let mut service = CardService::new(store);
    match command {
        Command::Team => {
            for section in service.team_sections()? {
                println!("[{}]", section.title);
                for member in section.members {
                    println!("  {:>5}  {}", member.id, member.name);
                }
            }
        }
        Command::List => {
            for card in service.list_cards()? {
                print_card(&card);
            }
        }
        Command::Create { team_member_id } => {
            let card_id = service.create_card(team_member_id)?;
            match service.get_card(card_id)? {
                Some(card) => print_card(&card),
                None => println!("created card #{card_id}"),
            }
        }
        Command::Update { card_id } => {
            service.update_card(card_id)?;
            if let Some(card) = service.get_card(card_id)? {
                print_card(&card);
            }
        }
        Command::Delete { card_id } => {
            service.delete_card(card_id)?;
            println!("deleted card #{card_id}");
        }
        Command::Migrations => {
            for name in store.applied_migrations()? {
                println!("{name}");
            }
        }
    }
    Ok(())
}

fn print_card(card: &Card) {
    println!(
        "#{:<4} {:<3} {} ({})",
        card.id(),
        card.position().abbreviation(),
        card.team_member.name,
        card.identity.category.display_name()
    );
    for attribute in &card.attributes {
        println!("       {:<16}{:>3}", attribute.name, attribute.value);
    }
}
