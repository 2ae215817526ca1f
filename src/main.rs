use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use seatplan::config::{Config, ConfigError, StorageKind};
use seatplan::db;
use seatplan::error::{ErrorCode, Notice, NoticeLevel};
use seatplan::model::{Location, Shape, TableId, TableTag};
use seatplan::planner::Planner;
use seatplan::snapshot::SavedVersion;
use seatplan::storage::{FileStore, MemoryStore, PersistenceGateway, PgStore};
use seatplan::store::{ResizeStep, SeatingError, TableEdit, TableSetup};
use seatplan::summary::{PrintMode, Summary};
use seatplan::versions::{VersionError, VersionStore, group_by_event};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Version(#[from] VersionError),
    #[error(transparent)]
    Seating(#[from] SeatingError),
    #[error("database init failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("seat numbers start at 1")]
    SeatNumber,
    #[error("guest not found: {0}")]
    UnknownGuest(String),
}

impl ErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Version(e) => e.error_code(),
            Self::Seating(e) => e.error_code(),
            Self::Database(_) => "E_DATABASE",
            Self::Io(_) => "E_IO",
            Self::SeatNumber => "E_SEAT_NUMBER",
            Self::UnknownGuest(_) => "E_GUEST_NOT_FOUND",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Version(e) => e.retryable(),
            Self::Database(_) => true,
            _ => false,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "seatplan", about = "Seating-chart planner: saved versions, placement, and print summaries")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a new event from a guest list and save it as a version.
    New {
        event: String,
        #[arg(long, default_value = "Draft")]
        version: String,
        #[arg(long, default_value = "-", help = "Guest list file path, or - for stdin")]
        guests: String,
        #[arg(long, default_value_t = 5)]
        tables: usize,
        #[arg(long, default_value = "rect")]
        shape: Shape,
        #[arg(long, default_value_t = 8)]
        size: usize,
        #[arg(long, default_value_t = 1)]
        ends: usize,
    },
    /// List saved versions grouped by event, newest first.
    List,
    /// Print a saved version.
    Show {
        key: String,
        #[arg(long, default_value = "combined")]
        mode: PrintMode,
    },
    /// Seat a guest (seat numbers start at 1).
    Place { key: String, guest: String, table: TableId, seat: usize },
    /// Move whoever sits in a seat back to the unseated list.
    Unseat { key: String, table: TableId, seat: usize },
    /// Grow or shrink a table by one seat.
    Resize {
        key: String,
        table: TableId,
        #[arg(value_enum)]
        step: StepArg,
    },
    /// Change a table's name, shape, size, ends or tag.
    EditTable {
        key: String,
        table: TableId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        shape: Option<Shape>,
        #[arg(long)]
        size: Option<usize>,
        #[arg(long)]
        ends: Option<usize>,
        #[arg(long)]
        tag: Option<TableTag>,
        #[arg(long, default_value_t = false, conflicts_with = "tag")]
        clear_tag: bool,
    },
    AddTable { key: String },
    DeleteTable { key: String, table: TableId },
    SwapTables { key: String, a: TableId, b: TableId },
    /// Append guests to the unseated list.
    AddGuests {
        key: String,
        #[arg(long, default_value = "-", help = "Guest list file path, or - for stdin")]
        guests: String,
    },
    /// Fill empty seats with unseated guests in random order.
    Randomize {
        key: String,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Unseat everyone.
    Clear { key: String },
    Duplicate { key: String },
    Delete { key: String },
    /// Write the export JSON for a saved version.
    Export {
        key: String,
        #[arg(long, help = "Output path; defaults to <event>-export.json")]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StepArg {
    Grow,
    Shrink,
}

impl From<StepArg> for ResizeStep {
    fn from(step: StepArg) -> Self {
        match step {
            StepArg::Grow => Self::Grow,
            StepArg::Shrink => Self::Shrink,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!(error = %e, "ignoring unreadable .env file");
        }
    }

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let gateway = build_gateway(&config).await?;
    let versions = VersionStore::new(gateway, config.key_prefix.clone());

    match run(&config, &versions, cli.command).await {
        Ok(notice) => {
            if let Some(notice) = notice {
                print_notice(&notice);
            }
            Ok(())
        }
        Err(e) => {
            print_notice(&Notice::error_from(&e));
            std::process::exit(if e.retryable() { 75 } else { 1 });
        }
    }
}

async fn build_gateway(config: &Config) -> Result<Arc<dyn PersistenceGateway>, CliError> {
    match &config.storage {
        StorageKind::File { dir } => Ok(Arc::new(FileStore::new(dir.clone()))),
        StorageKind::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageKind::Postgres { database_url, max_connections } => {
            let pool = db::init_pool(database_url, *max_connections).await?;
            info!(max_connections, "postgres storage ready");
            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}

fn print_notice(notice: &Notice) {
    match (notice.level, notice.code) {
        (NoticeLevel::Info, _) => println!("{}", notice.message),
        (NoticeLevel::Error, Some(code)) => eprintln!("error [{code}]: {}", notice.message),
        (NoticeLevel::Error, None) => eprintln!("error: {}", notice.message),
    }
}

async fn read_guest_text(source: &str) -> Result<String, CliError> {
    if source == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(tokio::fs::read_to_string(source).await?)
}

fn seat_index(seat: usize) -> Result<usize, CliError> {
    seat.checked_sub(1).ok_or(CliError::SeatNumber)
}

/// Load a saved version into a planner, keeping its version name for the write-back.
async fn open(versions: &VersionStore, config: &Config, key: &str) -> Result<(Planner, String), CliError> {
    let saved: SavedVersion = versions.load(key).await?;
    let version_name = saved.version_name.clone();
    let event_name = saved.event_name.clone();
    let planner = Planner::open(&event_name, saved.into_state(), config.history_limit)?;
    Ok((planner, version_name))
}

async fn save_back(versions: &VersionStore, planner: &Planner, version_name: &str) -> Result<String, CliError> {
    Ok(versions.save(planner.event_name(), version_name, planner.state()).await?)
}

#[allow(clippy::too_many_lines)]
async fn run(config: &Config, versions: &VersionStore, command: Command) -> Result<Option<Notice>, CliError> {
    match command {
        Command::New { event, version, guests, tables, shape, size, ends } => {
            let text = read_guest_text(&guests).await?;
            let setup = TableSetup::Uniform { count: tables, shape, size, ends };
            let planner = Planner::begin(&event, &text, &setup, config.history_limit)?;
            let key = save_back(versions, &planner, &version).await?;
            let stats = planner.stats();
            Ok(Some(Notice::info(format!(
                "saved {key}: {} guests, {} tables, {} seats",
                stats.guests,
                planner.state().tables.len(),
                stats.seats
            ))))
        }
        Command::List => {
            let summaries = versions.list().await?;
            for group in group_by_event(&summaries) {
                println!("{}", group.event_name);
                for v in &group.versions {
                    println!("  {:<24} {:>3}/{:<3} seated  {}  {}", v.version_name, v.seated, v.guests, v.saved_at, v.key);
                }
            }
            Ok(None)
        }
        Command::Show { key, mode } => {
            let (planner, _) = open(versions, config, &key).await?;
            print!("{}", Summary::new(planner.event_name(), planner.state(), mode));
            Ok(None)
        }
        Command::Place { key, guest, table, seat } => {
            let (mut planner, version) = open(versions, config, &key).await?;
            let from: Location = planner.store().locate(&guest).ok_or_else(|| CliError::UnknownGuest(guest.clone()))?;
            let displaced = planner.place_guest(&guest, from, table, seat_index(seat)?)?;
            save_back(versions, &planner, &version).await?;
            let message = match displaced {
                Some(other) => format!("seated {guest} at table {table} seat {seat}; {other} moved"),
                None => format!("seated {guest} at table {table} seat {seat}"),
            };
            Ok(Some(Notice::info(message)))
        }
        Command::Unseat { key, table, seat } => {
            let (mut planner, version) = open(versions, config, &key).await?;
            let removed = planner.unseat(table, seat_index(seat)?)?;
            save_back(versions, &planner, &version).await?;
            Ok(Some(Notice::info(match removed {
                Some(name) => format!("{name} unseated"),
                None => "seat was already empty".to_owned(),
            })))
        }
        Command::Resize { key, table, step } => {
            let (mut planner, version) = open(versions, config, &key).await?;
            let outcome = planner.resize_table(table, step.into())?;
            if !outcome.applied {
                return Ok(Some(Notice::info(format!("table {table} size unchanged"))));
            }
            save_back(versions, &planner, &version).await?;
            Ok(Some(Notice::info(bumped_message(&format!("table {table} resized"), &outcome.bumped))))
        }
        Command::EditTable { key, table, name, shape, size, ends, tag, clear_tag } => {
            let (mut planner, version) = open(versions, config, &key).await?;
            let current = planner.store().table(table).ok_or(SeatingError::TableNotFound(table))?;
            let edit = TableEdit {
                name: name.unwrap_or_else(|| current.name.clone()),
                shape: shape.unwrap_or(current.shape),
                size: size.unwrap_or(current.size),
                ends: ends.unwrap_or(current.ends),
                tag: if clear_tag { None } else { tag.or(current.tag) },
            };
            let bumped = planner.edit_table(table, edit)?;
            save_back(versions, &planner, &version).await?;
            Ok(Some(Notice::info(bumped_message(&format!("table {table} updated"), &bumped))))
        }
        Command::AddTable { key } => {
            let (mut planner, version) = open(versions, config, &key).await?;
            let id = planner.add_table();
            save_back(versions, &planner, &version).await?;
            Ok(Some(Notice::info(format!("added table {id}"))))
        }
        Command::DeleteTable { key, table } => {
            let (mut planner, version) = open(versions, config, &key).await?;
            planner.delete_table(table)?;
            save_back(versions, &planner, &version).await?;
            Ok(Some(Notice::info(format!("deleted table {table}"))))
        }
        Command::SwapTables { key, a, b } => {
            let (mut planner, version) = open(versions, config, &key).await?;
            if !planner.swap_tables(a, b) {
                return Ok(Some(Notice::info("nothing to swap")));
            }
            save_back(versions, &planner, &version).await?;
            Ok(Some(Notice::info(format!("swapped tables {a} and {b}"))))
        }
        Command::AddGuests { key, guests } => {
            let text = read_guest_text(&guests).await?;
            let (mut planner, version) = open(versions, config, &key).await?;
            let added = planner.add_guests(&text);
            save_back(versions, &planner, &version).await?;
            Ok(Some(Notice::info(format!("added {} guests", added.len()))))
        }
        Command::Randomize { key, seed } => {
            let (mut planner, version) = open(versions, config, &key).await?;
            let placed = match seed {
                Some(seed) => planner.randomize(&mut StdRng::seed_from_u64(seed)),
                None => planner.randomize(&mut rand::rng()),
            };
            save_back(versions, &planner, &version).await?;
            Ok(Some(Notice::info(format!("seated {placed} guests"))))
        }
        Command::Clear { key } => {
            let (mut planner, version) = open(versions, config, &key).await?;
            let cleared = planner.clear_all();
            save_back(versions, &planner, &version).await?;
            Ok(Some(Notice::info(format!("unseated {cleared} guests"))))
        }
        Command::Duplicate { key } => {
            let copy = versions.duplicate(&key).await?;
            Ok(Some(Notice::info(format!("duplicated to {copy}"))))
        }
        Command::Delete { key } => {
            let deleted = versions.delete(&key).await?;
            Ok(Some(Notice::info(if deleted { format!("deleted {key}") } else { format!("{key} not found") })))
        }
        Command::Export { key, out } => {
            let (planner, _) = open(versions, config, &key).await?;
            let (file_name, json) = VersionStore::export(planner.event_name(), planner.state())?;
            let path = out.unwrap_or_else(|| PathBuf::from(file_name));
            tokio::fs::write(&path, json).await?;
            Ok(Some(Notice::info(format!("exported to {}", path.display()))))
        }
    }
}

fn bumped_message(action: &str, bumped: &[String]) -> String {
    if bumped.is_empty() {
        action.to_owned()
    } else {
        format!("{action}; moved to unseated: {}", bumped.join(", "))
    }
}
