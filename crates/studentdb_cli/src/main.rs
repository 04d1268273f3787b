//! `studentdb` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, resolve config and start file logging.
//! - Open the student store and dispatch one command against it.
//! - Exit non-zero when the command fails.

mod commands;
mod config;
mod render;

use clap::{Args, Parser, Subcommand};
use commands::execute;
use config::AppConfig;
use log::info;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use studentdb_core::{
    core_version, init_logging, SqliteStudentRepository, StudentId, StudentService,
    GENDER_OPTIONS, MIN_YEAR,
};

/// Manage student records stored in a local SQLite file.
#[derive(Debug, Parser)]
#[command(name = "studentdb", author, version, long_about = None)]
pub struct Cli {
    /// Database file (defaults to StudentManagement.db next to the binary).
    #[arg(long, global = true, env = "STUDENTDB_DB_PATH")]
    db: Option<PathBuf>,

    /// Directory for rolling log files.
    #[arg(long, global = true, env = "STUDENTDB_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "STUDENTDB_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print machine-readable JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every student ordered by last name, then first name.
    List,
    /// Find students by number, first name, last name or email.
    Search {
        /// Substring to look for; blank lists everyone.
        term: String,
    },
    /// Show every field of one student.
    Show { id: StudentId },
    /// Add a new student.
    Add(AddArgs),
    /// Edit an existing student; omitted fields keep their value.
    Edit(EditArgs),
    /// Delete a student after confirmation.
    Delete {
        id: StudentId,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Check whether a student number is already in use.
    CheckNumber {
        number: String,
        /// Ignore this record (the one being edited).
        #[arg(long)]
        exclude: Option<StudentId>,
    },
    /// Print the core library version.
    Version,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub number: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    /// YYYY-MM-DD; defaults to 18 years before today.
    #[arg(long)]
    pub dob: Option<chrono::NaiveDate>,
    #[arg(long, value_parser = clap::builder::PossibleValuesParser::new(GENDER_OPTIONS))]
    pub gender: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub program: Option<String>,
    #[arg(long, default_value_t = MIN_YEAR)]
    pub year: u32,
    #[arg(long)]
    pub address: Option<String>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: StudentId,
    #[arg(long)]
    pub number: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub dob: Option<chrono::NaiveDate>,
    #[arg(long, value_parser = clap::builder::PossibleValuesParser::new(GENDER_OPTIONS))]
    pub gender: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub program: Option<String>,
    #[arg(long)]
    pub year: Option<u32>,
    #[arg(long)]
    pub address: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if matches!(cli.command, Command::Version) {
        println!("studentdb_core version={}", core_version());
        return Ok(());
    }

    let config = AppConfig::resolve(cli.db, cli.log_dir, cli.log_level);
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: file logging disabled: {err}");
    }
    info!("event=cli_start module=cli status=ok");

    let repo = SqliteStudentRepository::open(&config.db_path).map_err(|err| {
        anyhow::anyhow!(
            "failed to open student database `{}`: {err}",
            config.db_path.display()
        )
    })?;
    let service = StudentService::new(repo);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    execute(cli.command, &service, cli.json, &mut out, &mut input)?;
    out.flush()?;
    Ok(())
}
