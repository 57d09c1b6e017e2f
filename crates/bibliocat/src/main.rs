//! bibliocat CLI - maintain a library catalog database

use bibliocat::cli::{commands, Menu, OutputFormat, OutputWriter};
use bibliocat::config::DATABASE_ENV;
use bibliocat::{Catalog, Config, WorkDeletion, SAMPLE_SCHEMA};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LONG_ABOUT: &str = r#"Maintain a library catalog: authors, works, copies and loans.

Without a command, bibliocat opens an interactive menu:

  1. Import SQL file
  2. Get author's name
  3. Get works published before a given year
  4. Get works of a given type and style
  5. Delete copies bought before a date
  6. Delete works written by an author
  0. Exit

Every menu entry is also available as a one-shot command."#;

const AFTER_LONG_HELP: &str = r#"
EXAMPLES
═══════════════════════════════════════════════════════════════════════════════

  bibliocat --create -D library.db import sql/bibliotheque.sql
  bibliocat -D library.db author 1
  bibliocat -D library.db -f json before 1900
  bibliocat -D library.db filter 1 1 1930 1960
  bibliocat -D library.db purge-copies 2000          # preview only
  bibliocat -D library.db purge-copies 2000 --yes
  bibliocat -D library.db --work-deletion capture purge-author 3

The database may also be given through BIBLIOCAT_DATABASE."#;

#[derive(Parser)]
#[command(name = "bibliocat")]
#[command(version)]
#[command(about = "Maintain a library catalog database", long_about = LONG_ABOUT)]
#[command(after_long_help = AFTER_LONG_HELP)]
struct Cli {
    /// Path to the SQLite catalog (default: ./bibliotheque.db)
    #[arg(short = 'D', long, env = DATABASE_ENV, global = true)]
    database: Option<PathBuf>,

    /// Create the database file if it does not exist
    #[arg(long, global = true)]
    create: bool,

    /// What deleting an author's works removes: literal, capture
    #[arg(long, value_enum, default_value = "literal", global = true)]
    work_deletion: WorkDeletion,

    /// Output format for one-shot commands: table, json, jsonl, csv
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    format: OutputFormat,

    /// Enable verbose/debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (default)
    Menu,

    /// Import a .sql file in a single transaction
    Import {
        /// SQL file to execute
        file: PathBuf,
    },

    /// Look up an author's pen name
    Author {
        /// Author ID
        id: String,
    },

    /// List works first published before a year
    Before {
        /// Year (exclusive)
        year: String,
    },

    /// List works of a type and style published within a year range
    Filter {
        /// Type ID
        type_id: String,
        /// Style ID
        style_id: String,
        /// First year (inclusive)
        from: String,
        /// Last year (inclusive)
        to: String,
    },

    /// Delete copies bought before January 1st of a year, with their loans
    PurgeCopies {
        /// Four-digit year
        year: String,

        /// Actually delete; without it only the affected counts are shown
        #[arg(long)]
        yes: bool,
    },

    /// Delete the works written by an author
    PurgeAuthor {
        /// Author ID
        id: String,
    },

    /// Print the bundled catalog schema and sample data
    Schema,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Menu);
    if let Commands::Schema = command {
        print!("{}", SAMPLE_SCHEMA);
        return Ok(());
    }

    let database = cli.database.unwrap_or_else(Config::default_database);
    let (config, mut catalog) = match connect(database, cli.create, cli.work_deletion) {
        Ok(connected) => connected,
        Err(e) => {
            // Nothing can be done without a connection; report and leave.
            eprintln!("{} {}", "Error:".red(), e);
            return Ok(());
        }
    };

    let mut writer = OutputWriter::new(io::stdout(), cli.format);
    match command {
        Commands::Menu => {
            println!("Connected to the database");
            let stdin = io::stdin();
            Menu::new(stdin.lock(), io::stdout(), config.work_deletion).run(&mut catalog)?;
        }
        Commands::Import { file } => commands::import(&mut catalog, &file, &mut writer)?,
        Commands::Author { id } => commands::author(&catalog, &id, &mut writer)?,
        Commands::Before { year } => commands::before(&catalog, &year, &mut writer)?,
        Commands::Filter {
            type_id,
            style_id,
            from,
            to,
        } => commands::filter(&catalog, &type_id, &style_id, &from, &to, &mut writer)?,
        Commands::PurgeCopies { year, yes } => {
            commands::purge_copies(&mut catalog, &year, yes, &mut writer)?
        }
        Commands::PurgeAuthor { id } => {
            commands::purge_author(&mut catalog, &id, config.work_deletion, &mut writer)?
        }
        // Printed before connecting.
        Commands::Schema => {}
    }

    catalog.close()?;
    Ok(())
}

fn connect(
    database: PathBuf,
    create: bool,
    work_deletion: WorkDeletion,
) -> bibliocat::Result<(Config, Catalog)> {
    let config = Config::new(database, create)?.with_work_deletion(work_deletion);
    let catalog = Catalog::connect(&config)?;
    Ok((config, catalog))
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("bibliocat=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bibliocat=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
