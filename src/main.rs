use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use expense_tracker::cli::{
    handle_backup_command, handle_config_command, handle_export_command, handle_list_command,
    handle_log_command, handle_summary_command, Menu,
};
use expense_tracker::config::{paths::DATA_DIR_ENV, LedgerPaths, Settings};
use expense_tracker::export::ExportFormat;
use expense_tracker::models::ExpenseId;
use expense_tracker::services::ExpenseService;
use expense_tracker::store::SortKey;

#[derive(Parser)]
#[command(
    name = "expenses",
    version,
    about = "Terminal-based personal expense tracker",
    long_about = "Records expenses in a plain-text ledger and offers search, \
                  summaries, undo/redo, CSV export and backups from an \
                  interactive menu or one-shot commands."
)]
struct Cli {
    /// Directory holding settings, the audit log and the default data file
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Data file to use instead of <data-dir>/expenses.txt
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive menu (default)
    Menu,

    /// List expenses
    #[command(alias = "ls")]
    List {
        /// Sort order: id, date, amount or category
        #[arg(short, long, default_value = "id")]
        sort: SortKey,
    },

    /// Show summary statistics
    Summary,

    /// Export all expenses
    Export {
        /// Output path; the format's extension is added when missing
        path: PathBuf,

        #[arg(short = 'F', long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },

    /// Back up the data file
    Backup {
        /// List existing backups instead of creating one
        #[arg(short, long)]
        list: bool,
    },

    /// Show the most recent audit log entries
    Log {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,

        /// Only show entries for this expense id
        #[arg(short, long)]
        expense: Option<ExpenseId>,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> ExitCode {
    expense_tracker::init_tracing();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Fatal error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut paths = match cli.data_dir {
        Some(dir) => LedgerPaths::with_base_dir(dir),
        None => LedgerPaths::new()?,
    };
    if let Some(file) = cli.file {
        paths = paths.with_data_file(file);
    }
    let settings = Settings::load_or_create(&paths)?;

    if let Some(Commands::Config) = cli.command {
        handle_config_command(&paths, &settings)?;
        return Ok(());
    }

    let mut service = ExpenseService::open(&paths, settings)
        .with_context(|| format!("could not open ledger in {}", paths.base_dir().display()))?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let stdin = io::stdin();
            Menu::new(&mut service, stdin.lock(), io::stdout()).run()?;
        }
        Commands::List { sort } => handle_list_command(&service, sort)?,
        Commands::Summary => handle_summary_command(&service)?,
        Commands::Export { path, format } => handle_export_command(&service, &path, format)?,
        Commands::Backup { list } => handle_backup_command(&service, list)?,
        Commands::Log { count, expense } => handle_log_command(&service, count, expense)?,
        Commands::Config => handle_config_command(&paths, service.settings())?,
    }

    Ok(())
}
