use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pennywise::cli::{
    handle_allocate_command, handle_budget_command, handle_category_command,
    handle_expense_command, handle_export, handle_goal_command, handle_import,
    handle_recurring_command, handle_settings_command, handle_summary,
};
use pennywise::config::{paths::DATA_DIR_ENV, AppConfig, PennywisePaths};
use pennywise::display::format_process_report;
use pennywise::services::RecurringService;
use pennywise::storage::{init::initialize, Storage};

/// Environment variable holding a tracing filter, e.g. `pennywise=debug`
const LOG_ENV: &str = "PENNYWISE_LOG";

#[derive(Parser)]
#[command(
    name = "pennywise",
    version,
    about = "Monthly budgeting from the command line",
    long_about = "Pennywise keeps one budget per month: income, category allocations, \
                  expenses, rollover of what the previous month left, recurring \
                  expenses and savings goals."
)]
struct Cli {
    /// Directory holding the store, config and exports
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and seed default categories
    Init,

    /// Show current configuration and paths
    Config,

    /// Monthly budget commands
    #[command(subcommand)]
    Budget(pennywise::cli::BudgetCommands),

    /// Category allocation commands
    #[command(subcommand, alias = "alloc")]
    Allocate(pennywise::cli::AllocateCommands),

    /// Expense commands
    #[command(subcommand, alias = "exp")]
    Expense(pennywise::cli::ExpenseCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(pennywise::cli::CategoryCommands),

    /// Recurring expense commands
    #[command(subcommand)]
    Recurring(pennywise::cli::RecurringCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Goal(pennywise::cli::GoalCommands),

    /// Show a month's summary
    Summary {
        /// Budget month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Currency and theme settings
    #[command(subcommand)]
    Settings(pennywise::cli::SettingsCommands),

    /// Export the whole store to a JSON snapshot
    Export {
        /// Output file (defaults to a timestamped file in the backup directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Replace the whole store with a JSON snapshot
    Import {
        /// Snapshot file to read
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => PennywisePaths::with_base_dir(dir),
        None => PennywisePaths::new()?,
    };
    let config = AppConfig::load_or_create(&paths)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let storage = Storage::open(&paths)?;
    let seeded = initialize(&storage, config.default_currency)?;
    debug!(base_dir = %paths.base_dir().display(), seeded, "store ready");

    if config.process_recurring_on_start && !matches!(cli.command, Some(Commands::Import { .. })) {
        let report = RecurringService::new(&storage).process_due()?;
        if !report.posted.is_empty() || !report.failed.is_empty() {
            print!("{}", format_process_report(&report));
        }
    }

    match cli.command {
        Some(Commands::Init) => {
            config.save(&paths)?;
            println!("Initialized Pennywise at: {}", paths.base_dir().display());
            if seeded {
                println!("Default categories have been created.");
            }
            println!();
            println!("Run 'pennywise budget create <income>' to start this month.");
        }
        Some(Commands::Config) => {
            println!("Pennywise Configuration");
            println!("=======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Store file:       {}", paths.store_file().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Config file:      {}", paths.config_file().display());
            println!();
            println!("Config:");
            println!("  Default currency:   {}", config.default_currency);
            println!("  Log level:          {}", config.log_level);
            println!("  Pretty export:      {}", config.pretty_export);
            println!("  Recurring on start: {}", config.process_recurring_on_start);
        }
        Some(Commands::Budget(cmd)) => handle_budget_command(&storage, cmd)?,
        Some(Commands::Allocate(cmd)) => handle_allocate_command(&storage, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, cmd)?,
        Some(Commands::Category(cmd)) => handle_category_command(&storage, cmd)?,
        Some(Commands::Recurring(cmd)) => handle_recurring_command(&storage, cmd)?,
        Some(Commands::Goal(cmd)) => handle_goal_command(&storage, cmd)?,
        Some(Commands::Summary { month }) => handle_summary(&storage, month.as_deref())?,
        Some(Commands::Settings(cmd)) => handle_settings_command(&storage, cmd)?,
        Some(Commands::Export { output, compact }) => {
            handle_export(&storage, &paths, &config, output, compact)?
        }
        Some(Commands::Import { file }) => handle_import(&storage, &config, &file)?,
        None => {
            println!("Pennywise - monthly budgeting from the command line");
            println!();
            println!("Run 'pennywise --help' for usage information.");
        }
    }

    Ok(())
}
