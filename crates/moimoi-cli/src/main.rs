use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use moimoi_core::ItemKind;

mod commands;

#[derive(Parser)]
#[command(name = "moimoi-cli", version, about = "Moimoi CLI")]
struct Cli {
    /// Act as if today were this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::item::ItemAction,
    },
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::item::ItemAction,
    },
    /// Fire points and happiness
    Progress {
        #[command(subcommand)]
        action: commands::progress::ProgressAction,
    },
    /// Show the streak and unlocked achievements
    Streak {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Items created and completed per day
    Calendar {
        #[command(flatten)]
        args: commands::calendar::CalendarArgs,
    },
    /// Complete onboarding with habit templates
    Onboard {
        /// Template IDs (see `templates`)
        templates: Vec<String>,
    },
    /// List built-in habit templates
    Templates,
    /// Foreground companion (happiness decay)
    Companion {
        #[command(subcommand)]
        action: commands::companion::CompanionAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Remove all Moimoi data
    Clear {
        /// Skip the confirmation check
        #[arg(long)]
        yes: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let today = cli.date.unwrap_or_else(commands::today);
    let result = match cli.command {
        Commands::Task { action } => commands::item::run(ItemKind::Task, action, today),
        Commands::Habit { action } => commands::item::run(ItemKind::Habit, action, today),
        Commands::Progress { action } => commands::progress::run(action, today),
        Commands::Streak { json } => commands::progress::streak(json, today),
        Commands::Calendar { args } => commands::calendar::run(args, today),
        Commands::Onboard { templates } => commands::onboard::run(&templates),
        Commands::Templates => commands::onboard::templates(),
        Commands::Companion { action } => commands::companion::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Clear { yes } => commands::data::clear(yes),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
