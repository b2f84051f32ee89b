use clap::{Parser, Subcommand};
use rotin_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{CmdResult, Context};

#[derive(Parser)]
#[command(name = "rotin", version, about = "Rotin daily routine tracker")]
struct Cli {
    /// Work against the local cache only, without the remote backend
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Schedule block management
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Per-day subject notes
    Notes {
        #[command(subcommand)]
        action: commands::notes::NotesAction,
    },
    /// Streak and monthly statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Overview of one day
    Day {
        /// Day (YYYY-MM-DD, default: today)
        #[arg(long)]
        day: Option<String>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Local cache maintenance
    Cache {
        #[command(subcommand)]
        action: commands::cache::CacheAction,
    },
    /// Sign-in session
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load the config for data commands, falling back to the defaults when the
/// file cannot be read.
fn load_config() -> Config {
    match Config::load() {
        Ok(config) => {
            init_tracing(&config.log_level);
            config
        }
        Err(e) => {
            let config = Config::default();
            init_tracing(&config.log_level);
            tracing::warn!(error = %e, "config unreadable, using defaults");
            config
        }
    }
}

fn run(cli: Cli) -> CmdResult {
    let command = match cli.command {
        Commands::Config { action } => {
            init_tracing(&Config::default().log_level);
            return commands::config::run(action);
        }
        Commands::Cache { action } => {
            init_tracing(&Config::default().log_level);
            return commands::cache::run(action);
        }
        command => command,
    };

    let config = load_config();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let ctx = Context::open(&config, cli.offline)?;
    let result = runtime.block_on(async {
        match command {
            Commands::Task { action } => commands::task::run(&ctx, action).await,
            Commands::Schedule { action } => commands::schedule::run(&ctx, action).await,
            Commands::Notes { action } => commands::notes::run(&ctx, action).await,
            Commands::Stats { action } => commands::stats::run(&ctx, action).await,
            Commands::Day { day } => commands::day::run(&ctx, day).await,
            Commands::Auth { action } => commands::auth::run(&ctx, action).await,
            Commands::Config { .. } | Commands::Cache { .. } => Ok(()),
        }
    });
    ctx.print_notices();
    result
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
