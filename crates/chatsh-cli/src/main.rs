use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod console;
mod logging;

/// chatsh - remote command interpreter driven over a chat transport
#[derive(Parser, Debug)]
#[command(name = "chatsh", version)]
#[command(about = "Authenticate, expand aliases, and dispatch chat lines to local actions", long_about = None)]
pub struct Cli {
    /// Configuration directory (default: $CHATSH_CONFIG_DIR, then ~/.config/chatsh)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log at info level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log at debug level
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the console transport
    Run {
        /// Session identifier the console speaks as
        #[arg(long, default_value = "console")]
        session: String,
    },
    /// Print the built-in and user alias tables
    Aliases,
    /// Inspect or clear authorized sessions
    Sessions {
        #[command(subcommand)]
        action: SessionsAction,
    },
    /// Write starter configuration files that are missing
    Init,
}

#[derive(Subcommand, Debug)]
enum SessionsAction {
    /// List authorized sessions
    List,
    /// Revoke every authorized session
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = commands::utils::resolve_paths(cli.config_dir.clone())?;
    let service = chatsh_infrastructure::ConfigService::new(paths);
    let app = service.load_app_config()?;
    let _log_guard = logging::init(&cli, &app.logging, &service.paths().log_dir())?;

    match cli.command {
        Commands::Run { session } => commands::run::run(&service, &app, &session).await?,
        Commands::Aliases => commands::aliases::print(&service),
        Commands::Sessions { action } => match action {
            SessionsAction::List => commands::sessions::list(&service),
            SessionsAction::Clear => commands::sessions::clear(&service),
        },
        Commands::Init => commands::init::init(&service)?,
    }

    Ok(())
}
