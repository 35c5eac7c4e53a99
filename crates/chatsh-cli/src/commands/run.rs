use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tracing::info;

use chatsh_core::SessionId;
use chatsh_core::engine::{CLOSING, STARTING};
use chatsh_infrastructure::ConfigService;
use chatsh_infrastructure::dto::AppConfig;

use super::utils::build_engine;
use crate::console::{self, ConsoleHelper};

/// Runs the console transport until `restart`, Ctrl-D, or a read error.
pub async fn run(service: &ConfigService, app: &AppConfig, session: &str) -> Result<()> {
    let session: SessionId = session.parse()?;
    let engine = build_engine(service, app)?;
    let image_dir = app
        .capture
        .work_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir);

    let restored = engine.restore().await;
    for id in &restored {
        console::notice(id, STARTING);
    }
    info!(session = %session, restored = restored.len(), "Console transport started");

    let mut rl: Editor<ConsoleHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ConsoleHelper::new()));

    println!("{}", "=== chatsh console ===".bright_magenta().bold());
    println!(
        "{}",
        format!(
            "Speaking as session '{}'. Prefix a line with '{}' to send it as an edit.",
            session,
            console::EDIT_PREFIX.trim_end()
        )
        .bright_black()
    );
    println!();

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let outcome = engine.handle(&console::inbound(&session, trimmed)).await;
                console::render(&outcome.reply, &image_dir);
                if outcome.should_stop() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Send 'restart' or press CTRL-D to exit.".yellow());
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    console::notice(&session, CLOSING);
    info!(session = %session, "Console transport stopped");
    Ok(())
}
