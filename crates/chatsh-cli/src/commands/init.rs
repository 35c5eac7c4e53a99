use anyhow::{Context, Result};
use colored::Colorize;

use chatsh_infrastructure::ConfigService;

pub fn init(service: &ConfigService) -> Result<()> {
    let written = service
        .init()
        .context("Failed to write starter configuration")?;

    let root = service.paths().root().display().to_string();
    if written.is_empty() {
        println!("{}", format!("Nothing to do; {} is already set up.", root).bright_black());
        return Ok(());
    }

    for path in &written {
        println!("  {} {}", "created".green(), path.display());
    }
    println!(
        "\n{}",
        format!(
            "Set the login password in {} (or CHATSH_PASSWORD) before running.",
            service.paths().secret_file().display()
        )
        .yellow()
    );
    Ok(())
}
