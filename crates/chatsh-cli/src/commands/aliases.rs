use colored::Colorize;

use chatsh_core::AliasTable;
use chatsh_infrastructure::ConfigService;

use super::utils::alias_store;

fn print_table(title: &str, table: &AliasTable) {
    println!("{}", title.bright_magenta().bold());
    if table.is_empty() {
        println!("  {}", "(none)".bright_black());
        return;
    }
    for (name, entry) in table.iter() {
        match &entry.description {
            Some(description) => println!(
                "  {} -> {} {}",
                name.bright_cyan(),
                entry.command,
                format!("({})", description).bright_black()
            ),
            None => println!("  {} -> {}", name.bright_cyan(), entry.command),
        }
    }
}

pub fn print(service: &ConfigService) {
    let store = alias_store(service.paths());
    print_table("Built-in aliases", store.builtin());
    println!();
    print_table("User aliases", store.user());
}
