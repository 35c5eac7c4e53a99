use colored::Colorize;

use chatsh_infrastructure::ConfigService;

use super::utils::session_registry;

pub fn list(service: &ConfigService) {
    let mut registry = session_registry(service.paths());
    let sessions = registry.restore();
    if sessions.is_empty() {
        println!("{}", "No authorized sessions.".bright_black());
        return;
    }
    for session in sessions {
        println!("{}", session);
    }
}

pub fn clear(service: &ConfigService) {
    let mut registry = session_registry(service.paths());
    let count = registry.restore().len();
    registry.revoke_all();
    println!("{}", format!("Revoked {} session(s).", count).green());
}
