//! Console text: menus, records and status lines.

use colored::Colorize;

use crate::error::Result;
use crate::registry::{Collection, EXIT_CHOICE};
use crate::session::Operation;
use crate::store::Record;

/// Prompt marker printed after each menu.
pub const MENU_PROMPT: &str = "> ";

/// Lines of the collection menu.
pub fn collection_menu() -> Vec<String> {
    let mut lines = vec!["Choose a collection:".bold().to_string()];
    lines.extend(
        Collection::ALL
            .iter()
            .map(|c| format!("{}. {}", c.index(), c.name())),
    );
    lines.push(format!("{EXIT_CHOICE}. Exit"));
    lines.push(MENU_PROMPT.to_string());
    lines
}

/// Lines of the operation menu for `collection`.
pub fn operation_menu(collection: Collection) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {}",
        "Choose an option for".bold(),
        collection.name().cyan()
    )];
    lines.extend(
        Operation::ALL
            .iter()
            .map(|op| format!("{}. {}", op.index(), op.label())),
    );
    lines.push(MENU_PROMPT.to_string());
    lines
}

/// A record as one line of compact JSON.
pub fn format_record(record: &Record) -> Result<String> {
    Ok(serde_json::to_string(record)?)
}

/// Green check followed by `message`.
pub fn success(message: &str) -> String {
    format!("{} {message}", "✓".green())
}

/// Red `Error:` prefix followed by `message`.
pub fn error(message: &str) -> String {
    format!("{} {message}", "Error:".red())
}

/// `message` in yellow.
pub fn warning(message: &str) -> String {
    message.yellow().to_string()
}

/// `message` dimmed.
pub fn note(message: &str) -> String {
    message.dimmed().to_string()
}
