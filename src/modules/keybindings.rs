// Keyboard shortcut table on the settings page.
// Rows come from the browser commands API; the page only displays them.

use serde::{Deserialize, Serialize};
use std::future::Future;

/// Command the browser reserves for opening the popup. It has no description.
pub const OPEN_POPUP_COMMAND: &str = "_execute_browser_action";
const OPEN_POPUP_LABEL: &str = "Open the popup";
const UNSET_SHORTCUT: &str = "Not set";

/// One entry of `commands.getAll()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub shortcut: Option<String>,
}

impl Command {
    pub fn label(&self) -> &str {
        if self.name == OPEN_POPUP_COMMAND || self.name == "_execute_action" {
            return OPEN_POPUP_LABEL;
        }
        if self.description.is_empty() {
            &self.name
        } else {
            &self.description
        }
    }

    pub fn shortcut_text(&self) -> &str {
        match self.shortcut.as_deref() {
            Some(s) if !s.trim().is_empty() => s,
            _ => UNSET_SHORTCUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeybindingRow {
    pub command: String,
    pub shortcut: String,
}

impl From<&Command> for KeybindingRow {
    fn from(command: &Command) -> Self {
        Self {
            command: command.label().to_string(),
            shortcut: command.shortcut_text().to_string(),
        }
    }
}

/// Host side of `commands.getAll`.
pub trait CommandSource {
    fn commands(&self) -> impl Future<Output = Vec<Command>>;
}

/// The table element the rows are written into.
pub trait KeybindingTable {
    fn clear_rows(&mut self);
    fn push_row(&mut self, row: KeybindingRow);
}

/// Fills the shortcut table with one row per command, in the browser's order.
/// Returns the number of rows written.
pub async fn init_keybinding_table<C, T>(source: &C, table: &mut T) -> usize
where
    C: CommandSource,
    T: KeybindingTable,
{
    let commands = source.commands().await;
    table.clear_rows();
    for command in &commands {
        table.push_row(KeybindingRow::from(command));
    }
    log::info!("[Keybindings] Listed {} command(s)", commands.len());
    commands.len()
}
