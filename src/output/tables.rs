use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::providers::gitlab::Action;

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

/// Red for cancelled, yellow for unconfirmed or dry-run, dim for ignored.
pub fn action_cell(action: &Action) -> Cell {
    match action {
        Action::Ignored(reason) => Cell::new(format!("ignored ({reason})")).fg(TableColor::DarkGrey),
        Action::WouldCancel => Cell::new("would cancel").fg(TableColor::Yellow),
        Action::Canceled {
            confirmed: Some(false),
            ..
        } => Cell::new("cancel requested (unconfirmed)").fg(TableColor::Yellow),
        Action::Canceled {
            confirmed: Some(true),
            ..
        } => Cell::new("canceled (confirmed)").fg(TableColor::Red),
        Action::Canceled { confirmed: None, .. } => Cell::new("cancel requested").fg(TableColor::Red),
    }
}
