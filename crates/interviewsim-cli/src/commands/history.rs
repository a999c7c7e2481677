//! The `interviewsim history` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use interviewsim_core::history::{HistoryStore, JsonlHistoryStore};

pub fn execute(
    limit: Option<usize>,
    json: bool,
    history: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = super::load_config(config_path.as_deref())?;
    let store = JsonlHistoryStore::open(super::history_path(history, &config))?;
    let mut records = store.list()?;

    if let Some(limit) = limit {
        let skip = records.len().saturating_sub(limit);
        records.drain(..skip);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No history recorded yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "When", "Role", "Domain", "Mode", "Question", "Score"]);
    for r in &records {
        table.add_row(vec![
            Cell::new(r.id),
            Cell::new(r.created_at.format("%Y-%m-%d %H:%M")),
            Cell::new(&r.role),
            Cell::new(&r.domain),
            Cell::new(r.mode),
            Cell::new(&r.question),
            Cell::new(format!("{:.1}", r.score)),
        ]);
    }
    println!("{table}");

    Ok(())
}
