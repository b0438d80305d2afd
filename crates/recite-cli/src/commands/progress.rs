//! The `recite progress` command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use recite_core::model::ProgressTable;
use recite_core::traits::ProgressStore;
use recite_providers::config::load_config_from;
use recite_sheets::SheetsStore;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let sheets = config.require_sheets()?;
    let store = SheetsStore::new(
        &sheets.spreadsheet_id,
        &sheets.access_token,
        sheets.base_url.clone(),
    );

    let mut per_unit: BTreeMap<String, [usize; 2]> = BTreeMap::new();
    let mut totals = Table::new();
    totals.set_header(vec!["Set", "Sentences"]);

    for (column, table) in ProgressTable::ALL.into_iter().enumerate() {
        let rows = store
            .list(table)
            .await
            .with_context(|| format!("failed to read '{table}'"))?;
        totals.add_row(vec![Cell::new(table), Cell::new(rows.len())]);
        for row in rows {
            per_unit.entry(row.key).or_default()[column] += 1;
        }
    }

    println!("{totals}");

    if !per_unit.is_empty() {
        let mut units = Table::new();
        units.set_header(vec!["Unit", "Incorrect", "Mastered"]);
        for (key, [incorrect, mastered]) in &per_unit {
            units.add_row(vec![Cell::new(key), Cell::new(incorrect), Cell::new(mastered)]);
        }
        println!("{units}");
    }

    Ok(())
}
