//! The `recite units` command.

use std::path::PathBuf;

use anyhow::Result;

use recite_core::parser::load_bank;

use crate::render::unit_table;

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let bank = load_bank(&bank_path)?;
    if bank.is_empty() {
        println!("No questions in {}.", bank_path.display());
        return Ok(());
    }

    println!("{}", unit_table(&bank));
    println!("{} question(s) in total.", bank.len());
    Ok(())
}
