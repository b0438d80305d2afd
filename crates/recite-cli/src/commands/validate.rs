//! The `recite validate` command.

use std::path::PathBuf;

use anyhow::Result;

use recite_core::parser::{load_bank, validate_bank};

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let bank = load_bank(&bank_path)?;

    println!(
        "Quiz bank: {} ({} questions, {} learning notes)",
        bank_path.display(),
        bank.len(),
        bank.descriptions.len()
    );

    let warnings = validate_bank(&bank);
    for w in &warnings {
        let prefix = w
            .line
            .map(|line| format!("  [line {line}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if bank.is_empty() {
        println!("\nThe bank has no entries.");
    } else if warnings.is_empty() {
        println!("Quiz bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
