//! The `interviewsim validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let bank = interviewsim_core::parser::load_bank(&bank_path)?;

    println!(
        "Question bank: {} ({} roles, {} questions)",
        bank_path.display(),
        bank.roles.len(),
        bank.question_count()
    );

    let warnings = interviewsim_core::parser::validate_bank(&bank);
    for w in &warnings {
        let prefix = w
            .location
            .as_ref()
            .map(|loc| format!("  [{loc}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Question bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
