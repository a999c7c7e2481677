//! The `interviewsim roles` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(bank_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(config_path.as_deref())?;
    let bank = super::load_bank(bank_path.as_deref(), &config)?;

    for role in &bank.roles {
        println!("{}", role.name);
        for domain in &role.domains {
            println!("  {} ({} questions)", domain.name, domain.questions.len());
        }
    }

    Ok(())
}
