//! The `interviewsim questions` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

pub struct QuestionsArgs {
    pub role: String,
    pub domain: String,
    pub mode: String,
    pub count: Option<usize>,
    pub seed: Option<u64>,
    pub json: bool,
    pub bank: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub fn execute(args: QuestionsArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;
    let bank = super::load_bank(args.bank.as_deref(), &config)?;
    let mode = super::parse_mode(&args.mode)?;
    let count = args.count.unwrap_or(config.default_count);

    let mut rng = super::rng(args.seed);
    let questions = bank.select(&args.role, &args.domain, mode, count, &mut rng);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&questions)?);
        return Ok(());
    }

    if questions.is_empty() {
        println!("No questions for role '{}'.", args.role);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Category", "Difficulty", "Question"]);
    for q in &questions {
        table.add_row(vec![
            Cell::new(q.id),
            Cell::new(q.category.to_string()),
            Cell::new(q.difficulty.to_string()),
            Cell::new(&q.text),
        ]);
    }
    println!("{table}");

    Ok(())
}
