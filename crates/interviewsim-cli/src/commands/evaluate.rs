//! The `interviewsim evaluate` command: score one answer and record it.

use std::path::PathBuf;

use anyhow::Result;

use interviewsim_core::history::NewRecord;
use interviewsim_providers::build_scorer;

pub struct EvaluateArgs {
    pub question: String,
    pub answer: String,
    pub mode: String,
    pub role: String,
    pub domain: String,
    pub strategy: Option<String>,
    pub json: bool,
    pub history: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub async fn execute(args: EvaluateArgs) -> Result<()> {
    let answer = args.answer.trim();
    if answer.is_empty() {
        anyhow::bail!("answer is empty; nothing to evaluate");
    }

    let config = super::load_config(args.config.as_deref())?;
    let mode = super::parse_mode(&args.mode)?;
    let strategy = super::parse_strategy(args.strategy.as_deref(), &config)?;
    let scorer = build_scorer(&config, strategy);

    let evaluation = scorer.evaluate(&args.question, answer, mode).await;

    let mut history = super::open_history(&super::history_path(args.history, &config));
    super::record(
        history.as_mut(),
        NewRecord::from_evaluation(
            &args.role,
            &args.domain,
            mode,
            &args.question,
            answer,
            &evaluation,
        ),
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
        return Ok(());
    }

    println!("Score: {:.1}/10", evaluation.score);
    println!("Feedback: {}", evaluation.feedback);
    if !evaluation.strengths.is_empty() {
        println!("Strengths:");
        for s in &evaluation.strengths {
            println!("  + {s}");
        }
    }
    if !evaluation.weaknesses.is_empty() {
        println!("Weaknesses:");
        for w in &evaluation.weaknesses {
            println!("  - {w}");
        }
    }
    if !evaluation.suggested_improvement.is_empty() {
        println!("Suggested improvement: {}", evaluation.suggested_improvement);
    }
    if !evaluation.resources.is_empty() {
        println!("Resources: {}", evaluation.resources.join("; "));
    }

    Ok(())
}
