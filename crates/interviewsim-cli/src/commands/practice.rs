//! The `interviewsim practice` command.
//!
//! Reads one answer per line from stdin. `:skip`, `:hint` and `:quit` are
//! commands; end of input abandons the session.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use comfy_table::{Cell, Table};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use interviewsim_core::history::{JsonlHistoryStore, NewRecord};
use interviewsim_core::scoring::Scorer;
use interviewsim_core::session::{InterviewSetup, Session, SessionError, SessionSlot};
use interviewsim_providers::build_scorer;
use interviewsim_report::{
    write_document_export, write_json_export, SessionMeta, DEFAULT_DOCUMENT_FILE,
    DEFAULT_JSON_FILE,
};

pub struct PracticeArgs {
    pub role: String,
    pub domain: String,
    pub mode: String,
    pub count: Option<usize>,
    pub strategy: Option<String>,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
    pub history: Option<PathBuf>,
    pub bank: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

enum Outcome {
    Completed,
    Abandoned,
}

pub async fn execute(args: PracticeArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;
    let bank = super::load_bank(args.bank.as_deref(), &config)?;
    let mode = super::parse_mode(&args.mode)?;
    let strategy = super::parse_strategy(args.strategy.as_deref(), &config)?;
    let scorer = build_scorer(&config, strategy);
    let mut history = super::open_history(&super::history_path(args.history, &config));

    let setup = InterviewSetup {
        role: args.role,
        domain: args.domain,
        mode,
        count: args.count.unwrap_or(config.default_count),
    };

    let mut rng = super::rng(args.seed);
    let mut slot = SessionSlot::new();
    let session = slot.start(&bank, &setup, &mut rng);

    if session.questions().is_empty() {
        anyhow::bail!(
            "no questions for role '{}' (available roles: {})",
            setup.role,
            bank.roles().join(", ")
        );
    }

    println!(
        "Interview: {} / {} ({}), {} question(s), scoring: {}",
        session.role(),
        session.domain(),
        session.mode(),
        session.questions().len(),
        scorer.strategy()
    );
    println!("Type your answer on one line. Commands: :skip, :hint, :quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let outcome = run(session, &scorer, &mut lines, history.as_mut()).await?;

    match outcome {
        Outcome::Abandoned => {
            slot.clear();
            println!("Session abandoned.");
            Ok(())
        }
        Outcome::Completed => {
            let Some(session) = slot.session() else {
                return Ok(());
            };
            let output = args.output.unwrap_or_else(|| config.output_dir.clone());
            finish(session, &output)
        }
    }
}

/// Drive the question loop until every question is evaluated or input ends.
async fn run(
    session: &mut Session,
    scorer: &Scorer,
    lines: &mut Lines<BufReader<Stdin>>,
    mut history: Option<&mut JsonlHistoryStore>,
) -> Result<Outcome> {
    let mut shown = None;

    while !session.is_complete() {
        let index = session.current();
        let Some(question) = session.current_question().cloned() else {
            break;
        };

        if shown != Some(index) {
            println!(
                "\nQ{}/{} [{}, {}] {}",
                index + 1,
                session.questions().len(),
                question.category,
                question.difficulty,
                question.text
            );
            shown = Some(index);
        }
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            return Ok(Outcome::Abandoned);
        };

        match line.trim() {
            ":quit" => return Ok(Outcome::Abandoned),
            ":hint" => {
                match &question.hint {
                    Some(hint) => println!("Hint: {hint}"),
                    None => println!("No hint for this question."),
                }
                continue;
            }
            ":skip" => {
                session.skip(index)?;
                println!("Skipped.");
            }
            text => match session.submit(index, text, scorer).await {
                Ok(evaluation) => {
                    let evaluation = evaluation.clone();
                    println!("Score: {:.1}/10", evaluation.score);
                    println!("Feedback: {}", evaluation.feedback);
                    for strength in &evaluation.strengths {
                        println!("  + {strength}");
                    }
                    for weakness in &evaluation.weaknesses {
                        println!("  - {weakness}");
                    }
                    if !evaluation.suggested_improvement.is_empty() {
                        println!("Suggested improvement: {}", evaluation.suggested_improvement);
                    }
                    if !evaluation.resources.is_empty() {
                        println!("Resources: {}", evaluation.resources.join("; "));
                    }
                    super::record(
                        history.as_deref_mut(),
                        NewRecord::from_evaluation(
                            session.role(),
                            session.domain(),
                            session.mode(),
                            &question.text,
                            text,
                            &evaluation,
                        ),
                    );
                }
                Err(SessionError::EmptyAnswer) => {
                    println!("Please write an answer before submitting.");
                }
                Err(e) => return Err(e.into()),
            },
        }
    }

    Ok(Outcome::Completed)
}

/// Print the summary table and write both exports into `dir`.
fn finish(session: &Session, dir: &Path) -> Result<()> {
    let summary = session.summary()?;

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Score", "Feedback"]);
    for (i, item) in session.qa_items().iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&item.question),
            Cell::new(format!("{:.1}", item.eval.score)),
            Cell::new(&item.eval.feedback),
        ]);
    }
    println!("\n{table}");

    println!(
        "Average score: {:.1}/10 ({} answered, {} skipped)",
        summary.average_score, summary.answered, summary.skipped
    );
    if !summary.strengths.is_empty() {
        println!("Strengths:");
        for strength in &summary.strengths {
            println!("  + {strength}");
        }
    }
    if !summary.weaknesses.is_empty() {
        println!("Weaknesses:");
        for weakness in &summary.weaknesses {
            println!("  - {weakness}");
        }
    }

    let meta = SessionMeta::from_session(session, &summary);
    let items = session.qa_items();
    let json_path = dir.join(DEFAULT_JSON_FILE);
    let pdf_path = dir.join(DEFAULT_DOCUMENT_FILE);
    write_json_export(&meta, &items, &json_path)?;
    write_document_export(&meta, &items, &pdf_path)?;
    println!("Wrote {}", json_path.display());
    println!("Wrote {}", pdf_path.display());

    Ok(())
}
