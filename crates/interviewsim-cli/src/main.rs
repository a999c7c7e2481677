//! interviewsim CLI — interview practice with scored feedback.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "interviewsim",
    version,
    about = "Interview practice with scored feedback"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive practice interview
    Practice {
        /// Role to interview for
        #[arg(long, default_value = "Software Engineer")]
        role: String,

        /// Domain within the role (falls back to General)
        #[arg(long, default_value = "General")]
        domain: String,

        /// Interview mode: technical or behavioral
        #[arg(long, default_value = "technical")]
        mode: String,

        /// Number of questions (defaults to the configured count)
        #[arg(long)]
        count: Option<usize>,

        /// Scoring strategy: heuristic or remote (defaults to the configured strategy)
        #[arg(long)]
        strategy: Option<String>,

        /// Seed for question sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Write JSON and PDF exports into this directory when the session completes
        #[arg(long)]
        output: Option<PathBuf>,

        /// History log path
        #[arg(long)]
        history: Option<PathBuf>,

        /// Question bank TOML file
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Draw a set of questions without starting a session
    Questions {
        #[arg(long, default_value = "Software Engineer")]
        role: String,

        #[arg(long, default_value = "General")]
        domain: String,

        #[arg(long, default_value = "technical")]
        mode: String,

        #[arg(long)]
        count: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        #[arg(long)]
        bank: Option<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score a single answer and record it in the history log
    Evaluate {
        /// Question text
        #[arg(long)]
        question: String,

        /// Answer text
        #[arg(long)]
        answer: String,

        #[arg(long, default_value = "technical")]
        mode: String,

        #[arg(long, default_value = "Software Engineer")]
        role: String,

        #[arg(long, default_value = "General")]
        domain: String,

        #[arg(long)]
        strategy: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        #[arg(long)]
        history: Option<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show recorded evaluations
    History {
        /// Only show the most recent N records
        #[arg(long)]
        limit: Option<usize>,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        #[arg(long)]
        history: Option<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List roles and domains in the question bank
    Roles {
        #[arg(long)]
        bank: Option<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a question bank TOML file
    Validate {
        #[arg(long)]
        bank: PathBuf,
    },

    /// Render a PDF summary from a JSON session export
    Report {
        /// JSON export to read
        #[arg(long)]
        input: PathBuf,

        /// PDF file to write
        #[arg(long, default_value = "interview_summary.pdf")]
        output: PathBuf,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example question bank
    Init,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,interviewsim=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Practice {
            role,
            domain,
            mode,
            count,
            strategy,
            seed,
            output,
            history,
            bank,
            config,
        } => {
            commands::practice::execute(commands::practice::PracticeArgs {
                role,
                domain,
                mode,
                count,
                strategy,
                seed,
                output,
                history,
                bank,
                config,
            })
            .await
        }
        Commands::Questions {
            role,
            domain,
            mode,
            count,
            seed,
            json,
            bank,
            config,
        } => commands::questions::execute(commands::questions::QuestionsArgs {
            role,
            domain,
            mode,
            count,
            seed,
            json,
            bank,
            config,
        }),
        Commands::Evaluate {
            question,
            answer,
            mode,
            role,
            domain,
            strategy,
            json,
            history,
            config,
        } => {
            commands::evaluate::execute(commands::evaluate::EvaluateArgs {
                question,
                answer,
                mode,
                role,
                domain,
                strategy,
                json,
                history,
                config,
            })
            .await
        }
        Commands::History {
            limit,
            json,
            history,
            config,
        } => commands::history::execute(limit, json, history, config),
        Commands::Roles { bank, config } => commands::roles::execute(bank, config),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Report { input, output } => commands::report::execute(input, output),
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
