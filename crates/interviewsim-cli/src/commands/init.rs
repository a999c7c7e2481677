//! The `interviewsim init` command.

use std::path::Path;

use anyhow::{Context, Result};

use interviewsim_providers::config::{CONFIG_TEMPLATE, LOCAL_CONFIG_FILE};

const EXAMPLE_BANK_FILE: &str = "questions.toml";

pub fn execute() -> Result<()> {
    write_if_missing(Path::new(LOCAL_CONFIG_FILE), CONFIG_TEMPLATE)?;
    write_if_missing(Path::new(EXAMPLE_BANK_FILE), EXAMPLE_BANK)?;

    println!("\nNext steps:");
    println!("  1. Set OPENAI_API_KEY (or edit {LOCAL_CONFIG_FILE}) to enable remote scoring");
    println!("  2. Run: interviewsim validate --bank {EXAMPLE_BANK_FILE}");
    println!("  3. Run: interviewsim practice --bank {EXAMPLE_BANK_FILE} --role \"Site Reliability Engineer\"");

    Ok(())
}

fn write_if_missing(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const EXAMPLE_BANK: &str = r#"# Example question bank. Domains fall back to "General" when missing.

[[roles]]
name = "Site Reliability Engineer"

[[roles.domains]]
name = "General"

[[roles.domains.questions]]
id = 101
text = "How would you design alerting for a service with a 99.9% availability target?"
category = "system-design"
difficulty = "medium"
hint = "Error budgets, burn rate, symptom-based alerts."

[[roles.domains.questions]]
id = 102
text = "Walk through how you would debug a sudden latency spike in production."
category = "concept"
difficulty = "medium"

[[roles.domains.questions]]
id = 103
text = "Describe an incident you led. What was the impact and what changed afterwards? (STAR)"
category = "behavioral"
difficulty = "easy"

[[roles.domains]]
name = "Kubernetes"

[[roles.domains.questions]]
id = 111
text = "What happens between `kubectl apply` and a pod becoming ready?"
category = "concept"
difficulty = "hard"
hint = "API server, scheduler, kubelet, readiness probes."
"#;
