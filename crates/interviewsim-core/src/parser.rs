//! TOML question bank parser.
//!
//! Loads question banks from TOML files and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::bank::{DomainEntry, QuestionBank, RoleEntry, DEFAULT_DOMAIN};
use crate::model::{Category, Difficulty, Question};

/// Intermediate TOML structure for parsing bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    #[serde(default)]
    roles: Vec<TomlRole>,
}

#[derive(Debug, Deserialize)]
struct TomlRole {
    name: String,
    #[serde(default)]
    domains: Vec<TomlDomain>,
}

#[derive(Debug, Deserialize)]
struct TomlDomain {
    name: String,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: u32,
    text: String,
    #[serde(default = "default_category")]
    category: String,
    #[serde(default = "default_difficulty")]
    difficulty: String,
    #[serde(default)]
    hint: Option<String>,
}

fn default_category() -> String {
    "concept".to_string()
}

fn default_difficulty() -> String {
    "medium".to_string()
}

/// Parse a question bank file.
pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let roles = parsed
        .roles
        .into_iter()
        .map(|r| {
            let domains = r
                .domains
                .into_iter()
                .map(|d| {
                    let questions = d
                        .questions
                        .into_iter()
                        .map(|q| {
                            let category: Category = q.category.parse().map_err(|e: String| {
                                anyhow::anyhow!("question {}: {}", q.id, e)
                            })?;
                            let difficulty: Difficulty =
                                q.difficulty.parse().map_err(|e: String| {
                                    anyhow::anyhow!("question {}: {}", q.id, e)
                                })?;
                            Ok(Question {
                                id: q.id,
                                text: q.text,
                                category,
                                difficulty,
                                hint: q.hint.filter(|h| !h.trim().is_empty()),
                            })
                        })
                        .collect::<Result<Vec<_>>>()?;
                    Ok(DomainEntry {
                        name: d.name,
                        questions,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(RoleEntry {
                name: r.name,
                domains,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionBank::new(roles))
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Where the problem is (e.g. "Software Engineer/Backend").
    pub location: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a question bank for common issues.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut seen_ids = HashSet::new();

    for role in &bank.roles {
        if !role.domains.iter().any(|d| d.name == DEFAULT_DOMAIN) {
            warnings.push(ValidationWarning {
                location: Some(role.name.clone()),
                message: format!("no {DEFAULT_DOMAIN} domain; unknown domains will yield no questions"),
            });
        }

        for domain in &role.domains {
            let location = format!("{}/{}", role.name, domain.name);

            if domain.questions.is_empty() {
                warnings.push(ValidationWarning {
                    location: Some(location.clone()),
                    message: "domain has no questions".into(),
                });
            }

            for question in &domain.questions {
                if !seen_ids.insert(question.id) {
                    warnings.push(ValidationWarning {
                        location: Some(location.clone()),
                        message: format!("duplicate question ID: {}", question.id),
                    });
                }
                if question.text.trim().is_empty() {
                    warnings.push(ValidationWarning {
                        location: Some(location.clone()),
                        message: format!("question {} has empty text", question.id),
                    });
                }
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[[roles]]
name = "SRE"

[[roles.domains]]
name = "General"

[[roles.domains.questions]]
id = 100
text = "How would you design an alerting policy for a latency SLO?"
category = "system-design"
difficulty = "hard"
hint = "Burn rates."

[[roles.domains.questions]]
id = 101
text = "What happens when you type a URL into a browser?"
hint = ""
"#;

    #[test]
    fn parse_valid_toml() {
        let bank = parse_bank_str(VALID_TOML, &PathBuf::from("bank.toml")).unwrap();
        assert_eq!(bank.roles(), vec!["SRE"]);
        let questions = bank.resolve("SRE", "General");
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].category, Category::SystemDesign);
        assert_eq!(questions[0].hint.as_deref(), Some("Burn rates."));
        assert_eq!(questions[1].difficulty, Difficulty::Medium);
        assert!(questions[1].hint.is_none(), "empty hint should normalize to None");
    }

    #[test]
    fn parse_unknown_category_fails() {
        let toml = r#"
[[roles]]
name = "SRE"
[[roles.domains]]
name = "General"
[[roles.domains.questions]]
id = 1
text = "q"
category = "trivia"
"#;
        let err = parse_bank_str(toml, &PathBuf::from("bank.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("unknown category"));
    }

    #[test]
    fn parse_malformed_toml() {
        let result = parse_bank_str("roles = [ {", &PathBuf::from("bad.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn validate_builtin_bank_is_clean() {
        assert!(validate_bank(&QuestionBank::builtin()).is_empty());
    }

    #[test]
    fn validate_reports_duplicates_and_missing_general() {
        let toml = r#"
[[roles]]
name = "QA"

[[roles.domains]]
name = "Automation"

[[roles.domains.questions]]
id = 7
text = "What makes a test flaky?"

[[roles.domains.questions]]
id = 7
text = "  "
"#;
        let bank = parse_bank_str(toml, &PathBuf::from("bank.toml")).unwrap();
        let warnings = validate_bank(&bank);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate question ID: 7")));
        assert!(warnings.iter().any(|w| w.message.contains("empty text")));
        assert!(warnings.iter().any(|w| w.message.contains("no General domain")));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.toml");
        std::fs::write(&path, VALID_TOML).unwrap();

        let bank = load_bank(&path).unwrap();
        assert_eq!(bank.question_count(), 2);
    }

    #[test]
    fn load_missing_file_has_context() {
        let err = load_bank(&PathBuf::from("/nonexistent/bank.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read question bank"));
    }
}
