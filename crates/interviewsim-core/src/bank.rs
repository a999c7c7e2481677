//! The question bank: a static (role, domain) → questions table with sampling.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{Category, Difficulty, Mode, Question};

/// Domain used when the requested one does not exist for a role.
pub const DEFAULT_DOMAIN: &str = "General";

/// Questions for one domain of a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEntry {
    pub name: String,
    pub questions: Vec<Question>,
}

/// All domains for one role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleEntry {
    pub name: String,
    pub domains: Vec<DomainEntry>,
}

/// A lookup table of interview questions keyed by role and domain.
///
/// Roles and domains keep their insertion order so listings are stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionBank {
    pub roles: Vec<RoleEntry>,
}

impl QuestionBank {
    pub fn new(roles: Vec<RoleEntry>) -> Self {
        Self { roles }
    }

    /// Role names in bank order.
    pub fn roles(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.name.as_str()).collect()
    }

    /// Domain names for a role, empty if the role is unknown.
    pub fn domains(&self, role: &str) -> Vec<&str> {
        self.role(role)
            .map(|r| r.domains.iter().map(|d| d.name.as_str()).collect())
            .unwrap_or_default()
    }

    fn role(&self, role: &str) -> Option<&RoleEntry> {
        self.roles.iter().find(|r| r.name == role)
    }

    /// Resolve the question list for (role, domain), falling back to the
    /// role's default domain. Returns an empty slice on a lookup miss.
    pub fn resolve(&self, role: &str, domain: &str) -> &[Question] {
        let Some(entry) = self.role(role) else {
            return &[];
        };
        let find = |name: &str| {
            entry
                .domains
                .iter()
                .find(|d| d.name == name && !d.questions.is_empty())
        };
        find(domain)
            .or_else(|| find(DEFAULT_DOMAIN))
            .map(|d| d.questions.as_slice())
            .unwrap_or(&[])
    }

    /// Select up to `count` questions for an interview.
    ///
    /// When `count` covers the whole resolved list, the list is returned in its
    /// original order. Otherwise `count` distinct questions are sampled
    /// uniformly from it using `rng`. `mode` does not filter the result.
    pub fn select<R: Rng + ?Sized>(
        &self,
        role: &str,
        domain: &str,
        mode: Mode,
        count: usize,
        rng: &mut R,
    ) -> Vec<Question> {
        let available = self.resolve(role, domain);
        tracing::debug!(
            role,
            domain,
            %mode,
            count,
            available = available.len(),
            "selecting questions"
        );

        if count >= available.len() {
            return available.to_vec();
        }

        rand::seq::index::sample(rng, available.len(), count)
            .into_iter()
            .map(|i| available[i].clone())
            .collect()
    }

    /// Total number of questions across all roles and domains.
    pub fn question_count(&self) -> usize {
        self.roles
            .iter()
            .flat_map(|r| &r.domains)
            .map(|d| d.questions.len())
            .sum()
    }

    /// The bank shipped with the binary.
    pub fn builtin() -> Self {
        Self::new(vec![
            role(
                "Software Engineer",
                vec![
                    domain(
                        "General",
                        vec![
                            q(1, "Explain the difference between process and thread.", Category::Concept, Difficulty::Easy, Some("Consider memory and scheduling.")),
                            q(2, "How would you find a cycle in a directed graph? Give approach and complexity.", Category::Algorithm, Difficulty::Medium, Some("Think DFS and colors/stack.")),
                            q(3, "Design a URL shortener service. Outline components and trade-offs.", Category::SystemDesign, Difficulty::Hard, Some("Consider database, hashing, collision handling.")),
                        ],
                    ),
                    domain(
                        "Backend",
                        vec![
                            q(4, "How does database indexing speed up queries? Types of indexes?", Category::Concept, Difficulty::Medium, Some("B-trees, hash indexes")),
                            q(5, "Explain ACID properties in databases.", Category::Concept, Difficulty::Easy, None),
                        ],
                    ),
                    domain(
                        "Frontend",
                        vec![
                            q(6, "How does the browser render a webpage (critical rendering path)?", Category::Concept, Difficulty::Medium, Some("HTML, CSS, JS parsing & layout.")),
                            q(7, "Explain virtual DOM and its benefits.", Category::Concept, Difficulty::Easy, None),
                        ],
                    ),
                    domain(
                        "Machine Learning",
                        vec![q(8, "How would you evaluate and compare two models with different class imbalance?", Category::Ml, Difficulty::Medium, Some("Precision/recall, ROC, PR curves."))],
                    ),
                ],
            ),
            role(
                "Product Manager",
                vec![domain(
                    "General",
                    vec![
                        q(11, "Describe a time you prioritized features under tight deadline (STAR).", Category::Behavioral, Difficulty::Medium, Some("Be specific about trade-offs.")),
                        q(12, "How do you define success metrics for a new feature?", Category::Behavioral, Difficulty::Easy, Some("Think quantitative + qualitative metrics.")),
                    ],
                )],
            ),
            role(
                "Data Analyst",
                vec![domain(
                    "General",
                    vec![
                        q(21, "How would you clean a dataset with many missing values?", Category::Concept, Difficulty::Medium, Some("Imputation, dropping, modeling missingness.")),
                        q(22, "Which chart would you use to compare distribution of a continuous variable across groups?", Category::Concept, Difficulty::Easy, Some("Box plot, violin plot.")),
                    ],
                )],
            ),
        ])
    }
}

fn role(name: &str, domains: Vec<DomainEntry>) -> RoleEntry {
    RoleEntry {
        name: name.to_string(),
        domains,
    }
}

fn domain(name: &str, questions: Vec<Question>) -> DomainEntry {
    DomainEntry {
        name: name.to_string(),
        questions,
    }
}

fn q(id: u32, text: &str, category: Category, difficulty: Difficulty, hint: Option<&str>) -> Question {
    Question {
        id,
        text: text.to_string(),
        category,
        difficulty,
        hint: hint.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn builtin_lists_roles_and_domains_in_order() {
        let bank = QuestionBank::builtin();
        assert_eq!(
            bank.roles(),
            vec!["Software Engineer", "Product Manager", "Data Analyst"]
        );
        assert_eq!(
            bank.domains("Software Engineer"),
            vec!["General", "Backend", "Frontend", "Machine Learning"]
        );
        assert!(bank.domains("Astronaut").is_empty());
        assert_eq!(bank.question_count(), 12);
    }

    #[test]
    fn select_all_keeps_original_order() {
        let bank = QuestionBank::builtin();
        let picked = bank.select("Software Engineer", "General", Mode::Technical, 3, &mut rng());
        let ids: Vec<u32> = picked.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let more = bank.select("Software Engineer", "General", Mode::Technical, 10, &mut rng());
        assert_eq!(more, picked);
    }

    #[test]
    fn select_sample_has_no_duplicates_and_stays_in_source() {
        let bank = QuestionBank::builtin();
        let source: HashSet<u32> = bank
            .resolve("Software Engineer", "General")
            .iter()
            .map(|q| q.id)
            .collect();

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = bank.select("Software Engineer", "General", Mode::Behavioral, 2, &mut rng);
            assert_eq!(picked.len(), 2);
            let ids: HashSet<u32> = picked.iter().map(|q| q.id).collect();
            assert_eq!(ids.len(), 2, "duplicate in sample for seed {seed}");
            assert!(ids.is_subset(&source));
        }
    }

    #[test]
    fn select_is_reproducible_with_same_seed() {
        let bank = QuestionBank::builtin();
        let a = bank.select("Software Engineer", "General", Mode::Technical, 2, &mut rng());
        let b = bank.select("Software Engineer", "General", Mode::Technical, 2, &mut rng());
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_domain_falls_back_to_general() {
        let bank = QuestionBank::builtin();
        let picked = bank.select("Product Manager", "Growth", Mode::Behavioral, 5, &mut rng());
        let ids: Vec<u32> = picked.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![11, 12]);
    }

    #[test]
    fn unknown_role_yields_empty() {
        let bank = QuestionBank::builtin();
        assert!(bank
            .select("Astronaut", "General", Mode::Technical, 3, &mut rng())
            .is_empty());
    }

    #[test]
    fn zero_count_yields_empty() {
        let bank = QuestionBank::builtin();
        assert!(bank
            .select("Software Engineer", "General", Mode::Technical, 0, &mut rng())
            .is_empty());
    }
}
