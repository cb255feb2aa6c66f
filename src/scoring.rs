//! Job relevance scoring.
//!
//! A score is the weighted sum of independent signals, each returning a
//! fraction in [0, 1]. The sum is clamped to [0, 1].

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::models::{JobRecord, ResumeProfile};
use crate::normalize::{contains_term, normalize, tokenize};
use crate::roles::related_terms;
use crate::skills;

/// Score given to every job when the query is empty.
pub const EMPTY_QUERY_BASELINE: f64 = 0.5;

/// Boost per resume skill found in a job, and the cap on the total boost.
pub const PER_SKILL_BOOST: f64 = 0.1;
pub const MAX_BOOST: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub exact: f64,
    pub overlap: f64,
    pub related: f64,
    pub degree: f64,
    pub sequence: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            exact: 0.4,
            overlap: 0.25,
            related: 0.2,
            degree: 0.1,
            sequence: 0.05,
        }
    }
}

/// A query normalized once and reused for every job.
#[derive(Debug, Clone)]
pub struct Query {
    pub normalized: String,
    pub tokens: Vec<String>,
}

impl Query {
    pub fn new(text: &str) -> Self {
        Self {
            normalized: normalize(text),
            tokens: tokenize(text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

struct JobText {
    title: String,
    title_tokens: Vec<String>,
    description: String,
    description_lower: String,
}

impl JobText {
    fn new(job: &JobRecord) -> Self {
        Self {
            title: normalize(&job.title),
            title_tokens: tokenize(&job.title),
            description: normalize(&job.description_text),
            description_lower: job.description_text.to_lowercase(),
        }
    }
}

type Signal = fn(&Query, &JobText) -> f64;
type WeightOf = fn(&Weights) -> f64;

/// Signals in descending order of influence, each with its weight.
const SIGNALS: [(&str, Signal, WeightOf); 5] = [
    ("exact", exact_signal, |w| w.exact),
    ("overlap", overlap_signal, |w| w.overlap),
    ("related", related_signal, |w| w.related),
    ("degree", degree_signal, |w| w.degree),
    ("sequence", sequence_signal, |w| w.sequence),
];

/// The whole query appears in the title as whole words.
fn exact_signal(query: &Query, job: &JobText) -> f64 {
    if !query.normalized.is_empty() && contains_term(&job.title, &query.normalized) {
        1.0
    } else {
        0.0
    }
}

fn token_matches(query_token: &str, word: &str) -> bool {
    word.contains(query_token) || (word.len() >= 4 && query_token.starts_with(word))
}

fn overlap_signal(query: &Query, job: &JobText) -> f64 {
    if query.tokens.is_empty() {
        return 0.0;
    }
    let hits = query
        .tokens
        .iter()
        .filter(|t| job.title_tokens.iter().any(|w| token_matches(t, w)))
        .count();
    hits as f64 / query.tokens.len() as f64
}

fn related_signal(query: &Query, job: &JobText) -> f64 {
    let mut expandable = 0usize;
    let mut hits = 0usize;
    for token in &query.tokens {
        let terms = related_terms(token);
        if terms.is_empty() {
            continue;
        }
        expandable += 1;
        if terms
            .iter()
            .any(|term| contains_term(&job.title, term) || contains_term(&job.description, term))
        {
            hits += 1;
        }
    }
    if expandable == 0 {
        0.0
    } else {
        hits as f64 / expandable as f64
    }
}

static DEGREE_IN_RE: OnceLock<Regex> = OnceLock::new();
static FIELD_DEGREE_RE: OnceLock<Regex> = OnceLock::new();

/// Fields of study named in degree requirements, e.g. "BS in Electrical
/// Engineering" or "chemical engineering degree".
pub fn degree_fields(description: &str) -> Vec<String> {
    let text = description.to_lowercase();
    let degree_in = DEGREE_IN_RE.get_or_init(|| {
        Regex::new(
            r"\b(?:b\.?s\.?c?|b\.?a\.?|b\.?e(?:ng)?\.?|m\.?s\.?c?|m\.?eng\.?|ph\.?d\.?|bachelor(?:'?s)?|master(?:'?s)?|associate(?:'?s)?|degree)\s+(?:degree\s+)?(?:in|of)\s+([a-z][a-z /&-]{1,60})",
        )
        .expect("degree regex")
    });
    let field_degree = FIELD_DEGREE_RE.get_or_init(|| {
        Regex::new(r"\b([a-z]{3,}(?:\s+[a-z]{3,})?)\s+degree\b").expect("field degree regex")
    });

    let mut fields = Vec::new();
    for caps in degree_in.captures_iter(&text).chain(field_degree.captures_iter(&text)) {
        let field: String = normalize(&caps[1])
            .split(' ')
            .take_while(|w| *w != "or" && *w != "and")
            .take(4)
            .collect::<Vec<_>>()
            .join(" ");
        if !field.is_empty() && !fields.contains(&field) {
            fields.push(field);
        }
    }
    fields
}

fn degree_signal(query: &Query, job: &JobText) -> f64 {
    if query.tokens.is_empty() || job.description_lower.is_empty() {
        return 0.0;
    }
    let fields = degree_fields(&job.description_lower);
    if fields.is_empty() {
        return 0.0;
    }
    let hits = query
        .tokens
        .iter()
        .filter(|token| {
            let related = related_terms(token);
            fields.iter().any(|field| {
                field.split(' ').any(|w| token_matches(token, w) || w.starts_with(token.as_str()))
                    || related.iter().any(|term| contains_term(field, term))
            })
        })
        .count();
    hits as f64 / query.tokens.len() as f64
}

fn sequence_signal(query: &Query, job: &JobText) -> f64 {
    if query.normalized.is_empty() || job.title.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(&query.normalized, &job.title)
}

#[derive(Debug, Clone, Default)]
pub struct Scorer {
    weights: Weights,
}

impl Scorer {
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }

    /// Weighted contribution of each signal, in evaluation order.
    pub fn breakdown(&self, query: &Query, job: &JobRecord) -> Vec<(&'static str, f64)> {
        let text = JobText::new(job);
        SIGNALS
            .iter()
            .map(|(name, signal, weight)| (*name, signal(query, &text) * weight(&self.weights)))
            .collect()
    }

    pub fn score(&self, query: &Query, job: &JobRecord) -> f64 {
        if query.is_empty() {
            return EMPTY_QUERY_BASELINE;
        }
        let total: f64 = self.breakdown(query, job).iter().map(|(_, c)| c).sum();
        if total.is_nan() { 0.0 } else { total.clamp(0.0, 1.0) }
    }
}

/// Raises `base` by the resume skills found in the job's title and
/// description. Returns the boosted score and the matched skills.
pub fn boost(base: f64, job: &JobRecord, profile: Option<&ResumeProfile>) -> (f64, Vec<String>) {
    let Some(profile) = profile.filter(|p| p.has_skills()) else {
        return (base, Vec::new());
    };

    let text = job.searchable_text().to_lowercase();
    let matched: Vec<String> = profile
        .skills
        .iter()
        .filter(|name| {
            let name = name.to_lowercase();
            match skills::lookup(&name) {
                Some(skill) => skill.mentioned_in(&text),
                None => contains_term(&text, &name),
            }
        })
        .cloned()
        .collect();

    let bonus = (matched.len() as f64 * PER_SKILL_BOOST).min(MAX_BOOST);
    ((base + bonus).min(1.0).max(base), matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(query: &str, job: &JobRecord) -> f64 {
        Scorer::default().score(&Query::new(query), job)
    }

    fn job(title: &str, description: &str) -> JobRecord {
        JobRecord {
            title: title.to_string(),
            description_text: description.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_exact_title_match_scores_high() {
        let s = score("Electrical Engineer", &job("Electrical Engineer, Lithium Refinery", ""));
        assert!(s >= 0.65, "got {}", s);
        assert!(s <= 1.0);
    }

    #[test]
    fn test_related_role_expansion() {
        let s = score("Electrical Engineer", &job("Electronics Engineer", ""));
        assert!(s >= 0.3, "got {}", s);
    }

    #[test]
    fn test_related_role_in_description() {
        let query = Query::new("Electrical Engineer");
        let breakdown = Scorer::default().breakdown(
            &query,
            &job("Design Engineer", "You will build power systems for grid storage."),
        );
        let related = breakdown.iter().find(|(n, _)| *n == "related").unwrap().1;
        assert!((related - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_unrelated_job_scores_low() {
        let s = score("Electrical Engineer", &job("Backend Developer", ""));
        assert!(s < 0.3, "got {}", s);
    }

    #[test]
    fn test_empty_query_returns_baseline() {
        for j in [job("Welder", "Weld things"), job("", ""), job("Data Scientist", "")] {
            assert_eq!(score("", &j), EMPTY_QUERY_BASELINE);
            assert_eq!(score("  -- ", &j), EMPTY_QUERY_BASELINE);
        }
    }

    #[test]
    fn test_empty_job_fields_do_not_error() {
        let s = score("Electrical Engineer", &JobRecord::default());
        assert!((0.0..=1.0).contains(&s));
        assert!(s < 0.05);
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        let jobs = [
            job("Electrical Engineer Electrical Engineer", "BS in Electrical Engineering, electronics, hardware"),
            job("x", "y"),
            job("Software Developer", "Bachelor's degree in Computer Science"),
        ];
        let heavy = Scorer::new(Weights {
            exact: 2.0,
            overlap: 2.0,
            related: 2.0,
            degree: 2.0,
            sequence: 2.0,
        });
        for q in ["Electrical Engineer", "developer", "z", "electrical electrical"] {
            for j in &jobs {
                let s = score(q, j);
                assert!((0.0..=1.0).contains(&s), "{} / {} -> {}", q, j.title, s);
                let h = heavy.score(&Query::new(q), j);
                assert!((0.0..=1.0).contains(&h));
            }
        }
    }

    #[test]
    fn test_degree_fields_extraction() {
        let fields = degree_fields(
            "Requirements: B.S. in Electrical Engineering or related field. \
             A chemical engineering degree is a plus.",
        );
        assert!(fields.contains(&"electrical engineering".to_string()));
        assert!(fields.contains(&"chemical engineering".to_string()));
    }

    #[test]
    fn test_degree_signal_rewards_matching_field() {
        let query = Query::new("Electrical Engineer");
        let scorer = Scorer::default();
        let with_degree = scorer.score(&query, &job("Plant Engineer", "Bachelor's degree in Electrical Engineering required"));
        let without = scorer.score(&query, &job("Plant Engineer", "Bachelor's degree in Accounting required"));
        assert!(with_degree > without);
    }

    #[test]
    fn test_signal_ordering_exact_beats_overlap() {
        let scorer = Scorer::default();
        let query = Query::new("data engineer");
        let exact = scorer.score(&query, &job("Senior Data Engineer", ""));
        let partial = scorer.score(&query, &job("Engineer, Data Platform", ""));
        assert!(exact > partial);
    }

    #[test]
    fn test_boost_without_profile_is_noop() {
        let j = job("Python Developer", "Django and AWS");
        assert_eq!(boost(0.42, &j, None), (0.42, vec![]));
        let empty = ResumeProfile::default();
        assert_eq!(boost(0.42, &j, Some(&empty)), (0.42, vec![]));
    }

    #[test]
    fn test_boost_is_capped() {
        let profile = ResumeProfile {
            skills: vec!["python".into(), "django".into(), "aws".into(), "docker".into(), "sql".into()],
            ..Default::default()
        };
        let j = job("Python Developer", "Django, AWS, Docker and SQL");
        let (boosted, matched) = boost(0.4, &j, Some(&profile));
        assert_eq!(matched.len(), 5);
        assert!((boosted - 0.7).abs() < 1e-9);

        let (top, _) = boost(0.95, &j, Some(&profile));
        assert_eq!(top, 1.0);
    }

    #[test]
    fn test_boost_never_decreases() {
        let profile = ResumeProfile {
            skills: vec!["kubernetes".into(), "welding".into()],
            ..Default::default()
        };
        let j = job("Platform Engineer", "We run k8s everywhere");
        for base in [0.0, 0.1, 0.5, 0.99, 1.0] {
            let (boosted, matched) = boost(base, &j, Some(&profile));
            assert!(boosted >= base);
            assert!(boosted <= 1.0);
            assert_eq!(matched, vec!["kubernetes".to_string()]);
        }
    }

    #[test]
    fn test_exact_match_needs_whole_words() {
        for title in ["Accountant", "Electrical Engineer", "Clinical Coordinator"] {
            let s = score("C", &job(title, ""));
            assert!(s < 0.3, "{} -> {}", title, s);
        }
        let query = Query::new("data engineer");
        let exact = |title: &str| Scorer::default().breakdown(&query, &job(title, ""))[0].1;
        assert_eq!(exact("Big Data Engineer"), Weights::default().exact);
        assert_eq!(exact("Metadata Engineering Lead"), 0.0);
    }

    #[test]
    fn test_each_signal_uses_its_own_weight() {
        let weights = Weights { exact: 0.0, overlap: 0.0, related: 0.0, degree: 0.0, sequence: 1.0 };
        let query = Query::new("Electrical Engineer");
        let breakdown = Scorer::new(weights).breakdown(&query, &job("Electrical Engineer", ""));
        let names: Vec<&str> = breakdown.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["exact", "overlap", "related", "degree", "sequence"]);
        assert_eq!(breakdown[0].1, 0.0);
        assert_eq!(breakdown[1].1, 0.0);
        assert_eq!(breakdown[4].1, 1.0);
    }
}
