use std::cmp::Ordering;
use tracing::debug;

use crate::models::{JobRecord, ResumeProfile, ScoreResult};
use crate::scoring::{Query, Scorer, boost};

pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Thresholds outside [0, 1] are clamped; NaN falls back to the default.
pub fn clamp_threshold(threshold: f64) -> f64 {
    if threshold.is_nan() {
        DEFAULT_THRESHOLD
    } else {
        threshold.clamp(0.0, 1.0)
    }
}

/// Scores every job, keeps those at or above the threshold and orders them by
/// descending score. Equal scores keep their input order. An empty query
/// keeps every job.
pub fn filter<'a>(
    scorer: &Scorer,
    jobs: &'a [JobRecord],
    query: &str,
    threshold: f64,
    resume: Option<&ResumeProfile>,
) -> Vec<ScoreResult<'a>> {
    let threshold = clamp_threshold(threshold);
    let query = Query::new(query);
    let keep_all = query.is_empty();

    let mut results: Vec<ScoreResult<'a>> = jobs
        .iter()
        .filter_map(|job| {
            let base = scorer.score(&query, job);
            let (score, matched_skills) = boost(base, job, resume);
            (keep_all || score >= threshold).then(|| ScoreResult {
                job,
                score,
                matched_skills,
            })
        })
        .collect();

    // Vec::sort_by is stable
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    debug!(
        query = %query.normalized,
        threshold,
        kept = results.len(),
        total = jobs.len(),
        "filtered jobs"
    );
    results
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Similarity,
    Title,
    Company,
    Location,
}

impl SortColumn {
    pub fn next(self) -> Self {
        match self {
            SortColumn::Similarity => SortColumn::Title,
            SortColumn::Title => SortColumn::Company,
            SortColumn::Company => SortColumn::Location,
            SortColumn::Location => SortColumn::Similarity,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Similarity => "similarity",
            SortColumn::Title => "title",
            SortColumn::Company => "company",
            SortColumn::Location => "location",
        }
    }
}

/// Re-orders results for display. Similarity sorts descending, text columns
/// ascending and case-insensitively; all sorts are stable.
pub fn sort_results(results: &mut [ScoreResult<'_>], column: SortColumn) {
    match column {
        SortColumn::Similarity => {
            results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
        }
        SortColumn::Title => results.sort_by_key(|r| r.job.title.to_lowercase()),
        SortColumn::Company => results.sort_by_key(|r| r.job.company_name.to_lowercase()),
        SortColumn::Location => results.sort_by_key(|r| r.job.location.to_lowercase()),
    }
}
