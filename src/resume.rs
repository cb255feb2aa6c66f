use chrono::Datelike;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::decoder::{self, ResumeFormat};
use crate::error::{Result, SiftError};
use crate::models::ResumeProfile;
use crate::skills::{ROLE_SIGNATURES, SKILLS};
use crate::store::Store;

const MAX_SUGGESTED_ROLES: usize = 5;
const MAX_TITLES: usize = 5;
const MAX_EDUCATION: usize = 5;
const MAX_EXPERIENCE_YEARS: u32 = 60;

const ROLE_WORDS: &[&str] = &[
    "software", "developer", "engineer", "programmer", "architect", "analyst", "scientist",
    "researcher", "manager", "director", "lead", "senior", "junior", "intern", "consultant",
    "specialist", "technician", "designer", "administrator", "coordinator", "supervisor",
];

const EDUCATION_WORDS: &[&str] = &[
    "bachelor", "master", "phd", "doctorate", "degree", "university", "college", "bs", "ba",
    "ms", "ma", "mba", "engineering", "science", "arts", "technology", "computer science",
    "electrical engineering", "mechanical engineering", "business administration",
    "mathematics", "physics", "chemistry",
];

/// Reads a resume file, decodes it by extension and extracts a profile.
pub fn parse_resume_file(path: &Path) -> Result<ResumeProfile> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let format = ResumeFormat::from_extension(extension)
        .ok_or_else(|| SiftError::UnsupportedFormat(extension.to_string()))?;

    let bytes = std::fs::read(path).map_err(|source| SiftError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder = decoder::decoder_for(format);
    let text = decoder.decode(&bytes)?;
    if text.trim().is_empty() {
        return Err(SiftError::Extraction(format!(
            "no text found in {}",
            path.display()
        )));
    }
    debug!(path = %path.display(), format = ?decoder.format(), chars = text.len(), "decoded resume");
    Ok(extract(&text))
}

/// Parses a resume and replaces the saved profile with it. A failed parse
/// leaves the saved profile as it was.
pub fn parse_and_store(store: &Store, path: &Path) -> Result<ResumeProfile> {
    let profile = parse_resume_file(path)?;
    store.save_resume(&profile)?;
    info!(path = %path.display(), skills = profile.skills.len(), "saved resume profile");
    Ok(profile)
}

/// Builds a profile from already-extracted resume text. Never fails; text
/// without recognisable content yields an empty profile.
pub fn extract(text: &str) -> ResumeProfile {
    let lower = text.to_lowercase();
    let skills = extract_skills(&lower);
    let suggested_roles = suggest_roles(&skills);
    ResumeProfile {
        experience_years: estimate_experience(&lower),
        job_titles: extract_job_titles(&lower),
        education: extract_education(&lower),
        word_count: text.split_whitespace().count(),
        text: text.to_string(),
        skills,
        suggested_roles,
    }
}

/// Dictionary skills mentioned in lower-cased text, in dictionary order.
pub fn extract_skills(lower: &str) -> Vec<String> {
    SKILLS
        .iter()
        .filter(|skill| skill.mentioned_in(lower))
        .map(|skill| skill.name.to_string())
        .collect()
}

static EXPLICIT_YEARS_RE: OnceLock<Regex> = OnceLock::new();
static DATE_RANGE_RE: OnceLock<Regex> = OnceLock::new();

pub fn estimate_experience(lower: &str) -> u32 {
    let explicit = EXPLICIT_YEARS_RE.get_or_init(|| {
        Regex::new(
            r"(\d{1,2})\+?\s*(?:years?|yrs?)\s+(?:of\s+)?(?:\w+\s+)?experience|experience[:\s]+(\d{1,2})\+?\s*(?:years?|yrs?)|(\d{1,2})\+?\s*(?:years?|yrs?)\s+in\b",
        )
        .expect("experience regex")
    });

    let stated = explicit
        .captures_iter(lower)
        .filter_map(|caps| {
            caps.iter()
                .skip(1)
                .flatten()
                .next()
                .and_then(|m| m.as_str().parse::<u32>().ok())
        })
        .filter(|years| *years <= MAX_EXPERIENCE_YEARS)
        .max()
        .unwrap_or(0);
    if stated > 0 {
        return stated;
    }

    years_from_date_ranges(lower)
}

/// Total years covered by employment ranges such as "2018 - 2023" or
/// "Jan 2020 – Present", with overlapping ranges merged.
fn years_from_date_ranges(lower: &str) -> u32 {
    let range = DATE_RANGE_RE.get_or_init(|| {
        Regex::new(
            r"\b((?:19|20)\d{2})\s*(?:-|–|—|to)\s*(?:[a-z]{3,9}\.?\s+)?((?:19|20)\d{2}|present|current|now)\b",
        )
        .expect("date range regex")
    });
    let this_year = chrono::Local::now().year();

    let mut spans: Vec<(i32, i32)> = Vec::new();
    for caps in range.captures_iter(lower) {
        let Ok(start) = caps[1].parse::<i32>() else { continue };
        let end = match &caps[2] {
            "present" | "current" | "now" => this_year,
            year => match year.parse::<i32>() {
                Ok(y) => y,
                Err(_) => continue,
            },
        };
        if end >= start && !spans.contains(&(start, end)) {
            spans.push((start, end));
        }
    }
    if spans.is_empty() {
        return 0;
    }

    spans.sort_unstable();
    let mut total = 0i32;
    let (mut cur_start, mut cur_end) = spans[0];
    for &(start, end) in &spans[1..] {
        if start <= cur_end {
            cur_end = cur_end.max(end);
        } else {
            total += (cur_end - cur_start).max(1);
            cur_start = start;
            cur_end = end;
        }
    }
    total += (cur_end - cur_start).max(1);
    (total.max(0) as u32).min(MAX_EXPERIENCE_YEARS)
}

static YEAR_RE: OnceLock<Regex> = OnceLock::new();

fn line_mentions(line: &str, words: &[&str]) -> bool {
    words.iter().any(|w| crate::normalize::contains_term(line, w))
}

pub fn extract_job_titles(lower: &str) -> Vec<String> {
    let year = YEAR_RE.get_or_init(|| Regex::new(r"(?:19|20)\d{2}").expect("year regex"));
    lower
        .lines()
        .map(str::trim)
        .filter(|line| line_mentions(line, ROLE_WORDS))
        .map(|line| {
            let stripped = year.replace_all(line, "");
            stripped
                .replace(['-', '–', '—'], " ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|line| line.len() > 10 && line.len() < 100)
        .take(MAX_TITLES)
        .collect()
}

pub fn extract_education(lower: &str) -> Vec<String> {
    lower
        .lines()
        .map(str::trim)
        .filter(|line| line_mentions(line, EDUCATION_WORDS))
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| line.len() > 10 && line.len() < 200)
        .take(MAX_EDUCATION)
        .collect()
}

/// Roles ranked by how many of their signature skills the resume has.
/// Ties keep signature order.
pub fn suggest_roles(skills: &[String]) -> Vec<String> {
    let owned: HashSet<&str> = skills.iter().map(String::as_str).collect();
    let mut ranked: Vec<(&str, usize)> = ROLE_SIGNATURES
        .iter()
        .map(|(role, signature)| {
            (*role, signature.iter().filter(|s| owned.contains(*s)).count())
        })
        .filter(|(_, count)| *count > 0)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(MAX_SUGGESTED_ROLES)
        .map(|(role, _)| role.to_string())
        .collect()
}

/// How well a resume fits one posting: skill coverage, shared vocabulary and
/// title overlap, in [0, 1].
pub fn job_match_score(profile: &ResumeProfile, job_title: &str, job_description: &str) -> f64 {
    if profile.text.is_empty() {
        return 0.0;
    }
    let job_text = format!("{} {}", job_description, job_title).to_lowercase();
    let mut score: f64 = 0.0;

    let job_skills: Vec<&str> = SKILLS
        .iter()
        .filter(|skill| skill.mentioned_in(&job_text))
        .map(|skill| skill.name)
        .collect();
    if !job_skills.is_empty() {
        let shared = job_skills
            .iter()
            .filter(|name| profile.skills.iter().any(|s| s.as_str() == **name))
            .count();
        score += shared as f64 / job_skills.len() as f64 * 0.5;
    }

    let resume_words: HashSet<String> = profile.text.split_whitespace().map(str::to_lowercase).collect();
    let job_words: HashSet<&str> = job_text.split_whitespace().collect();
    let common = job_words.iter().filter(|w| resume_words.contains(**w)).count();
    score += (common as f64 / job_words.len().max(1) as f64).min(1.0) * 0.3;

    let title_lower = job_title.to_lowercase();
    if profile
        .job_titles
        .iter()
        .any(|t| t.split_whitespace().any(|w| title_lower.contains(w)))
    {
        score += 0.8 * 0.2;
    }

    score.clamp(0.0, 1.0)
}
