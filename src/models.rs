use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// One scraped listing. Missing or odd-typed fields load as empty strings;
/// keys we don't model are carried through `extra` so exports keep them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description_text: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub job_function: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub industries: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub employment_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub seniority_level: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub link: String,
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobRecord {
    /// Title and description joined, the text resume skills are matched against.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.description_text)
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(value))
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let text = value_to_string(value);
    Ok(if text.is_empty() { None } else { Some(text) })
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Array(items) => items
            .into_iter()
            .map(value_to_string)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// A job paired with its relevance for the current query.
#[derive(Debug, Clone)]
pub struct ScoreResult<'a> {
    pub job: &'a JobRecord,
    pub score: f64,
    pub matched_skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_years: u32,
    #[serde(default)]
    pub job_titles: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub suggested_roles: Vec<String>,
    #[serde(default)]
    pub word_count: usize,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
}

impl ResumeProfile {
    pub fn has_skills(&self) -> bool {
        !self.skills.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHistory {
    #[serde(default)]
    pub job_functions: Vec<String>,
}

impl SearchHistory {
    /// Appends a query unless it is blank or already present. Returns whether
    /// the history changed.
    pub fn record(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() || self.job_functions.iter().any(|q| q == query) {
            return false;
        }
        self.job_functions.push(query.to_string());
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    #[serde(rename = "Interview Scheduled")]
    InterviewScheduled,
    Rejected,
    #[serde(rename = "Offer Received")]
    OfferReceived,
}

impl ApplicationStatus {
    pub fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::InterviewScheduled => "Interview Scheduled",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::OfferReceived => "Offer Received",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match key.as_str() {
            "applied" => Ok(ApplicationStatus::Applied),
            "interview" | "interviewscheduled" => Ok(ApplicationStatus::InterviewScheduled),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "offer" | "offerreceived" => Ok(ApplicationStatus::OfferReceived),
            _ => Err(format!(
                "unknown status '{}' (expected applied, interview, rejected, offer)",
                s
            )),
        }
    }
}

/// Tracking entry for one job, keyed by job id in the application store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub job_title: String,
    pub company: String,
    pub applied_date: NaiveDate,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub job_link: String,
    pub last_updated: NaiveDateTime,
}
