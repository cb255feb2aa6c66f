use chrono::{Local, NaiveDateTime, Timelike};
use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Result, SiftError};
use crate::models::{ApplicationRecord, ApplicationStatus, JobRecord, ResumeProfile, SearchHistory};

const CONFIG_FILE: &str = "config.json";
const HISTORY_FILE: &str = "history.json";
const APPLICATIONS_FILE: &str = "applications.json";
const RESUME_FILE: &str = "resume_data.json";

pub type Applications = BTreeMap<String, ApplicationRecord>;

/// JSON-backed state kept in the data directory. Missing files mean empty
/// state; unreadable files are logged and treated the same way.
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn open(dir: Option<PathBuf>) -> Result<Self> {
        let dir = dir.unwrap_or_else(Self::default_dir);
        std::fs::create_dir_all(&dir).map_err(|source| SiftError::Write {
            path: dir.clone(),
            source,
        })?;
        debug!(dir = %dir.display(), "opened store");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn default_dir() -> PathBuf {
        // Use XDG data directory or fallback
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobsift") {
            proj_dirs.data_dir().to_path_buf()
        } else {
            PathBuf::from(".")
        }
    }

    fn file(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    // --- Config ---

    pub fn load_config(&self) -> Config {
        read_json_or_default(&self.file(CONFIG_FILE))
    }

    pub fn save_config(&self, config: &Config) -> Result<()> {
        write_json_atomic(&self.file(CONFIG_FILE), config)
    }

    // --- Search history ---

    pub fn load_history(&self) -> SearchHistory {
        read_json_or_default(&self.file(HISTORY_FILE))
    }

    /// Adds a query to the history file if it is new. Returns whether it was added.
    pub fn record_query(&self, query: &str) -> Result<bool> {
        let mut history = self.load_history();
        if !history.record(query) {
            return Ok(false);
        }
        write_json_atomic(&self.file(HISTORY_FILE), &history)?;
        Ok(true)
    }

    pub fn clear_history(&self) -> Result<()> {
        write_json_atomic(&self.file(HISTORY_FILE), &SearchHistory::default())
    }

    // --- Applications ---

    /// Tracked applications. Records that no longer parse are skipped with a
    /// warning but stay in the file.
    pub fn load_applications(&self) -> Applications {
        let Some(entries) = self.read_application_entries() else {
            return Applications::new();
        };
        entries
            .into_iter()
            .filter_map(|(id, value)| match serde_json::from_value(value) {
                Ok(record) => Some((id, record)),
                Err(e) => {
                    warn!(job_id = %id, error = %e, "skipping unreadable application record");
                    None
                }
            })
            .collect()
    }

    /// Raw entries of the application file. `None` when the file exists but
    /// can't be read as a JSON object.
    fn read_application_entries(&self) -> Option<BTreeMap<String, Value>> {
        let path = self.file(APPLICATIONS_FILE);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Some(BTreeMap::new()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read applications");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Some(entries),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt applications file");
                None
            }
        }
    }

    /// Creates or overwrites the record for `job`. An existing record keeps
    /// its applied date, and its notes when no new notes are given.
    pub fn mark_application(
        &self,
        job: &JobRecord,
        status: ApplicationStatus,
        notes: Option<&str>,
    ) -> Result<ApplicationRecord> {
        let path = self.file(APPLICATIONS_FILE);
        let mut entries = match self.read_application_entries() {
            Some(entries) => entries,
            None => {
                let backup = path.with_extension("json.bak");
                std::fs::copy(&path, &backup).map_err(|source| SiftError::Write {
                    path: backup.clone(),
                    source,
                })?;
                warn!(backup = %backup.display(), "kept a copy of the unreadable applications file");
                BTreeMap::new()
            }
        };
        let now = Local::now().naive_local();
        let previous: Option<ApplicationRecord> = entries
            .get(&job.id)
            .and_then(|value| serde_json::from_value(value.clone()).ok());
        let previous = previous.as_ref();

        let record = ApplicationRecord {
            job_title: job.title.clone(),
            company: job.company_name.clone(),
            applied_date: previous.map(|p| p.applied_date).unwrap_or_else(|| now.date()),
            status,
            notes: match (notes, previous) {
                (Some(n), _) => n.to_string(),
                (None, Some(p)) => p.notes.clone(),
                (None, None) => String::new(),
            },
            job_link: job.link.clone(),
            last_updated: truncate_to_seconds(now),
        };

        entries.insert(job.id.clone(), serde_json::to_value(&record)?);
        write_json_atomic(&path, &entries)?;
        info!(job_id = %job.id, status = %status, "application updated");
        Ok(record)
    }

    // --- Resume ---

    pub fn load_resume(&self) -> Option<ResumeProfile> {
        let path = self.file(RESUME_FILE);
        if !path.exists() {
            return None;
        }
        let profile: ResumeProfile = read_json_or_default(&path);
        if profile == ResumeProfile::default() { None } else { Some(profile) }
    }

    pub fn save_resume(&self, profile: &ResumeProfile) -> Result<()> {
        write_json_atomic(&self.file(RESUME_FILE), profile)
    }

    pub fn clear_resume(&self) -> Result<bool> {
        let path = self.file(RESUME_FILE);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path).map_err(|source| SiftError::Write { path, source })?;
        Ok(true)
    }
}

fn truncate_to_seconds(at: NaiveDateTime) -> NaiveDateTime {
    at.with_nanosecond(0).unwrap_or(at)
}

fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read store, using defaults");
            return T::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt store, using defaults");
            T::default()
        }
    }
}

/// Serializes `value` next to `path` and renames it into place so readers
/// never observe a partial file.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, json).map_err(|source| SiftError::Write {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| {
        let _ = std::fs::remove_file(&tmp);
        SiftError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

// --- Job files ---

pub fn load_jobs(path: &Path) -> Result<Vec<JobRecord>> {
    let raw = std::fs::read_to_string(path).map_err(|source| SiftError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let jobs: Vec<JobRecord> = serde_json::from_str(&raw).map_err(|source| SiftError::MalformedJobs {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), count = jobs.len(), "loaded jobs");
    Ok(jobs)
}

/// Writes jobs in the input schema, so an export can be loaded again.
pub fn export_jobs<'a>(path: &Path, jobs: impl IntoIterator<Item = &'a JobRecord>) -> Result<usize> {
    let jobs: Vec<&JobRecord> = jobs.into_iter().collect();
    write_json_atomic(path, &jobs)?;
    Ok(jobs.len())
}

fn separators() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-\s]+").expect("separator regex"))
}

/// `filtered_jobs_<query>_<YYYYmmdd_HHMMSS>.json`
pub fn default_export_name(query: &str, at: NaiveDateTime) -> String {
    let cleaned: String = query
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect();
    let slug = separators().replace_all(cleaned.trim(), "_");
    format!("filtered_jobs_{}_{}.json", slug, at.format("%Y%m%d_%H%M%S"))
}

/// Regular files in `dir`, sorted by name.
pub fn list_job_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| SiftError::Read {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn job(id: &str, title: &str) -> JobRecord {
        JobRecord {
            id: id.to_string(),
            title: title.to_string(),
            company_name: "Acme".to_string(),
            link: format!("https://example.com/jobs/{}", id),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_files_give_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(Some(dir.path().to_path_buf())).unwrap();
        assert!(store.load_history().job_functions.is_empty());
        assert!(store.load_applications().is_empty());
        assert!(store.load_resume().is_none());
        assert_eq!(store.load_config(), Config::default());
    }

    #[test]
    fn test_corrupt_store_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(Some(dir.path().to_path_buf())).unwrap();
        std::fs::write(dir.path().join(HISTORY_FILE), "{not json").unwrap();
        std::fs::write(dir.path().join(APPLICATIONS_FILE), "[1, 2").unwrap();
        std::fs::write(dir.path().join(RESUME_FILE), "null?").unwrap();
        assert!(store.load_history().job_functions.is_empty());
        assert!(store.load_applications().is_empty());
        assert!(store.load_resume().is_none());
    }

    #[test]
    fn test_history_persists_dedup() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(Some(dir.path().to_path_buf())).unwrap();
        assert!(store.record_query("Electrical Engineer").unwrap());
        assert!(store.record_query("Data Analyst").unwrap());
        assert!(!store.record_query("Electrical Engineer").unwrap());

        let raw = std::fs::read_to_string(dir.path().join(HISTORY_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["job_functions"], serde_json::json!(["Electrical Engineer", "Data Analyst"]));

        store.clear_history().unwrap();
        assert!(store.load_history().job_functions.is_empty());
    }

    #[test]
    fn test_mark_application_upserts_by_job_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(Some(dir.path().to_path_buf())).unwrap();
        let j = job("42", "Electrical Engineer");

        let first = store.mark_application(&j, ApplicationStatus::Applied, Some("via referral")).unwrap();
        let second = store.mark_application(&j, ApplicationStatus::InterviewScheduled, None).unwrap();
        assert_eq!(second.applied_date, first.applied_date);
        assert_eq!(second.notes, "via referral");

        let apps = store.load_applications();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps["42"].status, ApplicationStatus::InterviewScheduled);
        assert_eq!(apps["42"].job_link, "https://example.com/jobs/42");
        assert!(!dir.path().join("applications.json.tmp").exists());

        let raw = std::fs::read_to_string(dir.path().join(APPLICATIONS_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["42"]["status"], "Interview Scheduled");
        assert_eq!(value["42"]["job_title"], "Electrical Engineer");
        assert_eq!(value["42"]["applied_date"].as_str().unwrap().len(), 10);
    }

    #[test]
    fn test_mark_application_keeps_unparseable_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(Some(dir.path().to_path_buf())).unwrap();
        let seeded = serde_json::json!({
            "1": {
                "job_title": "Welder", "company": "Acme", "applied_date": "2025-12-01",
                "status": "Applied", "notes": "keep me", "job_link": "",
                "last_updated": "2025-12-01T09:00:00"
            },
            "2": {
                "job_title": "Fitter", "company": "Acme", "applied_date": "2025-12-02",
                "status": "Applied", "notes": "", "job_link": "",
                "last_updated": "2025-12-02 10:00:00.123456"
            }
        });
        std::fs::write(dir.path().join(APPLICATIONS_FILE), seeded.to_string()).unwrap();

        let before = store.load_applications();
        assert_eq!(before.keys().collect::<Vec<_>>(), vec!["1"]);

        store.mark_application(&job("3", "Electrician"), ApplicationStatus::Applied, None).unwrap();
        let after = store.load_applications();
        assert_eq!(after.keys().collect::<Vec<_>>(), vec!["1", "3"]);
        assert_eq!(after["1"].notes, "keep me");

        let raw = std::fs::read_to_string(dir.path().join(APPLICATIONS_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["2"]["last_updated"], "2025-12-02 10:00:00.123456");
    }

    #[test]
    fn test_mark_application_backs_up_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(Some(dir.path().to_path_buf())).unwrap();
        std::fs::write(dir.path().join(APPLICATIONS_FILE), "{not json").unwrap();

        store.mark_application(&job("7", "Electrician"), ApplicationStatus::Rejected, None).unwrap();
        let backup = std::fs::read_to_string(dir.path().join("applications.json.bak")).unwrap();
        assert_eq!(backup, "{not json");
        assert_eq!(store.load_applications().len(), 1);
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("taken.json");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("inside"), "x").unwrap();

        let result = write_json_atomic(&target, &serde_json::json!({"a": 1}));
        assert!(matches!(result, Err(SiftError::Write { .. })));
        assert!(!dir.path().join("taken.json.tmp").exists());
    }

    #[test]
    fn test_resume_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(Some(dir.path().to_path_buf())).unwrap();
        let profile = ResumeProfile {
            skills: vec!["python".into()],
            experience_years: 4,
            suggested_roles: vec!["Backend Developer".into()],
            word_count: 120,
            ..Default::default()
        };
        store.save_resume(&profile).unwrap();
        assert_eq!(store.load_resume(), Some(profile));
        assert!(store.clear_resume().unwrap());
        assert!(store.load_resume().is_none());
        assert!(!store.clear_resume().unwrap());
    }

    #[test]
    fn test_load_jobs_rejects_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"title": "not an array"}"#).unwrap();
        assert!(matches!(load_jobs(&bad), Err(SiftError::MalformedJobs { .. })));

        let scalars = dir.path().join("scalars.json");
        std::fs::write(&scalars, "[1, 2, 3]").unwrap();
        assert!(matches!(load_jobs(&scalars), Err(SiftError::MalformedJobs { .. })));

        assert!(matches!(load_jobs(&dir.path().join("missing.json")), Err(SiftError::Read { .. })));
    }

    #[test]
    fn test_export_then_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("jobs.json");
        std::fs::write(
            &input,
            r#"[{"id": "1", "title": "Electrical Engineer", "companyName": "Volt",
                 "descriptionText": "Grid work", "salary": "$120k", "postedAt": "2025-12-03"},
                {"id": 2, "title": "Backend Developer"}]"#,
        )
        .unwrap();
        let jobs = load_jobs(&input).unwrap();

        let out = dir.path().join("out.json");
        assert_eq!(export_jobs(&out, &jobs).unwrap(), 2);
        let reloaded = load_jobs(&out).unwrap();
        assert_eq!(reloaded, jobs);
    }

    #[test]
    fn test_default_export_name() {
        let at = NaiveDate::from_ymd_opt(2025, 12, 3)
            .unwrap()
            .and_hms_opt(21, 25, 37)
            .unwrap();
        assert_eq!(
            default_export_name("Electrical Engineer (R&D)", at),
            "filtered_jobs_Electrical_Engineer_RD_20251203_212537.json"
        );
    }

    #[test]
    fn test_list_job_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), "[]").unwrap();
        std::fs::write(dir.path().join("a.json"), "[]").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        let files = list_job_files(dir.path()).unwrap();
        let names: Vec<_> = files.iter().map(|p| p.file_name().unwrap().to_str().unwrap()).collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }
}
