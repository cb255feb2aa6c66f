mod config;
mod decoder;
mod error;
mod models;
mod normalize;
mod rank;
mod resume;
mod roles;
mod scoring;
mod skills;
mod store;
mod tui;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use models::{ApplicationStatus, ResumeProfile, ScoreResult};
use scoring::Scorer;
use skills::SkillCategory;
use std::path::PathBuf;
use store::Store;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "jobsift")]
#[command(about = "Rank scraped job listings against the role you are looking for")]
struct Cli {
    /// Directory holding config, history, applications and resume data
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config and show the data directory
    Init,

    /// Score and rank a job file against a job function
    Filter {
        /// JSON file of scraped jobs
        file: PathBuf,

        /// Job function to search for, e.g. "Electrical Engineer"
        query: String,

        /// Minimum similarity (0.0 - 1.0)
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Boost jobs that mention skills from the saved resume
        #[arg(long)]
        resume: bool,

        /// Number of rows to print (0 = all)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Export the results as JSON (default name in the export dir)
        #[arg(long, num_args = 0..=1, value_name = "PATH")]
        export: Option<Option<PathBuf>>,

        /// Open the interactive results table
        #[arg(long)]
        browse: bool,
    },

    /// Show previously searched job functions
    History {
        /// Forget all previous searches
        #[arg(long)]
        clear: bool,
    },

    /// List job files in the configured jobs directory
    Files,

    /// Track an application for a job
    Apply {
        /// JSON file containing the job
        file: PathBuf,

        /// Job ID
        job_id: String,

        /// Status (applied, interview, rejected, offer)
        #[arg(short, long, default_value = "applied")]
        status: String,

        /// Notes to keep with the application
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List tracked applications
    Applications {
        /// Filter by status (applied, interview, rejected, offer)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Manage the resume profile used for boosting
    Resume {
        #[command(subcommand)]
        command: ResumeCommands,
    },
}

#[derive(Subcommand)]
enum ResumeCommands {
    /// Extract a profile from a PDF, DOCX or text resume and save it
    Parse {
        /// Path to resume file
        file: PathBuf,
    },

    /// Show the saved resume profile
    Show,

    /// Remove the saved resume profile
    Clear,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("jobsift=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jobsift=warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn parse_status(status: &str) -> Result<ApplicationStatus> {
    status.parse::<ApplicationStatus>().map_err(|e| anyhow!(e))
}

fn print_results(results: &[ScoreResult<'_>], limit: usize) {
    println!(
        "{:<10} {:>6} {:<30} {:<20} {:<18} {}",
        "ID", "SIM", "TITLE", "COMPANY", "LOCATION", "SKILLS"
    );
    println!("{}", "-".repeat(100));
    let shown = if limit == 0 { results.len() } else { limit.min(results.len()) };
    for result in &results[..shown] {
        let job = result.job;
        println!(
            "{:<10} {:>5.1}% {:<30} {:<20} {:<18} {}",
            truncate(&job.id, 10),
            result.score * 100.0,
            truncate(&job.title, 28),
            truncate(&job.company_name, 18),
            truncate(&job.location, 16),
            truncate(&result.matched_skills.join(", "), 30)
        );
    }
    if shown < results.len() {
        println!("... {} more (use --limit 0 to show all)", results.len() - shown);
    }
}

fn print_profile(profile: &ResumeProfile) {
    println!("Skills ({}):", profile.skills.len());
    let mut groups: Vec<(SkillCategory, Vec<&str>)> = Vec::new();
    for name in &profile.skills {
        let category = skills::lookup(name).map_or(SkillCategory::Other, |s| s.category);
        match groups.iter_mut().find(|(c, _)| *c == category) {
            Some((_, names)) => names.push(name.as_str()),
            None => groups.push((category, vec![name.as_str()])),
        }
    }
    for (category, names) in groups {
        println!("  {:<18} {}", category.label(), names.join(", "));
    }
    println!("Experience: {} years", profile.experience_years);
    if !profile.job_titles.is_empty() {
        println!("Job titles:");
        for title in &profile.job_titles {
            println!("  - {}", title);
        }
    }
    if !profile.education.is_empty() {
        println!("Education:");
        for line in &profile.education {
            println!("  - {}", line);
        }
    }
    if !profile.suggested_roles.is_empty() {
        println!("Suggested roles: {}", profile.suggested_roles.join(", "));
    }
    println!("Word count: {}", profile.word_count);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let store = Store::open(cli.data_dir).context("Failed to open data directory")?;
    let config = store.load_config();

    match cli.command {
        Commands::Init => {
            store.save_config(&config).context("Failed to write config")?;
            println!("Data directory: {}", store.path().display());
            println!("Jobs directory: {}", config.jobs_dir.display());
        }

        Commands::Filter {
            file,
            query,
            threshold,
            resume,
            limit,
            export,
            browse,
        } => {
            let jobs = store::load_jobs(&file)
                .with_context(|| format!("Failed to load jobs from {}", file.display()))?;

            let profile = if resume {
                let profile = store.load_resume();
                if profile.is_none() {
                    println!("No resume profile saved; run `jobsift resume parse <FILE>` first.");
                }
                profile
            } else {
                None
            };

            let scorer = Scorer::new(config.weights);
            let threshold = threshold.unwrap_or(config.default_threshold);
            let results = rank::filter(&scorer, &jobs, &query, threshold, profile.as_ref());

            if !query.trim().is_empty() && store.record_query(&query).context("Failed to save search history")? {
                info!(query = %query.trim(), "added to history");
            }

            if results.is_empty() {
                println!("No jobs match '{}' at threshold {:.2}.", query, rank::clamp_threshold(threshold));
            } else {
                println!("{} of {} jobs match '{}'\n", results.len(), jobs.len(), query);
                print_results(&results, limit.unwrap_or(config.result_limit));
            }

            if let Some(path) = export {
                let path = path.unwrap_or_else(|| {
                    config
                        .export_dir
                        .join(store::default_export_name(&query, Local::now().naive_local()))
                });
                let count = store::export_jobs(&path, results.iter().map(|r| r.job))
                    .with_context(|| format!("Failed to export to {}", path.display()))?;
                println!("Exported {} jobs to {}", count, path.display());
            }

            if browse {
                tui::run_browse(&store, results, &query, profile.as_ref())?;
            }
        }

        Commands::History { clear } => {
            if clear {
                store.clear_history().context("Failed to clear history")?;
                println!("Search history cleared.");
            } else {
                let history = store.load_history();
                if history.job_functions.is_empty() {
                    println!("No previous searches.");
                } else {
                    for (i, query) in history.job_functions.iter().enumerate() {
                        println!("{:>3}. {}", i + 1, query);
                    }
                }
            }
        }

        Commands::Files => {
            let files = store::list_job_files(&config.jobs_dir)
                .with_context(|| format!("Failed to list {}", config.jobs_dir.display()))?;
            if files.is_empty() {
                println!("No job files in {}.", config.jobs_dir.display());
            } else {
                for path in files {
                    println!("{}", path.display());
                }
            }
        }

        Commands::Apply {
            file,
            job_id,
            status,
            notes,
        } => {
            let status = parse_status(&status)?;
            let jobs = store::load_jobs(&file)
                .with_context(|| format!("Failed to load jobs from {}", file.display()))?;
            let job = jobs
                .iter()
                .find(|job| job.id == job_id)
                .ok_or_else(|| anyhow!("Job '{}' not found in {}", job_id, file.display()))?;

            let record = store
                .mark_application(job, status, notes.as_deref())
                .context("Failed to save application")?;
            println!(
                "Marked '{}' at {} as {} (applied {}).",
                record.job_title,
                if record.company.is_empty() { "?" } else { record.company.as_str() },
                record.status,
                record.applied_date
            );
        }

        Commands::Applications { status } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            let applications = store.load_applications();
            let rows: Vec<_> = applications
                .iter()
                .filter(|(_, app)| status.is_none_or(|s| app.status == s))
                .collect();

            if rows.is_empty() {
                println!("No applications found.");
            } else {
                println!(
                    "{:<10} {:<20} {:<28} {:<20} {:<12}",
                    "ID", "STATUS", "TITLE", "COMPANY", "APPLIED"
                );
                println!("{}", "-".repeat(94));
                for (id, app) in rows {
                    println!(
                        "{:<10} {:<20} {:<28} {:<20} {:<12}",
                        truncate(id, 10),
                        app.status,
                        truncate(&app.job_title, 26),
                        truncate(&app.company, 18),
                        app.applied_date
                    );
                }
            }
        }

        Commands::Resume { command } => match command {
            ResumeCommands::Parse { file } => {
                let profile = resume::parse_and_store(&store, &file)
                    .with_context(|| format!("Failed to parse resume {}", file.display()))?;
                println!("Parsed {}\n", file.display());
                print_profile(&profile);
            }

            ResumeCommands::Show => match store.load_resume() {
                Some(profile) => print_profile(&profile),
                None => println!("No resume profile saved."),
            },

            ResumeCommands::Clear => {
                if store.clear_resume().context("Failed to remove resume profile")? {
                    println!("Resume profile removed.");
                } else {
                    println!("No resume profile saved.");
                }
            }
        },
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
