use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;
use std::process::{Command, Stdio};

use crate::models::{ApplicationStatus, ResumeProfile, ScoreResult};
use crate::rank::{sort_results, SortColumn};
use crate::resume::job_match_score;
use crate::store::{Applications, Store};
use crate::truncate;

struct AppState<'a> {
    results: Vec<ScoreResult<'a>>,
    query: String,
    selected: usize,
    scroll_offset: u16,
    sort: SortColumn,
    applications: Applications,
    resume: Option<&'a ResumeProfile>,
    message: Option<String>,
}

impl<'a> AppState<'a> {
    fn new(
        results: Vec<ScoreResult<'a>>,
        query: &str,
        applications: Applications,
        resume: Option<&'a ResumeProfile>,
    ) -> Self {
        Self {
            results,
            query: query.to_string(),
            selected: 0,
            scroll_offset: 0,
            sort: SortColumn::default(),
            applications,
            resume,
            message: None,
        }
    }

    fn current(&self) -> Option<&ScoreResult<'a>> {
        self.results.get(self.selected)
    }

    fn next(&mut self) {
        if !self.results.is_empty() && self.selected < self.results.len() - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }

    fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
        sort_results(&mut self.results, self.sort);
        self.selected = 0;
        self.scroll_offset = 0;
        self.message = Some(format!("Sorted by {}", self.sort.label()));
    }

    fn mark(&mut self, store: &Store, status: ApplicationStatus) {
        let Some(job) = self.current().map(|r| r.job) else { return };
        match store.mark_application(job, status, None) {
            Ok(record) => {
                self.applications.insert(job.id.clone(), record);
                self.message = Some(format!("Marked '{}' as {}", job.title, status));
            }
            Err(e) => self.message = Some(format!("Failed to save application: {}", e)),
        }
    }

    fn open_current_link(&mut self) {
        let Some(job) = self.current().map(|r| r.job) else { return };
        if job.link.is_empty() {
            self.message = Some("No link for this job".to_string());
            return;
        }
        self.message = Some(match open_link(&job.link) {
            Ok(()) => format!("Opened {}", job.link),
            Err(e) => format!("Failed to open link: {}", e),
        });
    }
}

fn open_link(url: &str) -> std::io::Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };
    command
        .arg(url)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}

pub fn run_browse(
    store: &Store,
    results: Vec<ScoreResult<'_>>,
    query: &str,
    resume: Option<&ResumeProfile>,
) -> Result<()> {
    if results.is_empty() {
        println!("No matching jobs to browse.");
        return Ok(());
    }

    let mut state = AppState::new(results, query, store.load_applications(), resume);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, store);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState<'_>,
    store: &Store,
) -> Result<()> {
    let mut list_state = ListState::default();
    list_state.select(Some(0));

    loop {
        terminal.draw(|frame| draw(frame, state, &mut list_state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Down | KeyCode::Char('j') => state.next(),
                KeyCode::Up | KeyCode::Char('k') => state.prev(),
                KeyCode::Char('J') | KeyCode::PageDown => state.scroll_down(),
                KeyCode::Char('K') | KeyCode::PageUp => state.scroll_up(),
                KeyCode::Char('s') => state.cycle_sort(),
                KeyCode::Char('a') => state.mark(store, ApplicationStatus::Applied),
                KeyCode::Char('i') => state.mark(store, ApplicationStatus::InterviewScheduled),
                KeyCode::Char('x') => state.mark(store, ApplicationStatus::Rejected),
                KeyCode::Char('o') => state.mark(store, ApplicationStatus::OfferReceived),
                KeyCode::Char('l') => state.open_current_link(),
                _ => {}
            }
            list_state.select(Some(state.selected));
        }
    }
    Ok(())
}

fn status_icon(status: Option<ApplicationStatus>) -> &'static str {
    match status {
        None => " ",
        Some(ApplicationStatus::Applied) => "+",
        Some(ApplicationStatus::InterviewScheduled) => "*",
        Some(ApplicationStatus::Rejected) => "x",
        Some(ApplicationStatus::OfferReceived) => "$",
    }
}

fn draw(frame: &mut Frame, state: &AppState<'_>, list_state: &mut ListState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(60),
        ])
        .split(rows[0]);

    // Left panel: ranked results
    let items: Vec<ListItem> = state
        .results
        .iter()
        .map(|result| {
            let job = result.job;
            let icon = status_icon(state.applications.get(&job.id).map(|a| a.status));
            let company = if job.company_name.is_empty() { "?" } else { job.company_name.as_str() };
            ListItem::new(format!(
                "{} {:>5.1}% {} | {}",
                icon,
                result.score * 100.0,
                truncate(&job.title, 32),
                truncate(company, 20)
            ))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " '{}' ({}) by {} ",
            truncate(&state.query, 24),
            state.results.len(),
            state.sort.label()
        )))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], list_state);

    // Right panel: job detail
    let detail = build_detail(state);
    let detail_widget = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));

    frame.render_widget(detail_widget, chunks[1]);

    // Footer: last action or key help
    let footer = state.message.clone().unwrap_or_else(|| {
        " j/k:navigate  J/K:scroll  s:sort  a:applied i:interview x:rejected o:offer  l:open link  q:quit"
            .to_string()
    });
    let help = Paragraph::new(footer).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, rows[1]);
}

fn build_detail<'s>(state: &'s AppState<'_>) -> Text<'s> {
    let Some(result) = state.current() else {
        return Text::raw("No job selected");
    };
    let job = result.job;

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        job.title.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if !job.company_name.is_empty() {
        lines.push(Line::from(format!("at {}", job.company_name)));
    }
    lines.push(Line::from(Span::styled(
        format!("Similarity: {:.1}%", result.score * 100.0),
        Style::default().fg(Color::Cyan),
    )));

    let fields = [
        ("Location", job.location.as_str()),
        ("Employment Type", job.employment_type.as_str()),
        ("Seniority Level", job.seniority_level.as_str()),
        ("Job Function", job.job_function.as_str()),
        ("Industries", job.industries.as_str()),
        ("Salary", job.salary.as_deref().unwrap_or_default()),
        ("Link", job.link.as_str()),
    ];
    for (label, value) in fields {
        if !value.is_empty() {
            lines.push(Line::from(format!("{}: {}", label, value)));
        }
    }

    if let Some(app) = state.applications.get(&job.id) {
        let style = match app.status {
            ApplicationStatus::Applied => Style::default().fg(Color::Cyan),
            ApplicationStatus::InterviewScheduled => Style::default().fg(Color::Yellow),
            ApplicationStatus::Rejected => Style::default().fg(Color::Red),
            ApplicationStatus::OfferReceived => Style::default().fg(Color::Green),
        };
        lines.push(Line::from(Span::styled(
            format!("Application: {} (applied {})", app.status, app.applied_date),
            style,
        )));
        if !app.notes.is_empty() {
            lines.push(Line::from(format!("Notes: {}", app.notes)));
        }
    }

    lines.push(Line::from(""));

    if let Some(profile) = state.resume {
        lines.push(Line::from(Span::styled(
            "RESUME",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        let fit = job_match_score(profile, &job.title, &job.description_text);
        lines.push(Line::from(format!("  Fit: {:.0}%", fit * 100.0)));
        if result.matched_skills.is_empty() {
            lines.push(Line::from(Span::styled(
                "  (no resume skills found in this posting)",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            lines.push(Line::from(format!("  Matched skills: {}", result.matched_skills.join(", "))));
        }
        lines.push(Line::from(""));
    }

    if job.description_text.is_empty() {
        lines.push(Line::from(Span::styled(
            "(No description)",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Description",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for line in textwrap::fill(&job.description_text, 70).lines() {
            lines.push(Line::from(line.to_string()));
        }
    }

    Text::from(lines)
}
