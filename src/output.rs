//! Progress lines, spinners, and the end-of-run summary.

use crate::config::Config;
use crate::constants::PROGRESS_TICK_MS;
use crate::error::Result;
use crate::repo::{SyncOutcome, SyncStep, short_sha};
use crate::update::UpdateReport;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Installing,
    Updating,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::Installing => "Installing",
            Action::Updating => "Updating",
        }
    }
}

fn format_counter(position: Option<(usize, usize)>) -> String {
    position
        .map(|(index, total)| format!(" ({}/{})", index, total))
        .unwrap_or_default()
}

pub fn print_action(config: &Config, action: Action, name: &str, position: Option<(usize, usize)>) {
    if config.is_quiet() {
        return;
    }
    let label = match action {
        Action::Installing => action.label().green().bold(),
        Action::Updating => action.label().cyan().bold(),
    };
    println!("{} {}{}", label, name, format_counter(position).dimmed());
}

pub fn print_install_path(config: &Config, path: &Path) {
    if config.is_quiet() {
        return;
    }
    println!(
        "{} {}",
        "Install path:".cyan(),
        path.display().to_string().white().bold()
    );
}

/// Per-repository step feedback: a transient spinner in normal mode,
/// step lines on stderr in verbose mode, nothing in quiet mode.
pub struct StepProgress {
    spinner: Option<ProgressBar>,
    config: Config,
}

impl StepProgress {
    #[must_use]
    pub fn start(config: &Config) -> Self {
        let spinner = if config.is_quiet() || config.is_verbose() {
            None
        } else {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                .template("  {spinner:.cyan} {msg}")
            {
                spinner.set_style(style);
            }
            spinner.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
            Some(spinner)
        };

        Self {
            spinner,
            config: *config,
        }
    }

    pub fn update(&self, step: &SyncStep) {
        if let Some(spinner) = &self.spinner {
            spinner.set_message(format!("{}...", step));
        }
        if self.config.is_verbose() {
            eprintln!("  {}...", step.to_string().dimmed());
        }
    }

    pub fn finish(&self, result: &Result<SyncOutcome>) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
        if !self.config.is_verbose() {
            return;
        }
        match result {
            Ok(outcome) => eprintln!("  {} {}", "✓".green(), describe_outcome(outcome)),
            Err(err) => eprintln!("  {} {}", "✗".red(), err),
        }
    }
}

#[must_use]
pub fn describe_outcome(outcome: &SyncOutcome) -> String {
    match outcome {
        SyncOutcome::Cloned { head } => format!("cloned at {}", short_sha(head)),
        SyncOutcome::UpToDate { head } => format!("already up to date at {}", short_sha(head)),
        SyncOutcome::FastForwarded { from, to } => {
            format!("fast-forwarded {}..{}", short_sha(from), short_sha(to))
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub cloned: usize,
    pub fast_forwarded: usize,
    pub up_to_date: usize,
}

impl OutcomeCounts {
    pub fn tally<'a>(outcomes: impl IntoIterator<Item = &'a SyncOutcome>) -> Self {
        outcomes
            .into_iter()
            .fold(Self::default(), |mut counts, outcome| {
                match outcome {
                    SyncOutcome::Cloned { .. } => counts.cloned += 1,
                    SyncOutcome::FastForwarded { .. } => counts.fast_forwarded += 1,
                    SyncOutcome::UpToDate { .. } => counts.up_to_date += 1,
                }
                counts
            })
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.cloned + self.fast_forwarded + self.up_to_date
    }
}

pub fn print_summary(report: &UpdateReport, config: &Config) {
    let counts = OutcomeCounts::tally(report.outcomes());
    if config.is_quiet() {
        println!("{} repositories synced", counts.total());
        return;
    }

    print_section("Summary");
    println!(
        "  {} installed, {} updated, {} already up to date",
        counts.cloned.to_string().green().bold(),
        counts.fast_forwarded.to_string().cyan().bold(),
        counts.up_to_date.to_string().white().bold(),
    );
    println!(
        "{}: {} repositories ({} roles) in {}",
        "Total".white().bold(),
        counts.total(),
        report.roles.len(),
        format_duration(report.duration)
    );
}

pub fn print_aborted() {
    eprintln!("\n{}", "debops-update aborted by user".red().bold());
}

fn format_duration(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f32())
}

fn print_section(title: &str) {
    let line = "=".repeat(50).cyan().dimmed();
    let padding = (50 - title.len()) / 2;
    let centered = format!("{:>width$}", title, width = padding + title.len());
    println!("\n{}\n{}\n{}\n", line, centered.cyan().bold(), line);
}
