use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use srcflat_core::{CopyFailure, CopyPlan, CopyRecord, ProgressReporter, ProjectCandidate};
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::time::Duration;

/// CLI progress reporter.
///
/// - Discovery: spinner (number of projects unknown upfront)
/// - Copy: one line per file, `[Copy]` or `[Rename]`
pub struct CliReporter {
    bar: RefCell<Option<ProgressBar>>,
    found: Cell<usize>,
    dry_run: Cell<bool>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: RefCell::new(None),
            found: Cell::new(0),
            dry_run: Cell::new(false),
        }
    }

    fn finish_bar(&self) {
        if let Some(pb) = self.bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }

    fn tag(&self, label: &str) -> String {
        if self.dry_run.get() {
            format!("[Plan {}]", label)
        } else {
            format!("[{}]", label)
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self, root: &Path) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.set_message(format!("Scanning projects under {}...", root.display()));
        pb.enable_steady_tick(Duration::from_millis(80));
        self.found.set(0);
        self.finish_bar();
        *self.bar.borrow_mut() = Some(pb);
    }

    fn on_project_found(&self, _candidate: &ProjectCandidate) {
        self.found.set(self.found.get() + 1);
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_message(format!("Scanning... {} projects found", self.found.get()));
        }
    }

    fn on_dir_skipped(&self, path: &Path, _reason: &str) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_message(format!("Skipped unreadable {}", path.display()));
        }
    }

    fn on_scan_complete(&self, projects: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  {} Scan complete: {} projects in {:.2}s",
            "✓".green(),
            projects,
            duration_secs
        );
    }

    fn on_copy_start(&self, plan: &CopyPlan) {
        self.dry_run.set(plan.dry_run);
        let action = if plan.dry_run {
            "Planning"
        } else {
            "Collecting and copying"
        };
        println!("[Operation] {} only {} files...", action, plan.extension);
    }

    fn on_file_copied(&self, record: &CopyRecord) {
        if record.renamed {
            println!(
                "  {} {} -> {}",
                self.tag("Rename").yellow(),
                record.source_name(),
                record.destination_name()
            );
        } else {
            println!("  {} {}", self.tag("Copy").green(), record.destination_name());
        }
    }

    fn on_file_failed(&self, failure: &CopyFailure) {
        eprintln!(
            "  {} Failed to copy file: {} -> {} ({})",
            "[Error]".red(),
            failure.source.display(),
            failure.destination.display(),
            failure.message
        );
    }
}
