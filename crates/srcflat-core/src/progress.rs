use crate::copier::{CopyFailure, CopyPlan, CopyRecord, CopyResult};
use crate::model::ProjectCandidate;
use std::path::Path;

/// Trait for reporting discovery and copy progress.
///
/// The CLI implements it with indicatif and console lines; tests record events.
/// All methods have default no-op implementations.
pub trait ProgressReporter {
    fn on_scan_start(&self, _root: &Path) {}
    fn on_project_found(&self, _candidate: &ProjectCandidate) {}
    /// A directory whose listing failed; its subtree is not scanned.
    fn on_dir_skipped(&self, _path: &Path, _reason: &str) {}
    fn on_scan_complete(&self, _projects: usize, _duration_secs: f64) {}
    fn on_copy_start(&self, _plan: &CopyPlan) {}
    fn on_file_copied(&self, _record: &CopyRecord) {}
    fn on_file_failed(&self, _failure: &CopyFailure) {}
    fn on_copy_complete(&self, _result: &CopyResult, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
