use crate::config::{absolute, AppConfig, ScanConfig};
use crate::copier::{self, CopyPlan, CopyResult};
use crate::discovery::{self, SourceRoot};
use crate::error::Error;
use crate::model::ProjectCandidate;
use crate::progress::ProgressReporter;
use std::path::PathBuf;
use tracing::debug;

/// Runs discovery and the flattening copy against one configuration.
pub struct Engine {
    scan: ScanConfig,
    destination_root: PathBuf,
    dry_run: bool,
}

/// Where a chosen project's files come from and go to.
#[derive(Debug, Clone)]
pub struct ProjectPlan {
    pub project: ProjectCandidate,
    pub source: SourceRoot,
    pub copy: CopyPlan,
}

impl Engine {
    pub fn new(config: &AppConfig) -> Result<Self, Error> {
        Ok(Self {
            scan: config.scan_config()?,
            destination_root: absolute(&config.destination_root),
            dry_run: false,
        })
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn scan_config(&self) -> &ScanConfig {
        &self.scan
    }

    pub fn discover(
        &self,
        reporter: &dyn ProgressReporter,
    ) -> Result<Vec<ProjectCandidate>, Error> {
        discovery::discover(&self.scan, reporter)
    }

    /// Resolve the project's source root; the destination is named after the project directory.
    pub fn plan_for(&self, project: &ProjectCandidate) -> ProjectPlan {
        let source = discovery::resolve_source_root(&project.path, &self.scan);
        let copy = CopyPlan::new(
            source.path.clone(),
            self.destination_root.join(project.name()),
            self.scan.extension.clone(),
        )
        .with_dry_run(self.dry_run);

        ProjectPlan {
            project: project.clone(),
            source,
            copy,
        }
    }

    pub fn copy(
        &self,
        plan: &ProjectPlan,
        reporter: &dyn ProgressReporter,
    ) -> Result<CopyResult, Error> {
        debug!(
            "Flattening {} from {} into {}",
            plan.project.label,
            plan.copy.source_root.display(),
            plan.copy.destination.display()
        );
        copier::copy_flat(&plan.copy, reporter)
    }
}
