pub mod config;
pub mod copier;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod model;
pub mod progress;
pub mod selection;

pub use config::{AppConfig, DiscoveryMode, ScanConfig};
pub use copier::{copy_flat, CopyFailure, CopyPlan, CopyRecord, CopyResult};
pub use discovery::{discover, resolve_source_root, SourceRoot, SourceRootKind};
pub use engine::{Engine, ProjectPlan};
pub use error::Error;
pub use model::{ExcludeSet, Extension, ProjectCandidate};
pub use progress::{ProgressReporter, SilentReporter};
