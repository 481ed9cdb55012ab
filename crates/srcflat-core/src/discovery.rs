use crate::config::{DiscoveryMode, ScanConfig};
use crate::error::Error;
use crate::model::{Extension, ProjectCandidate};
use crate::progress::ProgressReporter;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// How far below a loose source directory (e.g. `src`) qualifying files are looked for.
pub const LOOSE_SOURCE_DEPTH: usize = 2;

/// Find project directories under `config.root`.
///
/// In recursive mode the walk is depth-first, entries sorted by file name, and a
/// qualifying directory is still descended so nested projects are reported too.
/// Excluded directories are pruned with their whole subtree. Listing failures
/// below the root are logged and prune only that branch; a missing or
/// unreadable root is an error.
pub fn discover(
    config: &ScanConfig,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<ProjectCandidate>, Error> {
    check_root(&config.root)?;

    info!("Scanning projects under {}", config.root.display());
    reporter.on_scan_start(&config.root);
    let scan_start = Instant::now();

    let projects = match config.mode {
        DiscoveryMode::Recursive => walk_projects(config, reporter),
        DiscoveryMode::Children => list_children(config, reporter)?,
    };

    let scan_duration = scan_start.elapsed();
    debug!(
        "Discovery completed in {:.2}s, {} projects",
        scan_duration.as_secs_f64(),
        projects.len()
    );
    reporter.on_scan_complete(projects.len(), scan_duration.as_secs_f64());

    Ok(projects)
}

fn check_root(root: &Path) -> Result<(), Error> {
    if !root.is_dir() {
        return Err(Error::RootNotFound(root.to_path_buf()));
    }
    fs::read_dir(root)
        .map(|_| ())
        .map_err(|source| Error::RootUnreadable {
            path: root.to_path_buf(),
            source,
        })
}

fn walk_projects(config: &ScanConfig, reporter: &dyn ProgressReporter) -> Vec<ProjectCandidate> {
    let walker = WalkDir::new(&config.root)
        .max_depth(config.max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| should_visit(entry, config));

    let mut projects = Vec::new();
    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| config.root.clone());
                warn!("Skipping unreadable directory {}: {}", path.display(), err);
                reporter.on_dir_skipped(&path, &err.to_string());
                continue;
            }
        };

        if is_project(entry.path(), config) {
            let candidate = ProjectCandidate::new(entry.path(), &config.root);
            debug!("Project found: {}", candidate.label);
            reporter.on_project_found(&candidate);
            projects.push(candidate);
        }
    }

    projects
}

fn should_visit(entry: &DirEntry, config: &ScanConfig) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    entry.file_type().is_dir() && !config.excludes.matches(&entry.file_name().to_string_lossy())
}

fn list_children(
    config: &ScanConfig,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<ProjectCandidate>, Error> {
    let entries = fs::read_dir(&config.root).map_err(|source| Error::RootUnreadable {
        path: config.root.clone(),
        source,
    })?;

    let mut projects: Vec<ProjectCandidate> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(
                    "Error reading entry in directory {}: {}",
                    config.root.display(),
                    err
                );
                None
            }
        })
        .filter(|entry| entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false))
        .filter(|entry| !config.excludes.matches(&entry.file_name().to_string_lossy()))
        .map(|entry| ProjectCandidate::new(&entry.path(), &config.root))
        .collect();

    projects.sort_by(|a, b| a.label.cmp(&b.label));
    for project in &projects {
        reporter.on_project_found(project);
    }

    Ok(projects)
}

/// Whether `dir` looks like a self-contained source project.
pub fn is_project(dir: &Path, config: &ScanConfig) -> bool {
    if let Some(marker) = config
        .marker_files
        .iter()
        .find(|name| dir.join(name).exists())
    {
        debug!("{} has marker file {}", dir.display(), marker);
        return true;
    }

    if config
        .source_layouts
        .iter()
        .any(|layout| dir.join(layout).is_dir())
    {
        return true;
    }

    if config
        .loose_source_dirs
        .iter()
        .any(|name| contains_extension(&dir.join(name), &config.extension, LOOSE_SOURCE_DEPTH))
    {
        return true;
    }

    config.extension_fallback && contains_extension(dir, &config.extension, 1)
}

/// True if `dir` holds a regular file with `extension` at most `depth` levels down.
pub fn contains_extension(dir: &Path, extension: &Extension, depth: usize) -> bool {
    if !dir.is_dir() {
        return false;
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(depth)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!("Ignoring unreadable entry under {}: {}", dir.display(), err);
                None
            }
        })
        .any(|entry| entry.file_type().is_file() && extension.matches(entry.path()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRootKind {
    /// A conventional nested layout such as `src/main/java`.
    Layout,
    /// A loose `src` directory holding qualifying files.
    Loose,
    /// Nothing better found; the project directory itself.
    ProjectRoot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoot {
    pub path: PathBuf,
    pub kind: SourceRootKind,
}

/// Pick the directory a project's sources are copied from.
///
/// First match wins: a configured source layout that exists, then a loose source
/// directory holding a qualifying file within [`LOOSE_SOURCE_DEPTH`] levels, then
/// the project directory.
pub fn resolve_source_root(project_dir: &Path, config: &ScanConfig) -> SourceRoot {
    if let Some(path) = config
        .source_layouts
        .iter()
        .map(|layout| project_dir.join(layout))
        .find(|path| path.is_dir())
    {
        return SourceRoot {
            path,
            kind: SourceRootKind::Layout,
        };
    }

    if let Some(path) = config
        .loose_source_dirs
        .iter()
        .map(|name| project_dir.join(name))
        .find(|path| contains_extension(path, &config.extension, LOOSE_SOURCE_DEPTH))
    {
        return SourceRoot {
            path,
            kind: SourceRootKind::Loose,
        };
    }

    debug!(
        "No source layout under {}, copying from the project directory",
        project_dir.display()
    );
    SourceRoot {
        path: project_dir.to_path_buf(),
        kind: SourceRootKind::ProjectRoot,
    }
}
