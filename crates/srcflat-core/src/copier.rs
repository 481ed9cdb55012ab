//! Flattening copy: every qualifying file under a source tree lands directly in
//! one destination directory, renamed `<stem>_<n><ext>` when its name is taken.

use crate::config::absolute;
use crate::error::Error;
use crate::model::Extension;
use crate::progress::ProgressReporter;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct CopyPlan {
    pub source_root: PathBuf,
    pub destination: PathBuf,
    pub extension: Extension,
    /// Plan names and report them without touching the filesystem.
    pub dry_run: bool,
}

impl CopyPlan {
    pub fn new(
        source_root: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        extension: Extension,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            destination: destination.into(),
            extension,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRecord {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub renamed: bool,
}

impl CopyRecord {
    pub fn source_name(&self) -> String {
        file_name_lossy(&self.source)
    }

    pub fn destination_name(&self) -> String {
        file_name_lossy(&self.destination)
    }
}

#[derive(Debug, Clone)]
pub struct CopyFailure {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub renamed: bool,
    pub message: String,
}

/// Outcome of one flattening copy run.
#[derive(Debug, Clone, Default)]
pub struct CopyResult {
    /// Every qualifying file that was attempted, failed ones included.
    pub processed: usize,
    /// Files written under a numbered name because the original was taken.
    pub renamed: usize,
    pub failed: usize,
    pub destination: PathBuf,
    pub copied: Vec<CopyRecord>,
    pub failures: Vec<CopyFailure>,
}

impl CopyResult {
    fn new(destination: PathBuf) -> Self {
        Self {
            destination,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.processed == 0
    }

    fn record(mut self, outcome: Result<CopyRecord, CopyFailure>) -> Self {
        self.processed += 1;
        match outcome {
            Ok(record) => {
                if record.renamed {
                    self.renamed += 1;
                }
                self.copied.push(record);
            }
            Err(failure) => {
                if failure.renamed {
                    self.renamed += 1;
                }
                self.failed += 1;
                self.failures.push(failure);
            }
        }
        self
    }
}

impl fmt::Display for CopyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed={} renamed={} failed={} destination={}",
            self.processed,
            self.renamed,
            self.failed,
            self.destination.display()
        )
    }
}

/// Copy every file under `plan.source_root` ending in `plan.extension` into
/// `plan.destination`, discarding directory structure.
///
/// Existing destination files are never overwritten: a taken name is retried as
/// `<stem>_1<ext>`, `<stem>_2<ext>`, ... until a free one is found. A file that
/// fails to copy is recorded and the run continues.
pub fn copy_flat(plan: &CopyPlan, reporter: &dyn ProgressReporter) -> Result<CopyResult, Error> {
    if !plan.source_root.is_dir() {
        return Err(Error::SourceNotDirectory(plan.source_root.clone()));
    }
    if !plan.dry_run && !plan.destination.is_dir() {
        debug!("Creating target directory {}", plan.destination.display());
        fs::create_dir_all(&plan.destination).map_err(|source| Error::DestinationInit {
            path: plan.destination.clone(),
            source,
        })?;
    }

    reporter.on_copy_start(plan);
    let copy_start = Instant::now();

    // The destination may live inside the source tree; never read back what we write.
    let destination_abs = absolute(&plan.destination);
    let mut claimed: HashSet<OsString> = HashSet::new();

    let result = qualifying_files(&plan.source_root, &plan.extension, &destination_abs).fold(
        CopyResult::new(plan.destination.clone()),
        |result, source| {
            let outcome = copy_one(&source, plan, &mut claimed);
            match &outcome {
                Ok(record) => reporter.on_file_copied(record),
                Err(failure) => reporter.on_file_failed(failure),
            }
            result.record(outcome)
        },
    );

    let copy_duration = copy_start.elapsed();
    if result.is_empty() {
        info!(
            "No {} files found under {}",
            plan.extension,
            plan.source_root.display()
        );
    } else {
        debug!(
            "Copy completed in {:.2}s: {}",
            copy_duration.as_secs_f64(),
            result
        );
    }
    reporter.on_copy_complete(&result, copy_duration.as_secs_f64());

    Ok(result)
}

/// Regular files under `source_root` whose name ends with `extension`, in
/// file-name order, skipping the `exclude` subtree. Symlinks are not followed.
pub fn qualifying_files<'a>(
    source_root: &Path,
    extension: &'a Extension,
    exclude: &'a Path,
) -> impl Iterator<Item = PathBuf> + 'a {
    WalkDir::new(source_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| {
            entry.depth() == 0 || absolute(entry.path()).as_path() != exclude
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(move |entry| entry.file_type().is_file() && extension.matches(entry.path()))
        .map(|entry| entry.into_path())
}

/// `Foo.java` → `Foo_<n>.java`; the split is at the last dot. Non-UTF-8 names
/// keep their bytes.
pub fn numbered_name(file_name: &OsStr, n: usize) -> OsString {
    let path = Path::new(file_name);
    let mut name = OsString::with_capacity(file_name.len() + 4);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => {
            name.push(stem);
            name.push(format!("_{}.", n));
            name.push(ext);
        }
        // `.java`: everything after the leading dot is the extension
        _ if file_name.as_encoded_bytes().first() == Some(&b'.') => {
            name.push(format!("_{}", n));
            name.push(file_name);
        }
        _ => {
            name.push(file_name);
            name.push(format!("_{}", n));
        }
    }
    name
}

fn copy_one(
    source: &Path,
    plan: &CopyPlan,
    claimed: &mut HashSet<OsString>,
) -> Result<CopyRecord, CopyFailure> {
    let file_name = source.file_name().unwrap_or_default().to_os_string();

    let mut attempt = 0usize;
    loop {
        let name = if attempt == 0 {
            file_name.clone()
        } else {
            numbered_name(&file_name, attempt)
        };
        let renamed = attempt > 0;
        attempt += 1;

        let destination = plan.destination.join(&name);
        if claimed.contains(&name) || destination.exists() {
            continue;
        }

        if plan.dry_run {
            claimed.insert(name);
            return Ok(CopyRecord {
                source: source.to_path_buf(),
                destination,
                renamed,
            });
        }

        match write_new(source, &destination) {
            Ok(bytes) => {
                debug!(
                    "Copied {} -> {} ({} bytes)",
                    source.display(),
                    destination.display(),
                    bytes
                );
                claimed.insert(name);
                return Ok(CopyRecord {
                    source: source.to_path_buf(),
                    destination,
                    renamed,
                });
            }
            // Appeared between the probe and the write; keep probing.
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => {
                error!(
                    "Failed to copy file {} -> {}: {}",
                    source.display(),
                    destination.display(),
                    err
                );
                return Err(CopyFailure {
                    source: source.to_path_buf(),
                    destination,
                    renamed,
                    message: err.to_string(),
                });
            }
        }
    }
}

/// Copy bytes into a file that must not already exist.
fn write_new(source: &Path, destination: &Path) -> io::Result<u64> {
    let mut reader = File::open(source)?;
    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)?;

    io::copy(&mut reader, &mut writer).inspect_err(|_| {
        let _ = fs::remove_file(destination);
    })
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_name_splits_at_last_dot() {
        assert_eq!(numbered_name(OsStr::new("Foo.java"), 1), "Foo_1.java");
        assert_eq!(numbered_name(OsStr::new("Foo.test.java"), 2), "Foo.test_2.java");
        assert_eq!(numbered_name(OsStr::new("Makefile"), 3), "Makefile_3");
        assert_eq!(numbered_name(OsStr::new(".java"), 1), "_1.java");
        assert_eq!(numbered_name(OsStr::new("..java"), 1), "._1.java");
        assert_eq!(numbered_name(OsStr::new("Foo."), 1), "Foo_1.");
    }

    #[test]
    fn test_record_counts_failures_as_processed() {
        let result = CopyResult::new(PathBuf::from("/dest"))
            .record(Ok(CopyRecord {
                source: PathBuf::from("/src/a/X.java"),
                destination: PathBuf::from("/dest/X.java"),
                renamed: false,
            }))
            .record(Err(CopyFailure {
                source: PathBuf::from("/src/b/X.java"),
                destination: PathBuf::from("/dest/X_1.java"),
                renamed: true,
                message: "permission denied".to_string(),
            }));

        assert_eq!(result.processed, 2);
        assert_eq!(result.renamed, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(result.copied.len(), 1);
        assert_eq!(
            result.to_string(),
            "processed=2 renamed=1 failed=1 destination=/dest"
        );
    }
}
