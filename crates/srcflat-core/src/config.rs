use crate::error::Error;
use crate::model::{ExcludeSet, Extension};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File as ConfigFile};
use directories::UserDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// How discovery walks the scan root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryMode {
    /// Depth-first walk classifying every directory with the marker heuristics.
    #[default]
    Recursive,
    /// Every immediate subdirectory of the root is a candidate, sorted by name.
    Children,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub projects_root: PathBuf,
    pub destination_root: PathBuf,
    pub max_depth: usize,
    pub extension: String,
    pub exclude_dirs: Vec<String>,
    pub marker_files: Vec<String>,
    pub source_layouts: Vec<String>,
    pub loose_source_dirs: Vec<String>,
    pub extension_fallback: bool,
    pub mode: DiscoveryMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            projects_root: home_dir().join("IdeaProjects"),
            destination_root: documents_dir().join("CODE"),
            max_depth: 3,
            extension: "java".to_string(),
            exclude_dirs: to_strings(&[
                ".git",
                ".idea",
                ".gradle",
                ".mvn",
                "target",
                "build",
                "out",
                "bin",
                "node_modules",
            ]),
            marker_files: to_strings(&[
                "pom.xml",
                "build.gradle",
                "build.gradle.kts",
                "settings.gradle",
                "settings.gradle.kts",
                "build.xml",
                ".project",
            ]),
            source_layouts: to_strings(&["src/main/java"]),
            loose_source_dirs: to_strings(&["src"]),
            extension_fallback: true,
            mode: DiscoveryMode::Recursive,
        }
    }
}

impl AppConfig {
    /// Validate and compile into the value discovery and resolution run against.
    pub fn scan_config(&self) -> Result<ScanConfig, Error> {
        let extension = Extension::parse(&self.extension)?;
        if self.projects_root.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "projects_root must not be empty".to_string(),
            ));
        }

        Ok(ScanConfig {
            root: absolute(&self.projects_root),
            max_depth: self.max_depth,
            excludes: ExcludeSet::new(&self.exclude_dirs),
            marker_files: self.marker_files.clone(),
            source_layouts: self.source_layouts.iter().map(PathBuf::from).collect(),
            loose_source_dirs: self.loose_source_dirs.clone(),
            extension,
            extension_fallback: self.extension_fallback,
            mode: self.mode,
        })
    }
}

/// Compiled discovery settings.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub root: PathBuf,
    pub max_depth: usize,
    pub excludes: ExcludeSet,
    pub marker_files: Vec<String>,
    pub source_layouts: Vec<PathBuf>,
    pub loose_source_dirs: Vec<String>,
    pub extension: Extension,
    pub extension_fallback: bool,
    pub mode: DiscoveryMode,
}

/// Load `Config.toml` (optional) and `SRCFLAT_*` environment variables over the defaults.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(
            Environment::with_prefix("SRCFLAT")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("exclude_dirs")
                .with_list_parse_key("marker_files")
                .with_list_parse_key("source_layouts")
                .with_list_parse_key("loose_source_dirs"),
        );
    build_configuration(builder)
}

pub fn build_configuration(
    builder: ConfigBuilder<DefaultState>,
) -> Result<AppConfig, ConfigError> {
    builder.build()?.try_deserialize::<AppConfig>()
}

pub(crate) fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn home_dir() -> PathBuf {
    UserDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn documents_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| home_dir().join("Documents"))
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
