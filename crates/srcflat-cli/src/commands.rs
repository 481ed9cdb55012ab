use clap::{Parser, Subcommand};
use srcflat_core::{AppConfig, DiscoveryMode};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "srcflat")]
#[command(about = "Pick a source project and copy its files into one flat directory", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory scanned for projects
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Directory the chosen project is copied into (as a subdirectory named after it)
    #[arg(long, global = true)]
    pub dest: Option<PathBuf>,

    /// Maximum directory depth below the root
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,

    /// File extension to copy, e.g. `java` or `.kt`
    #[arg(long, global = true)]
    pub ext: Option<String>,

    /// Only list the root's immediate subdirectories instead of walking it
    #[arg(long, global = true)]
    pub children: bool,

    /// Show what would be copied without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Choose a project by its number instead of prompting
    #[arg(long)]
    pub select: Option<usize>,

    /// Exit without waiting for Enter
    #[arg(long)]
    pub no_wait: bool,
}

#[derive(Debug, Clone, Copy, Default, Subcommand)]
pub enum Commands {
    /// Discover projects, choose one, and flatten-copy its sources (default)
    #[default]
    Copy,
    /// Print the discovered projects and exit
    List,
    /// Print configuration values
    PrintConfig,
}

impl Cli {
    /// Command-line flags take precedence over Config.toml and environment values.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(root) = &self.root {
            config.projects_root = root.clone();
        }
        if let Some(dest) = &self.dest {
            config.destination_root = dest.clone();
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(ext) = &self.ext {
            config.extension = ext.clone();
        }
        if self.children {
            config.mode = DiscoveryMode::Children;
        }
    }
}
