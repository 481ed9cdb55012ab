use colored::*;
use console::Term;
use srcflat_core::{CopyResult, ProjectCandidate};
use std::io::{self, Write};

const RULE: &str = "=============================================================";

pub fn print_header(title: &str) {
    let _ = Term::stdout().clear_screen();
    println!("{}", RULE);
    println!("     {}", title.bold());
    println!("{}\n", RULE);
}

pub fn print_projects(projects: &[ProjectCandidate]) {
    for (index, project) in projects.iter().enumerate() {
        println!("  {}. {}", index + 1, project.label);
    }
}

pub fn print_summary(result: &CopyResult, extension: &str, dry_run: bool) {
    println!(
        "\n====================== {} ======================",
        if dry_run {
            "Dry Run Completed"
        } else {
            "Operation Completed"
        }
    );
    if result.is_empty() {
        println!(
            "  {}",
            format!("No {} files found in the source directory.", extension).yellow()
        );
    } else {
        println!(
            "  Total {} files processed: {}",
            extension,
            format!("{}", result.processed).green()
        );
        println!(
            "  Number of files renamed due to conflicts: {}",
            format!("{}", result.renamed).yellow()
        );
        if result.failed > 0 {
            println!(
                "  Number of files that failed to copy: {}",
                format!("{}", result.failed).red()
            );
        }
        println!(
            "  All files {} to:",
            if dry_run { "would be copied" } else { "copied" }
        );
        println!("  {}", result.destination.display());
    }
    println!("{}\n", RULE);
}

/// Block until the operator presses Enter (or input ends).
pub fn wait_for_enter() -> io::Result<()> {
    print!("Press Enter to exit...");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(())
}
