mod commands;
mod logging;
mod progress;
mod prompt;

use std::io;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use progress::CliReporter;
use srcflat_core::selection::{parse_selection, prompt_selection};
use srcflat_core::{AppConfig, Engine, ProjectCandidate, SourceRootKind};
use tracing::error;

/// How a run ended; each maps to a distinct process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunStatus {
    Completed,
    Cancelled,
    Failed,
    RootUnavailable,
    NoProjects,
}

impl RunStatus {
    fn code(self) -> u8 {
        match self {
            RunStatus::Completed | RunStatus::Cancelled => 0,
            RunStatus::Failed => 1,
            RunStatus::RootUnavailable => 2,
            RunStatus::NoProjects => 3,
        }
    }

    fn exit_code(self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

fn main() -> ExitCode {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let mut config = match srcflat_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            return finish(RunStatus::Failed, args.no_wait);
        }
    };
    args.apply_overrides(&mut config);

    let outcome = match args.command.unwrap_or_default() {
        Commands::Copy => run_copy(&config, &args),
        Commands::List => run_list(&config),
        Commands::PrintConfig => {
            println!("Configuration: {:#?}", config);
            return ExitCode::SUCCESS;
        }
    };

    let status = outcome.unwrap_or_else(|err| {
        error!("Error: {:#}", err);
        match err.downcast_ref::<srcflat_core::Error>() {
            Some(core_err) if core_err.is_root_failure() => {
                eprintln!(
                    "{} Please check the `projects_root` setting or pass --root.",
                    "[Error]".red()
                );
                RunStatus::RootUnavailable
            }
            _ => RunStatus::Failed,
        }
    });

    let no_wait = args.no_wait || matches!(args.command, Some(Commands::List));
    finish(status, no_wait)
}

fn finish(status: RunStatus, no_wait: bool) -> ExitCode {
    if !no_wait {
        if let Err(err) = prompt::wait_for_enter() {
            error!("Error reading from stdin: {}", err);
        }
    }
    status.exit_code()
}

fn discover_projects(
    engine: &Engine,
    reporter: &CliReporter,
) -> anyhow::Result<Vec<ProjectCandidate>> {
    let root = &engine.scan_config().root;
    let projects = engine.discover(reporter)?;
    if projects.is_empty() {
        println!(
            "{} No project folders found in \"{}\".",
            "[Warning]".yellow(),
            root.display()
        );
    }
    Ok(projects)
}

fn run_list(config: &AppConfig) -> anyhow::Result<RunStatus> {
    let engine = Engine::new(config)?;
    let reporter = CliReporter::new();

    let projects = discover_projects(&engine, &reporter)?;
    if projects.is_empty() {
        return Ok(RunStatus::NoProjects);
    }

    prompt::print_projects(&projects);
    Ok(RunStatus::Completed)
}

fn run_copy(config: &AppConfig, args: &Cli) -> anyhow::Result<RunStatus> {
    let engine = Engine::new(config)?.with_dry_run(args.dry_run);
    let reporter = CliReporter::new();

    prompt::print_header(&format!(
        "Source Code Copier ({} files)",
        engine.scan_config().extension
    ));

    let projects = discover_projects(&engine, &reporter)?;
    if projects.is_empty() {
        return Ok(RunStatus::NoProjects);
    }

    prompt::print_projects(&projects);
    println!("-------------------------------------------------------------");

    let index = match args.select {
        Some(choice) => match parse_selection(&choice.to_string(), projects.len()) {
            Ok(index) => index,
            Err(err) => bail!("--select {}: {}", choice, err),
        },
        None => {
            let stdin = io::stdin();
            match prompt_selection(stdin.lock(), io::stdout(), projects.len())
                .context("Error reading project selection")?
            {
                Some(index) => index,
                None => {
                    println!("\n{} No project selected, exiting.", "[Info]".cyan());
                    return Ok(RunStatus::Cancelled);
                }
            }
        }
    };

    let plan = engine.plan_for(&projects[index]);
    if plan.source.kind == SourceRootKind::ProjectRoot {
        println!(
            "{} No source layout found in \"{}\", will copy from the project root directory.",
            "[Info]".cyan(),
            plan.project.label
        );
    }

    println!();
    println!("[Info] Flattening and copying project files...");
    println!("  Project Name:     {}", plan.project.name());
    println!("  Source Directory: {}", plan.copy.source_root.display());
    println!("  Target Directory: {}", plan.copy.destination.display());
    println!();

    let result = engine.copy(&plan, &reporter)?;
    prompt::print_summary(&result, plan.copy.extension.suffix(), plan.copy.dry_run);

    Ok(RunStatus::Completed)
}
