//! depjob - Dependency update job runner CLI
//!
//! Runs one update job against a repository checkout and reports the
//! pull-request events it produced.

use anyhow::Context;
use clap::Parser;
use depjob::api::{ApiHandler, HttpApiHandler, RecordingApiHandler};
use depjob::cli::{CliArgs, Command, PickVersionArgs, RunArgs, SelectArgs};
use depjob::config::{Config, TOKEN_ENV_VAR};
use depjob::domain::{Job, Requirement, Version};
use depjob::output::{create_formatter, OutputConfig, RunReport};
use depjob::progress::Progress;
use depjob::run::{select_handler, RunWorker};
use depjob::update::{ReleaseCandidate, VersionCandidateFilter};
use depjob::workers::CommandWorkers;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr log subscriber
fn init_logging(default_level: &str, verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    match args.command {
        Command::Run(run_args) => run_job(run_args, args.verbose, args.quiet).await,
        Command::Select(select_args) => {
            init_logging("info", args.verbose, args.quiet);
            select(select_args)
        }
        Command::PickVersion(pick_args) => {
            init_logging("info", args.verbose, args.quiet);
            pick_version(pick_args)
        }
    }
}

async fn run_job(args: RunArgs, verbose: bool, quiet: bool) -> anyhow::Result<ExitCode> {
    let config = Config::load(args.config.as_deref())?
        .with_env_token(std::env::var(TOKEN_ENV_VAR).ok())
        .with_cli_overrides(args.api_url.clone(), args.job_id.clone())?;
    init_logging(&config.logging.level, verbose, quiet);

    let job = Job::from_file(&args.job)?;
    let workers = CommandWorkers::new(config.worker_commands()?);

    let api = match (&config.api.url, &config.api.job_id) {
        (Some(url), Some(job_id)) => {
            debug!("forwarding events to {}", url);
            let http = HttpApiHandler::new(url, job_id)?.with_token(config.api.token.clone());
            RecordingApiHandler::forwarding(Box::new(http) as Box<dyn ApiHandler>)
        }
        _ => RecordingApiHandler::new(),
    };

    let mut progress = Progress::new(!quiet);
    progress.spinner(&format!("Running job for {}", args.repo_root.display()));

    let worker = RunWorker::new(&workers, &workers, &workers, &api);
    let outcome = worker
        .run(&job, &args.repo_root, &args.base_commit_sha)
        .await;
    progress.finish_and_clear();

    // Events recorded before a delivery failure are still written out.
    let kind = select_handler(&job);
    let report = RunReport::new(kind, api.messages());

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&report.events)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write events to {}", path.display()))?;
    }

    let formatter = create_formatter(OutputConfig::from_cli(args.json, verbose, quiet));
    let mut stdout = io::stdout().lock();
    formatter.format(&report, &mut stdout)?;
    stdout.flush()?;

    outcome?;

    if report.summary.has_job_errors() {
        warn!("job finished with errors");
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn select(args: SelectArgs) -> anyhow::Result<ExitCode> {
    let job = Job::from_file(&args.job)?;
    println!("{}", select_handler(&job).tag_name());
    Ok(ExitCode::SUCCESS)
}

fn pick_version(args: PickVersionArgs) -> anyhow::Result<ExitCode> {
    let content = std::fs::read_to_string(&args.candidates)
        .with_context(|| format!("failed to read {}", args.candidates.display()))?;
    let candidates: Vec<ReleaseCandidate> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", args.candidates.display()))?;

    let current = args.current.as_deref().map(Version::parse).transpose()?;
    let ignored = args
        .ignore
        .iter()
        .map(|requirement| Requirement::parse(requirement))
        .collect::<Result<Vec<_>, _>>()?;

    let filter = VersionCandidateFilter::new()
        .with_ignored_versions(ignored)
        .with_cooldown(args.cooldown_options());

    match filter.select(&candidates, current.as_ref()) {
        Some(candidate) => {
            println!("{}", candidate.version);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("No admissible version");
            Ok(ExitCode::FAILURE)
        }
    }
}
