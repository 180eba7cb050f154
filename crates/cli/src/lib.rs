use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use jobctx_github::{ClientConfig, GitHubApi, GitHubClient};
use jobctx_resolver::{ActionContext, DeploymentResolver, JobResolver};
use jobctx_toolkit::{command, InputResolver};
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

mod outputs;

use outputs::Outputs;

pub const TOKEN_INPUT: &str = "token";
const HTTP_TIMEOUT_ENV: &str = "JOBCTX_HTTP_TIMEOUT_MS";
const FALLBACK_FAILURE: &str = "Unhandled error, see job logs";

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "jobctx")]
#[command(about = "Resolve the running workflow job and its deployment", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the current job and publish it as step outputs
    Job(ResolveArgs),

    /// Resolve the current job and the in-progress deployment it performs
    Deployment(ResolveArgs),
}

#[derive(Args)]
struct ResolveArgs {
    /// Also print the resolved records as JSON on stdout
    #[arg(long)]
    json: bool,
}

pub async fn main_entry() -> ExitCode {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose || command::is_debug() {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&err);
            ExitCode::FAILURE
        }
    }
}

fn report_failure(err: &anyhow::Error) {
    let message = err.to_string();
    if message.trim().is_empty() {
        command::set_failed(FALLBACK_FAILURE);
    } else {
        command::set_failed(&message);
    }
    eprintln!("{err:?}");
}

async fn run(cli: Cli) -> Result<()> {
    let inputs = InputResolver::from_env();
    let token = inputs.required(TOKEN_INPUT)?;
    command::set_secret(&token);

    let context = Arc::new(ActionContext::from_env()?);
    log::debug!(
        "run {} attempt {} of {} at {} on runner '{}'",
        context.run_id,
        context.run_attempt,
        context.repository(),
        context.sha,
        context.runner_name
    );

    let api: Arc<dyn GitHubApi> = Arc::new(GitHubClient::new(ClientConfig {
        api_url: context.api_url.clone(),
        graphql_url: context.graphql_url.clone(),
        token,
        timeout: http_timeout(),
    })?);
    let jobs = Arc::new(JobResolver::new(api.clone(), context, inputs));

    match cli.command {
        Commands::Job(args) => run_job(&jobs, args).await,
        Commands::Deployment(args) => run_deployment(api, jobs, args).await,
    }
}

async fn run_job(jobs: &JobResolver, args: ResolveArgs) -> Result<()> {
    command::start_group("Resolve current job");
    let resolved = jobs.resolve_current_job().await;
    command::end_group();
    let job = resolved?;

    let mut outputs = Outputs::default();
    outputs.job(job);
    outputs.publish()?;

    if args.json {
        print_stdout(&serde_json::to_string_pretty(&serde_json::json!({ "job": job }))?)?;
    }
    Ok(())
}

async fn run_deployment(
    api: Arc<dyn GitHubApi>,
    jobs: Arc<JobResolver>,
    args: ResolveArgs,
) -> Result<()> {
    let deployments = DeploymentResolver::new(api, jobs.clone());

    command::start_group("Resolve current deployment");
    let resolved = async {
        let job = jobs.resolve_current_job().await?;
        let deployment = deployments.resolve_current_deployment().await?;
        Ok::<_, jobctx_resolver::ResolveError>((job, deployment))
    }
    .await;
    command::end_group();
    let (job, deployment) = resolved?;

    let mut outputs = Outputs::default();
    outputs.job(job);
    match deployment {
        Some(deployment) => outputs.deployment(deployment),
        None => log::info!("No in-progress deployment matched job {}", job.id),
    }
    outputs.publish()?;

    if args.json {
        let document = serde_json::json!({ "job": job, "deployment": deployment });
        print_stdout(&serde_json::to_string_pretty(&document)?)?;
    }
    Ok(())
}

fn http_timeout() -> Duration {
    std::env::var(HTTP_TIMEOUT_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
        .unwrap_or(jobctx_github::DEFAULT_TIMEOUT)
}
