//! Zoe CLI - run flows and tasks locally, inspect flows and deployments

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

use zoe_core::application::deploy::{default_deployment_specs, DEFAULT_DEPLOY_WORK_POOL, DEFAULT_GIT_URL};
use zoe_core::application::tasks::{run_shell_task, verify_filenames};
use zoe_core::application::{DeployRequest, DeployService, FlowParams, FlowRegistry, FlowRunner};
use zoe_core::domain::{FlowRunState, GitSource, IntervalSchedule, ValidationError};
use zoe_core::port::id_provider::UuidProvider;
use zoe_core::port::time_provider::SystemTimeProvider;
use zoe_core::port::{DeploymentRegistry, InMemoryDeploymentRegistry};
use zoe_infra_system::{LocalFileSystem, StreamingShellExecutor};

#[derive(Parser)]
#[command(name = "zoe")]
#[command(about = "Run and inspect Zoe flows", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter (same syntax as RUST_LOG)
    #[arg(long, env = "ZOE_LOG", default_value = "zoe=info")]
    log: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a registered flow
    Run {
        /// Flow entrypoint (see `zoe flows`)
        entrypoint: String,

        /// Flow parameter as key=value (repeatable); values are parsed as JSON when possible
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, serde_json::Value)>,
    },

    /// List registered flows
    Flows,

    /// Deploy the default flows into an in-memory registry and show them
    Deployments {
        /// Git repository the flows are pulled from
        #[arg(long, env = "ZOE_GIT_URL", default_value = DEFAULT_GIT_URL)]
        git_url: String,

        /// Work pool name
        #[arg(long, env = "ZOE_WORK_POOL", default_value = DEFAULT_DEPLOY_WORK_POOL)]
        work_pool: String,

        /// Schedule interval in minutes
        #[arg(long, default_value = "5")]
        every_minutes: u64,
    },

    /// Verify that every filename in a directory is snake_case
    CheckFilenames {
        /// Directory to check
        dir: PathBuf,
    },

    /// Run a shell command, streaming its output
    Shell {
        /// Full command line, passed to the host shell
        command: String,
    },
}

#[derive(Tabled)]
struct FlowRow {
    entrypoint: String,
    name: String,
    log_prints: bool,
}

#[derive(Tabled)]
struct DeploymentRow {
    name: String,
    entrypoint: String,
    work_pool: String,
    every: String,
    branch: String,
}

fn parse_param(raw: &str) -> std::result::Result<(String, serde_json::Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    if key.is_empty() {
        return Err(format!("empty parameter name in '{}'", raw));
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn runner(flows: Arc<FlowRegistry>) -> FlowRunner {
    let time_provider = Arc::new(SystemTimeProvider);
    FlowRunner::new(
        flows,
        Arc::new(StreamingShellExecutor::new(time_provider.clone())),
        Arc::new(LocalFileSystem),
        Arc::new(UuidProvider),
        time_provider,
    )
}

async fn execute(command: Commands) -> Result<bool> {
    match command {
        Commands::Run { entrypoint, params } => {
            let mut flow_params = FlowParams::new();
            for (key, value) in params {
                flow_params.insert(key, value);
            }

            let run = runner(Arc::new(FlowRegistry::builtin()))
                .run(&entrypoint, flow_params)
                .await?;

            match run.state {
                FlowRunState::Completed => {
                    println!(
                        "{}",
                        format!("✓ Flow '{}' completed (run {})", run.flow_name, run.id)
                            .green()
                            .bold()
                    );
                    Ok(true)
                }
                _ => {
                    println!(
                        "{}",
                        format!("✗ Flow '{}' failed (run {})", run.flow_name, run.id)
                            .red()
                            .bold()
                    );
                    if let Some(error) = run.error {
                        println!("  {} {}", "Error:".bold(), error);
                    }
                    Ok(false)
                }
            }
        }

        Commands::Flows => {
            let registry = FlowRegistry::builtin();
            let rows: Vec<FlowRow> = registry
                .entries()
                .into_iter()
                .map(|(entrypoint, descriptor)| FlowRow {
                    entrypoint: entrypoint.to_string(),
                    name: descriptor.name.to_string(),
                    log_prints: descriptor.log_prints,
                })
                .collect();

            println!("{}", Table::new(rows));
            Ok(true)
        }

        Commands::Deployments {
            git_url,
            work_pool,
            every_minutes,
        } => {
            let registry = Arc::new(InMemoryDeploymentRegistry::new());
            let request = DeployRequest {
                source: GitSource::new(git_url),
                work_pool_name: work_pool,
                schedule: IntervalSchedule::every_minutes(every_minutes)
                    .context("Invalid schedule")?,
            };

            DeployService::new(registry.clone(), Arc::new(FlowRegistry::builtin()))
                .deploy_all(&default_deployment_specs(), &request)
                .await?;

            let rows: Vec<DeploymentRow> = registry
                .list()
                .await?
                .into_iter()
                .map(|d| DeploymentRow {
                    every: format!("{}s ({})", d.schedule.interval_secs, d.schedule.timezone),
                    branch: d.source.branch,
                    name: d.name,
                    entrypoint: d.entrypoint,
                    work_pool: d.work_pool_name,
                })
                .collect();

            println!("{}", "✓ Deployments registered".green().bold());
            println!();
            println!("{}", Table::new(rows));
            Ok(true)
        }

        Commands::CheckFilenames { dir } => match verify_filenames(&LocalFileSystem, &dir) {
            Ok(report) => {
                println!(
                    "{}",
                    format!("✓ All {} filenames are valid", report.valid.len())
                        .green()
                        .bold()
                );
                Ok(true)
            }
            Err(ValidationError::ValidationFailure { invalid }) => {
                println!(
                    "{}",
                    format!("✗ {} invalid filenames", invalid.len()).red().bold()
                );
                for name in invalid {
                    println!("  {} {}", "•".bold(), name);
                }
                Ok(false)
            }
            Err(e) => Err(e.into()),
        },

        Commands::Shell { command } => {
            let shell = StreamingShellExecutor::new(Arc::new(SystemTimeProvider));
            match run_shell_task(&shell, &command).await {
                Ok(_) => {
                    println!("{}", "✓ Command succeeded".green().bold());
                    Ok(true)
                }
                Err(e) => {
                    println!("{}", format!("✗ {}", e).red().bold());
                    Ok(false)
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_new(&cli.log).unwrap_or_else(|_| EnvFilter::new("zoe=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match execute(cli.command).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param_string_and_json() {
        assert_eq!(
            parse_param("command=echo hi").unwrap(),
            ("command".to_string(), serde_json::json!("echo hi"))
        );
        assert_eq!(
            parse_param("count=3").unwrap(),
            ("count".to_string(), serde_json::json!(3))
        );
        assert_eq!(
            parse_param("folder_path=").unwrap(),
            ("folder_path".to_string(), serde_json::json!(""))
        );
    }

    #[test]
    fn test_parse_param_rejects_malformed() {
        assert!(parse_param("no_equals").is_err());
        assert!(parse_param("=value").is_err());
    }

    #[test]
    fn test_cli_parses_run_with_params() {
        let cli = Cli::parse_from([
            "zoe",
            "run",
            "flows/run_shell_command:run_shell_flow",
            "-p",
            "command=echo hi",
        ]);

        match cli.command {
            Commands::Run { entrypoint, params } => {
                assert_eq!(entrypoint, "flows/run_shell_command:run_shell_flow");
                assert_eq!(params.len(), 1);
            }
            _ => panic!("expected run"),
        }
    }
}
