//! Process Poster CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Resolve configuration**: read the optional TOML file and apply flags
//!    and environment variables on top.
//! 2. **Wire observability**: configure `tracing-subscriber` (plain or JSON)
//!    and, when an endpoint is configured, an OpenTelemetry OTLP exporter.
//! 3. **Construct infrastructure**: build the `HttpCaptureApi` and inject it
//!    into a `CaptureGateway`.
//! 4. **Create the process**: upload the given document, create the process,
//!    and print the server's copy as JSON on stdout.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use capture::{ContainerId, WorkflowId};
use capture_http::HttpCaptureApi;
use clap::builder::BoolishValueParser;
use clap::Parser;
use gateway::{CaptureGateway, FileSource};
use tracing::{error, warn};

mod config;
mod telemetry;

use config::{FileConfig, Overrides};

/// Create a process on the Capture API from a workflow and a document.
#[derive(Parser)]
#[command(name = "process-poster", version, long_about = None)]
struct Cli {
    /// Document to attach to the new process
    file: PathBuf,

    /// Workflow the process is spawned from
    #[arg(short, long, env = "PROCESS_POSTER_WORKFLOW_ID")]
    workflow_id: String,

    /// Container (portal) the process is posted into
    #[arg(short = 'p', long, env = "PROCESS_POSTER_CONTAINER_ID")]
    container_id: u64,

    /// TOML configuration file
    #[arg(short, long, env = "PROCESS_POSTER_CONFIG")]
    config: Option<PathBuf>,

    /// Capture API base URL
    #[arg(long, env = "PROCESS_POSTER_URL")]
    url: Option<String>,

    /// User the requests authenticate as
    #[arg(short, long, env = "PROCESS_POSTER_USERNAME")]
    username: Option<String>,

    /// Password for the user
    #[arg(long, env = "PROCESS_POSTER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Per-request timeout in seconds (0 disables)
    #[arg(long, env = "PROCESS_POSTER_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Emit logs as JSON
    #[arg(
        long,
        env = "PROCESS_POSTER_LOG_JSON",
        value_parser = BoolishValueParser::new()
    )]
    log_json: bool,

    /// OTLP gRPC endpoint for trace export
    #[arg(long, env = "PROCESS_POSTER_OTLP_ENDPOINT")]
    otlp_endpoint: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            timeout_secs: self.timeout_secs,
            log_json: self.log_json,
            otlp_endpoint: self.otlp_endpoint.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = config::resolve(cli.overrides(), file_config)?;
    let _telemetry = telemetry::init(settings.log_json, settings.otlp_endpoint.as_deref())?;

    let workflow_id = WorkflowId::new(cli.workflow_id).context("workflow id must not be empty")?;
    let container_id = ContainerId::new(cli.container_id);

    let api = HttpCaptureApi::new(&settings.client).context("configuring Capture API client")?;
    let gateway = CaptureGateway::new(Arc::new(api));

    let process = match gateway
        .create_process(&workflow_id, container_id, FileSource::path(cli.file))
        .await
    {
        Ok(process) => process,
        Err(err) => {
            let phase = err.phase();
            error!(%phase, error = %err, "process creation failed");
            if let Some(orphan) = err.orphaned_file() {
                warn!(stored_file = %orphan, "uploaded file was left on the server");
            }
            return Err(anyhow::Error::new(err).context(format!("{phase} step failed")));
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&process).context("encoding process")?
    );
    Ok(())
}
