use std::process;

use serde_json::json;
use tracing::error;
use tracing_subscriber::EnvFilter;

use codeql_harvest::prelude::*;
use codeql_harvest::shared::COMPONENT;

/// Fixed failure payload when the required credential is absent.
const MISSING_CONFIGURATION_BODY: &str = "Internal Server Error: Missing Configuration";

#[tokio::main]
async fn main() {
    init_logging();
    let args = Args::parse_args();

    let config = match Config::resolve(&args) {
        Ok(config) => config,
        Err(err) => {
            error!(component = COMPONENT, error = %err, "configuration error");
            if let Some(HarvestError::MissingConfiguration { .. }) =
                err.downcast_ref::<HarvestError>()
            {
                let payload = json!({ "status": "error", "message": MISSING_CONFIGURATION_BODY });
                println!("{payload}");
                process::exit(ExitCode::MissingConfiguration.as_i32());
            }
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    };

    match run(config).await {
        Ok(report) => {
            match serde_json::to_string(&report) {
                Ok(body) => println!("{body}"),
                Err(err) => {
                    error!(component = COMPONENT, error = %err, "failed to serialize report");
                    process::exit(ExitCode::ApplicationError.as_i32());
                }
            }
            process::exit(ExitCode::Success.as_i32());
        }
        Err(err) => {
            error!(component = COMPONENT, error = %err, "harvest run failed");
            for cause in err.chain().skip(1) {
                error!(component = COMPONENT, cause = %cause, "caused by");
            }
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

async fn run(config: Config) -> Result<HarvestReport> {
    let gateway = ReqwestGateway::new(config.github_token.clone())?;
    let alert_source = GithubAlertSource::new(gateway);

    let destination = match &config.bucket {
        Some(spec) => Some(PublishTarget::new(
            spec.bucket().to_string(),
            GcsObjectStore::new(spec)?,
        )),
        None => None,
    };

    let use_case = HarvestAlertsUseCase::new(alert_source, destination);
    use_case.execute(&config.topic).await
}

/// One JSON record per line on stdout, severity-tagged, for the hosting log
/// pipeline.
fn init_logging() {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}
