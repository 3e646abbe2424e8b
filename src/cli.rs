use clap::Parser;

/// Harvest open CodeQL alerts across an organization's repositories and
/// publish a severity-filtered summary
#[derive(Parser, Debug, Default)]
#[command(name = "codeql-harvest")]
#[command(version)]
#[command(about = "Fetch open CodeQL alerts by repository topic and publish critical/high snapshots", long_about = None)]
pub struct Args {
    /// Repository topic to scan (overrides CODEQL_GITHUB_TOPIC)
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Destination bucket, optionally gs://bucket/prefix (overrides CODEQL_GCS_BUCKET_NAME)
    #[arg(short, long)]
    pub bucket: Option<String>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
