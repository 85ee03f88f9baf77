use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gitlaber::{GitLab, GitLabConfig, ProjectMergeRequest, DEFAULT_CONFIG_FILE, DEFAULT_SECTION};

#[derive(Debug, Parser)]
#[command(name = "gitlaber", author, version, about, long_about = None)]
struct Cli {
    /// INI file holding `url`, `private_token` and `project_id`
    #[arg(long, env = "GITLABER_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Section of the config file to read
    #[arg(long, env = "GITLABER_SECTION", default_value = DEFAULT_SECTION)]
    section: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the labels of a merge request
    Labels {
        /// Merge request IID within the configured project
        mr: u64,
    },
    /// Add labels to a merge request, keeping existing ones
    AddLabels {
        /// Merge request IID within the configured project
        mr: u64,
        #[arg(required = true)]
        labels: Vec<String>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = GitLabConfig::from_file(&cli.config, &cli.section)
        .with_context(|| format!("failed to load [{}] from {:?}", cli.section, cli.config))?;
    let gl = GitLab::from_config(&config)?;

    tracing::debug!(base_url = gl.config().base_url(), project_id = config.project_id, "loaded config");

    match cli.command {
        Commands::Labels { mr } => {
            let labels = ProjectMergeRequest::new(&gl, config.project_id, mr)
                .labels()
                .await
                .with_context(|| format!("failed to fetch merge request !{mr}"))?;

            for label in labels {
                println!("{label}");
            }
        }

        Commands::AddLabels { mr, labels } => {
            let updated = ProjectMergeRequest::new(&gl, config.project_id, mr)
                .add_labels(&labels)
                .await
                .with_context(|| format!("failed to add labels to merge request !{mr}"))?;

            tracing::info!(web_url = %updated.web_url, "labels updated");
            println!("{}", updated.labels.join(", "));
        }
    }

    Ok(())
}
