//! aigen - CLI entry point.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use aigen::config::{ConfigStore, Settings};
use aigen::error::GatewayError;
use aigen::git::GitInspector;
use aigen::llm::{GeminiClient, ModelGateway, UnconfiguredGateway};
use aigen::pipeline::{
    ArtifactResult, ChangelogPipeline, CommitMessagePipeline, DEFAULT_CHANGELOG_LIMIT,
    DEFAULT_PR_OUTPUT, Persisted, PipelineContext, PullRequestPipeline, ReadmePipeline,
    ReviewBatch, review_batch, review_staged, run,
};

/// Log filter, e.g. `AIGEN_LOG=debug`.
const LOG_ENV_VAR: &str = "AIGEN_LOG";

/// Generate commit messages, READMEs, changelogs, PR descriptions and code
/// reviews with Gemini.
#[derive(Parser, Debug)]
#[command(name = "aigen")]
#[command(about = "Generate developer artifacts from your repository with Gemini")]
#[command(version)]
struct Cli {
    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save the Gemini API key
    Config {
        /// API key to store
        api_key: String,
    },

    /// Generate a commit message for the staged changes
    Git {
        /// Commit the staged changes with the generated message
        #[arg(short, long)]
        commit: bool,

        /// Instruction for the model (replaces the default rules)
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Generate README.md from the project files
    Readme {
        /// Write README.md instead of printing a preview
        #[arg(short, long)]
        create: bool,

        /// Additional instruction for the model
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Generate CHANGELOG.md from recent commits
    Changelog {
        /// Write CHANGELOG.md instead of printing a preview
        #[arg(short, long)]
        create: bool,

        /// Additional instruction for the model
        #[arg(short, long)]
        message: Option<String>,

        /// Number of commits to summarize
        #[arg(short = 'n', long, default_value_t = DEFAULT_CHANGELOG_LIMIT)]
        limit: usize,
    },

    /// Generate a pull request title and description from the staged changes
    Pr {
        /// Write the template file instead of printing a preview
        #[arg(short, long)]
        create: bool,

        /// Additional instruction for the model
        #[arg(short, long)]
        message: Option<String>,

        /// Template path, relative to the project root
        #[arg(short, long, default_value = DEFAULT_PR_OUTPUT)]
        output: PathBuf,
    },

    /// Review files (all staged files when none are given)
    Review {
        /// Files to review
        files: Vec<PathBuf>,

        /// Additional instruction for the model
        #[arg(short, long)]
        message: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let store = ConfigStore::default_location()?;

    if let Command::Config { api_key } = &cli.command {
        return save_api_key(&store, api_key);
    }

    let root = std::env::current_dir().context("Could not determine the current directory")?;
    let settings = Settings::load(&store).context("Failed to load configuration")?;
    let gateway = build_gateway(&settings)?;
    let repo = GitInspector::new(root.clone());
    let ctx = PipelineContext::new(&root, &repo, gateway.as_ref());

    match cli.command {
        Command::Config { .. } => Ok(()),
        Command::Git { commit, message } => {
            println!("Analyzing staged changes...");
            let result = run(&CommitMessagePipeline::new(message, commit), &ctx).await?;
            report(&result, "Run with --commit to commit with this message.");
            Ok(())
        }
        Command::Readme { create, message } => {
            println!("Scanning project...");
            let result = run(&ReadmePipeline::new(message, !create), &ctx).await?;
            report(&result, "Preview only. Run with --create to write README.md.");
            Ok(())
        }
        Command::Changelog {
            create,
            message,
            limit,
        } => {
            println!("Reading git history...");
            let pipeline = ChangelogPipeline::new(message, !create).with_limit(limit);
            let result = run(&pipeline, &ctx).await?;
            report(&result, "Preview only. Run with --create to write CHANGELOG.md.");
            Ok(())
        }
        Command::Pr {
            create,
            message,
            output,
        } => {
            println!("Gathering staged changes...");
            let pipeline = PullRequestPipeline::new(message, !create).with_output(output);
            let result = run(&pipeline, &ctx).await?;
            report(&result, "Preview only. Run with --create to write the template.");
            Ok(())
        }
        Command::Review { files, message } => {
            let batch = if files.is_empty() {
                println!("Reviewing staged files...");
                review_staged(message.as_deref(), &ctx).await?
            } else {
                review_batch(files, message.as_deref(), &ctx).await?
            };
            report_reviews(&batch)
        }
    }
}

/// Install the stderr log subscriber.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,aigen=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn save_api_key(store: &ConfigStore, api_key: &str) -> Result<()> {
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    store
        .set_api_key(api_key)
        .context("Failed to save API key")?;

    println!("✓ API key saved to {}", store.path().display());
    Ok(())
}

/// Gemini client, or a gateway that reports the missing key when first used.
fn build_gateway(settings: &Settings) -> Result<Box<dyn ModelGateway>> {
    match GeminiClient::new(settings) {
        Ok(client) => Ok(Box::new(client)),
        Err(GatewayError::MissingCredential) => Ok(Box::new(UnconfiguredGateway)),
        Err(e) => Err(e).context("Failed to initialize the Gemini client"),
    }
}

fn report(result: &ArtifactResult, preview_hint: &str) {
    println!("\n{}\n", result.text.trim_end());

    match &result.persisted {
        Some(Persisted::File(path)) => {
            println!("✓ {} written to {}", result.kind, display_relative(path));
        }
        Some(Persisted::Commit(short_id)) => println!("✓ Committed {}", short_id),
        None => println!("{}", preview_hint),
    }
}

fn report_reviews(batch: &ReviewBatch) -> Result<()> {
    for (path, review) in &batch.reviews {
        println!("\n=== Review: {} ===\n", path);
        println!("{}", review.text.trim_end());
    }

    for (path, error) in &batch.failures {
        eprintln!("✗ {}: {}", path, error);
    }

    if batch.has_failures() {
        bail!(
            "{} of {} review(s) failed",
            batch.failures.len(),
            batch.len()
        );
    }

    Ok(())
}

fn display_relative(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
