use crate::predict::{run_form, run_predict, PredictArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_eligibility::config::{ArtifactLayout, ModelConfig};
use loan_eligibility::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Eligibility Predictor",
    about = "Serve loan eligibility predictions or score a single applicant from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score one applicant and print the verdict with a summary table
    Predict(PredictArgs),
    /// Print the applicant form contract
    Form,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

/// Artifact location overrides shared by every command that loads a model.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct ArtifactArgs {
    /// Pipeline artifact bundling preprocessing with the classifier
    #[arg(long, conflicts_with_all = ["model", "preprocessor"])]
    pub(crate) pipeline: Option<PathBuf>,
    /// Classifier artifact for the split layout
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Preprocessor artifact for the split layout
    #[arg(long)]
    pub(crate) preprocessor: Option<PathBuf>,
}

impl ArtifactArgs {
    pub(crate) fn apply(&self, config: &mut ModelConfig) {
        if let Some(path) = &self.pipeline {
            config.layout = ArtifactLayout::Pipeline;
            config.pipeline_path = path.clone();
        }
        if self.model.is_some() || self.preprocessor.is_some() {
            config.layout = ArtifactLayout::Split;
        }
        if let Some(path) = &self.model {
            config.model_path = path.clone();
        }
        if let Some(path) = &self.preprocessor {
            config.preprocessor_path = path.clone();
        }
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Predict(args) => run_predict(args),
        Command::Form => {
            run_form();
            Ok(())
        }
    }
}
