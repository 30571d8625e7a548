use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use carewatch::application::config::AppConfig;
use carewatch::application::services::classifier::AlertClassifier;
use carewatch::domain::ports::directory::{NoDirectory, SubjectDirectory};
use carewatch::domain::ports::presenter::Presenter;
use carewatch::domain::rules::{default_rules, RuleEngine};
use carewatch::domain::value_objects::thresholds::VitalThresholds;
use carewatch::infrastructure::directory::{InMemoryDirectory, RestDirectory};
use carewatch::infrastructure::presenters::{
    CompositePresenter, LogFilePresenter, TerminalPresenter,
};
use carewatch::presentation::cli::app::{Cli, Commands};
use carewatch::presentation::cli::commands::classify::run_classify;
use carewatch::presentation::cli::commands::listen::run_listen;
use carewatch::presentation::cli::commands::replay::run_replay;

fn print_banner() {
    println!("{}", "\u{2501}".repeat(40).cyan());
    println!("{}", "  carewatch: clinical notifications".bold().cyan());
    println!("{}", "\u{2501}".repeat(40).cyan());
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_directory(
    config: &AppConfig,
    patients: Option<&Path>,
) -> anyhow::Result<Arc<dyn SubjectDirectory>> {
    let file = patients.map(Path::to_path_buf).or_else(|| {
        config
            .directory
            .patients_file
            .as_deref()
            .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
    });
    if let Some(path) = file {
        let directory = InMemoryDirectory::from_json_file(&path)?;
        tracing::info!("Patient directory: {} ({} patients)", path.display(), directory.len());
        return Ok(Arc::new(directory));
    }

    match (&config.directory.rest_url, &config.directory.api_key) {
        (Some(url), Some(key)) => {
            tracing::info!("Patient directory: {url}");
            Ok(Arc::new(RestDirectory::new(url, key)?))
        }
        (Some(_), None) => {
            tracing::warn!("directory.rest_url is set without directory.api_key, lookups disabled");
            Ok(Arc::new(NoDirectory))
        }
        _ => {
            tracing::debug!("No patient directory configured");
            Ok(Arc::new(NoDirectory))
        }
    }
}

fn build_presenter(config: &AppConfig, terminal: bool) -> Arc<dyn Presenter> {
    let mut presenters: Vec<Box<dyn Presenter>> = Vec::new();
    if terminal && config.presentation.terminal {
        presenters.push(Box::new(TerminalPresenter::new()));
    }
    if let Some(ref path) = config.presentation.log_file {
        presenters.push(Box::new(LogFilePresenter::new(path)));
    }
    Arc::new(CompositePresenter::new(presenters))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    let config = if let Some(ref path) = cli.config {
        AppConfig::load_from(path)?
    } else {
        AppConfig::load()?
    };

    // Manual DI: main.rs is the only place that knows concrete types
    let directory = build_directory(&config, cli.patients.as_deref())?;
    let classifier = Arc::new(AlertClassifier::new(
        RuleEngine::new(default_rules()),
        VitalThresholds::from(&config.thresholds),
        directory,
        config.general.fallback_subject_label.clone(),
    ));
    let buffer = config.general.feed_buffer;

    match cli.command {
        Commands::Replay { file, json } => {
            let presenter = build_presenter(&config, !json);
            run_replay(&file, json, classifier, presenter, buffer).await?;
        }
        Commands::Listen { user } => {
            print_banner();
            let presenter = build_presenter(&config, true);
            run_listen(&user, classifier, presenter, buffer).await?;
        }
        Commands::Classify { file } => {
            run_classify(&classifier, &file).await?;
        }
    }

    Ok(())
}
