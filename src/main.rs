//! # Onboardbot
//!
//! Proactive onboarding companion for Microsoft Teams. Runs the background
//! notifiers — weekly learning plans, pair-up matches, feedback surveys —
//! against the configured user store, SharePoint plan, and bot registration.
//!
//! Usage:
//!   onboardbot                        # Start all notifiers
//!   onboardbot --once                 # One weekly dispatch, then exit
//!   onboardbot --config ./dev.toml    # Custom config path

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use onboard_channels::{Retry, TeamsChannel};
use onboard_content::SharePointContentSource;
use onboard_core::traits::{NotificationSink, UserDirectory};
use onboard_core::OnboardConfig;
use onboard_scheduler::{LearningPlanNotifier, PairUpNotifier, SurveyNotifier};
use onboard_storage::UserStore;

#[derive(Parser)]
#[command(
    name = "onboardbot",
    version,
    about = "🧭 Onboardbot — proactive onboarding companion for Microsoft Teams"
)]
struct Cli {
    /// Config path (default: ~/.onboardbot/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run one weekly learning-plan dispatch immediately, then exit
    #[arg(long)]
    once: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => OnboardConfig::load_from(path)?,
        None => OnboardConfig::load()?,
    };

    // Wire the seams: SQLite directory, SharePoint content, Teams sink with
    // retry around every delivery.
    let store = Arc::new(UserStore::open(Path::new(&config.storage.db_path))?);
    tracing::info!("👥 User store ready ({} users)", store.user_count()?);

    let content = Arc::new(SharePointContentSource::new(&config.sharepoint));
    let sink: Arc<dyn NotificationSink> = Arc::new(Retry::new(TeamsChannel::new(
        &config.bot.app_id,
        &config.bot.app_password,
    )));
    let directory: Arc<dyn UserDirectory> = store;

    let learning = LearningPlanNotifier::new(
        directory.clone(),
        content,
        sink.clone(),
        config.scheduler.plan_weeks,
        &config.bot.app_base_uri,
    );

    if cli.once {
        let sent = learning.send_weekly_notifications(chrono::Utc::now()).await?;
        if !sent {
            anyhow::bail!("No learning plan content available");
        }
        return Ok(());
    }

    let pair_up = PairUpNotifier::new(
        directory.clone(),
        sink.clone(),
        config.scheduler.pair_up_interval_days,
    );
    let survey = SurveyNotifier::new(
        directory,
        sink,
        config.scheduler.survey_frequency,
        config.scheduler.plan_weeks,
        config.scheduler.survey_window_months,
        &config.bot.app_base_uri,
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let interval = config.scheduler.check_interval_secs;

    let mut tasks = Vec::new();
    tasks.push(tokio::spawn({
        let rx = shutdown_rx.clone();
        async move { learning.run(interval, rx).await }
    }));
    tasks.push(tokio::spawn({
        let rx = shutdown_rx.clone();
        async move { pair_up.run(rx).await }
    }));
    tasks.push(tokio::spawn({
        let rx = shutdown_rx;
        async move { survey.run(interval, rx).await }
    }));

    tracing::info!("🚀 Onboardbot running — press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    tracing::info!("🛑 Shutdown signal received");
    shutdown_tx.send(true).ok();

    for task in tasks {
        task.await.ok();
    }
    tracing::info!("Bye 👋");

    Ok(())
}
