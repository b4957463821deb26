//! # Sighting Janitor Binary
//!
//! Assembles the collaborators chosen at compile time and runs the poll loop.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sj_config::{CommunityConfig, LogFormat, Settings};
use sj_core::traits::{Notifier, PlatformClient, SightingRecorder};
use sj_janitor::{DryRunPlatform, Janitor};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "reddit")]
use sj_reddit::RedditClient;

#[cfg(feature = "record-local")]
use sj_record_local::LocalSightingRecorder;

#[cfg(feature = "notify-webhook")]
use sj_notify_webhook::{LogNotifier, WebhookNotifier};

const DEFAULT_LOG_FILTER: &str = "info,sj_janitor=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    init_tracing(settings.log_format);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        communities = ?settings.communities,
        dry_run = settings.dry_run,
        "sighting-janitor starting"
    );

    // 1. Notifier first, so startup problems reach the operators.
    #[cfg(feature = "notify-webhook")]
    let notifier: Arc<dyn Notifier> = match &settings.notify.webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(url)?),
        None => {
            warn!("no webhook configured; notifications go to the log only");
            Arc::new(LogNotifier)
        }
    };

    // 2. Platform client, optionally neutered for a dry run.
    #[cfg(feature = "reddit")]
    let (platform, bot_username): (Arc<dyn PlatformClient>, String) = {
        let client = RedditClient::new(&settings.reddit)?;
        let username = client.username().to_string();
        if settings.dry_run {
            (Arc::new(DryRunPlatform::new(client)), username)
        } else {
            (Arc::new(client), username)
        }
    };

    // 3. Recorder
    #[cfg(feature = "record-local")]
    let recorder: Arc<dyn SightingRecorder> =
        Arc::new(LocalSightingRecorder::new(settings.record.dir.clone()));

    let communities = resolve_communities(&settings, notifier.as_ref()).await;
    if communities.is_empty() {
        anyhow::bail!("no valid communities configured");
    }

    let janitor = Janitor::new(platform, recorder, notifier.clone(), bot_username);
    let interval = Duration::from_secs(settings.poll_interval_mins.max(1) * 60);

    loop {
        for (name, config) in &communities {
            if let Err(err) = janitor.handle_community(name, config, chrono::Utc::now()).await {
                error!(community = %name, error = %err, "community pass failed");
                notifier
                    .notify_error(&format!("Exception when handling all posts in {name}: {err}\n```{err:?}```"))
                    .await;
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                break;
            }
        }
    }

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Each community's configuration, built once. Bad names are reported and skipped.
async fn resolve_communities(
    settings: &Settings,
    notifier: &dyn Notifier,
) -> Vec<(String, CommunityConfig)> {
    let mut resolved = Vec::new();
    for name in &settings.communities {
        match settings.get_config(name) {
            Ok(config) => resolved.push((name.clone(), config)),
            Err(err) => {
                error!(community = %name, error = %err, "skipping community");
                notifier
                    .notify_error(&format!("Skipping community {name}: {err}"))
                    .await;
            }
        }
    }
    resolved
}
