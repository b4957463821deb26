//! # sj-notify-webhook
//!
//! `Notifier` implementations for the operator channel.
//! `WebhookNotifier` posts to a chat webhook (Discord-compatible `{"content": ...}`);
//! `LogNotifier` only writes to the log and is used when no webhook is configured.
//!
//! Delivery is best-effort: failures are logged and swallowed.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use sj_core::traits::Notifier;
use tracing::{error, info, warn};

/// Chat platforms reject longer messages.
pub const MAX_MESSAGE_LEN: usize = 2000;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

pub struct WebhookNotifier {
    http: reqwest::Client,
    url: SecretString,
}

impl WebhookNotifier {
    pub fn new(url: &SecretString) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("building webhook http client")?;
        Ok(Self {
            http,
            url: SecretString::from(url.expose_secret()),
        })
    }

    async fn send(&self, text: &str) -> anyhow::Result<()> {
        let content = truncate(text);
        self.http
            .post(self.url.expose_secret())
            .json(&WebhookPayload { content: &content })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify_action(&self, text: &str) {
        info!(message = %text, "action");
        if let Err(err) = self.send(text).await {
            warn!(error = %err, "webhook delivery failed");
        }
    }

    async fn notify_error(&self, text: &str) {
        error!(message = %text, "error notification");
        if let Err(err) = self.send(text).await {
            warn!(error = %err, "webhook delivery failed");
        }
    }
}

pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_action(&self, text: &str) {
        info!(message = %text, "action");
    }

    async fn notify_error(&self, text: &str) {
        error!(message = %text, "error notification");
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_MESSAGE_LEN {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_MESSAGE_LEN - 1).collect();
    cut.push('…');
    cut
}
