//! # sj-config
//!
//! Layered settings: built-in defaults, then an optional `janitor.toml`, then
//! `JANITOR__*` environment variables (`.env` is loaded first).
//!
//! Per-community behaviour lives in [`CommunityConfig`]. It is built once per
//! community at startup and only ever handed out by reference.

use std::collections::HashMap;
use std::path::PathBuf;

use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File, FileFormat};
use secrecy::SecretString;
use serde::Deserialize;
use sj_core::{validate_community_name, AppError, Result, StatementState};

pub const DEFAULT_CONFIG_PATH: &str = "janitor.toml";
pub const ENV_PREFIX: &str = "JANITOR";

/// Process-wide settings.
#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub communities: Vec<String>,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_mins: u64,
    /// Perform reads only; every mutation is logged instead.
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub log_format: LogFormat,
    pub reddit: RedditSettings,
    #[serde(default)]
    pub notify: NotifySettings,
    #[serde(default)]
    pub record: RecordSettings,
    /// Community name (lower-case) to its overrides of the defaults.
    #[serde(default)]
    pub overrides: HashMap<String, CommunityConfig>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Deserialize)]
pub struct RedditSettings {
    pub client_id: String,
    pub client_secret: SecretString,
    pub username: String,
    pub password: SecretString,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NotifySettings {
    /// Chat webhook; when absent notifications only go to the log.
    #[serde(default)]
    pub webhook_url: Option<SecretString>,
}

#[derive(Debug, Deserialize)]
pub struct RecordSettings {
    #[serde(default = "default_record_dir")]
    pub dir: PathBuf,
}

impl Default for RecordSettings {
    fn default() -> Self {
        Self {
            dir: default_record_dir(),
        }
    }
}

/// Per-community configuration. Missing keys fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CommunityConfig {
    /// Label texts (case-insensitive) marking a post as a sighting.
    pub sighting_labels: Vec<String>,
    /// Posts younger than this are "new"; older ones count toward the stop threshold.
    pub check_window_mins: i64,
    /// How many consecutive old posts to scan past the window before stopping.
    pub consecutive_old_posts: u32,
    pub grace_period_mins: i64,
    /// On timeout, report instead of removing.
    pub report_on_timeout: bool,
    pub post_warnings: bool,
    pub messages: MessageConfig,
    pub auto_label: AutoLabelConfig,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            sighting_labels: vec!["sightings report".to_string()],
            check_window_mins: 120,
            consecutive_old_posts: 5,
            grace_period_mins: 30,
            report_on_timeout: true,
            post_warnings: true,
            messages: MessageConfig::default(),
            auto_label: AutoLabelConfig::default(),
        }
    }
}

/// State-specific message snippets used by the comment and removal templates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    pub missing: String,
    pub invalid: String,
    pub incomplete: String,
    pub example: String,
    pub footer: String,
}

impl MessageConfig {
    pub fn explanation(&self, state: StatementState) -> &str {
        match state {
            StatementState::Missing => &self.missing,
            StatementState::Invalid => &self.invalid,
            StatementState::Incomplete => &self.incomplete,
            StatementState::Valid => "",
        }
    }
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            missing: "We could not find a location statement on your post. Sightings need \
                      post text, or a comment on your own post, saying where and when the \
                      footage was captured."
                .to_string(),
            invalid: "Your location statement has an empty field. Both the location and \
                      the date/time need a real value."
                .to_string(),
            incomplete: "Your location statement needs both a calendar date and a time of day."
                .to_string(),
            example: "Location: Phoenix, Arizona\nTime: December 9, 2025 at 10:30 PM".to_string(),
            footer: "This is a bot. Replies will not receive responses. Please message the \
                     moderators if you feel this was an error."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AutoLabelConfig {
    pub enabled: bool,
    /// Only notify operators; never touch the post.
    pub dry_run: bool,
    /// Label template identifier (or text) to apply.
    pub label: String,
    /// News sites never auto-labeled.
    pub excluded_domains: Vec<String>,
    pub media_domains: Vec<String>,
}

impl Default for AutoLabelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dry_run: true,
            label: String::new(),
            excluded_domains: strings(&[
                "cnn.com",
                "foxnews.com",
                "nytimes.com",
                "washingtonpost.com",
                "theguardian.com",
                "bbc.com",
                "bbc.co.uk",
                "reuters.com",
                "apnews.com",
                "nbcnews.com",
                "cbsnews.com",
                "newsweek.com",
            ]),
            media_domains: strings(&[
                "v.redd.it",
                "i.redd.it",
                "imgur.com",
                "youtube.com",
                "youtu.be",
                "streamable.com",
                "tiktok.com",
                "instagram.com",
            ]),
        }
    }
}

impl Settings {
    /// Loads `.env`, then `$JANITOR_CONFIG` (default `janitor.toml`, optional), then the environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let path = std::env::var("JANITOR_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        tracing::debug!(path = %path, "loading settings");
        let builder = Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("communities")
                    .try_parsing(true),
            );
        Self::from_builder(builder)
    }

    /// Builds settings from a TOML document alone, without file or environment lookups.
    pub fn from_toml(toml: &str) -> Result<Self> {
        Self::from_builder(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let mut settings: Settings = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AppError::Config(e.to_string()))?;

        settings.communities = settings
            .communities
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        settings.overrides = settings
            .overrides
            .into_iter()
            .map(|(name, cfg)| (name.to_lowercase(), cfg))
            .collect();
        Ok(settings)
    }

    /// Looks up a community's configuration by name.
    ///
    /// Names are checked against a conservative allow-list before they are
    /// used anywhere else, since they end up in URLs and file names.
    pub fn get_config(&self, community: &str) -> Result<CommunityConfig> {
        validate_community_name(community)?;
        Ok(self
            .overrides
            .get(&community.to_lowercase())
            .cloned()
            .unwrap_or_default())
    }
}

fn default_poll_interval() -> u64 {
    1
}

fn default_user_agent() -> String {
    format!("sighting-janitor/{}", env!("CARGO_PKG_VERSION"))
}

fn default_record_dir() -> PathBuf {
    PathBuf::from("./data/sightings")
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    const BASE: &str = r#"
communities = ["ufos", "CollapseTesting"]

[reddit]
client_id = "abc"
client_secret = "shh"
username = "janitor_bot"
password = "hunter2"
"#;

    #[test]
    fn test_defaults_apply_without_overrides() {
        let settings = Settings::from_toml(BASE).unwrap();
        assert_eq!(settings.poll_interval_mins, 1);
        assert!(!settings.dry_run);
        assert_eq!(settings.log_format, LogFormat::Pretty);
        assert_eq!(settings.communities, vec!["ufos", "CollapseTesting"]);
        assert_eq!(settings.reddit.password.expose_secret(), "hunter2");
        assert!(settings.notify.webhook_url.is_none());

        let cfg = settings.get_config("ufos").unwrap();
        assert_eq!(cfg, CommunityConfig::default());
        assert_eq!(cfg.grace_period_mins, 30);
        assert!(cfg.report_on_timeout);
    }

    #[test]
    fn test_partial_override_merges_over_defaults() {
        let toml = format!(
            "{BASE}\n[overrides.CollapseTesting]\ngrace_period_mins = 5\nreport_on_timeout = false\n\n\
             [overrides.CollapseTesting.auto_label]\nenabled = true\nlabel = \"abc-123\"\n"
        );
        let settings = Settings::from_toml(&toml).unwrap();
        let cfg = settings.get_config("collapsetesting").unwrap();
        assert_eq!(cfg.grace_period_mins, 5);
        assert!(!cfg.report_on_timeout);
        assert_eq!(cfg.check_window_mins, 120);
        assert!(cfg.auto_label.enabled);
        assert!(cfg.auto_label.dry_run);
        assert_eq!(cfg.auto_label.label, "abc-123");
        assert!(!cfg.auto_label.media_domains.is_empty());

        // Other communities are untouched.
        assert_eq!(settings.get_config("ufos").unwrap(), CommunityConfig::default());
    }

    #[test]
    fn test_invalid_community_names_are_rejected() {
        let settings = Settings::from_toml(BASE).unwrap();
        for name in ["", "ufos/../x", "ufos; rm", "über", "a b"] {
            assert!(
                matches!(settings.get_config(name), Err(AppError::InvalidCommunityName(_))),
                "{name:?}"
            );
        }
        assert!(settings.get_config("Ufos_2").is_ok());
    }

    #[test]
    fn test_missing_credentials_is_config_error() {
        let err = Settings::from_toml("communities = [\"ufos\"]").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_explanation_per_state() {
        let messages = MessageConfig::default();
        assert_eq!(messages.explanation(StatementState::Missing), messages.missing);
        assert_eq!(messages.explanation(StatementState::Incomplete), messages.incomplete);
        assert_eq!(messages.explanation(StatementState::Valid), "");
    }
}
