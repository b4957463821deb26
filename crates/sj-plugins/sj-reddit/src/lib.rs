//! # sj-reddit
//!
//! Reddit implementation of `PlatformClient` over the OAuth JSON API.
//! Authenticates as the bot account with the password grant and caches the
//! bearer token until shortly before it expires.

mod wire;

use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sj_config::RedditSettings;
use sj_core::models::{Comment, Post};
use sj_core::traits::PlatformClient;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";
pub const API_BASE: &str = "https://oauth.reddit.com";

/// Posts fetched per listing request (Reddit's maximum).
const LISTING_LIMIT: u32 = 100;
const TOKEN_SLACK: Duration = Duration::from_secs(60);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

struct CachedToken {
    value: SecretString,
    expires_at: Instant,
}

pub struct RedditClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: SecretString,
    username: String,
    password: SecretString,
    api_base: String,
    auth_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl RedditClient {
    pub fn new(settings: &RedditSettings) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building reddit http client")?;

        Ok(Self {
            http,
            client_id: settings.client_id.clone(),
            client_secret: SecretString::from(settings.client_secret.expose_secret()),
            username: settings.username.clone(),
            password: SecretString::from(settings.password.expose_secret()),
            api_base: API_BASE.to_string(),
            auth_url: AUTH_URL.to_string(),
            token: Mutex::new(None),
        })
    }

    /// The account the janitor acts as; its comments are the warnings it looks for.
    pub fn username(&self) -> &str {
        &self.username
    }

    async fn bearer(&self) -> anyhow::Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.expose_secret().to_string());
            }
        }

        debug!(username = %self.username, "requesting access token");
        let response = self
            .http
            .post(&self.auth_url)
            .basic_auth(&self.client_id, Some(self.client_secret.expose_secret()))
            .form(&[
                ("grant_type", "password"),
                ("username", self.username.as_str()),
                ("password", self.password.expose_secret()),
            ])
            .send()
            .await
            .context("requesting access token")?
            .error_for_status()
            .context("reddit refused credentials")?;
        let body: wire::TokenResponse = response.json().await.context("decoding access token")?;

        let lifetime = Duration::from_secs(body.expires_in).saturating_sub(TOKEN_SLACK);
        let value = body.access_token.clone();
        *cached = Some(CachedToken {
            value: SecretString::from(body.access_token),
            expires_at: Instant::now() + lifetime,
        });
        info!(username = %self.username, "authenticated with reddit");
        Ok(value)
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> anyhow::Result<String> {
        let token = self.bearer().await?;
        let url = format!("{}{}", self.api_base, path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("raw_json", "1")])
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {path}"))?
            .error_for_status()
            .with_context(|| format!("GET {path}"))?;
        Ok(response.text().await?)
    }

    async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> anyhow::Result<String> {
        let token = self.bearer().await?;
        let url = format!("{}{}", self.api_base, path);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .form(form)
            .send()
            .await
            .with_context(|| format!("POST {path}"))?
            .error_for_status()
            .with_context(|| format!("POST {path}"))?;
        Ok(response.text().await?)
    }
}

/// Flair template ids are UUIDs; anything else is treated as flair text.
fn is_template_id(label: &str) -> bool {
    label.len() == 36
        && label.chars().enumerate().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => c.is_ascii_hexdigit(),
        })
}

fn article_id(post: &Post) -> &str {
    post.id.strip_prefix("t3_").unwrap_or(&post.id)
}

#[async_trait]
impl PlatformClient for RedditClient {
    async fn list_recent_posts(&self, community: &str) -> anyhow::Result<Vec<Post>> {
        let limit = LISTING_LIMIT.to_string();
        let body = self
            .get(&format!("/r/{community}/new"), &[("limit", limit.as_str())])
            .await?;
        wire::parse_posts(&body)
    }

    async fn comments_of(&self, post: &Post) -> anyhow::Result<Vec<Comment>> {
        let body = self
            .get(
                &format!("/comments/{}", article_id(post)),
                &[("depth", "1"), ("limit", "500")],
            )
            .await?;
        wire::parse_comments(&body)
    }

    async fn apply_label(&self, post: &Post, label: &str) -> anyhow::Result<()> {
        let key = if is_template_id(label) { "flair_template_id" } else { "text" };
        self.post_form(
            &format!("/r/{}/api/selectflair", post.community),
            &[("api_type", "json"), ("link", post.id.as_str()), (key, label)],
        )
        .await?;
        Ok(())
    }

    async fn save(&self, post: &Post) -> anyhow::Result<()> {
        self.post_form("/api/save", &[("id", post.id.as_str())]).await?;
        Ok(())
    }

    async fn reply(&self, post: &Post, text: &str) -> anyhow::Result<Comment> {
        let body = self
            .post_form(
                "/api/comment",
                &[("api_type", "json"), ("thing_id", post.id.as_str()), ("text", text)],
            )
            .await?;
        wire::parse_new_comment(&body)
    }

    async fn distinguish_and_pin(&self, comment: &Comment) -> anyhow::Result<()> {
        self.post_form(
            "/api/distinguish",
            &[
                ("api_type", "json"),
                ("id", comment.id.as_str()),
                ("how", "yes"),
                ("sticky", "true"),
            ],
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, comment: &Comment) -> anyhow::Result<()> {
        self.post_form("/api/del", &[("id", comment.id.as_str())]).await?;
        Ok(())
    }

    async fn report(&self, post: &Post, reason: &str) -> anyhow::Result<()> {
        self.post_form(
            "/api/report",
            &[("api_type", "json"), ("thing_id", post.id.as_str()), ("reason", reason)],
        )
        .await?;
        Ok(())
    }

    /// Removes the post, then leaves the reason as a pinned moderator comment.
    async fn remove(&self, post: &Post, reason: &str) -> anyhow::Result<()> {
        self.post_form("/api/remove", &[("id", post.id.as_str()), ("spam", "false")])
            .await?;
        let comment = self.reply(post, reason).await?;
        self.distinguish_and_pin(&comment).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_ids_are_recognised() {
        assert!(is_template_id("3f1c6a52-7a55-11ee-9f6e-4e2a1b6c0d9e"));
        assert!(!is_template_id("sightings report"));
        assert!(!is_template_id("3f1c6a52-7a55-11ee-9f6e-4e2a1b6c0d9"));
    }

    #[test]
    fn test_client_acts_as_configured_account() {
        let settings = RedditSettings {
            client_id: "abc".into(),
            client_secret: SecretString::from("shh"),
            username: "janitor_bot".into(),
            password: SecretString::from("hunter2"),
            user_agent: "sighting-janitor/test".into(),
        };
        let client = RedditClient::new(&settings).unwrap();
        assert_eq!(client.username(), "janitor_bot");
        assert_eq!(client.api_base, API_BASE);
    }

    #[test]
    fn test_article_id_strips_kind_prefix() {
        let post = Post {
            id: "t3_abc".into(),
            community: "ufos".into(),
            author: "op".into(),
            title: "t".into(),
            selftext: String::new(),
            permalink: "/r/ufos/comments/abc/t/".into(),
            url: None,
            domain: None,
            created_at: chrono::Utc::now(),
            label: None,
            approved: false,
            saved: false,
            is_video: false,
            is_gallery: false,
        };
        assert_eq!(article_id(&post), "abc");
    }
}
