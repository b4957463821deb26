//! # Core Traits (Ports)
//!
//! Any collaborator plugin must implement these traits to be wired into the binary.
//! Calls are awaited one at a time; nothing here expects overlapping requests.

use async_trait::async_trait;

use crate::models::{Comment, Post, SightingRow};

/// Forum platform contract: reads listings and comments, performs moderation.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Newest-first listing of a community's recent posts.
    async fn list_recent_posts(&self, community: &str) -> anyhow::Result<Vec<Post>>;
    async fn comments_of(&self, post: &Post) -> anyhow::Result<Vec<Comment>>;

    /// Applies a label by template identifier or by text.
    async fn apply_label(&self, post: &Post, label: &str) -> anyhow::Result<()>;
    async fn save(&self, post: &Post) -> anyhow::Result<()>;

    async fn reply(&self, post: &Post, text: &str) -> anyhow::Result<Comment>;
    async fn distinguish_and_pin(&self, comment: &Comment) -> anyhow::Result<()>;
    async fn delete(&self, comment: &Comment) -> anyhow::Result<()>;

    async fn report(&self, post: &Post, reason: &str) -> anyhow::Result<()>;
    async fn remove(&self, post: &Post, reason: &str) -> anyhow::Result<()>;
}

/// Append-only store of validated sightings.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SightingRecorder: Send + Sync {
    async fn append_row(&self, community: &str, row: SightingRow) -> anyhow::Result<()>;
}

/// Operator notification channel. Best-effort: implementations log and swallow
/// their own failures so moderation outcomes never depend on delivery.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_action(&self, text: &str);
    async fn notify_error(&self, text: &str);
}
