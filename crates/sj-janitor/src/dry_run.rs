//! Dry-run wrapper: reads go to the real platform, mutations are only logged.

use async_trait::async_trait;
use sj_core::{Comment, PlatformClient, Post};
use tracing::info;

pub struct DryRunPlatform<P> {
    inner: P,
}

impl<P: PlatformClient> DryRunPlatform<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: PlatformClient> PlatformClient for DryRunPlatform<P> {
    async fn list_recent_posts(&self, community: &str) -> anyhow::Result<Vec<Post>> {
        self.inner.list_recent_posts(community).await
    }

    async fn comments_of(&self, post: &Post) -> anyhow::Result<Vec<Comment>> {
        self.inner.comments_of(post).await
    }

    async fn apply_label(&self, post: &Post, label: &str) -> anyhow::Result<()> {
        info!(permalink = %post.permalink, label, "dry run: apply_label");
        Ok(())
    }

    async fn save(&self, post: &Post) -> anyhow::Result<()> {
        info!(permalink = %post.permalink, "dry run: save");
        Ok(())
    }

    async fn reply(&self, post: &Post, text: &str) -> anyhow::Result<Comment> {
        info!(permalink = %post.permalink, text, "dry run: reply");
        Ok(Comment {
            id: format!("dry-run-{}", post.id),
            author: "dry-run".to_string(),
            body: text.to_string(),
            is_submitter: false,
            is_top_level: true,
        })
    }

    async fn distinguish_and_pin(&self, comment: &Comment) -> anyhow::Result<()> {
        info!(comment = %comment.id, "dry run: distinguish_and_pin");
        Ok(())
    }

    async fn delete(&self, comment: &Comment) -> anyhow::Result<()> {
        info!(comment = %comment.id, "dry run: delete");
        Ok(())
    }

    async fn report(&self, post: &Post, reason: &str) -> anyhow::Result<()> {
        info!(permalink = %post.permalink, reason, "dry run: report");
        Ok(())
    }

    async fn remove(&self, post: &Post, reason: &str) -> anyhow::Result<()> {
        info!(permalink = %post.permalink, reason, "dry run: remove");
        Ok(())
    }
}
