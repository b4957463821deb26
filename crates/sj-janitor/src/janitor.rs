//! # Janitor
//!
//! Drives each post through its lifecycle, once per poll cycle:
//! unlabeled -> labeled (pending) -> warned -> resolved (recorded, reported or removed).
//!
//! Nothing is remembered between cycles except what the platform keeps for us:
//! the post's "saved" flag and the presence of our warning comment.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sj_config::CommunityConfig;
use sj_core::classify::recorded_time;
use sj_core::{
    AppError, Comment, ExtractedStatement, Notifier, PlatformClient, Post, PostOutcome, Result,
    SightingRecorder, SightingRow, StatementState,
};
use sj_messages as messages;
use tracing::{debug, error, info};

use crate::auto_label::{label_to_apply, should_auto_label};
use crate::select::select_statement;

pub const DEFAULT_PERMALINK_BASE: &str = "https://www.reddit.com";

/// Tally of one pass over a community's listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommunityReport {
    pub community: String,
    pub examined: usize,
    pub auto_labeled: usize,
    pub recorded: usize,
    pub warned: usize,
    pub reported: usize,
    pub removed: usize,
    pub failed: usize,
}

impl CommunityReport {
    fn new(community: &str) -> Self {
        Self {
            community: community.to_string(),
            ..Self::default()
        }
    }

    fn tally(&mut self, outcome: PostOutcome) {
        match outcome {
            PostOutcome::AutoLabeled => self.auto_labeled += 1,
            PostOutcome::Recorded => self.recorded += 1,
            PostOutcome::Warned => self.warned += 1,
            PostOutcome::Reported => self.reported += 1,
            PostOutcome::Removed => self.removed += 1,
            PostOutcome::OutOfScope | PostOutcome::AlreadyActioned | PostOutcome::Waiting => {}
        }
    }
}

/// The post lifecycle controller. Collaborators are shared trait objects so the
/// binary can swap implementations (or wrap the platform in a dry run).
pub struct Janitor {
    platform: Arc<dyn PlatformClient>,
    recorder: Arc<dyn SightingRecorder>,
    notifier: Arc<dyn Notifier>,
    bot_username: String,
}

impl Janitor {
    pub fn new(
        platform: Arc<dyn PlatformClient>,
        recorder: Arc<dyn SightingRecorder>,
        notifier: Arc<dyn Notifier>,
        bot_username: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            recorder,
            notifier,
            bot_username: bot_username.into(),
        }
    }

    /// Walks the community's listing newest-first.
    ///
    /// Approved older posts can resurface among new ones, so scanning continues
    /// past the check window until more than `consecutive_old_posts` old posts
    /// have been seen in a row. A failing post never aborts the pass.
    pub async fn handle_community(
        &self,
        community: &str,
        config: &CommunityConfig,
        now: DateTime<Utc>,
    ) -> Result<CommunityReport> {
        let posts = self.platform.list_recent_posts(community).await?;
        let cutoff = now - Duration::minutes(config.check_window_mins);
        let mut report = CommunityReport::new(community);
        let mut consecutive_old: u32 = 0;

        for post in &posts {
            debug!(community, permalink = %post.permalink, title = %post.title, "checking post");
            report.examined += 1;
            match self.handle_post(post, config, now).await {
                Ok(outcome) => report.tally(outcome),
                Err(err) => {
                    report.failed += 1;
                    self.report_failure(post, &err).await;
                }
            }

            if post.created_at > cutoff {
                consecutive_old = 0;
            } else {
                consecutive_old += 1;
            }
            if consecutive_old > config.consecutive_old_posts {
                debug!(community, consecutive_old, "reached old posts, stopping scan");
                break;
            }
        }

        info!(
            community,
            examined = report.examined,
            recorded = report.recorded,
            warned = report.warned,
            reported = report.reported,
            removed = report.removed,
            auto_labeled = report.auto_labeled,
            failed = report.failed,
            "community pass complete"
        );
        Ok(report)
    }

    /// Runs one lifecycle step for one post.
    pub async fn handle_post(
        &self,
        post: &Post,
        config: &CommunityConfig,
        now: DateTime<Utc>,
    ) -> Result<PostOutcome> {
        let labeled = post.has_label(&config.sighting_labels);

        if config.auto_label.enabled && !labeled {
            let (apply, reason) = should_auto_label(post, config);
            debug!(permalink = %post.permalink, apply, reason = %reason, "auto-label decision");
            if apply {
                // The poster needs a cycle to act before validation runs.
                self.auto_label(post, config, &reason).await?;
                return Ok(PostOutcome::AutoLabeled);
            }
        }

        if !labeled {
            return Ok(PostOutcome::OutOfScope);
        }
        if post.saved {
            debug!(permalink = %post.permalink, "already actioned; unsave it to re-action");
            return Ok(PostOutcome::AlreadyActioned);
        }

        let comments = self.platform.comments_of(post).await?;
        let statement = select_statement(post, &comments);
        let warning = self.find_warning(&comments);
        debug!(
            permalink = %post.permalink,
            state = %statement.state(),
            source = %statement.source,
            warned = warning.is_some(),
            "statement selected"
        );

        match statement.state() {
            StatementState::Valid => self.record(post, &statement, warning).await,
            StatementState::Missing | StatementState::Invalid | StatementState::Incomplete => {
                self.handle_defect(post, config, &statement, warning, now).await
            }
        }
    }

    async fn auto_label(&self, post: &Post, config: &CommunityConfig, reason: &str) -> Result<()> {
        let label = label_to_apply(config).ok_or_else(|| {
            AppError::Config(format!("no label configured for {}", post.community))
        })?;
        let link = post.absolute_permalink(DEFAULT_PERMALINK_BASE);

        if config.auto_label.dry_run {
            info!(permalink = %post.permalink, label, "dry run: would auto-label");
            self.notifier
                .notify_action(&format!("[dry run] Would auto-label ({reason}): {link}"))
                .await;
            return Ok(());
        }

        self.platform.apply_label(post, label).await?;
        info!(permalink = %post.permalink, label, "auto-labeled");
        self.notifier
            .notify_action(&format!("Auto-labeled ({reason}): {link}"))
            .await;
        Ok(())
    }

    async fn record(
        &self,
        post: &Post,
        statement: &ExtractedStatement,
        warning: Option<&Comment>,
    ) -> Result<PostOutcome> {
        let assessment = &statement.assessment;
        let (Some(location), Some(time)) = (assessment.location.as_deref(), recorded_time(assessment))
        else {
            return Err(AppError::Classification(format!(
                "VALID statement from {} without captured fields on {}",
                statement.source, post.permalink
            )));
        };

        if let Some(comment) = warning {
            // The poster fixed it; drop the stale warning.
            self.platform.delete(comment).await?;
        }
        self.platform.save(post).await?;

        let link = post.absolute_permalink(DEFAULT_PERMALINK_BASE);
        let row = SightingRow {
            location: location.to_string(),
            time: time.to_string(),
            posted_at: post.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            permalink: link.clone(),
        };
        self.recorder.append_row(&post.community, row).await?;

        info!(permalink = %post.permalink, source = %statement.source, "recorded valid statement");
        self.notifier
            .notify_action(&format!("Recorded sighting ({location} / {time}): {link}"))
            .await;
        Ok(PostOutcome::Recorded)
    }

    async fn handle_defect(
        &self,
        post: &Post,
        config: &CommunityConfig,
        statement: &ExtractedStatement,
        warning: Option<&Comment>,
        now: DateTime<Utc>,
    ) -> Result<PostOutcome> {
        let state = statement.state();

        if !post.is_older_than(config.grace_period_mins, now) {
            if config.post_warnings && warning.is_none() {
                let body = messages::warning_comment(config, &statement.assessment)?;
                let comment = self.platform.reply(post, &body).await?;
                self.platform.distinguish_and_pin(&comment).await?;
                info!(permalink = %post.permalink, %state, "posted warning");
                return Ok(PostOutcome::Warned);
            }
            debug!(permalink = %post.permalink, %state, "grace period running");
            return Ok(PostOutcome::Waiting);
        }

        if let Some(comment) = warning {
            self.platform.delete(comment).await?;
        }

        let link = post.absolute_permalink(DEFAULT_PERMALINK_BASE);
        let outcome = if post.approved {
            self.platform
                .report(post, &messages::approved_report_reason(state))
                .await?;
            PostOutcome::Reported
        } else if config.report_on_timeout {
            self.platform
                .report(post, &messages::timeout_report_reason(state))
                .await?;
            PostOutcome::Reported
        } else {
            let reason = messages::removal_reason(config, &statement.assessment)?;
            self.platform.remove(post, &reason).await?;
            PostOutcome::Removed
        };
        self.platform.save(post).await?;

        let verb = match outcome {
            PostOutcome::Removed => "Removed",
            _ => "Reported",
        };
        info!(permalink = %post.permalink, %state, approved = post.approved, "{verb} after timeout");
        self.notifier
            .notify_action(&format!("{verb} post with {state} location statement: {link}"))
            .await;
        Ok(outcome)
    }

    fn find_warning<'c>(&self, comments: &'c [Comment]) -> Option<&'c Comment> {
        comments.iter().find(|c| {
            c.author.eq_ignore_ascii_case(&self.bot_username) && messages::is_warning(&c.body)
        })
    }

    async fn report_failure(&self, post: &Post, err: &AppError) {
        let message = format!(
            "Exception when handling post {}, {}: {}\n```{:?}```",
            post.title, post.permalink, err, err
        );
        error!(permalink = %post.permalink, error = %err, "failed to handle post");
        self.notifier.notify_error(&message).await;
    }
}
