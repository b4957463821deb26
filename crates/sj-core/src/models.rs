//! # Domain Models
//!
//! These structs represent the platform content the janitor reads and the
//! ephemeral results it derives from them. Nothing here is persisted by us;
//! posts are fetched fresh every poll cycle and identified by permalink.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of checking one block of text for a location/time statement.
///
/// Variants are declared worst-first so the derived `Ord` is the "goodness"
/// order used for tie-breaking: `Valid > Incomplete > Invalid > Missing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementState {
    /// No recognizable field found, or only one of the two.
    Missing,
    /// Both fields found but one of them is (nearly) empty.
    Invalid,
    /// Both fields have content but the date/time lacks a date or a time of day.
    Incomplete,
    Valid,
}

impl StatementState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementState::Missing => "MISSING",
            StatementState::Invalid => "INVALID",
            StatementState::Incomplete => "INCOMPLETE",
            StatementState::Valid => "VALID",
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, StatementState::Valid)
    }
}

impl fmt::Display for StatementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a statement was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementSource {
    Selftext,
    Comment,
    Title,
    None,
}

impl fmt::Display for StatementSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatementSource::Selftext => "selftext",
            StatementSource::Comment => "comment",
            StatementSource::Title => "title",
            StatementSource::None => "none",
        };
        f.write_str(s)
    }
}

/// Detailed classifier result for a single block of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub state: StatementState,
    /// First captured "Location" value, cleaned.
    pub location: Option<String>,
    /// First captured "Time/Date" value, cleaned.
    pub time: Option<String>,
    /// Every date/time field joined with single spaces.
    pub combined_time: Option<String>,
    pub missing_date: bool,
    pub missing_time: bool,
}

impl Assessment {
    pub fn missing() -> Self {
        Self {
            state: StatementState::Missing,
            location: None,
            time: None,
            combined_time: None,
            missing_date: false,
            missing_time: false,
        }
    }
}

/// The statement chosen for a post this cycle. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedStatement {
    pub source: StatementSource,
    pub text: String,
    pub assessment: Assessment,
}

impl ExtractedStatement {
    pub fn none() -> Self {
        Self {
            source: StatementSource::None,
            text: String::new(),
            assessment: Assessment::missing(),
        }
    }

    pub fn state(&self) -> StatementState {
        self.assessment.state
    }
}

/// A submission as fetched from the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Platform identifier (e.g. `t3_abc123`).
    pub id: String,
    /// Community the post lives in, as the platform names it.
    pub community: String,
    pub author: String,
    pub title: String,
    /// Body text; empty for pure link posts.
    #[serde(default)]
    pub selftext: String,
    /// Path relative to the platform root, e.g. `/r/ufos/comments/abc123/...`.
    pub permalink: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Current label (flair) text, if any.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub approved: bool,
    /// Our sole persisted "already fully actioned" marker.
    #[serde(default)]
    pub saved: bool,
    #[serde(default)]
    pub is_video: bool,
    #[serde(default)]
    pub is_gallery: bool,
}

impl Post {
    /// True when the current label matches one of `labels`, case-insensitively.
    pub fn has_label(&self, labels: &[String]) -> bool {
        match self.label.as_deref() {
            Some(label) if !label.trim().is_empty() => {
                let label = label.trim().to_lowercase();
                labels.iter().any(|l| l.trim().to_lowercase() == label)
            }
            _ => false,
        }
    }

    /// True once `minutes` have fully elapsed since creation.
    pub fn is_older_than(&self, minutes: i64, now: DateTime<Utc>) -> bool {
        self.created_at + Duration::minutes(minutes) < now
    }

    pub fn absolute_permalink(&self, base: &str) -> String {
        if self.permalink.starts_with("http") {
            self.permalink.clone()
        } else {
            format!("{}{}", base.trim_end_matches('/'), self.permalink)
        }
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.permalink, self.title)
    }
}

/// A comment on a post. Only top-level comments matter to the janitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub body: String,
    /// Authored by the post's original poster.
    #[serde(default)]
    pub is_submitter: bool,
    #[serde(default)]
    pub is_top_level: bool,
}

/// One recorded sighting: `[location, time, iso_timestamp, permalink]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SightingRow {
    pub location: String,
    pub time: String,
    /// Post creation time, `YYYY-MM-DD HH:MM:SS` in UTC.
    pub posted_at: String,
    pub permalink: String,
}

impl SightingRow {
    pub fn cells(&self) -> [&str; 4] {
        [&self.location, &self.time, &self.posted_at, &self.permalink]
    }
}

/// What one cycle did to one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOutcome {
    AutoLabeled,
    OutOfScope,
    AlreadyActioned,
    Recorded,
    Warned,
    Waiting,
    Reported,
    Removed,
}
