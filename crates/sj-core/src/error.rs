//! # AppError
//!
//! Centralized error handling for the janitor. None of these escalate past a
//! single post or a single community; the outer loop is the backstop.

use thiserror::Error;

/// The primary error type for all sj-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Community name outside the `^\w+$` allow-list.
    #[error("invalid community name: {0:?}")]
    InvalidCommunityName(String),

    /// An internal invariant was violated while classifying a post.
    #[error("classification fault: {0}")]
    Classification(String),

    /// Settings could not be loaded or deserialized.
    #[error("configuration error: {0}")]
    Config(String),

    /// Any failure reported by the platform, recorder, or notifier.
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

/// A specialized Result type for janitor logic.
pub type Result<T> = std::result::Result<T, AppError>;

/// Accepts ASCII letters, digits, and underscores only. Community names end
/// up in URLs and file names, so they are checked before any other use.
pub fn validate_community_name(name: &str) -> Result<()> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(AppError::InvalidCommunityName(name.to_string()));
    }
    Ok(())
}
