//! Reddit JSON payloads and their mapping onto `sj-core` models.
//!
//! Reddit wraps everything as `{"kind": ..., "data": ...}`. Fields we do not
//! read are ignored; fields Reddit omits or nulls fall back to defaults.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sj_core::models::{Comment, Post};

#[derive(Debug, Deserialize)]
pub(crate) struct Thing<T> {
    pub kind: String,
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Listing<T> {
    #[serde(default = "Vec::new")]
    pub children: Vec<Thing<T>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawPost {
    pub name: String,
    pub subreddit: String,
    pub author: String,
    pub title: String,
    pub selftext: String,
    pub permalink: String,
    pub url: Option<String>,
    pub domain: Option<String>,
    pub created_utc: f64,
    pub link_flair_text: Option<String>,
    pub approved: Option<bool>,
    pub approved_by: Option<String>,
    pub saved: bool,
    pub is_video: bool,
    pub is_gallery: Option<bool>,
}

impl RawPost {
    pub fn into_post(self) -> anyhow::Result<Post> {
        let created_at = timestamp(self.created_utc)
            .with_context(|| format!("bad created_utc on {}", self.name))?;
        Ok(Post {
            id: self.name,
            community: self.subreddit.to_lowercase(),
            author: self.author,
            title: self.title,
            selftext: self.selftext,
            permalink: self.permalink,
            url: self.url,
            domain: self.domain,
            created_at,
            label: self.link_flair_text.filter(|text| !text.is_empty()),
            approved: self.approved.unwrap_or(false) || self.approved_by.is_some(),
            saved: self.saved,
            is_video: self.is_video,
            is_gallery: self.is_gallery.unwrap_or(false),
        })
    }
}

// Comments on a deleted account come back with author "[deleted]"; bodies may be null.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawComment {
    pub name: String,
    pub author: String,
    pub body: Option<String>,
    pub is_submitter: bool,
    pub parent_id: String,
}

impl RawComment {
    pub fn into_comment(self) -> Comment {
        Comment {
            is_top_level: self.parent_id.starts_with("t3_"),
            id: self.name,
            author: self.author,
            body: self.body.unwrap_or_default(),
            is_submitter: self.is_submitter,
        }
    }
}

/// Body of `/api/comment` with `api_type=json`.
#[derive(Debug, Deserialize)]
pub(crate) struct CommentResponse {
    pub json: CommentResponseJson,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentResponseJson {
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
    pub data: Option<CommentResponseData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentResponseData {
    pub things: Vec<Thing<RawComment>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

fn timestamp(secs: f64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs.trunc() as i64, 0)
}

/// `/r/{sub}/new` listing -> posts, newest first as returned.
pub(crate) fn parse_posts(body: &str) -> anyhow::Result<Vec<Post>> {
    let listing: Thing<Listing<RawPost>> =
        serde_json::from_str(body).context("decoding post listing")?;
    listing
        .data
        .children
        .into_iter()
        .filter(|thing| thing.kind == "t3")
        .map(|thing| thing.data.into_post())
        .collect()
}

/// `/comments/{id}` returns `[post listing, comment listing]`; only the
/// second matters. "more" stubs are dropped.
pub(crate) fn parse_comments(body: &str) -> anyhow::Result<Vec<Comment>> {
    let (_, comments): (serde_json::Value, Thing<Listing<RawComment>>) =
        serde_json::from_str(body).context("decoding comment tree")?;
    Ok(comments
        .data
        .children
        .into_iter()
        .filter(|thing| thing.kind == "t1")
        .map(|thing| thing.data.into_comment())
        .collect())
}

pub(crate) fn parse_new_comment(body: &str) -> anyhow::Result<Comment> {
    let response: CommentResponse =
        serde_json::from_str(body).context("decoding comment response")?;
    if !response.json.errors.is_empty() {
        anyhow::bail!("reddit rejected comment: {:?}", response.json.errors);
    }
    response
        .json
        .data
        .and_then(|data| data.things.into_iter().next())
        .map(|thing| thing.data.into_comment())
        .context("comment response carried no comment")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"{
        "kind": "Listing",
        "data": {
            "after": null,
            "children": [
                {"kind": "t3", "data": {
                    "name": "t3_abc", "subreddit": "UFOs", "author": "op",
                    "title": "Orb", "selftext": "Location: Reno\nTime: 9pm 6/1",
                    "permalink": "/r/UFOs/comments/abc/orb/",
                    "url": "https://v.redd.it/xyz", "domain": "v.redd.it",
                    "created_utc": 1765319400.0, "link_flair_text": "Sightings Report",
                    "approved": null, "approved_by": "a_mod", "saved": false,
                    "is_video": true
                }},
                {"kind": "t3", "data": {
                    "name": "t3_def", "subreddit": "UFOs", "author": "other",
                    "title": "Question", "permalink": "/r/UFOs/comments/def/q/",
                    "created_utc": 1765319000.0, "link_flair_text": "",
                    "saved": true
                }}
            ]
        }
    }"#;

    #[test]
    fn test_parse_posts_maps_fields() {
        let posts = parse_posts(LISTING).unwrap();
        assert_eq!(posts.len(), 2);

        let first = &posts[0];
        assert_eq!(first.id, "t3_abc");
        assert_eq!(first.community, "ufos");
        assert_eq!(first.label.as_deref(), Some("Sightings Report"));
        assert!(first.approved);
        assert!(first.is_video);
        assert!(!first.is_gallery);
        assert_eq!(first.created_at.to_rfc3339(), "2025-12-09T22:30:00+00:00");

        let second = &posts[1];
        assert_eq!(second.label, None);
        assert!(second.saved);
        assert!(!second.approved);
        assert_eq!(second.selftext, "");
    }

    #[test]
    fn test_parse_comments_keeps_top_level_flag() {
        let body = r#"[
            {"kind": "Listing", "data": {"children": []}},
            {"kind": "Listing", "data": {"children": [
                {"kind": "t1", "data": {"name": "t1_a", "author": "op", "body": "Location: Reno",
                    "is_submitter": true, "parent_id": "t3_abc"}},
                {"kind": "t1", "data": {"name": "t1_b", "author": "[deleted]", "body": null,
                    "parent_id": "t1_a"}},
                {"kind": "more", "data": {"count": 3, "children": ["t1_x"]}}
            ]}}
        ]"#;
        let comments = parse_comments(body).unwrap();
        assert_eq!(comments.len(), 2);
        assert!(comments[0].is_top_level && comments[0].is_submitter);
        assert!(!comments[1].is_top_level);
        assert_eq!(comments[1].body, "");
    }

    #[test]
    fn test_parse_new_comment() {
        let body = r#"{"json": {"errors": [], "data": {"things": [
            {"kind": "t1", "data": {"name": "t1_new", "author": "janitor_bot",
                "body": "hello", "parent_id": "t3_abc"}}
        ]}}}"#;
        let comment = parse_new_comment(body).unwrap();
        assert_eq!(comment.id, "t1_new");
        assert!(comment.is_top_level);
    }

    #[test]
    fn test_parse_new_comment_surfaces_errors() {
        let body = r#"{"json": {"errors": [["RATELIMIT", "you are doing that too much", "ratelimit"]]}}"#;
        let err = parse_new_comment(body).unwrap_err();
        assert!(err.to_string().contains("RATELIMIT"));
    }
}
