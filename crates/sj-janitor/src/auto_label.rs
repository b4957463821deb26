//! Auto-label decision for unlabeled media posts.

use sj_config::CommunityConfig;
use sj_core::classify;
use sj_core::media::{is_excluded_domain, is_media_post};
use sj_core::{Post, StatementState};

/// Decides whether an unlabeled post should receive the sighting label.
///
/// Anything that *attempts* the statement format is labeled, so the poster
/// gets the grace period to perfect it. A lone date/time or location field
/// still counts as an attempt; only text with no field at all is withheld.
pub fn should_auto_label(post: &Post, config: &CommunityConfig) -> (bool, String) {
    if post.has_label(&config.sighting_labels) {
        return (false, "already labeled".to_string());
    }
    if !is_media_post(post, &config.auto_label.media_domains) {
        return (false, "not a media post".to_string());
    }
    if is_excluded_domain(post, &config.auto_label.excluded_domains) {
        let domain = post.domain.as_deref().unwrap_or_default();
        return (false, format!("excluded domain {domain}"));
    }

    let text = format!("{}\n{}", post.selftext, post.title);
    let assessment = classify::assess(&text);
    let attempted = assessment.state != StatementState::Missing
        || assessment.location.is_some()
        || assessment.time.is_some();
    if attempted {
        (true, format!("media post with {} statement", assessment.state))
    } else {
        (false, "no statement attempt".to_string())
    }
}

/// Label to apply: the configured identifier, else the first sighting label text.
pub fn label_to_apply(config: &CommunityConfig) -> Option<&str> {
    let configured = config.auto_label.label.trim();
    if !configured.is_empty() {
        return Some(configured);
    }
    config.sighting_labels.first().map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn media_post(title: &str) -> Post {
        Post {
            id: "t3_v".into(),
            community: "ufos".into(),
            author: "op".into(),
            title: title.into(),
            selftext: String::new(),
            permalink: "/r/ufos/comments/v/x/".into(),
            url: Some("https://v.redd.it/abc".into()),
            domain: Some("v.redd.it".into()),
            created_at: Utc::now(),
            label: None,
            approved: false,
            saved: false,
            is_video: true,
            is_gallery: false,
        }
    }

    #[test]
    fn test_video_with_title_statement_is_labeled() {
        let (apply, reason) = should_auto_label(&media_post("Date: Dec 7 Time: 8pm"), &CommunityConfig::default());
        assert!(apply, "{reason}");
    }

    #[test]
    fn test_video_with_full_statement_reports_state() {
        let post = media_post("Location: Reno, NV Time: Dec 7 8pm");
        let (apply, reason) = should_auto_label(&post, &CommunityConfig::default());
        assert!(apply);
        assert!(reason.contains("VALID"));
    }

    #[test]
    fn test_no_attempt_is_not_labeled() {
        let (apply, _) = should_auto_label(&media_post("Weird lights!!"), &CommunityConfig::default());
        assert!(!apply);
    }

    #[test]
    fn test_labeled_text_and_news_domains_are_skipped() {
        let config = CommunityConfig::default();

        let mut labeled = media_post("Date: Dec 7 Time: 8pm");
        labeled.label = Some("Sightings Report".into());
        assert_eq!(should_auto_label(&labeled, &config), (false, "already labeled".to_string()));

        let mut text_post = media_post("Date: Dec 7 Time: 8pm");
        text_post.is_video = false;
        text_post.domain = Some("self.ufos".into());
        text_post.url = None;
        assert!(!should_auto_label(&text_post, &config).0);

        let mut news = media_post("Date: Dec 7 Time: 8pm");
        news.is_video = true;
        news.domain = Some("edition.cnn.com".into());
        let (apply, reason) = should_auto_label(&news, &config);
        assert!(!apply);
        assert!(reason.starts_with("excluded domain"));
    }

    #[test]
    fn test_label_to_apply_falls_back_to_sighting_label() {
        let mut config = CommunityConfig::default();
        assert_eq!(label_to_apply(&config), Some("sightings report"));
        config.auto_label.label = "4f1c-flair".into();
        assert_eq!(label_to_apply(&config), Some("4f1c-flair"));
    }
}
