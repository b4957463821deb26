//! # Media/Domain Classifier
//!
//! Predicates over a post's outbound link and native media flags. Only used to
//! gate auto-labeling, never the validation/removal path.

use crate::models::Post;

/// Case-insensitive substring membership: `youtube.com` matches `m.youtube.com`.
pub fn domain_in(domain: &str, list: &[String]) -> bool {
    let domain = domain.trim().to_lowercase();
    if domain.is_empty() {
        return false;
    }
    list.iter()
        .map(|d| d.trim().to_lowercase())
        .any(|d| !d.is_empty() && domain.contains(&d))
}

pub fn is_excluded_domain(post: &Post, excluded: &[String]) -> bool {
    post_domain(post).is_some_and(|d| domain_in(d, excluded))
}

pub fn is_media_domain(post: &Post, media: &[String]) -> bool {
    post_domain(post).is_some_and(|d| domain_in(d, media))
}

pub fn is_media_post(post: &Post, media_domains: &[String]) -> bool {
    post.is_video
        || post.is_gallery
        || is_media_domain(post, media_domains)
        || post
            .url
            .as_deref()
            .is_some_and(|u| u.to_lowercase().contains("/gallery/"))
}

// Falls back to the URL when the platform leaves the domain out.
fn post_domain(post: &Post) -> Option<&str> {
    post.domain
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .or(post.url.as_deref())
}
