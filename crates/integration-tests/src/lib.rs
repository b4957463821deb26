//! Shared fixtures for the janitor integration tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use sj_core::{Comment, MockNotifier, MockPlatformClient, MockSightingRecorder, Post};
use sj_janitor::Janitor;
use sj_messages::WARNING_MARKER;

pub const BOT: &str = "janitor_bot";

pub const VALID_STATEMENT: &str = "Location: Phoenix, Arizona\nTime: December 9, 2025 at 10:30 PM";
pub const INCOMPLETE_STATEMENT: &str = "Time: 8pm\nLocation: somewhere";

/// Fixed "now" for every test.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 10, 12, 0, 0).unwrap()
}

/// A labeled sighting post created `minutes_old` minutes before [`now`].
pub fn sighting_post(id: &str, selftext: &str, minutes_old: i64) -> Post {
    Post {
        id: format!("t3_{id}"),
        community: "ufos".to_string(),
        author: "op".to_string(),
        title: "Strange lights".to_string(),
        selftext: selftext.to_string(),
        permalink: format!("/r/ufos/comments/{id}/strange_lights/"),
        url: None,
        domain: Some("self.ufos".to_string()),
        created_at: now() - Duration::minutes(minutes_old),
        label: Some("Sightings Report".to_string()),
        approved: false,
        saved: false,
        is_video: false,
        is_gallery: false,
    }
}

/// An unlabeled video post.
pub fn video_post(id: &str, title: &str, minutes_old: i64) -> Post {
    Post {
        title: title.to_string(),
        selftext: String::new(),
        url: Some(format!("https://v.redd.it/{id}")),
        domain: Some("v.redd.it".to_string()),
        label: None,
        is_video: true,
        ..sighting_post(id, "", minutes_old)
    }
}

pub fn op_comment(id: &str, body: &str) -> Comment {
    Comment {
        id: format!("t1_{id}"),
        author: "op".to_string(),
        body: body.to_string(),
        is_submitter: true,
        is_top_level: true,
    }
}

/// A warning comment previously posted by the bot.
pub fn bot_warning(id: &str) -> Comment {
    Comment {
        id: format!("t1_{id}"),
        author: BOT.to_string(),
        body: format!("**{WARNING_MARKER}**\n\nPlease add a statement."),
        is_submitter: false,
        is_top_level: true,
    }
}

/// A notifier that accepts any number of calls.
pub fn quiet_notifier() -> MockNotifier {
    let mut notifier = MockNotifier::new();
    notifier.expect_notify_action().returning(|_| ());
    notifier.expect_notify_error().returning(|_| ());
    notifier
}

pub fn janitor(
    platform: MockPlatformClient,
    recorder: MockSightingRecorder,
    notifier: MockNotifier,
) -> Janitor {
    Janitor::new(Arc::new(platform), Arc::new(recorder), Arc::new(notifier), BOT)
}
