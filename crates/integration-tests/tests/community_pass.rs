//! Whole-community passes: listing traversal and per-post failure isolation.

use integration_tests::*;
use sj_config::CommunityConfig;
use sj_core::{MockNotifier, MockPlatformClient, MockSightingRecorder, Post};

/// A post the janitor has already actioned, so handling it touches nothing.
fn actioned(id: &str, minutes_old: i64) -> Post {
    let mut post = sighting_post(id, "", minutes_old);
    post.saved = true;
    post
}

fn config(consecutive_old_posts: u32) -> CommunityConfig {
    CommunityConfig {
        check_window_mins: 120,
        consecutive_old_posts,
        ..CommunityConfig::default()
    }
}

#[tokio::test]
async fn test_scan_stops_after_run_of_old_posts() {
    let posts = vec![
        actioned("p1", 5),
        actioned("p2", 200),
        actioned("p3", 210),
        // An approved older post resurfacing resets the run.
        actioned("p4", 10),
        actioned("p5", 220),
        actioned("p6", 230),
        actioned("p7", 240),
        actioned("p8", 250),
    ];

    let mut platform = MockPlatformClient::new();
    platform
        .expect_list_recent_posts()
        .withf(|community: &str| community == "ufos")
        .times(1)
        .returning(move |_| Ok(posts.clone()));

    let janitor = janitor(platform, MockSightingRecorder::new(), MockNotifier::new());
    let report = janitor
        .handle_community("ufos", &config(2), now())
        .await
        .unwrap();

    assert_eq!(report.community, "ufos");
    assert_eq!(report.examined, 7);
    assert_eq!(report.failed, 0);
}

#[tokio::test]
async fn test_short_listing_is_fully_examined() {
    let posts = vec![actioned("p1", 5), actioned("p2", 300)];

    let mut platform = MockPlatformClient::new();
    platform
        .expect_list_recent_posts()
        .times(1)
        .returning(move |_| Ok(posts.clone()));

    let janitor = janitor(platform, MockSightingRecorder::new(), MockNotifier::new());
    let report = janitor
        .handle_community("ufos", &config(5), now())
        .await
        .unwrap();
    assert_eq!(report.examined, 2);
}

#[tokio::test]
async fn test_failing_post_does_not_abort_the_pass() {
    let broken = sighting_post("bad", "", 10);
    let valid = sighting_post("good", VALID_STATEMENT, 10);
    let posts = vec![broken, valid];

    let mut platform = MockPlatformClient::new();
    platform
        .expect_list_recent_posts()
        .times(1)
        .returning(move |_| Ok(posts.clone()));
    platform.expect_comments_of().times(2).returning(|post: &Post| {
        if post.id == "t3_bad" {
            Err(anyhow::anyhow!("connection reset"))
        } else {
            Ok(vec![])
        }
    });
    platform.expect_save().times(1).returning(|_| Ok(()));

    let mut recorder = MockSightingRecorder::new();
    recorder.expect_append_row().times(1).returning(|_, _| Ok(()));

    let mut notifier = MockNotifier::new();
    notifier
        .expect_notify_error()
        .withf(|text: &str| {
            text.starts_with("Exception when handling post Strange lights, /r/ufos/comments/bad/")
                && text.contains("connection reset")
        })
        .times(1)
        .returning(|_| ());
    notifier.expect_notify_action().times(1).returning(|_| ());

    let janitor = janitor(platform, recorder, notifier);
    let report = janitor
        .handle_community("ufos", &config(5), now())
        .await
        .unwrap();

    assert_eq!(report.examined, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.recorded, 1);
}

#[tokio::test]
async fn test_listing_failure_is_returned() {
    let mut platform = MockPlatformClient::new();
    platform
        .expect_list_recent_posts()
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("401 Unauthorized")));

    let janitor = janitor(platform, MockSightingRecorder::new(), MockNotifier::new());
    let err = janitor
        .handle_community("ufos", &config(5), now())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("401"));
}
