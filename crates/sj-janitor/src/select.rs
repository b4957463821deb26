//! Source selection: post body, then the poster's statement comment, then the title.

use sj_core::classify;
use sj_core::extract::has_location_label;
use sj_core::{Comment, ExtractedStatement, Post, StatementSource};

/// First top-level comment by the original poster that carries a location label.
pub fn op_statement_comment(comments: &[Comment]) -> Option<&Comment> {
    comments
        .iter()
        .filter(|c| c.is_top_level && c.is_submitter)
        .find(|c| has_location_label(&c.body))
}

/// Picks the statement to judge a post by.
///
/// Stops at the first `VALID` source. Otherwise keeps the best defect seen,
/// ranked by state; ties keep the earlier source, so a later `MISSING` never
/// replaces an `INVALID` or `INCOMPLETE` found before it.
pub fn select_statement(post: &Post, comments: &[Comment]) -> ExtractedStatement {
    let candidates = [
        (StatementSource::Selftext, Some(post.selftext.as_str())),
        (
            StatementSource::Comment,
            op_statement_comment(comments).map(|c| c.body.as_str()),
        ),
        (StatementSource::Title, Some(post.title.as_str())),
    ];

    let mut best = ExtractedStatement::none();
    for (source, text) in candidates {
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            continue;
        };
        let candidate = ExtractedStatement {
            source,
            text: text.to_string(),
            assessment: classify::assess(text),
        };
        if candidate.state().is_valid() {
            return candidate;
        }
        if candidate.state() > best.state() {
            best = candidate;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sj_core::StatementState;

    const VALID: &str = "Location: Phoenix\nTime: Dec 9 at 10pm";
    const INCOMPLETE: &str = "Location: Phoenix\nTime: 10pm";
    const INVALID: &str = "Location:\nTime: 10pm";
    const MISSING: &str = "just a video";

    fn post(selftext: &str, title: &str) -> Post {
        Post {
            id: "t3_1".into(),
            community: "ufos".into(),
            author: "op".into(),
            title: title.into(),
            selftext: selftext.into(),
            permalink: "/r/ufos/comments/1/x/".into(),
            url: None,
            domain: None,
            created_at: Utc::now(),
            label: Some("Sightings Report".into()),
            approved: false,
            saved: false,
            is_video: false,
            is_gallery: false,
        }
    }

    fn comment(author: &str, body: &str, is_submitter: bool, is_top_level: bool) -> Comment {
        Comment {
            id: format!("t1_{author}"),
            author: author.into(),
            body: body.into(),
            is_submitter,
            is_top_level,
        }
    }

    fn text_for(state: StatementState) -> &'static str {
        match state {
            StatementState::Valid => VALID,
            StatementState::Incomplete => INCOMPLETE,
            StatementState::Invalid => INVALID,
            StatementState::Missing => MISSING,
        }
    }

    #[test]
    fn test_valid_body_wins_without_looking_further() {
        let p = post(VALID, INCOMPLETE);
        let statement = select_statement(&p, &[comment("op", INVALID, true, true)]);
        assert_eq!(statement.source, StatementSource::Selftext);
        assert_eq!(statement.state(), StatementState::Valid);
    }

    #[test]
    fn test_later_valid_source_beats_defective_body() {
        let p = post(INCOMPLETE, "Orb");
        let statement = select_statement(&p, &[comment("op", VALID, true, true)]);
        assert_eq!(statement.source, StatementSource::Comment);
        assert_eq!(statement.state(), StatementState::Valid);

        let p = post(INVALID, VALID);
        let statement = select_statement(&p, &[]);
        assert_eq!(statement.source, StatementSource::Title);
        assert!(statement.state().is_valid());
    }

    #[test]
    fn test_only_poster_top_level_comments_count() {
        let comments = [
            comment("someone_else", VALID, false, true),
            comment("op", VALID, true, false),
            comment("op", "cool right?", true, true),
        ];
        assert!(op_statement_comment(&comments).is_none());

        let p = post("", "Orb");
        let statement = select_statement(&p, &comments);
        assert_eq!(statement.state(), StatementState::Missing);
        assert_eq!(statement.source, StatementSource::None);
    }

    #[test]
    fn test_defect_is_never_downgraded_by_later_sources() {
        let p = post(INCOMPLETE, MISSING);
        let statement = select_statement(&p, &[comment("op", INVALID, true, true)]);
        assert_eq!(statement.source, StatementSource::Selftext);
        assert_eq!(statement.state(), StatementState::Incomplete);
    }

    #[test]
    fn test_selected_state_is_best_of_all_sources() {
        let states = [
            StatementState::Missing,
            StatementState::Invalid,
            StatementState::Incomplete,
            StatementState::Valid,
        ];
        for body in states {
            for op in states {
                for title in states {
                    let p = post(text_for(body), text_for(title));
                    let comments = [comment("op", text_for(op), true, true)];
                    let selected = select_statement(&p, &comments).state();
                    let best = body.max(op).max(title);
                    assert_eq!(selected, best, "body={body} comment={op} title={title}");
                }
            }
        }
    }
}
