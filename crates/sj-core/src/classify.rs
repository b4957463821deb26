//! # Statement Classifier
//!
//! Combines the extractor and the shape checker into a [`StatementState`].
//! The checks form a priority cascade: `Missing` pre-empts `Invalid`, which
//! pre-empts `Incomplete`.

use crate::datetime::{has_date_component, has_time_component};
use crate::extract;
use crate::models::{Assessment, StatementState};

/// Captured values shorter than this (after trimming) count as empty.
pub const MIN_FIELD_LEN: usize = 2;

pub fn classify(text: &str) -> StatementState {
    assess(text).state
}

/// Full classification, keeping the captured values for recording and messaging.
pub fn assess(text: &str) -> Assessment {
    if text.trim().is_empty() {
        return Assessment::missing();
    }

    let fields = extract::extract(text);
    let (Some(location), Some(time)) = (fields.location.as_deref(), fields.time.as_deref()) else {
        return Assessment {
            location: fields.location,
            time: fields.time,
            combined_time: fields.combined_time,
            ..Assessment::missing()
        };
    };

    let mut assessment = Assessment {
        state: StatementState::Valid,
        location: Some(location.to_string()),
        time: Some(time.to_string()),
        combined_time: fields.combined_time.clone(),
        missing_date: false,
        missing_time: false,
    };

    if too_short(location) || too_short(time) {
        assessment.state = StatementState::Invalid;
        return assessment;
    }

    // Split Date:/Time: lines are judged together.
    let time_content = fields.combined_time.as_deref().unwrap_or(time);

    assessment.missing_date = !has_date_component(time_content);
    assessment.missing_time = !has_time_component(time_content);
    if assessment.missing_date || assessment.missing_time {
        assessment.state = StatementState::Incomplete;
    }
    assessment
}

/// The date/time content to record: every date/time field, or the first one.
pub fn recorded_time(assessment: &Assessment) -> Option<&str> {
    assessment
        .combined_time
        .as_deref()
        .or(assessment.time.as_deref())
}

fn too_short(value: &str) -> bool {
    value.trim().chars().count() < MIN_FIELD_LEN
}
