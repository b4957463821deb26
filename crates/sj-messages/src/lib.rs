//! User-facing text: the warning comment, removal reasons, and report reasons.

use anyhow::Context;
use askama::Template;
use sj_config::CommunityConfig;
use sj_core::{Assessment, StatementState};

/// Every warning comment we post contains this phrase; it is how we find our own.
pub const WARNING_MARKER: &str = "Location statement reminder";

/// Platform limit on report reasons.
pub const MAX_REPORT_REASON_LEN: usize = 100;

#[derive(Template)]
#[template(
    ext = "txt",
    source = "**{{ marker }}**

{{ explanation }}
{%- if missing_date %} No calendar date was found.{% endif %}
{%- if missing_time %} No time of day was found.{% endif %}

Please add one to the post text, or as a comment on your own post, within {{ grace_period_mins }} minutes of posting. \
Otherwise this post will be {% if report_on_timeout %}reported to the moderators{% else %}removed{% endif %}.

Expected format:

{{ example }}

{{ footer }}"
)]
pub struct WarningTemplate<'a> {
    pub marker: &'a str,
    pub explanation: &'a str,
    pub missing_date: bool,
    pub missing_time: bool,
    pub grace_period_mins: i64,
    pub report_on_timeout: bool,
    pub example: &'a str,
    pub footer: &'a str,
}

#[derive(Template)]
#[template(
    ext = "txt",
    source = "Your post has been removed. {{ explanation }}
{%- if missing_date %} No calendar date was found.{% endif %}
{%- if missing_time %} No time of day was found.{% endif %}

If you still wish to share it, resubmit it with a location statement such as:

{{ example }}

{{ footer }}"
)]
pub struct RemovalTemplate<'a> {
    pub explanation: &'a str,
    pub missing_date: bool,
    pub missing_time: bool,
    pub example: &'a str,
    pub footer: &'a str,
}

/// Body of the pinned warning comment for a defective statement.
pub fn warning_comment(config: &CommunityConfig, assessment: &Assessment) -> anyhow::Result<String> {
    let example = code_block(&config.messages.example);
    WarningTemplate {
        marker: WARNING_MARKER,
        explanation: config.messages.explanation(assessment.state),
        missing_date: incomplete_and(assessment, assessment.missing_date),
        missing_time: incomplete_and(assessment, assessment.missing_time),
        grace_period_mins: config.grace_period_mins,
        report_on_timeout: config.report_on_timeout,
        example: &example,
        footer: &config.messages.footer,
    }
    .render()
    .context("rendering warning comment")
}

/// Removal reason shown to the poster when the grace period runs out.
pub fn removal_reason(config: &CommunityConfig, assessment: &Assessment) -> anyhow::Result<String> {
    let example = code_block(&config.messages.example);
    RemovalTemplate {
        explanation: config.messages.explanation(assessment.state),
        missing_date: incomplete_and(assessment, assessment.missing_date),
        missing_time: incomplete_and(assessment, assessment.missing_time),
        example: &example,
        footer: &config.messages.footer,
    }
    .render()
    .context("rendering removal reason")
}

/// Report reason for a moderator-approved post that still lacks a statement.
pub fn approved_report_reason(state: StatementState) -> String {
    truncate(&format!("Moderator approved post, but {state} location statement. Please look."))
}

/// Report reason for a post whose grace period ran out.
pub fn timeout_report_reason(state: StatementState) -> String {
    truncate(&format!("{state} location statement after timeout. Please look."))
}

/// Whether `text` is one of our warning comments.
pub fn is_warning(text: &str) -> bool {
    text.contains(WARNING_MARKER)
}

fn incomplete_and(assessment: &Assessment, flag: bool) -> bool {
    assessment.state == StatementState::Incomplete && flag
}

// Indented so markdown renders the example verbatim.
fn code_block(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate(text: &str) -> String {
    text.chars().take(MAX_REPORT_REASON_LEN).collect()
}
