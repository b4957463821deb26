//! # Field Extractor
//!
//! Locates the "Location" and "Time/Date" fields inside free-form post text.
//!
//! Users write these fields every way imaginable: `**Location:** Phoenix`,
//! `where - the beach`, `Date/Time: ...`, separate `Date:` and `Time:` lines,
//! or both fields on one line, with or without a separator. Extraction is
//! label-driven: every accepted label starts a value, and a value runs until
//! the other field's label, the end of the line, or the end of the text.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Which field a label introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Location,
    DateTime,
}

/// Result of one extraction pass. `None` means no label was found at all,
/// which is distinct from a label followed by an empty value (`Some("")`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    pub location: Option<String>,
    pub time: Option<String>,
    /// Every non-empty date/time value, joined with single spaces.
    pub combined_time: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct Label {
    kind: FieldKind,
    start: usize,
    value_start: usize,
    separated: bool,
}

const DATETIME_LABELS: &str =
    r"(?:time|date)[ \t]*(?:/|&|\band\b)[ \t]*(?:time|date)|time|date|when";
const LOCATION_LABELS: &str = r"location|locaiton|loaction|locaton|where";

// Label, optional emphasis on both sides, then an optional separator.
static LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)[*_]{{0,2}}(?:(?P<when>{DATETIME_LABELS})|(?P<loc>{LOCATION_LABELS}))[*_]{{0,2}}(?P<sep>[ \t]*[:\-–—])?[*_]{{0,2}}"
    ))
    .unwrap()
});

/// Runs the full extraction: first location value, first date/time value,
/// and the combined date/time content.
pub fn extract(text: &str) -> Fields {
    let labels = find_labels(text);
    let mut fields = Fields::default();
    let mut combined: Vec<String> = Vec::new();

    for (idx, label) in labels.iter().enumerate() {
        let value = value_of(text, &labels, idx);
        match label.kind {
            FieldKind::Location => {
                if fields.location.is_none() {
                    fields.location = Some(value);
                }
            }
            FieldKind::DateTime => {
                if !value.is_empty() {
                    combined.push(value.clone());
                }
                if fields.time.is_none() {
                    fields.time = Some(value);
                }
            }
        }
    }

    if !combined.is_empty() {
        fields.combined_time = Some(combined.join(" "));
    }
    fields
}

/// Cheap cue used to pick the poster's statement comment out of a thread.
pub fn has_location_label(text: &str) -> bool {
    find_labels(text)
        .iter()
        .any(|l| l.kind == FieldKind::Location)
}

fn find_labels(text: &str) -> Vec<Label> {
    LABEL
        .captures_iter(text)
        .filter_map(|caps| accept(text, &caps))
        .collect()
}

fn accept(text: &str, caps: &Captures<'_>) -> Option<Label> {
    let whole = caps.get(0)?;
    let (kind, name) = match (caps.name("when"), caps.name("loc")) {
        (Some(m), _) => (FieldKind::DateTime, m),
        (None, Some(m)) => (FieldKind::Location, m),
        (None, None) => return None,
    };

    // Whole words only: "somewhere", "Times", "sometime" are not labels.
    if text[..whole.start()]
        .chars()
        .next_back()
        .is_some_and(char::is_alphanumeric)
    {
        return None;
    }
    if text[name.end()..]
        .chars()
        .next()
        .is_some_and(char::is_alphanumeric)
    {
        return None;
    }

    // Without a separator, whitespace has to follow the label.
    let separated = caps.name("sep").is_some();
    if !separated
        && !text[whole.end()..]
            .chars()
            .next()
            .map_or(true, char::is_whitespace)
    {
        return None;
    }

    Some(Label {
        kind,
        start: whole.start(),
        value_start: whole.end(),
        separated,
    })
}

// A value ends at the other field's label. A label of the same field only
// ends it when written with a separator ("Date: Dec 7 Time: 8pm"), so
// "near where I live" stays one location.
fn ends_value(current: &Label, next: &Label) -> bool {
    next.kind != current.kind || next.separated
}

fn value_of(text: &str, labels: &[Label], idx: usize) -> String {
    let label = labels[idx];
    let rest = &text[label.value_start..];
    let mut end = rest.find('\n').unwrap_or(rest.len());
    if let Some(next) = labels[idx + 1..].iter().find(|next| ends_value(&label, next)) {
        end = end.min(next.start - label.value_start);
    }
    clean(&rest[..end])
}

fn clean(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '*' || c == '_')
        .trim()
        .to_string()
}
