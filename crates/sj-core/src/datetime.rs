//! # Date/Time Shape Checker
//!
//! Pattern predicates over the captured date/time content. Only concrete
//! calendar references count as a date; "yesterday" or "Saturday" do not.

use std::sync::LazyLock;

use regex::Regex;

const MONTHS: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

/// `12/25`, `12-25-2024`, `25.12.24`, `2024-12-25`.
static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{4}[/\-.]\d{1,2}[/\-.]\d{1,2}|\d{1,2}[/\-.]\d{1,2}(?:[/\-.](?:\d{4}|\d{2}))?)\b")
        .unwrap()
});

/// `Dec 7`, `December 9th`, `Sept. 3`.
static MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b{MONTHS}\.?\s*\d{{1,2}}(?:st|nd|rd|th)?\b")).unwrap()
});

/// `7th December`, `3rd of March`, `9 Dec`.
static DAY_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:of\s+)?{MONTHS}\b")).unwrap()
});

static HOUR_MINUTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{1,2}:\d{2}\b").unwrap());

/// `8pm`, `8 p.m.`, `11:45 AM`.
static TWELVE_HOUR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:1[0-2]|0?[1-9])(?::[0-5]\d)?\s*[ap]\.?\s?m\b").unwrap()
});

static DAY_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:morning|afternoon|evening|night|midnight|noon|dusk|dawn)\b").unwrap()
});

static AROUND_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\baround\s+\d{1,2}(?P<ordinal>st|nd|rd|th)?\b").unwrap()
});

static LEADING_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)^\s*(?:of\s+)?{MONTHS}\b")).unwrap());

/// 24-hour `0000`-`2359`, with or without `hrs`.
static MILITARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:[01]\d|2[0-3])[0-5]\d\b").unwrap());

static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:19|20)\d\d$").unwrap());

/// A month/day date ending right where a following year would start.
static TRAILING_MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(?:{MONTHS}\.?\s*\d{{1,2}}(?:st|nd|rd|th)?|\d{{1,2}}(?:st|nd|rd|th)?\s+(?:of\s+)?{MONTHS}\.?),?\s*$"
    ))
    .unwrap()
});

/// True if `text` names a concrete calendar date.
pub fn has_date_component(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    NUMERIC_DATE.is_match(text) || MONTH_DAY.is_match(text) || DAY_MONTH.is_match(text)
}

/// True if `text` names a time of day.
pub fn has_time_component(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    HOUR_MINUTE.is_match(text)
        || TWELVE_HOUR.is_match(text)
        || DAY_PART.is_match(text)
        || has_around_hour(text)
        || has_military_time(text)
}

// "2130" is a time; the "2025" in "Dec 7, 2025" or "12/25/2025" is a year.
fn has_military_time(text: &str) -> bool {
    MILITARY.find_iter(text).any(|m| {
        let before = &text[..m.start()];
        let after = &text[m.end()..];
        let in_numeric_date = before.ends_with(['/', '-', '.']) || after.starts_with(['/', '-', '.']);
        let year_after_date = YEAR.is_match(m.as_str()) && TRAILING_MONTH_DAY.is_match(before);
        !in_numeric_date && !year_after_date
    })
}

// "around 10" is a time; "around 10th" or "around 10 March" is a date.
fn has_around_hour(text: &str) -> bool {
    AROUND_NUMBER.captures_iter(text).any(|caps| {
        let Some(whole) = caps.get(0) else {
            return false;
        };
        caps.name("ordinal").is_none() && !LEADING_MONTH.is_match(&text[whole.end()..])
    })
}
