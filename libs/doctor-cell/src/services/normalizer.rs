// libs/doctor-cell/src/services/normalizer.rs
//
// Pure string normalization for slot tokens.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::services::slots::{meridiem, twelve_hour};

/// The range that is always the midday slot, whatever suffix it arrives with.
pub const NOON_RANGE: &str = "11:00-12:00";

/// `9:00AM10:00AM` style tokens where the separator was lost upstream.
static CONCATENATED_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}:\d{2})(AM|PM)(\d{1,2}:\d{2})(AM|PM)$")
        .expect("concatenated range regex must compile")
});

/// `H:MM[:SS]-H:MM[:SS]` without any AM/PM marker.
static UNMARKED_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2})(?::\d{2})?-(\d{1,2}):(\d{2})(?::\d{2})?$")
        .expect("unmarked range regex must compile")
});

/// Comparison key derived from a raw slot token. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn has_meridiem(&self) -> bool {
        has_meridiem(&self.0)
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Reduce a raw token to its comparison key.
///
/// Whitespace is dropped, letters are upper-cased and dash variants become `-`.
/// A concatenated `<start><AM|PM><end><AM|PM>` token is split into
/// `<start>-<end><end indicator>`. Finally the noon rule forces a trailing `AM`
/// on `11:00-12:00` to `PM`. Running this on its own output is a no-op.
pub fn normalize(raw: &str) -> NormalizedKey {
    let mut key: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .map(unify_dash)
        .collect();

    if has_meridiem(&key) && !key.contains('-') {
        if let Some(split) = split_concatenated(&key) {
            key = split;
        }
    }

    NormalizedKey(apply_noon_rule(key))
}

/// Light cleanup that keeps the spacing between time and indicator:
/// trimmed, upper-cased, dashes unified, whitespace runs collapsed and no
/// spaces around the range separator.
pub fn tidy(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;

    for c in raw.trim().chars().flat_map(char::to_uppercase).map(unify_dash) {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && c != '-' && !out.ends_with('-') && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }

    out
}

/// Pre-save pass over one selected token: resolves the noon ambiguity and adds
/// a missing AM/PM suffix by looking at the start hour (12 and later is PM).
/// Unmarked `H:MM` ranges are rewritten on the 12-hour clock. Bare hour
/// ranges and anything unparseable come back tidied but otherwise untouched.
pub fn normalize_time_slot(token: &str) -> String {
    let tidied = tidy(token);
    let key = normalize(&tidied);

    if key.has_meridiem() {
        if key.as_str().contains(NOON_RANGE) && tidied.ends_with("AM") {
            let mut fixed = tidied;
            fixed.truncate(fixed.len() - 2);
            fixed.push_str("PM");
            return fixed;
        }
        return tidied;
    }

    let Some(caps) = UNMARKED_RANGE.captures(key.as_str()) else {
        return tidied;
    };

    let (Ok(start), Ok(end)) = (caps[1].parse::<u8>(), caps[3].parse::<u8>()) else {
        return tidied;
    };
    if start > 23 || end > 24 {
        return tidied;
    }

    let suffix = if start == 11 && end == 12 { "PM" } else { meridiem(start) };
    format!(
        "{}:{}-{}:{} {}",
        twelve_hour(start),
        &caps[2],
        twelve_hour(end),
        &caps[4],
        suffix
    )
}

pub fn has_meridiem(s: &str) -> bool {
    s.contains("AM") || s.contains("PM")
}

fn unify_dash(c: char) -> char {
    match c {
        '\u{2010}'..='\u{2015}' | '\u{2212}' | '\u{FE58}' | '\u{FE63}' | '\u{FF0D}' => '-',
        other => other,
    }
}

fn split_concatenated(key: &str) -> Option<String> {
    let caps = CONCATENATED_RANGE.captures(key)?;
    Some(format!("{}-{}{}", &caps[1], &caps[3], &caps[4]))
}

fn apply_noon_rule(mut key: String) -> String {
    if key.contains(NOON_RANGE) && key.ends_with("AM") {
        key.truncate(key.len() - 2);
        key.push_str("PM");
    }
    key
}
