// libs/doctor-cell/src/services/matcher.rs
//
// Resolves arbitrary slot tokens to a canonical slot through an ordered list of
// strategies. Earlier strategies are exact; later ones are looser and may produce
// false positives, so the order matters and new formats are appended, not inserted.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::models::CanonicalSlot;
use crate::services::normalizer::{normalize, tidy, NormalizedKey};
use crate::services::slots::{meridiem, twelve_hour, CANONICAL_SLOTS};

/// A single resolution attempt. Strategies are pure and share this signature.
pub type MatchStrategy = fn(&SlotMatcher, &MatchInput) -> Option<CanonicalSlot>;

pub const DEFAULT_STRATEGIES: [(&str, MatchStrategy); 4] = [
    ("direct_lookup", direct_lookup),
    ("hour_pattern", hour_pattern),
    ("indicator_spacing", indicator_spacing),
    ("loose_numeric", loose_numeric),
];

static HOUR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^(\d{1,2}):00(?::00)?-(\d{1,2}):00(?::00)?$",
        r"^(\d{1,2})-(\d{1,2})$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("hour pattern regex must compile"))
    .collect()
});

static INTEGERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+").expect("integer regex must compile"));

static CANONICAL_MATCHER: Lazy<SlotMatcher> = Lazy::new(|| SlotMatcher::new(&CANONICAL_SLOTS));

/// A raw token prepared once for all strategies.
#[derive(Debug, Clone)]
pub struct MatchInput {
    pub raw: String,
    pub tidy: String,
    pub key: NormalizedKey,
}

impl MatchInput {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            tidy: tidy(raw),
            key: normalize(raw),
        }
    }
}

pub struct SlotMatcher {
    slots: Vec<CanonicalSlot>,
    encodings: HashMap<String, CanonicalSlot>,
    hour_index: HashMap<u8, CanonicalSlot>,
    strategies: Vec<(&'static str, MatchStrategy)>,
}

impl SlotMatcher {
    pub fn new(slots: &[CanonicalSlot]) -> Self {
        let mut encodings = HashMap::new();
        for slot in slots {
            for encoding in known_encodings(slot) {
                encodings.entry(tidy(&encoding)).or_insert(*slot);
            }
        }

        let mut hour_index = HashMap::new();
        for slot in slots {
            hour_index.entry(slot.start_hour).or_insert(*slot);
        }
        // Afternoon slots are also reachable by their 12-hour start ("1-2" is 13:00-14:00).
        for slot in slots.iter().filter(|slot| slot.start_hour > 12) {
            hour_index.entry(slot.start_hour - 12).or_insert(*slot);
        }

        Self {
            slots: slots.to_vec(),
            encodings,
            hour_index,
            strategies: DEFAULT_STRATEGIES.to_vec(),
        }
    }

    /// Shared matcher over the fixed slot table.
    pub fn canonical() -> &'static SlotMatcher {
        &CANONICAL_MATCHER
    }

    /// Append a strategy after the existing ones.
    pub fn with_strategy(mut self, name: &'static str, strategy: MatchStrategy) -> Self {
        self.strategies.push((name, strategy));
        self
    }

    pub fn slots(&self) -> &[CanonicalSlot] {
        &self.slots
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|(name, _)| *name).collect()
    }

    pub fn match_token(&self, raw: &str) -> Option<CanonicalSlot> {
        self.match_with_strategy(raw).map(|(slot, _)| slot)
    }

    /// Like [`match_token`](Self::match_token) but also reports which strategy won.
    pub fn match_with_strategy(&self, raw: &str) -> Option<(CanonicalSlot, &'static str)> {
        let input = MatchInput::new(raw);
        for (name, strategy) in &self.strategies {
            if let Some(slot) = strategy(self, &input) {
                debug!("Slot token '{}' resolved to '{}' by {}", raw, slot.label, name);
                return Some((slot, *name));
            }
        }
        debug!("Slot token '{}' matched no strategy", raw);
        None
    }

    pub fn lookup_encoding(&self, encoded: &str) -> Option<CanonicalSlot> {
        self.encodings.get(encoded).copied()
    }

    /// Slot for a start/end hour pair, either on the 24-hour clock or with an
    /// afternoon start written on the 12-hour clock.
    pub fn slot_for_hours(&self, start: u8, end: u8) -> Option<CanonicalSlot> {
        let slot = self.hour_index.get(&start)?;
        let twelve_hour_end = if start < slot.start_hour { slot.end_hour - 12 } else { slot.end_hour };
        (end == twelve_hour_end).then_some(*slot)
    }
}

/// Resolve a raw token against the fixed slot table.
pub fn match_slot(raw: &str) -> Option<CanonicalSlot> {
    SlotMatcher::canonical().match_token(raw)
}

/// Every spelling of a slot that has been seen in stored schedules.
fn known_encodings(slot: &CanonicalSlot) -> Vec<String> {
    let (s, e) = (slot.start_hour, slot.end_hour);
    let (s12, e12) = (twelve_hour(s), twelve_hour(e));
    let (sm, em) = (meridiem(s), meridiem(e));

    vec![
        slot.label.to_string(),
        format!("{:02}:00:00-{:02}:00:00", s, e),
        format!("{}:00:00-{}:00:00", s, e),
        format!("{:02}:00-{:02}:00", s, e),
        format!("{}:00-{}:00", s, e),
        format!("{}:00{}-{}:00{}", s12, sm, e12, em),
        format!("{}:00 {}-{}:00 {}", s12, sm, e12, em),
        format!("{}-{} {}", s12, e12, em),
    ]
}

// ==============================================================================
// STRATEGIES
// ==============================================================================

pub fn direct_lookup(matcher: &SlotMatcher, input: &MatchInput) -> Option<CanonicalSlot> {
    matcher
        .lookup_encoding(&input.tidy)
        .or_else(|| matcher.lookup_encoding(input.key.as_str()))
}

pub fn hour_pattern(matcher: &SlotMatcher, input: &MatchInput) -> Option<CanonicalSlot> {
    HOUR_PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.captures(input.key.as_str())?;
        // A capture that does not parse falls through rather than half-matching.
        let start = caps[1].parse::<u8>().ok()?;
        let end = caps[2].parse::<u8>().ok()?;
        matcher.slot_for_hours(start, end)
    })
}

pub fn indicator_spacing(matcher: &SlotMatcher, input: &MatchInput) -> Option<CanonicalSlot> {
    if !input.key.has_meridiem() {
        return None;
    }
    let spaced = input.key.as_str().replace("AM", " AM").replace("PM", " PM");
    matcher.lookup_encoding(&spaced)
}

pub fn loose_numeric(matcher: &SlotMatcher, input: &MatchInput) -> Option<CanonicalSlot> {
    let wanted = leading_integers(&input.tidy)?;
    matcher
        .slots()
        .iter()
        .copied()
        .find(|slot| leading_integers(slot.label) == Some(wanted))
}

fn leading_integers(text: &str) -> Option<(u32, u32)> {
    let mut numbers = INTEGERS
        .find_iter(text)
        .map(|m| m.as_str().parse::<u32>().ok());
    let first = numbers.next()??;
    let second = numbers.next()??;
    Some((first, second))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_integers() {
        assert_eq!(leading_integers("9:00-10:00 AM"), Some((9, 0)));
        assert_eq!(leading_integers("garbage"), None);
        assert_eq!(leading_integers("nine 9"), None);
    }

    #[test]
    fn test_hour_index_includes_twelve_hour_afternoon() {
        let matcher = SlotMatcher::canonical();
        assert_eq!(matcher.slot_for_hours(1, 2).map(|s| s.start_hour), Some(13));
        assert_eq!(matcher.slot_for_hours(13, 14).map(|s| s.start_hour), Some(13));
        assert_eq!(matcher.slot_for_hours(11, 12).map(|s| s.start_hour), Some(11));
        assert!(matcher.slot_for_hours(9, 11).is_none());
        assert!(matcher.slot_for_hours(12, 13).is_none());
    }

    #[test]
    fn test_hour_pattern_requires_exact_end_hour() {
        let matcher = SlotMatcher::canonical();
        assert!(matcher.slot_for_hours(10, 23).is_none());
        assert!(matcher.slot_for_hours(11, 24).is_none());
        assert!(matcher.slot_for_hours(13, 2).is_none());
        assert!(matcher.slot_for_hours(1, 14).is_none());

        for raw in ["10:00:00-23:00:00", "11:00-24:00", "13-2"] {
            assert_eq!(hour_pattern(matcher, &MatchInput::new(raw)), None, "input {:?}", raw);
        }
    }
}
