// libs/doctor-cell/src/services/toggle.rs
//
// Selection toggling over sets of slot strings that may not be canonical yet.
// Membership is decided by canonical equivalence; what gets stored is the
// literal string the caller passed in.

use std::collections::BTreeSet;

use tracing::debug;

use crate::services::matcher::SlotMatcher;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Inserted(String),
    /// Every member equivalent to the toggled slot, in their stored form.
    Removed(Vec<String>),
}

impl ToggleOutcome {
    pub fn is_selected(&self) -> bool {
        matches!(self, ToggleOutcome::Inserted(_))
    }
}

pub fn toggle(slot_label: &str, into: &mut BTreeSet<String>) -> ToggleOutcome {
    toggle_with(SlotMatcher::canonical(), slot_label, into)
}

/// Remove every member that resolves to the same slot as `slot_label`, or insert
/// `slot_label` verbatim when none does. An unrecognized label falls back to
/// plain string equality.
pub fn toggle_with(matcher: &SlotMatcher, slot_label: &str, into: &mut BTreeSet<String>) -> ToggleOutcome {
    let equivalent: Vec<String> = match matcher.match_token(slot_label) {
        Some(target) => into
            .iter()
            .filter(|member| matcher.match_token(member) == Some(target))
            .cloned()
            .collect(),
        None => into.iter().filter(|member| *member == slot_label).cloned().collect(),
    };

    if equivalent.is_empty() {
        into.insert(slot_label.to_string());
        debug!("Toggled slot on: '{}'", slot_label);
        ToggleOutcome::Inserted(slot_label.to_string())
    } else {
        for member in &equivalent {
            into.remove(member);
        }
        debug!("Toggled slot off: '{}' (removed {:?})", slot_label, equivalent);
        ToggleOutcome::Removed(equivalent)
    }
}
