// libs/doctor-cell/src/services/reconciler.rs

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::models::{CanonicalSlot, RawSchedule, ReconcileOutcome, ScheduleCategory, ScheduleSelection};
use crate::services::matcher::SlotMatcher;

/// Reconcile raw tokens against the fixed slot table.
pub fn reconcile<I, S>(raw_tokens: I) -> ReconcileOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    reconcile_with(SlotMatcher::canonical(), raw_tokens)
}

/// Resolve every token to a canonical slot. Tokens no strategy recognizes are
/// reported in `unrecognized` and left out of the slot set, never coerced.
pub fn reconcile_with<I, S>(matcher: &SlotMatcher, raw_tokens: I) -> ReconcileOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut outcome = ReconcileOutcome::default();

    for token in raw_tokens {
        let token = token.as_ref();
        match matcher.match_token(token) {
            Some(slot) => {
                outcome.slots.insert(slot);
            }
            None => {
                warn!("Unrecognized slot token: '{}'", token);
                outcome.unrecognized.push(token.to_string());
            }
        }
    }

    debug!(
        "Reconciled {} slots, {} unrecognized",
        outcome.slots.len(),
        outcome.unrecognized.len()
    );
    outcome
}

/// Canonical labels for persistence. Writing these back is what heals older,
/// inconsistently formatted records.
pub fn to_raw_tokens<'a, I>(selection: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a CanonicalSlot>,
{
    selection.into_iter().map(|slot| slot.label.to_string()).collect()
}

/// Reconcile both categories of a stored schedule.
pub fn reconcile_schedule(raw: &RawSchedule) -> (ScheduleSelection, RawSchedule) {
    let mut selection = ScheduleSelection::default();
    let mut unrecognized = RawSchedule::default();

    for category in ScheduleCategory::ALL {
        let outcome = reconcile(raw.get(category));
        *selection.get_mut(category) = outcome.slots;
        unrecognized.get_mut(category).extend(outcome.unrecognized);
    }

    (selection, unrecognized)
}

/// Inverse of [`reconcile_schedule`].
pub fn schedule_to_raw(selection: &ScheduleSelection) -> RawSchedule {
    RawSchedule {
        weekday: to_raw_tokens(&selection.weekday),
        weekend: to_raw_tokens(&selection.weekend),
    }
}
