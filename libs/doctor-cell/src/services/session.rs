// libs/doctor-cell/src/services/session.rs
//
// One schedule editing session: Loaded -> Editing -> Normalizing -> Saved.
// Saving is only reachable through Normalizing.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::{RawSchedule, ScheduleCategory, ScheduleError, ScheduleSelection};
use crate::services::matcher::SlotMatcher;
use crate::services::normalizer::normalize_time_slot;
use crate::services::reconciler::{reconcile_schedule, schedule_to_raw};
use crate::services::toggle::{toggle, ToggleOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Loaded,
    Editing,
    Normalizing,
    Saved,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Loaded => write!(f, "loaded"),
            SessionState::Editing => write!(f, "editing"),
            SessionState::Normalizing => write!(f, "normalizing"),
            SessionState::Saved => write!(f, "saved"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleEditSession {
    doctor_id: String,
    hospital_id: String,
    state: SessionState,
    literal: RawSchedule,
    selection: ScheduleSelection,
    load_unrecognized: RawSchedule,
    pending_unrecognized: RawSchedule,
}

impl ScheduleEditSession {
    /// Open a session from whatever the store returned. The working sets start
    /// out as canonical labels; tokens that could not be reconciled are kept
    /// aside for reporting.
    pub fn load(doctor_id: &str, hospital_id: &str, raw: &RawSchedule) -> Self {
        let (selection, load_unrecognized) = reconcile_schedule(raw);

        info!(
            "Opened schedule session for doctor {} at hospital {}: {} weekday, {} weekend slots",
            doctor_id,
            hospital_id,
            selection.weekday.len(),
            selection.weekend.len()
        );
        if !load_unrecognized.is_empty() {
            warn!(
                "Doctor {} schedule had unrecognized tokens: {:?}",
                doctor_id, load_unrecognized
            );
        }

        Self {
            doctor_id: doctor_id.to_string(),
            hospital_id: hospital_id.to_string(),
            state: SessionState::Loaded,
            literal: schedule_to_raw(&selection),
            selection,
            load_unrecognized,
            pending_unrecognized: RawSchedule::default(),
        }
    }

    pub fn doctor_id(&self) -> &str {
        &self.doctor_id
    }

    pub fn hospital_id(&self) -> &str {
        &self.hospital_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Working sets as edited, possibly holding non-canonical spellings.
    pub fn literal(&self) -> &RawSchedule {
        &self.literal
    }

    /// Canonical selection as of the last load or normalize pass.
    pub fn selection(&self) -> &ScheduleSelection {
        &self.selection
    }

    pub fn load_unrecognized(&self) -> &RawSchedule {
        &self.load_unrecognized
    }

    /// Tokens the normalize pass could not resolve; they will not be saved.
    pub fn pending_unrecognized(&self) -> &RawSchedule {
        &self.pending_unrecognized
    }

    pub fn toggle(&mut self, category: ScheduleCategory, slot_label: &str) -> Result<ToggleOutcome, ScheduleError> {
        self.begin_edit()?;
        Ok(toggle(slot_label, self.literal.get_mut(category)))
    }

    /// Replace a whole category's working set.
    pub fn replace<I, S>(&mut self, category: ScheduleCategory, tokens: I) -> Result<(), ScheduleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.begin_edit()?;
        *self.literal.get_mut(category) = tokens.into_iter().map(Into::into).collect();
        Ok(())
    }

    /// Resolve the noon ambiguity, infer missing AM/PM suffixes and reconcile
    /// the working sets into the canonical selection. Repeating it is a no-op.
    pub fn normalize(&mut self) -> Result<&ScheduleSelection, ScheduleError> {
        match self.state {
            SessionState::Loaded | SessionState::Editing => {}
            SessionState::Normalizing => return Ok(&self.selection),
            SessionState::Saved => return Err(self.wrong_state("loaded, editing or normalizing")),
        }

        let matcher = SlotMatcher::canonical();
        let mut selection = ScheduleSelection::default();
        let mut pending = RawSchedule::default();

        for category in ScheduleCategory::ALL {
            for token in self.literal.get(category) {
                let fixed = normalize_time_slot(token);
                match matcher.match_token(&fixed) {
                    Some(slot) => {
                        selection.get_mut(category).insert(slot);
                    }
                    None => {
                        warn!("Dropping unrecognized {} slot '{}' before save", category, token);
                        pending.get_mut(category).insert(token.clone());
                    }
                }
            }
        }

        self.selection = selection;
        self.pending_unrecognized = pending;
        self.state = SessionState::Normalizing;
        debug!("Schedule session for doctor {} normalized", self.doctor_id);
        Ok(&self.selection)
    }

    /// Canonical labels to persist. Only valid straight after [`normalize`](Self::normalize).
    pub fn finish(&mut self) -> Result<RawSchedule, ScheduleError> {
        if self.state != SessionState::Normalizing {
            return Err(self.wrong_state("normalizing"));
        }
        self.state = SessionState::Saved;
        Ok(schedule_to_raw(&self.selection))
    }

    fn begin_edit(&mut self) -> Result<(), ScheduleError> {
        match self.state {
            SessionState::Loaded | SessionState::Editing => {
                self.state = SessionState::Editing;
                Ok(())
            }
            _ => Err(self.wrong_state("loaded or editing")),
        }
    }

    fn wrong_state(&self, expected: &str) -> ScheduleError {
        ScheduleError::InvalidSessionState {
            expected: expected.to_string(),
            actual: self.state.to_string(),
        }
    }
}
