// libs/doctor-cell/src/services/schedule.rs

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use shared_config::AppConfig;

use crate::models::{RawSchedule, ScheduleCategory, ScheduleError, ScheduleResponse, ScheduleSelection};
use crate::services::record::{build_record, extract_raw_tokens, record_matches_hospital};
use crate::services::session::ScheduleEditSession;
use crate::services::store::ScheduleStore;
use crate::services::toggle::ToggleOutcome;

/// What a save wrote, and what it had to leave behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSchedule {
    pub selection: ScheduleSelection,
    pub dropped: RawSchedule,
}

impl SavedSchedule {
    pub fn to_response(&self, doctor_id: &str, hospital_id: &str) -> ScheduleResponse {
        ScheduleResponse::from_selection(&self.selection, self.dropped.clone())
            .for_doctor(doctor_id, hospital_id)
    }
}

pub struct ScheduleService {
    store: Arc<dyn ScheduleStore>,
    config: Arc<AppConfig>,
}

impl ScheduleService {
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn ScheduleStore>) -> Self {
        Self { store, config }
    }

    /// Start an edit session from the stored row for this doctor and hospital.
    pub async fn open_session(
        &self,
        doctor_id: &str,
        hospital_id: &str,
    ) -> Result<ScheduleEditSession, ScheduleError> {
        validate_ids(doctor_id, hospital_id)?;
        debug!("Fetching schedule for doctor {} at hospital {}", doctor_id, hospital_id);

        let raw = match self.store.fetch(doctor_id, hospital_id).await? {
            Some(record) if record_matches_hospital(&record, hospital_id) => extract_raw_tokens(&record),
            Some(_) => {
                warn!(
                    "Stored schedule for doctor {} belongs to another hospital, ignoring",
                    doctor_id
                );
                RawSchedule::default()
            }
            None => {
                debug!("No stored schedule for doctor {}", doctor_id);
                RawSchedule::default()
            }
        };

        Ok(ScheduleEditSession::load(doctor_id, hospital_id, &raw))
    }

    pub async fn load_schedule(
        &self,
        doctor_id: &str,
        hospital_id: &str,
    ) -> Result<ScheduleResponse, ScheduleError> {
        let session = self.open_session(doctor_id, hospital_id).await?;
        Ok(
            ScheduleResponse::from_selection(session.selection(), session.load_unrecognized().clone())
                .for_doctor(doctor_id, hospital_id),
        )
    }

    /// Normalize, then persist the canonical form of the session.
    pub async fn save_session(
        &self,
        session: &mut ScheduleEditSession,
    ) -> Result<SavedSchedule, ScheduleError> {
        session.normalize()?;

        // Stored tokens that never made it into the working sets are lost on
        // write just like the ones the normalize pass could not resolve.
        let mut dropped = session.load_unrecognized().clone();
        for category in ScheduleCategory::ALL {
            dropped
                .get_mut(category)
                .extend(session.pending_unrecognized().get(category).iter().cloned());
        }
        if self.config.strict_schedule_save && !dropped.is_empty() {
            return Err(ScheduleError::Validation(format!(
                "Unrecognized slots: weekday {:?}, weekend {:?}",
                dropped.weekday, dropped.weekend
            )));
        }

        session.finish()?;

        let record = build_record(
            session.doctor_id(),
            session.hospital_id(),
            session.selection(),
            Utc::now(),
            &self.config,
        );
        self.store
            .upsert(session.doctor_id(), session.hospital_id(), record)
            .await?;

        info!(
            "Saved schedule for doctor {} at hospital {}: {} weekday, {} weekend slots",
            session.doctor_id(),
            session.hospital_id(),
            session.selection().weekday.len(),
            session.selection().weekend.len()
        );

        Ok(SavedSchedule {
            selection: session.selection().clone(),
            dropped,
        })
    }

    /// Overwrite both categories with the given tokens.
    pub async fn replace_schedule(
        &self,
        doctor_id: &str,
        hospital_id: &str,
        raw: RawSchedule,
    ) -> Result<SavedSchedule, ScheduleError> {
        validate_ids(doctor_id, hospital_id)?;

        let mut session = ScheduleEditSession::load(doctor_id, hospital_id, &RawSchedule::default());
        session.replace(ScheduleCategory::Weekday, raw.weekday)?;
        session.replace(ScheduleCategory::Weekend, raw.weekend)?;

        self.save_session(&mut session).await
    }

    /// Load, toggle one slot, save.
    pub async fn toggle_slot(
        &self,
        doctor_id: &str,
        hospital_id: &str,
        category: ScheduleCategory,
        slot_label: &str,
    ) -> Result<(ToggleOutcome, SavedSchedule), ScheduleError> {
        if slot_label.trim().is_empty() {
            return Err(ScheduleError::Validation("Slot must not be empty".to_string()));
        }

        let mut session = self.open_session(doctor_id, hospital_id).await?;
        let outcome = session.toggle(category, slot_label)?;
        let saved = self.save_session(&mut session).await?;

        Ok((outcome, saved))
    }
}

fn validate_ids(doctor_id: &str, hospital_id: &str) -> Result<(), ScheduleError> {
    if doctor_id.trim().is_empty() {
        return Err(ScheduleError::Validation("Doctor ID must not be empty".to_string()));
    }
    if hospital_id.trim().is_empty() {
        return Err(ScheduleError::Validation("Hospital ID must not be empty".to_string()));
    }
    Ok(())
}
