use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==============================================================================
// CANONICAL SLOTS
// ==============================================================================

/// One of the fixed one-hour appointment slots offered in the schedule editor.
///
/// Ordering follows `start_hour`, so sets of slots iterate in clock order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CanonicalSlot {
    pub start_hour: u8,
    pub end_hour: u8,
    pub label: &'static str,
}

impl CanonicalSlot {
    pub const fn new(start_hour: u8, end_hour: u8, label: &'static str) -> Self {
        Self { start_hour, end_hour, label }
    }

    pub fn start_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.start_hour.into(), 0, 0).unwrap_or(NaiveTime::MIN)
    }

    pub fn end_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.end_hour.into(), 0, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for CanonicalSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

// ==============================================================================
// SCHEDULE SHAPES
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleCategory {
    #[serde(alias = "weekdays", alias = "WEEKDAY")]
    Weekday,
    #[serde(alias = "weekends", alias = "WEEKEND")]
    Weekend,
}

impl ScheduleCategory {
    pub const ALL: [ScheduleCategory; 2] = [ScheduleCategory::Weekday, ScheduleCategory::Weekend];

    pub fn days(&self) -> &'static [Weekday] {
        match self {
            ScheduleCategory::Weekday => &[
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            ScheduleCategory::Weekend => &[Weekday::Sat, Weekday::Sun],
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            ScheduleCategory::Weekday => "weekday",
            ScheduleCategory::Weekend => "weekend",
        }
    }
}

impl fmt::Display for ScheduleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Lowercase day name as used for the per-day keys of a stored weekly schedule.
pub fn day_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Unvalidated slot strings for both categories, as read from or headed to storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSchedule {
    #[serde(default)]
    pub weekday: BTreeSet<String>,
    #[serde(default)]
    pub weekend: BTreeSet<String>,
}

impl RawSchedule {
    pub fn get(&self, category: ScheduleCategory) -> &BTreeSet<String> {
        match category {
            ScheduleCategory::Weekday => &self.weekday,
            ScheduleCategory::Weekend => &self.weekend,
        }
    }

    pub fn get_mut(&mut self, category: ScheduleCategory) -> &mut BTreeSet<String> {
        match category {
            ScheduleCategory::Weekday => &mut self.weekday,
            ScheduleCategory::Weekend => &mut self.weekend,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.weekday.is_empty() && self.weekend.is_empty()
    }
}

/// Canonical weekday/weekend selection for one doctor at one hospital.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleSelection {
    pub weekday: BTreeSet<CanonicalSlot>,
    pub weekend: BTreeSet<CanonicalSlot>,
}

impl ScheduleSelection {
    pub fn get(&self, category: ScheduleCategory) -> &BTreeSet<CanonicalSlot> {
        match category {
            ScheduleCategory::Weekday => &self.weekday,
            ScheduleCategory::Weekend => &self.weekend,
        }
    }

    pub fn get_mut(&mut self, category: ScheduleCategory) -> &mut BTreeSet<CanonicalSlot> {
        match category {
            ScheduleCategory::Weekday => &mut self.weekday,
            ScheduleCategory::Weekend => &mut self.weekend,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.weekday.is_empty() && self.weekend.is_empty()
    }

    pub fn labels(&self, category: ScheduleCategory) -> Vec<&'static str> {
        self.get(category).iter().map(|slot| slot.label).collect()
    }
}

/// Result of reconciling one set of raw tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub slots: BTreeSet<CanonicalSlot>,
    /// Tokens no matcher stage recognized, in input order.
    pub unrecognized: Vec<String>,
}

impl ReconcileOutcome {
    pub fn is_clean(&self) -> bool {
        self.unrecognized.is_empty()
    }
}

// ==============================================================================
// API REQUEST/RESPONSE TYPES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeTokenRequest {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSlotsRequest {
    #[serde(default)]
    pub weekday: Vec<String>,
    #[serde(default)]
    pub weekend: Vec<String>,
}

impl From<ScheduleSlotsRequest> for RawSchedule {
    fn from(request: ScheduleSlotsRequest) -> Self {
        RawSchedule {
            weekday: request.weekday.into_iter().collect(),
            weekend: request.weekend.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleSlotRequest {
    pub category: ScheduleCategory,
    pub slot: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleResponse {
    pub doctor_id: Option<String>,
    pub hospital_id: Option<String>,
    pub weekday: Vec<String>,
    pub weekend: Vec<String>,
    pub unrecognized: RawSchedule,
}

impl ScheduleResponse {
    pub fn from_selection(selection: &ScheduleSelection, unrecognized: RawSchedule) -> Self {
        Self {
            doctor_id: None,
            hospital_id: None,
            weekday: to_owned_labels(selection.labels(ScheduleCategory::Weekday)),
            weekend: to_owned_labels(selection.labels(ScheduleCategory::Weekend)),
            unrecognized,
        }
    }

    pub fn for_doctor(mut self, doctor_id: &str, hospital_id: &str) -> Self {
        self.doctor_id = Some(doctor_id.to_string());
        self.hospital_id = Some(hospital_id.to_string());
        self
    }
}

fn to_owned_labels(labels: Vec<&'static str>) -> Vec<String> {
    labels.into_iter().map(str::to_string).collect()
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Schedule session is {actual}, expected {expected}")]
    InvalidSessionState { expected: String, actual: String },

    #[error("Schedule storage error: {0}")]
    Storage(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
