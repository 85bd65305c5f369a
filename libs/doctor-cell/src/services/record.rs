// libs/doctor-cell/src/services/record.rs
//
// Reading and writing the stored doctor availability row. Older rows carry the
// weekly schedule in several shapes; new rows are always written canonically.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use shared_config::AppConfig;

use crate::models::{day_key, RawSchedule, ScheduleCategory, ScheduleSelection};

const WEEKDAY_KEY_PREFIX: &str = "slot_weekday_";
const WEEKEND_KEY_PREFIX: &str = "slot_weekend_";

static TIME_RANGE_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,2}:\d{2}(:\d{2})?-\d{1,2}:\d{2}(:\d{2})?$")
        .expect("time range field regex must compile")
});

/// Pull weekday/weekend raw tokens out of a stored row, whatever shape it has.
/// Returns empty sets when nothing recognizable is present.
pub fn extract_raw_tokens(record: &Value) -> RawSchedule {
    let Some(row) = record.as_object() else {
        warn!("Schedule record is not an object, ignoring");
        return RawSchedule::default();
    };

    match row.get("weekly_schedule") {
        Some(Value::Object(schedule)) => {
            let raw = from_schedule_object(schedule);
            if !raw.is_empty() {
                debug!("Read weekly_schedule object");
                return raw;
            }
        }
        Some(Value::String(encoded)) => match serde_json::from_str::<Value>(encoded) {
            Ok(Value::Object(schedule)) => {
                debug!("Read weekly_schedule from JSON string");
                let raw = from_schedule_object(&schedule);
                if !raw.is_empty() {
                    return raw;
                }
            }
            Ok(_) => warn!("weekly_schedule string does not hold an object"),
            Err(e) => warn!("weekly_schedule string is not valid JSON: {}", e),
        },
        _ => {}
    }

    let raw = from_prefixed_keys(row);
    if !raw.is_empty() {
        debug!("Read schedule from slot_* columns");
        return raw;
    }

    let raw = from_time_like_fields(row);
    if !raw.is_empty() {
        warn!("Read schedule by pattern-matching arbitrary fields");
    }
    raw
}

/// Canonical row for a selection. `weekly_schedule` carries both the category
/// label arrays and the per-day `{start, end, available}` expansion.
pub fn build_record(
    doctor_id: &str,
    hospital_id: &str,
    selection: &ScheduleSelection,
    now: DateTime<Utc>,
    config: &AppConfig,
) -> Value {
    let mut weekly = Map::new();

    for category in ScheduleCategory::ALL {
        let slots = selection.get(category);
        weekly.insert(category.key().to_string(), json!(selection.labels(category)));

        let day_slots: Vec<Value> = slots
            .iter()
            .map(|slot| {
                json!({
                    "start": slot.start_time().format("%H:%M:%S").to_string(),
                    "end": slot.end_time().format("%H:%M:%S").to_string(),
                    "available": true
                })
            })
            .collect();

        for day in category.days() {
            weekly.insert(day_key(*day).to_string(), Value::Array(day_slots.clone()));
        }
    }

    json!({
        "doctor_id": doctor_id,
        "hospital_id": hospital_id,
        "weekly_schedule": Value::Object(weekly),
        "effective_from": now.date_naive().format("%Y-%m-%d").to_string(),
        "effective_until": Value::Null,
        "max_normal_patients": config.max_normal_patients,
        "max_premium_patients": config.max_premium_patients,
        "updated_at": now.to_rfc3339()
    })
}

pub fn record_matches_hospital(record: &Value, hospital_id: &str) -> bool {
    record.get("hospital_id").and_then(Value::as_str) == Some(hospital_id)
}

fn from_schedule_object(schedule: &Map<String, Value>) -> RawSchedule {
    let mut raw = RawSchedule::default();

    for category in ScheduleCategory::ALL {
        if let Some(Value::Array(tokens)) = schedule.get(category.key()) {
            raw.get_mut(category)
                .extend(tokens.iter().filter_map(Value::as_str).map(str::to_string));
        }
    }
    if !raw.is_empty() {
        return raw;
    }

    // Per-day arrays of {start, end, available}.
    for category in ScheduleCategory::ALL {
        for day in category.days() {
            let Some(Value::Array(entries)) = schedule.get(day_key(*day)) else {
                continue;
            };
            for entry in entries {
                let available = entry.get("available").and_then(Value::as_bool).unwrap_or(false);
                let start = entry.get("start").and_then(Value::as_str);
                let end = entry.get("end").and_then(Value::as_str);
                if let (true, Some(start), Some(end)) = (available, start, end) {
                    raw.get_mut(category).insert(format!("{}-{}", start, end));
                }
            }
        }
    }

    raw
}

fn from_prefixed_keys(row: &Map<String, Value>) -> RawSchedule {
    let mut raw = RawSchedule::default();

    for (key, value) in row {
        let Some(token) = value.as_str() else { continue };
        if key.starts_with(WEEKDAY_KEY_PREFIX) {
            raw.weekday.insert(token.to_string());
        } else if key.starts_with(WEEKEND_KEY_PREFIX) {
            raw.weekend.insert(token.to_string());
        }
    }

    raw
}

fn from_time_like_fields(row: &Map<String, Value>) -> RawSchedule {
    let mut raw = RawSchedule::default();

    for (key, value) in row {
        let Some(token) = value.as_str() else { continue };
        if !TIME_RANGE_FIELD.is_match(token.trim()) {
            continue;
        }
        let key = key.to_lowercase();
        if key.contains("weekend") || key.contains("week_end") {
            raw.weekend.insert(token.to_string());
        } else {
            raw.weekday.insert(token.to_string());
        }
    }

    raw
}
