use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ==============================================================================
// BLOOD GROUPS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
    ];

    /// Accepts `A+`, `a +ve`, `AB negative`, `O pos`, and a zero typed for `O`.
    pub fn parse_loose(raw: &str) -> Option<Self> {
        let compact: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect();

        let (group, rh) = if let Some(rest) = compact.strip_prefix("AB") {
            ("AB", rest)
        } else if let Some(rest) = compact.strip_prefix('A') {
            ("A", rest)
        } else if let Some(rest) = compact.strip_prefix('B') {
            ("B", rest)
        } else if let Some(rest) = compact.strip_prefix(['O', '0']) {
            ("O", rest)
        } else {
            return None;
        };

        let positive = match rh {
            "+" | "+VE" | "POS" | "POSITIVE" => true,
            "-" | "-VE" | "NEG" | "NEGATIVE" => false,
            _ => return None,
        };

        Some(match (group, positive) {
            ("A", true) => BloodGroup::APositive,
            ("A", false) => BloodGroup::ANegative,
            ("B", true) => BloodGroup::BPositive,
            ("B", false) => BloodGroup::BNegative,
            ("AB", true) => BloodGroup::AbPositive,
            ("AB", false) => BloodGroup::AbNegative,
            (_, true) => BloodGroup::OPositive,
            (_, false) => BloodGroup::ONegative,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = DonationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_loose(s).ok_or_else(|| DonationError::Validation(format!("Unknown blood group '{}'", s)))
    }
}

// ==============================================================================
// REQUEST STATUS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum DonationRequestStatus {
    #[serde(alias = "pending")]
    Pending,
    #[serde(alias = "accepted", alias = "approved")]
    Accepted,
    #[serde(alias = "rejected", alias = "declined")]
    Rejected,
    #[serde(alias = "completed", alias = "fulfilled")]
    Completed,
    #[serde(alias = "cancelled", alias = "canceled")]
    Cancelled,
}

impl DonationRequestStatus {
    /// Canonicalize a status string as it shows up in stored rows and client
    /// payloads. Case and surrounding whitespace are ignored.
    pub fn parse_loose(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "pending" | "requested" => Some(DonationRequestStatus::Pending),
            "accepted" | "approved" => Some(DonationRequestStatus::Accepted),
            "rejected" | "declined" => Some(DonationRequestStatus::Rejected),
            "completed" | "complete" | "done" | "fulfilled" => Some(DonationRequestStatus::Completed),
            "cancelled" | "canceled" => Some(DonationRequestStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for DonationRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DonationRequestStatus::Pending => write!(f, "Pending"),
            DonationRequestStatus::Accepted => write!(f, "Accepted"),
            DonationRequestStatus::Rejected => write!(f, "Rejected"),
            DonationRequestStatus::Completed => write!(f, "Completed"),
            DonationRequestStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl FromStr for DonationRequestStatus {
    type Err = DonationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_loose(s).ok_or_else(|| DonationError::UnknownStatus(s.to_string()))
    }
}

// ==============================================================================
// DONORS AND REQUESTS
// ==============================================================================

/// A patient who has registered as a blood donor. Whether they can be asked
/// right now is derived from their requests, never stored here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Donor {
    pub patient_id: String,
    pub name: String,
    pub blood_group: BloodGroup,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DonationRequest {
    pub id: Uuid,
    pub donor_id: String,
    pub requested_by_admin: String,
    pub blood_requested_for: String,
    pub blood_group: BloodGroup,
    pub request_status: DonationRequestStatus,
    pub blood_requested_time: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==============================================================================
// API REQUEST TYPES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterDonorRequest {
    pub patient_id: String,
    pub name: String,
    /// Free text, canonicalized with [`BloodGroup::parse_loose`].
    pub blood_group: String,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDonationRequest {
    pub donor_id: String,
    pub requested_by_admin: String,
    pub blood_requested_for: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRequestStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailableDonorsQuery {
    pub blood_group: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestHistoryQuery {
    pub donor_id: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DonationError {
    #[error("Donation request cannot move from {from} to {to}")]
    InvalidStatusTransition {
        from: DonationRequestStatus,
        to: DonationRequestStatus,
    },

    #[error("Donation request not found: {0}")]
    RequestNotFound(Uuid),

    #[error("Donor not found: {0}")]
    DonorNotFound(String),

    #[error("Donor {0} is already registered")]
    DonorAlreadyRegistered(String),

    #[error("Donor {0} already has an active request")]
    ActiveRequestExists(String),

    #[error("Unknown request status '{0}'")]
    UnknownStatus(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
