// libs/blood-donation-cell/src/services/lifecycle.rs
use tracing::{debug, info, warn};

use crate::models::{DonationError, DonationRequestStatus};

#[derive(Debug, Clone, Copy, Default)]
pub struct DonationLifecycleService;

impl DonationLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a request status transition is allowed
    pub fn validate_transition(
        &self,
        current_status: DonationRequestStatus,
        new_status: DonationRequestStatus,
    ) -> Result<(), DonationError> {
        debug!("Validating donation status transition from {} to {}", current_status, new_status);

        if !self.valid_transitions(current_status).contains(&new_status) {
            warn!("Invalid donation status transition attempted: {} -> {}", current_status, new_status);
            return Err(DonationError::InvalidStatusTransition {
                from: current_status,
                to: new_status,
            });
        }

        info!("Donation status transition validated: {} -> {}", current_status, new_status);
        Ok(())
    }

    /// Get all valid next statuses for a given current status
    pub fn valid_transitions(&self, current_status: DonationRequestStatus) -> Vec<DonationRequestStatus> {
        match current_status {
            DonationRequestStatus::Pending => vec![
                DonationRequestStatus::Accepted,
                DonationRequestStatus::Rejected,
                DonationRequestStatus::Cancelled,
            ],
            DonationRequestStatus::Accepted => vec![
                DonationRequestStatus::Completed,
                DonationRequestStatus::Cancelled,
            ],
            // Terminal states - no transitions allowed
            DonationRequestStatus::Rejected => vec![],
            DonationRequestStatus::Completed => vec![],
            DonationRequestStatus::Cancelled => vec![],
        }
    }

    pub fn is_terminal(&self, status: DonationRequestStatus) -> bool {
        self.valid_transitions(status).is_empty()
    }

    /// Pending or Accepted: the donor is spoken for.
    pub fn is_active(&self, status: DonationRequestStatus) -> bool {
        !self.is_terminal(status)
    }

    /// A donor can be asked again when they have never been asked, or their
    /// latest request has run its course.
    pub fn is_available_for_request(&self, latest_status: Option<DonationRequestStatus>) -> bool {
        latest_status.map_or(true, |status| self.is_terminal(status))
    }
}
