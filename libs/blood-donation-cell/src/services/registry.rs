// libs/blood-donation-cell/src/services/registry.rs
//
// In-memory donor and request bookkeeping. Availability, activity and history
// are all views over the request log; none of them is stored.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{
    BloodGroup, CreateDonationRequest, DonationError, DonationRequest, DonationRequestStatus, Donor,
    RegisterDonorRequest,
};
use crate::services::lifecycle::DonationLifecycleService;

#[derive(Debug, Default)]
pub struct DonationRegistry {
    donors: HashMap<String, Donor>,
    requests: Vec<DonationRequest>,
    lifecycle: DonationLifecycleService,
}

impl DonationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_donor(
        &mut self,
        request: RegisterDonorRequest,
        now: DateTime<Utc>,
    ) -> Result<Donor, DonationError> {
        let patient_id = request.patient_id.trim();
        if patient_id.is_empty() {
            return Err(DonationError::Validation("Patient ID must not be empty".to_string()));
        }
        if request.name.trim().is_empty() {
            return Err(DonationError::Validation("Donor name must not be empty".to_string()));
        }
        if self.donors.contains_key(patient_id) {
            return Err(DonationError::DonorAlreadyRegistered(patient_id.to_string()));
        }

        let blood_group: BloodGroup = request.blood_group.parse()?;

        let donor = Donor {
            patient_id: patient_id.to_string(),
            name: request.name.trim().to_string(),
            blood_group,
            phone_number: request.phone_number,
            email: request.email,
            registered_at: now,
        };

        info!("Registered blood donor {} ({})", donor.patient_id, donor.blood_group);
        self.donors.insert(donor.patient_id.clone(), donor.clone());
        Ok(donor)
    }

    pub fn donor(&self, patient_id: &str) -> Option<&Donor> {
        self.donors.get(patient_id)
    }

    pub fn request(&self, request_id: Uuid) -> Option<&DonationRequest> {
        self.requests.iter().find(|r| r.id == request_id)
    }

    /// Most recent request made of a donor, if any.
    pub fn latest_request_for(&self, donor_id: &str) -> Option<&DonationRequest> {
        self.requests
            .iter()
            .filter(|r| r.donor_id == donor_id)
            .max_by_key(|r| r.blood_requested_time)
    }

    pub fn has_active_request(&self, donor_id: &str) -> bool {
        self.requests
            .iter()
            .any(|r| r.donor_id == donor_id && self.lifecycle.is_active(r.request_status))
    }

    pub fn create_request(
        &mut self,
        request: CreateDonationRequest,
        now: DateTime<Utc>,
    ) -> Result<DonationRequest, DonationError> {
        if request.requested_by_admin.trim().is_empty() {
            return Err(DonationError::Validation("Requesting admin must not be empty".to_string()));
        }
        if request.blood_requested_for.trim().is_empty() {
            return Err(DonationError::Validation("Recipient must not be empty".to_string()));
        }

        let donor = self
            .donors
            .get(&request.donor_id)
            .ok_or_else(|| DonationError::DonorNotFound(request.donor_id.clone()))?;

        if self.has_active_request(&donor.patient_id) {
            warn!("Donor {} already has an active donation request", donor.patient_id);
            return Err(DonationError::ActiveRequestExists(donor.patient_id.clone()));
        }

        let created = DonationRequest {
            id: Uuid::new_v4(),
            donor_id: donor.patient_id.clone(),
            requested_by_admin: request.requested_by_admin.trim().to_string(),
            blood_requested_for: request.blood_requested_for.trim().to_string(),
            blood_group: donor.blood_group,
            request_status: DonationRequestStatus::Pending,
            blood_requested_time: now,
            updated_at: now,
        };

        info!("Created donation request {} for donor {}", created.id, created.donor_id);
        self.requests.push(created.clone());
        Ok(created)
    }

    pub fn transition_request(
        &mut self,
        request_id: Uuid,
        new_status: DonationRequestStatus,
        now: DateTime<Utc>,
    ) -> Result<DonationRequest, DonationError> {
        let lifecycle = self.lifecycle;
        let request = self
            .requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or(DonationError::RequestNotFound(request_id))?;

        lifecycle.validate_transition(request.request_status, new_status)?;

        debug!("Donation request {}: {} -> {}", request_id, request.request_status, new_status);
        request.request_status = new_status;
        request.updated_at = now;
        Ok(request.clone())
    }

    /// Donors nobody is currently waiting on, newest registration first.
    pub fn available_donors(&self, blood_group: Option<BloodGroup>) -> Vec<&Donor> {
        let mut donors: Vec<&Donor> = self
            .donors
            .values()
            .filter(|d| blood_group.map_or(true, |group| d.blood_group == group))
            .filter(|d| {
                self.lifecycle
                    .is_available_for_request(self.latest_request_for(&d.patient_id).map(|r| r.request_status))
            })
            .collect();

        donors.sort_by(|a, b| {
            b.registered_at
                .cmp(&a.registered_at)
                .then_with(|| a.patient_id.cmp(&b.patient_id))
        });
        donors
    }

    /// Pending and Accepted requests, newest first.
    pub fn active_requests(&self) -> Vec<&DonationRequest> {
        self.newest_first(|r| self.lifecycle.is_active(r.request_status))
    }

    /// Requests that reached a terminal status, newest first, optionally for one donor.
    pub fn request_history(&self, donor_id: Option<&str>) -> Vec<&DonationRequest> {
        self.newest_first(|r| {
            self.lifecycle.is_terminal(r.request_status) && donor_id.map_or(true, |id| r.donor_id == id)
        })
    }

    pub fn donor_count(&self) -> usize {
        self.donors.len()
    }

    fn newest_first<F>(&self, keep: F) -> Vec<&DonationRequest>
    where
        F: Fn(&DonationRequest) -> bool,
    {
        // Later insertions win ties on equal timestamps.
        let mut requests: Vec<&DonationRequest> = self.requests.iter().rev().filter(|&r| keep(r)).collect();
        requests.sort_by(|a, b| b.blood_requested_time.cmp(&a.blood_requested_time));
        requests
    }
}
