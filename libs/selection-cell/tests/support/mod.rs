// Shared fixtures for selection-cell integration tests.
#![allow(dead_code)]

use std::collections::HashMap;

use async_trait::async_trait;

use selection_cell::models::{
    AssignmentStatus, CareTeam, CareTeamAssignment, CaseStatus, Doctor, PatientCase, Principal,
    ProviderRole, SelectionRequest,
};
use selection_cell::store::{DirectoryStore, StoreError};

/// In-memory directory store. Fields mirror the queries the core issues so
/// each test can pin exactly the rows it cares about.
#[derive(Default)]
pub struct MockDirectoryStore {
    /// `None` means the (state, pathway) mapping is unknown.
    pub care_providing_state: Option<i64>,
    pub doctor_ids_in_care_providing_state: Vec<i64>,
    /// Returned verbatim by the eligibility-intersection query.
    pub eligible_doctor_ids: Vec<i64>,
    pub available_doctor_ids: Vec<i64>,
    pub patient_id: i64,
    pub cases: Vec<PatientCase>,
    pub care_teams_by_case: HashMap<i64, CareTeam>,
    pub doctors: HashMap<i64, Doctor>,
    /// When set, every doctor-listing query fails with this message.
    pub fail_doctor_queries: Option<String>,
}

impl MockDirectoryStore {
    fn doctor_failure(&self) -> Option<StoreError> {
        self.fail_doctor_queries
            .as_ref()
            .map(|msg| StoreError::Other(anyhow::anyhow!(msg.clone())))
    }
}

#[async_trait]
impl DirectoryStore for MockDirectoryStore {
    async fn care_providing_state_id(
        &self,
        _state_code: &str,
        _pathway_tag: &str,
    ) -> Result<i64, StoreError> {
        self.care_providing_state.ok_or(StoreError::NotFound)
    }

    async fn doctor_ids_in_care_providing_state(
        &self,
        _care_providing_state_id: i64,
    ) -> Result<Vec<i64>, StoreError> {
        Ok(self.doctor_ids_in_care_providing_state.clone())
    }

    async fn eligible_doctor_ids_among(
        &self,
        _candidate_ids: &[i64],
        _care_providing_state_id: i64,
    ) -> Result<Vec<i64>, StoreError> {
        Ok(self.eligible_doctor_ids.clone())
    }

    async fn patient_id_for_account(&self, _account_id: i64) -> Result<i64, StoreError> {
        Ok(self.patient_id)
    }

    async fn cases_for_patient(
        &self,
        _patient_id: i64,
        _statuses: &[CaseStatus],
    ) -> Result<Vec<PatientCase>, StoreError> {
        Ok(self.cases.clone())
    }

    async fn care_teams_for_cases(
        &self,
        _case_ids: &[i64],
    ) -> Result<HashMap<i64, CareTeam>, StoreError> {
        Ok(self.care_teams_by_case.clone())
    }

    async fn doctors_by_ids(&self, ids: &[i64]) -> Result<Vec<Doctor>, StoreError> {
        if let Some(err) = self.doctor_failure() {
            return Err(err);
        }
        ids.iter()
            .map(|id| {
                self.doctors.get(id).cloned().ok_or_else(|| {
                    StoreError::Other(anyhow::anyhow!("doctor {} missing from directory", id))
                })
            })
            .collect()
    }

    async fn available_doctor_ids(&self, n: usize) -> Result<Vec<i64>, StoreError> {
        if let Some(err) = self.doctor_failure() {
            return Err(err);
        }
        let mut ids = self.available_doctor_ids.clone();
        ids.truncate(n);
        Ok(ids)
    }
}

/// Doctors with ids 1..=n, named the way the admin tool renders them.
pub fn generate_doctors(n: usize) -> Vec<Doctor> {
    (1..=n as i64)
        .map(|id| Doctor {
            id,
            short_display_name: format!("doctorDisplay{}", id),
            long_title: format!("doctorTitle{}", id),
            role: ProviderRole::Doctor,
        })
        .collect()
}

pub fn doctor_map(doctors: &[Doctor]) -> HashMap<i64, Doctor> {
    doctors.iter().map(|d| (d.id, d.clone())).collect()
}

pub fn anonymous_request() -> SelectionRequest {
    SelectionRequest {
        state_code: "CA".to_string(),
        pathway_tag: "acne".to_string(),
        principal: None,
    }
}

pub fn patient_request(account_id: i64) -> SelectionRequest {
    SelectionRequest {
        principal: Some(Principal {
            account_id,
            role: "patient".to_string(),
        }),
        ..anonymous_request()
    }
}

/// A single-doctor care team for a case, in the shape the selector inspects.
pub fn active_doctor_team(provider_id: i64) -> CareTeam {
    CareTeam {
        assignments: vec![CareTeamAssignment {
            provider_id,
            provider_role: ProviderRole::Doctor,
            status: AssignmentStatus::Active,
        }],
    }
}

pub fn submitted_case(id: i64) -> PatientCase {
    PatientCase {
        id,
        status: CaseStatus::Submitted,
    }
}
