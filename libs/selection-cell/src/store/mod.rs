use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CareTeam, CaseStatus, Doctor, PatientCase};

pub mod postgrest;

pub use postgrest::PostgrestDirectoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Read operations the selection core requires from the directory store. Any
/// persistent layout that can answer these satisfies the contract; production
/// uses the PostgREST-backed implementation, tests an in-memory one.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Resolves a (state code, pathway tag) pair to its care-providing-state
    /// key, or `StoreError::NotFound` when no such mapping exists.
    async fn care_providing_state_id(
        &self,
        state_code: &str,
        pathway_tag: &str,
    ) -> Result<i64, StoreError>;

    /// All doctor ids eligible for the care-providing state, excluding
    /// temporarily unavailable rows.
    async fn doctor_ids_in_care_providing_state(
        &self,
        care_providing_state_id: i64,
    ) -> Result<Vec<i64>, StoreError>;

    /// The subset of `candidate_ids` eligible for the care-providing state,
    /// in a stable order.
    async fn eligible_doctor_ids_among(
        &self,
        candidate_ids: &[i64],
        care_providing_state_id: i64,
    ) -> Result<Vec<i64>, StoreError>;

    async fn patient_id_for_account(&self, account_id: i64) -> Result<i64, StoreError>;

    async fn cases_for_patient(
        &self,
        patient_id: i64,
        statuses: &[CaseStatus],
    ) -> Result<Vec<PatientCase>, StoreError>;

    async fn care_teams_for_cases(
        &self,
        case_ids: &[i64],
    ) -> Result<HashMap<i64, CareTeam>, StoreError>;

    /// Full doctor records for `ids`, in the requested order.
    async fn doctors_by_ids(&self, ids: &[i64]) -> Result<Vec<Doctor>, StoreError>;

    /// Up to `n` doctor ids from the global available pool.
    async fn available_doctor_ids(&self, n: usize) -> Result<Vec<i64>, StoreError>;
}
