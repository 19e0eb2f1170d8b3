use std::collections::HashMap;

use anyhow::anyhow;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::postgrest::{in_filter, PostgrestClient};

use crate::models::{CareTeam, CareTeamAssignment, CaseStatus, Doctor, PatientCase};
use crate::store::{DirectoryStore, StoreError};

/// Directory store reads over the PostgREST API. All queries are global
/// reads keyed by ids, so the shared anon-key client is used throughout.
pub struct PostgrestDirectoryStore {
    client: PostgrestClient,
}

#[derive(Debug, Deserialize)]
struct IdRow {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct DoctorIdRow {
    doctor_id: i64,
}

#[derive(Debug, Deserialize)]
struct AssignmentRow {
    case_id: i64,
    #[serde(flatten)]
    assignment: CareTeamAssignment,
}

impl PostgrestDirectoryStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: PostgrestClient::new(config),
        }
    }
}

#[async_trait]
impl DirectoryStore for PostgrestDirectoryStore {
    async fn care_providing_state_id(
        &self,
        state_code: &str,
        pathway_tag: &str,
    ) -> Result<i64, StoreError> {
        // Pathway tags are free-form; encode so a tag containing `&` or `=`
        // cannot rewrite the filter.
        let path = format!(
            "/rest/v1/care_providing_states?state_code=eq.{}&pathway_tag=eq.{}&select=id",
            urlencoding::encode(state_code),
            urlencoding::encode(pathway_tag)
        );
        let rows: Vec<IdRow> = self.client.get(&path).await?;
        match rows.first() {
            Some(row) => Ok(row.id),
            None => {
                debug!(
                    "No care providing state for ({}, {})",
                    state_code, pathway_tag
                );
                Err(StoreError::NotFound)
            }
        }
    }

    async fn doctor_ids_in_care_providing_state(
        &self,
        care_providing_state_id: i64,
    ) -> Result<Vec<i64>, StoreError> {
        let path = format!(
            "/rest/v1/care_provider_eligibility?care_providing_state_id=eq.{}&unavailable=eq.false&select=doctor_id&order=doctor_id",
            care_providing_state_id
        );
        let rows: Vec<DoctorIdRow> = self.client.get(&path).await?;
        Ok(rows.into_iter().map(|row| row.doctor_id).collect())
    }

    async fn eligible_doctor_ids_among(
        &self,
        candidate_ids: &[i64],
        care_providing_state_id: i64,
    ) -> Result<Vec<i64>, StoreError> {
        if candidate_ids.is_empty() {
            return Ok(Vec::new());
        }
        let path = format!(
            "/rest/v1/care_provider_eligibility?care_providing_state_id=eq.{}&unavailable=eq.false&doctor_id={}&select=doctor_id&order=doctor_id",
            care_providing_state_id,
            in_filter(candidate_ids)
        );
        let rows: Vec<DoctorIdRow> = self.client.get(&path).await?;
        Ok(rows.into_iter().map(|row| row.doctor_id).collect())
    }

    async fn patient_id_for_account(&self, account_id: i64) -> Result<i64, StoreError> {
        let path = format!("/rest/v1/patients?account_id=eq.{}&select=id", account_id);
        let rows: Vec<IdRow> = self.client.get(&path).await?;
        rows.first().map(|row| row.id).ok_or(StoreError::NotFound)
    }

    async fn cases_for_patient(
        &self,
        patient_id: i64,
        statuses: &[CaseStatus],
    ) -> Result<Vec<PatientCase>, StoreError> {
        let status_list = statuses
            .iter()
            .map(|status| status.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let path = format!(
            "/rest/v1/patient_cases?patient_id=eq.{}&status=in.({})&select=id,status&order=id",
            patient_id, status_list
        );
        let cases: Vec<PatientCase> = self.client.get(&path).await?;
        Ok(cases)
    }

    async fn care_teams_for_cases(
        &self,
        case_ids: &[i64],
    ) -> Result<HashMap<i64, CareTeam>, StoreError> {
        if case_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let path = format!(
            "/rest/v1/care_team_assignments?case_id={}&select=case_id,provider_id,provider_role,status&order=case_id",
            in_filter(case_ids)
        );
        let rows: Vec<AssignmentRow> = self.client.get(&path).await?;

        let mut teams: HashMap<i64, CareTeam> = HashMap::new();
        for row in rows {
            teams
                .entry(row.case_id)
                .or_default()
                .assignments
                .push(row.assignment);
        }
        Ok(teams)
    }

    async fn doctors_by_ids(&self, ids: &[i64]) -> Result<Vec<Doctor>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let path = format!(
            "/rest/v1/doctors?id={}&select=id,short_display_name,long_title,role",
            in_filter(ids)
        );
        let rows: Vec<Doctor> = self.client.get(&path).await?;

        // PostgREST returns table order; re-map to the requested order.
        let mut by_id: HashMap<i64, Doctor> = rows.into_iter().map(|d| (d.id, d)).collect();
        ids.iter()
            .map(|id| {
                by_id
                    .remove(id)
                    .ok_or_else(|| StoreError::Other(anyhow!("doctor {} missing from directory", id)))
            })
            .collect()
    }

    async fn available_doctor_ids(&self, n: usize) -> Result<Vec<i64>, StoreError> {
        let path = format!(
            "/rest/v1/doctors?available=eq.true&select=id&order=id&limit={}",
            n
        );
        let rows: Vec<IdRow> = self.client.get(&path).await?;
        Ok(rows.into_iter().map(|row| row.id).collect())
    }
}
