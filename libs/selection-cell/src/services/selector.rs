use std::collections::HashSet;

use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::models::{AssignmentStatus, CaseStatus, ProviderRole, SelectionRequest};
use crate::store::{DirectoryStore, StoreError};

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("access forbidden")]
    Forbidden,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Picks the ordered list of doctor ids offered to the caller: doctors from
/// the patient's prior care teams first, topped up with a uniform random
/// draw from the remaining eligible pool.
pub struct SelectorService<'a> {
    store: &'a dyn DirectoryStore,
}

impl<'a> SelectorService<'a> {
    pub fn new(store: &'a dyn DirectoryStore) -> Self {
        Self { store }
    }

    pub async fn pick_doctors<R: Rng>(
        &self,
        rng: &mut R,
        request: &SelectionRequest,
        n: usize,
    ) -> Result<Vec<i64>, SelectionError> {
        let care_providing_state_id = match self
            .store
            .care_providing_state_id(&request.state_code, &request.pathway_tag)
            .await
        {
            Ok(id) => id,
            // An unknown (state, pathway) mapping is not an error; the
            // caller still gets the first-available option.
            Err(StoreError::NotFound) => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut picked: Vec<i64> = Vec::with_capacity(n);

        if let Some(principal) = &request.principal {
            // only patients may access this endpoint in authenticated mode
            if !principal.is_patient() {
                return Err(SelectionError::Forbidden);
            }

            let history = self
                .history_doctor_ids(principal.account_id)
                .await?;

            let eligible = self
                .store
                .eligible_doctor_ids_among(&history, care_providing_state_id)
                .await?;
            debug!(
                "{} of {} care-team doctors eligible for care providing state {}",
                eligible.len(),
                history.len(),
                care_providing_state_id
            );

            // Enough prior doctors: the selection is fully deterministic.
            if eligible.len() >= n {
                return Ok(eligible[..n].to_vec());
            }
            picked.extend(eligible);
        }

        let available = self
            .store
            .doctor_ids_in_care_providing_state(care_providing_state_id)
            .await?;

        // Drop already-picked ids (and duplicates) from the fill pool.
        let mut taken: HashSet<i64> = picked.iter().copied().collect();
        let mut pool: Vec<i64> = Vec::with_capacity(available.len());
        for id in available {
            if taken.insert(id) {
                pool.push(id);
            }
        }

        let remaining = n - picked.len();
        if pool.is_empty() {
            return Ok(picked);
        }
        if remaining >= pool.len() {
            // The whole pool is needed; keep the store's order.
            picked.extend(pool);
            return Ok(picked);
        }

        // Partial Fisher-Yates: draw `remaining` distinct ids uniformly
        // without replacement, appended in draw order.
        let mut live = pool.len();
        for _ in 0..remaining {
            let index = rng.gen_range(0..live);
            picked.push(pool[index]);
            pool.swap(index, live - 1);
            live -= 1;
        }

        Ok(picked)
    }

    /// Distinct doctors from the patient's submitted-or-later cases, in
    /// first-seen order across care teams.
    async fn history_doctor_ids(&self, account_id: i64) -> Result<Vec<i64>, SelectionError> {
        let patient_id = self.store.patient_id_for_account(account_id).await?;

        let cases = self
            .store
            .cases_for_patient(patient_id, CaseStatus::submitted_or_later())
            .await?;
        let case_ids: Vec<i64> = cases.iter().map(|case| case.id).collect();

        let care_teams = self.store.care_teams_for_cases(&case_ids).await?;

        let mut seen = HashSet::new();
        let mut history = Vec::new();
        for team in care_teams.values() {
            for assignment in &team.assignments {
                if assignment.provider_role == ProviderRole::Doctor
                    && assignment.status == AssignmentStatus::Active
                    && seen.insert(assignment.provider_id)
                {
                    history.push(assignment.provider_id);
                }
            }
        }
        Ok(history)
    }
}
