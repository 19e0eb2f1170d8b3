use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use crate::assets::thumbnail_url;
use crate::models::ProviderRole;
use crate::store::{DirectoryStore, StoreError};

/// How many candidate ids to request from the global pool per thumbnail
/// wanted, to keep the collage varied.
const POOL_FACTOR: usize = 5;

/// Draws distinct doctor portrait thumbnails for the first-available collage.
/// Doctors in `exclude` already appear as named options, so their portraits
/// are dispreferred but not forbidden: they are used only when the rest of
/// the pool runs out.
pub struct PortraitService<'a> {
    store: &'a dyn DirectoryStore,
    api_domain: &'a str,
}

impl<'a> PortraitService<'a> {
    pub fn new(store: &'a dyn DirectoryStore, api_domain: &'a str) -> Self {
        Self { store, api_domain }
    }

    pub async fn sample<R: Rng>(
        &self,
        rng: &mut R,
        n: usize,
        exclude: &[i64],
    ) -> Result<Vec<String>, StoreError> {
        let pool = self.store.available_doctor_ids(POOL_FACTOR * n).await?;
        if pool.is_empty() {
            return Ok(Vec::new());
        }

        let members: HashSet<i64> = pool.iter().copied().collect();

        // Only excluded ids actually present in the pool matter; keep the
        // caller's order for the fall-back phase.
        let excluded: Vec<i64> = exclude
            .iter()
            .copied()
            .filter(|id| members.contains(id))
            .collect();
        let excluded_set: HashSet<i64> = excluded.iter().copied().collect();

        let target = n.min(pool.len());
        let mut urls = Vec::with_capacity(target);

        // Swap-remove draws over a shrinking live prefix. Excluded draws are
        // discarded but stay out of rotation, so each id is considered once.
        let mut scratch = pool;
        let mut live = scratch.len();
        while urls.len() < target && live > 0 {
            let index = rng.gen_range(0..live);
            let id = scratch[index];
            scratch.swap(index, live - 1);
            live -= 1;
            if excluded_set.contains(&id) {
                continue;
            }
            urls.push(thumbnail_url(self.api_domain, ProviderRole::Doctor, id));
        }

        // Not enough non-excluded portraits: pad from the exclusion list.
        // These ids are disjoint from everything added above, so no URL can
        // repeat.
        for id in &excluded {
            if urls.len() >= target {
                break;
            }
            urls.push(thumbnail_url(self.api_domain, ProviderRole::Doctor, *id));
        }

        debug!("Sampled {} of {} requested portrait urls", urls.len(), n);
        Ok(urls)
    }
}
