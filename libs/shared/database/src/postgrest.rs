use anyhow::{anyhow, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client,
};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Thin read-only client for the directory's PostgREST-style API. The
/// directory tables are served with the service anon key; per-user tokens are
/// never forwarded because the selection core performs global reads only.
pub struct PostgrestClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl PostgrestClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.clone(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(key) = HeaderValue::from_str(&self.anon_key) {
            headers.insert("apikey", key);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Fetching {}", url);

        let response = self.client.get(&url).headers(self.headers()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Directory API error ({}): {}", status, error_text);
            return Err(anyhow!("directory API error ({}): {}", status, error_text));
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }
}

/// Renders an id list as a PostgREST `in.(...)` filter value.
pub fn in_filter(ids: &[i64]) -> String {
    let joined = ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("in.({})", joined)
}
