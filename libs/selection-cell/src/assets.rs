use crate::models::ProviderRole;

/// Builds the stable portrait thumbnail URL the asset service serves for a
/// care provider. Opaque to the rest of the core.
pub fn thumbnail_url(api_domain: &str, role: ProviderRole, id: i64) -> String {
    format!(
        "https://{}/v1/thumbnail?role={}&role_id={}",
        api_domain,
        role.as_str(),
        id
    )
}
