use serde::{Deserialize, Serialize};

/// Namespace prefixed to the `type` field of every selection option.
pub const SELECTION_NAMESPACE: &str = "care_provider_selection";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderRole {
    #[serde(rename = "DOCTOR")]
    Doctor,
    #[serde(rename = "CARE_COORDINATOR")]
    CareCoordinator,
}

impl ProviderRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderRole::Doctor => "DOCTOR",
            ProviderRole::CareCoordinator => "CARE_COORDINATOR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentStatus {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "INACTIVE")]
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    #[serde(rename = "SUBMITTED")]
    Submitted,
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "TREATED")]
    Treated,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Submitted => "SUBMITTED",
            CaseStatus::Active => "ACTIVE",
            CaseStatus::Treated => "TREATED",
        }
    }

    /// Case states in which a prior care team counts toward selection
    /// preference.
    pub fn submitted_or_later() -> &'static [CaseStatus] {
        &[CaseStatus::Submitted, CaseStatus::Active, CaseStatus::Treated]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub short_display_name: String,
    pub long_title: String,
    pub role: ProviderRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientCase {
    pub id: i64,
    pub status: CaseStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareTeamAssignment {
    pub provider_id: i64,
    pub provider_role: ProviderRole,
    pub status: AssignmentStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CareTeam {
    pub assignments: Vec<CareTeamAssignment>,
}

/// Authenticated caller of the selection endpoint.
#[derive(Debug, Clone)]
pub struct Principal {
    pub account_id: i64,
    pub role: String,
}

impl Principal {
    pub fn from_user(user: &shared_models::auth::User) -> Result<Self, String> {
        let account_id = user
            .id
            .parse()
            .map_err(|_| format!("invalid account id in token: {}", user.id))?;
        Ok(Self {
            account_id,
            role: user.role.clone().unwrap_or_default(),
        })
    }

    pub fn is_patient(&self) -> bool {
        self.role == "patient"
    }
}

/// Request-scoped selection context, built once validation has passed.
#[derive(Debug, Clone)]
pub struct SelectionRequest {
    pub state_code: String,
    pub pathway_tag: String,
    pub principal: Option<Principal>,
}

impl SelectionRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.state_code.len() != 2 || !self.state_code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!(
                "expected a two letter state code, instead got {:?}",
                self.state_code
            ));
        }
        if self.pathway_tag.is_empty() {
            return Err("missing pathway tag".to_string());
        }
        Ok(())
    }
}

mod id_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Composite option standing in for "any qualified doctor, chosen later",
/// decorated with a collage of portrait thumbnails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstAvailableOption {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub image_urls: Vec<String>,
    pub title: String,
    pub description: String,
    pub button_title: String,
}

impl FirstAvailableOption {
    pub fn type_name() -> &'static str {
        "first_available"
    }

    /// The image collage may legitimately be empty when the available pool
    /// is, so only the textual fields are required.
    pub fn validate(&mut self, namespace: &str) -> Result<(), String> {
        self.type_tag = format!("{}:{}", namespace, Self::type_name());
        if self.title.is_empty() {
            return Err("title is required".to_string());
        }
        if self.button_title.is_empty() {
            return Err("button_title is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareProviderOption {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub image_url: String,
    pub title: String,
    pub description: String,
    pub button_title: String,
    #[serde(with = "id_string")]
    pub care_provider_id: i64,
}

impl CareProviderOption {
    pub fn type_name() -> &'static str {
        "care_provider"
    }

    pub fn validate(&mut self, namespace: &str) -> Result<(), String> {
        self.type_tag = format!("{}:{}", namespace, Self::type_name());
        if self.title.is_empty() {
            return Err("title is required".to_string());
        }
        if self.button_title.is_empty() {
            return Err("button_title is required".to_string());
        }
        if self.image_url.is_empty() {
            return Err("image_url is required".to_string());
        }
        if self.care_provider_id == 0 {
            return Err("care_provider_id is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectionOption {
    FirstAvailable(FirstAvailableOption),
    CareProvider(CareProviderOption),
}

impl SelectionOption {
    pub fn validate(&mut self, namespace: &str) -> Result<(), String> {
        match self {
            SelectionOption::FirstAvailable(option) => option.validate(namespace),
            SelectionOption::CareProvider(option) => option.validate(namespace),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionResponse {
    pub options: Vec<SelectionOption>,
}
