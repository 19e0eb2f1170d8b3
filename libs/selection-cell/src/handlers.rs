use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;
use tracing::debug;

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::jwt::validate_token;

use crate::assets::thumbnail_url;
use crate::models::{
    CareProviderOption, FirstAvailableOption, Principal, SelectionOption, SelectionRequest,
    SelectionResponse, SELECTION_NAMESPACE,
};
use crate::services::{PortraitService, SelectionError, SelectorService};
use crate::store::{DirectoryStore, PostgrestDirectoryStore};

const FIRST_AVAILABLE_TITLE: &str = "First Available";
const FIRST_AVAILABLE_DESCRIPTION: &str = "Choose this option for a response within 24 hours. \
     You'll be treated by the first available doctor.";
const FIRST_AVAILABLE_BUTTON_TITLE: &str = "Choose First Available";

/// Number of portrait thumbnails decorating the first-available option.
const FIRST_AVAILABLE_IMAGE_COUNT: usize = 6;

/// All fields are optional at the extractor so that missing parameters reach
/// `SelectionRequest::validate` and come back in the JSON error envelope
/// instead of axum's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    pub state_code: Option<String>,
    pub pathway_id: Option<String>,
    /// Accepted for client compatibility; not consumed by the selection core.
    pub zip_code: Option<String>,
}

#[axum::debug_handler]
pub async fn care_provider_selection(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<SelectionQuery>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Json<SelectionResponse>, AppError> {
    let principal = match auth {
        Some(TypedHeader(auth)) => {
            let user = validate_token(auth.token(), &state.supabase_jwt_secret)
                .map_err(AppError::Forbidden)?;
            Some(Principal::from_user(&user).map_err(AppError::Forbidden)?)
        }
        None => None,
    };

    let request = SelectionRequest {
        state_code: query.state_code.unwrap_or_default(),
        pathway_tag: query.pathway_id.unwrap_or_default(),
        principal,
    };
    request.validate().map_err(AppError::BadRequest)?;

    let store = PostgrestDirectoryStore::new(&state);
    let mut rng = StdRng::from_entropy();
    let response = build_selection_response(&state, &store, &mut rng, &request).await?;
    Ok(Json(response))
}

/// Assembles the options list for a validated request: runs the selector,
/// then hydrates the picked doctors and samples the portrait collage in
/// parallel. Either fetch failing fails the request; partial responses are
/// never emitted.
pub async fn build_selection_response<R: Rng>(
    config: &AppConfig,
    store: &dyn DirectoryStore,
    rng: &mut R,
    request: &SelectionRequest,
) -> Result<SelectionResponse, AppError> {
    let selector = SelectorService::new(store);
    let picked = selector
        .pick_doctors(rng, request, config.selection_count)
        .await
        .map_err(|err| match err {
            SelectionError::Forbidden => AppError::Forbidden(
                "only patients may request care provider selection".to_string(),
            ),
            SelectionError::Store(err) => AppError::Internal(err.to_string()),
        })?;
    debug!("Selected {} care providers", picked.len());

    let portraits = PortraitService::new(store, &config.api_domain);
    let (doctors, image_urls) = tokio::try_join!(
        async {
            store
                .doctors_by_ids(&picked)
                .await
                .map_err(|err| AppError::Internal(err.to_string()))
        },
        async {
            portraits
                .sample(rng, FIRST_AVAILABLE_IMAGE_COUNT, &picked)
                .await
                .map_err(|err| AppError::Internal(err.to_string()))
        },
    )?;

    let mut options: Vec<SelectionOption> = Vec::with_capacity(1 + doctors.len());
    options.push(SelectionOption::FirstAvailable(FirstAvailableOption {
        type_tag: String::new(),
        image_urls,
        title: FIRST_AVAILABLE_TITLE.to_string(),
        description: FIRST_AVAILABLE_DESCRIPTION.to_string(),
        button_title: FIRST_AVAILABLE_BUTTON_TITLE.to_string(),
    }));
    for doctor in &doctors {
        options.push(SelectionOption::CareProvider(CareProviderOption {
            type_tag: String::new(),
            image_url: thumbnail_url(&config.api_domain, doctor.role, doctor.id),
            title: doctor.short_display_name.clone(),
            description: doctor.long_title.clone(),
            button_title: format!("Choose {}", doctor.short_display_name),
            care_provider_id: doctor.id,
        }));
    }

    // The content is server-generated, so a validation failure here is a bug
    // rather than a client error.
    for option in &mut options {
        option
            .validate(SELECTION_NAMESPACE)
            .map_err(AppError::Internal)?;
    }

    Ok(SelectionResponse { options })
}
