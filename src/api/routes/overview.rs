use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate;
use crate::models::{CompanyOverview, LegacyRecord, PlayerProfile, WarScope};

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    /// `None` until at least one war is loaded
    pub overview: Option<CompanyOverview>,
    /// Historical record already folded into `overview`
    pub legacy: LegacyRecord,
}

pub async fn company_overview(
    State(state): State<AppState>,
) -> Result<Json<OverviewResponse>, ApiError> {
    let repo = state.repo.read().await;
    let wars: Vec<_> = repo.wars().collect();
    let legacy = state.config.legacy;

    Ok(Json(OverviewResponse {
        overview: calculate::company_overview(&wars, legacy),
        legacy,
    }))
}

pub async fn player_profile(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<PlayerProfile>, ApiError> {
    let repo = state.repo.read().await;
    let wars = repo.visible_wars(WarScope::All);

    let profile = calculate::player_profile(&wars, &name);
    if profile.wars_played == 0 {
        return Err(ApiError::NotFound(format!("Player '{}'", name.trim())));
    }
    Ok(Json(profile))
}
