use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::storage::WarRepository;

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub wars: usize,
    pub full_wars: usize,
}

/// Re-read the data directory and swap in the new repository.
///
/// The old repository stays in place if loading fails.
pub async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, ApiError> {
    let config = state.config.clone();
    let loaded = tokio::task::spawn_blocking(move || {
        WarRepository::load_dir(
            &config.data_dir,
            &config.ingest.file_pattern,
            config.ingest.dialect,
        )
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    let response = ReloadResponse {
        wars: loaded.len(),
        full_wars: loaded.full_wars().len(),
    };
    *state.repo.write().await = loaded;

    tracing::info!("Reloaded {} wars", response.wars);
    Ok(Json(response))
}
