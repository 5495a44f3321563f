use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::{parse_scope, ApiError};
use crate::calculate::{compare_baseline_group, compare_pair};
use crate::models::{PairReport, SynergyReport};

use super::wars::find_war;

#[derive(Debug, Deserialize)]
pub struct BaselineParams {
    pub war: Option<String>,
    pub group: Option<String>,
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PairParams {
    pub a: Option<String>,
    pub b: Option<String>,
    pub scope: Option<String>,
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("Missing '{}' parameter", name)))
}

pub async fn baseline_group(
    State(state): State<AppState>,
    Query(params): Query<BaselineParams>,
) -> Result<Json<SynergyReport>, ApiError> {
    let scope = parse_scope(params.scope.as_deref())?;
    let file = required(&params.war, "war")?;
    let group: u32 = required(&params.group, "group")?
        .parse()
        .map_err(|_| ApiError::BadRequest("Group must be a number".to_string()))?;

    let repo = state.repo.read().await;
    let baseline = find_war(&repo, file)?;
    let wars = repo.visible_wars(scope);

    Ok(Json(compare_baseline_group(baseline, group, &wars)))
}

pub async fn pair(
    State(state): State<AppState>,
    Query(params): Query<PairParams>,
) -> Result<Json<PairReport>, ApiError> {
    let scope = parse_scope(params.scope.as_deref())?;
    let a = required(&params.a, "a")?;
    let b = required(&params.b, "b")?;

    let repo = state.repo.read().await;
    let wars = repo.visible_wars(scope);

    compare_pair(&wars, a, b)
        .map(Json)
        .ok_or_else(|| ApiError::BadRequest("Pick two different players".to_string()))
}
