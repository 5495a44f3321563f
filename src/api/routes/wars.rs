use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{parse_scope, to_json, ApiError};
use crate::calculate::{
    average_kill_participation, class_comparison, compute_totals, damage_by_player,
    group_comparison, group_summaries, heat_table, matchup, war_insights, Matchup,
    RANKED_TABLE_LEN,
};
use crate::models::{
    Build, GroupStat, GroupSummary, HeatRow, Insight, Outcome, PlayerRecord, Stat, Totals, War,
    WarScope,
};
use crate::storage::WarRepository;

#[derive(Debug, Deserialize)]
pub struct ListWarsParams {
    pub scope: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WarListing {
    pub file: String,
    pub label: String,
    pub date: Option<NaiveDate>,
    pub opponent: String,
    pub outcome: Outcome,
    pub badge: &'static str,
    pub full: bool,
    pub players: usize,
}

impl From<&War> for WarListing {
    fn from(war: &War) -> Self {
        Self {
            file: war.file.clone(),
            label: war.label(),
            date: war.date,
            opponent: war.opponent.clone(),
            outcome: war.outcome,
            badge: war.outcome.badge(),
            full: war.is_full(),
            players: war.players.len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WarListResponse {
    pub scope: WarScope,
    pub wars: Vec<WarListing>,
}

/// Look up a war or fail with 404.
pub(crate) fn find_war<'a>(repo: &'a WarRepository, file: &str) -> Result<&'a War, ApiError> {
    repo.get(file)
        .ok_or_else(|| ApiError::NotFound(format!("War '{}'", file)))
}

pub async fn list_wars(
    State(state): State<AppState>,
    Query(params): Query<ListWarsParams>,
) -> Result<Json<WarListResponse>, ApiError> {
    let scope = parse_scope(params.scope.as_deref())?;
    let repo = state.repo.read().await;

    let wars = repo
        .visible_wars(scope)
        .into_iter()
        .map(WarListing::from)
        .collect();

    Ok(Json(WarListResponse { scope, wars }))
}

#[derive(Debug, Serialize)]
pub struct WarSummaryResponse {
    #[serde(flatten)]
    pub listing: WarListing,
    pub matchup: Matchup,
    pub banner: &'static str,
    pub totals: Totals,
    pub team_kill_death_ratio: String,
    pub avg_kill_participation: f64,
    pub insights: Vec<Insight>,
    pub ledger: Vec<PlayerRecord>,
}

/// Header, totals, insights and ledger for one war.
pub fn summarize_war(war: &War) -> WarSummaryResponse {
    let totals = compute_totals(&war.players);

    WarSummaryResponse {
        listing: WarListing::from(war),
        matchup: matchup(&war.players, war.outcome),
        banner: war.outcome.banner(),
        totals,
        team_kill_death_ratio: totals.team_kill_death_display(),
        avg_kill_participation: average_kill_participation(&war.players),
        insights: war_insights(&war.players),
        ledger: war.ledger().into_iter().cloned().collect(),
    }
}

pub async fn war_summary(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<Json<WarSummaryResponse>, ApiError> {
    let repo = state.repo.read().await;
    let war = find_war(&repo, &file)?;
    Ok(Json(summarize_war(war)))
}

#[derive(Debug, Deserialize)]
pub struct GroupsParams {
    /// Pull the overflow build into its own squad (default true)
    pub overflow: Option<bool>,
}

#[derive(Debug, Serialize)]
struct GroupsResponse<'a> {
    separate_overflow: bool,
    groups: Vec<GroupSummary<'a>>,
    overflow: Option<GroupSummary<'a>>,
}

pub async fn war_groups(
    State(state): State<AppState>,
    Path(file): Path<String>,
    Query(params): Query<GroupsParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let repo = state.repo.read().await;
    let war = find_war(&repo, &file)?;

    let separate_overflow = params.overflow.unwrap_or(true);
    let (groups, overflow) = group_summaries(&war.players, separate_overflow);

    to_json(&GroupsResponse {
        separate_overflow,
        groups,
        overflow,
    })
}

#[derive(Debug, Serialize)]
pub struct DamageRow {
    pub player: String,
    pub build_type: Build,
    pub damage: u64,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub top_kills: Vec<HeatRow>,
    pub top_deaths: Vec<HeatRow>,
    pub kill_participation: Vec<HeatRow>,
    pub damage_by_player: Vec<DamageRow>,
    pub kill_death_curve: Vec<HeatRow>,
}

pub async fn war_analytics(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let repo = state.repo.read().await;
    let war = find_war(&repo, &file)?;
    let records = &war.players;

    Ok(Json(AnalyticsResponse {
        top_kills: heat_table(records, Stat::Kills, Some(RANKED_TABLE_LEN)),
        top_deaths: heat_table(records, Stat::Deaths, Some(RANKED_TABLE_LEN)),
        kill_participation: heat_table(records, Stat::KillParticipation, None),
        damage_by_player: damage_by_player(records)
            .into_iter()
            .map(|p| DamageRow {
                player: p.player.clone(),
                build_type: p.build_type,
                damage: p.damage,
            })
            .collect(),
        kill_death_curve: heat_table(records, Stat::KillDeathRatio, None),
    }))
}

pub async fn war_group_comparison(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<Json<Vec<GroupStat>>, ApiError> {
    let repo = state.repo.read().await;
    let war = find_war(&repo, &file)?;
    Ok(Json(group_comparison(&war.players)))
}

pub async fn war_class_comparison(
    State(state): State<AppState>,
    Path((file, build)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let build = Build::from_name(&build)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown build '{}'", build)))?;

    let repo = state.repo.read().await;
    let war = find_war(&repo, &file)?;
    to_json(&class_comparison(&war.players, build))
}
