use std::sync::Arc;

use crate::{
    error::{ApiJson, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use giveaway_core::campaigns::{Campaign, CampaignStatusView, CampaignSummary, NewCampaign};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    creator_id: Option<String>,
}

async fn create_campaign(
    State(state): State<Arc<AppState>>,
    ApiJson(new_campaign): ApiJson<NewCampaign>,
) -> ApiResult<(StatusCode, Json<Campaign>)> {
    let campaign = state.campaign_service.create_campaign(new_campaign).await?;
    Ok((StatusCode::CREATED, Json(campaign)))
}

async fn list_campaigns(
    Query(query): Query<ListQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CampaignSummary>>> {
    let creator_id = query.creator_id.as_deref().filter(|id| !id.trim().is_empty());
    let campaigns = state.campaign_service.list_campaigns(creator_id)?;
    Ok(Json(campaigns))
}

async fn get_campaign(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CampaignSummary>> {
    let campaign = state.campaign_service.get_campaign(&id)?;
    Ok(Json(campaign))
}

async fn get_campaign_status(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CampaignStatusView>> {
    let status = state.campaign_service.get_campaign_status(&id)?;
    Ok(Json(status))
}

async fn cancel_campaign(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Campaign>> {
    let campaign = state.campaign_service.cancel_campaign(&id).await?;
    Ok(Json(campaign))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/campaigns", get(list_campaigns).post(create_campaign))
        .route("/campaigns/{id}", get(get_campaign))
        .route("/campaigns/{id}/status", get(get_campaign_status))
        .route("/campaigns/{id}/cancel", post(cancel_campaign))
}
