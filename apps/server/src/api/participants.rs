use std::sync::Arc;

use crate::{
    error::{ApiJson, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use giveaway_core::participation::{JoinOutcome, JoinRequest, Participation};
use giveaway_core::settlement::Settlement;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JoinResponse {
    success: bool,
    #[serde(flatten)]
    outcome: JoinOutcome,
}

async fn join_campaign(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    ApiJson(mut request): ApiJson<JoinRequest>,
) -> ApiResult<Json<JoinResponse>> {
    // The route decides which campaign is joined.
    request.campaign_id = id;
    let outcome = state.participation_service.join_campaign(request).await?;
    Ok(Json(JoinResponse {
        success: true,
        outcome,
    }))
}

async fn list_participants(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Participation>>> {
    let participants = state.participation_service.list_participants(&id)?;
    Ok(Json(participants))
}

async fn get_settlement(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Settlement>> {
    let settlement = state.participation_service.get_settlement(&id)?;
    Ok(Json(settlement))
}

async fn settle_campaign(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Settlement>> {
    let settlement = state.participation_service.settle_campaign(&id).await?;
    Ok(Json(settlement))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/campaigns/{id}/participants",
            get(list_participants).post(join_campaign),
        )
        .route("/campaigns/{id}/settlement", get(get_settlement))
        .route("/campaigns/{id}/settle", post(settle_campaign))
}
