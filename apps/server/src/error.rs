use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use giveaway_core::errors::Error as CoreError;
use giveaway_core::participation::ParticipationError;
use giveaway_core::settlement::SettlementError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// `Json` extractor whose rejections use the API error body.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    kind: &'static str,
    message: String,
}

impl ApiError {
    /// Status code and machine-readable kind for the response body.
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Core(e) => match e {
                CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
                CoreError::NotFound(_) => (StatusCode::NOT_FOUND, "notFound"),
                CoreError::Participation(p) => match p {
                    ParticipationError::CampaignNotActive { .. } => {
                        (StatusCode::CONFLICT, "campaignNotActive")
                    }
                    ParticipationError::CampaignFull { .. } => {
                        (StatusCode::CONFLICT, "campaignFull")
                    }
                    ParticipationError::DuplicateJoin { .. } => {
                        (StatusCode::CONFLICT, "duplicateJoin")
                    }
                },
                // Refusals of the retry endpoint are the caller's problem.
                CoreError::Settlement(SettlementError::AlreadySettled(_)) => {
                    (StatusCode::CONFLICT, "alreadySettled")
                }
                CoreError::Settlement(SettlementError::CapNotReached { .. }) => {
                    (StatusCode::CONFLICT, "capNotReached")
                }
                CoreError::Settlement(SettlementError::CampaignNotActive { .. }) => {
                    (StatusCode::CONFLICT, "campaignNotActive")
                }
                CoreError::Settlement(_) => (StatusCode::INTERNAL_SERVER_ERROR, "settlement"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
            },
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "validation"),
            ApiError::Anyhow(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.classify();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            kind,
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_full_campaign_is_a_conflict() {
        let err = ApiError::from(CoreError::from(ParticipationError::CampaignFull {
            campaign_id: "c1".to_string(),
            max_participants: 2,
        }));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], 409);
        assert_eq!(body["kind"], "campaignFull");
    }

    #[tokio::test]
    async fn test_settlement_failures_split_by_cause() {
        let (status, body) = render(ApiError::from(CoreError::from(
            SettlementError::AlreadySettled("c1".to_string()),
        )))
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["kind"], "alreadySettled");

        let (status, body) = render(ApiError::from(CoreError::from(
            SettlementError::Crediting("balance update failed".to_string()),
        )))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["kind"], "settlement");
    }
}
