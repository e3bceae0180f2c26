use crate::domain::profile::UserProfile;
use crate::services::diet_plan::DietPlanError;
use crate::state::SharedState;
use crate::web::error_response;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlanRequest {
    pub form_data: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct DietPlanResponse {
    pub plan: String,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/generate-diet-plan", post(generate_diet_plan))
        .with_state(state)
}

impl IntoResponse for DietPlanError {
    fn into_response(self) -> Response {
        let status = match &self {
            DietPlanError::InvalidProfile(_) => StatusCode::BAD_REQUEST,
            DietPlanError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            DietPlanError::QuotaExhausted => StatusCode::PAYMENT_REQUIRED,
            DietPlanError::NotConfigured
            | DietPlanError::Upstream
            | DietPlanError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = self.to_string();
        if message.is_empty() {
            return error_response(status, "Unknown error");
        }
        error_response(status, message)
    }
}

async fn generate_diet_plan(
    State(state): State<SharedState>,
    payload: Result<Json<DietPlanRequest>, JsonRejection>,
) -> Result<Json<DietPlanResponse>, DietPlanError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("generate_diet_plan", %request_id);

    async move {
        let request = match payload {
            Ok(Json(request)) => request,
            Err(rejection) => {
                tracing::warn!("Rejected diet plan payload: {}", rejection.body_text());
                return Err(DietPlanError::Unexpected(rejection.body_text()));
            }
        };

        match state.diet_plans.generate(&request.form_data).await {
            Ok(plan) => {
                tracing::info!("Diet plan generated ({} chars)", plan.len());
                Ok(Json(DietPlanResponse { plan }))
            }
            Err(e) => {
                tracing::warn!("Diet plan request failed: {}", e);
                Err(e)
            }
        }
    }
    .instrument(span)
    .await
}
