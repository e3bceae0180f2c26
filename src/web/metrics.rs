use crate::domain::metrics::{calculate_metrics, MetricsForm};
use crate::web::error_response;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

pub fn router() -> Router {
    Router::new().route("/metrics", post(metrics))
}

async fn metrics(payload: Result<Json<MetricsForm>, JsonRejection>) -> Response {
    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    match form.validate() {
        Ok(body) => {
            let result = calculate_metrics(&body);
            tracing::debug!(
                "Metrics: BMI {} BMR {} TDEE {}",
                result.bmi_display(),
                result.bmr,
                result.tdee
            );
            Json(result).into_response()
        }
        Err(e) => {
            tracing::debug!("Rejected metrics form: {}", e);
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}
