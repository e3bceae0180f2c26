use crate::domain::profile::UserProfile;
use crate::domain::wizard::{ProfileDraft, ProfileWizard, WizardError, WizardStep};
use crate::web::error_response;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WizardAction {
    #[default]
    Next,
    Back,
    StartOver,
}

#[derive(Debug, Deserialize)]
pub struct StepCheckRequest {
    pub step: WizardStep,
    #[serde(default)]
    pub action: WizardAction,
    #[serde(default)]
    pub draft: ProfileDraft,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct StepCheckResponse {
    pub valid: bool,
    /// Step to show next; stays on the current one when invalid.
    pub next: WizardStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Complete profile, present once the wizard reaches results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
    /// Emptied draft returned after a restart.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<ProfileDraft>,
}

impl StepCheckResponse {
    fn moved(next: WizardStep) -> Self {
        Self {
            valid: true,
            next,
            error: None,
            profile: None,
            draft: None,
        }
    }
}

pub fn router() -> Router {
    Router::new().route("/wizard/validate", post(validate_step))
}

async fn validate_step(payload: Result<Json<StepCheckRequest>, JsonRejection>) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!("Rejected wizard payload: {}", rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let mut wizard = ProfileWizard::resume(request.step, request.draft);
    let response = match request.action {
        WizardAction::Next => advance(&mut wizard),
        WizardAction::Back => StepCheckResponse::moved(wizard.back()),
        WizardAction::StartOver => {
            wizard.start_over();
            StepCheckResponse {
                draft: Some(wizard.draft().clone()),
                ..StepCheckResponse::moved(wizard.step())
            }
        }
    };
    Json(response).into_response()
}

fn advance(wizard: &mut ProfileWizard) -> StepCheckResponse {
    let current = wizard.step();
    let advanced = match wizard.advance() {
        Ok(next) => Ok(next),
        Err(WizardError::Finished) => Ok(WizardStep::Results),
        Err(e) => Err(e),
    };

    let outcome = advanced.and_then(|next| {
        if next == WizardStep::Results {
            wizard.profile().map(|profile| (next, Some(profile)))
        } else {
            Ok((next, None))
        }
    });

    match outcome {
        Ok((next, profile)) => StepCheckResponse {
            profile,
            ..StepCheckResponse::moved(next)
        },
        Err(e) => StepCheckResponse {
            valid: false,
            error: Some(e.to_string()),
            ..StepCheckResponse::moved(current)
        },
    }
}
