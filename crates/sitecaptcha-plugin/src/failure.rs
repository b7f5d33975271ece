//! Responses for rejected submissions.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sitecaptcha_core::error::CaptchaError;

/// Produces the response for a submission that failed verification.
pub trait FailureHandler: Send + Sync {
    fn on_failure(&self, err: &CaptchaError) -> Response;
}

/// 403 with a small JSON body. Every error fails closed with the same status;
/// only the `code` field differs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFailureHandler;

impl FailureHandler for DefaultFailureHandler {
    fn on_failure(&self, err: &CaptchaError) -> Response {
        let body = json!({
            "code": err.client_code().as_str(),
            "msg": "captcha verification failed",
        });
        (StatusCode::FORBIDDEN, Json(body)).into_response()
    }
}
