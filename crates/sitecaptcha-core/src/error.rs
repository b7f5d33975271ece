//! Shared error type across sitecaptcha crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid plugin or site configuration.
    Config,
    /// Malformed submission.
    BadRequest,
    /// CAPTCHA token missing or rejected.
    VerificationFailed,
    /// Verification service could not be reached or answered garbage.
    VerifierUnavailable,
    /// Internal error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::Config => "CONFIG",
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::VerificationFailed => "VERIFICATION_FAILED",
            ClientCode::VerifierUnavailable => "VERIFIER_UNAVAILABLE",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, CaptchaError>;

/// Unified error type used by core and plugin.
#[derive(Debug, Error)]
pub enum CaptchaError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("captcha verification failed")]
    VerificationFailed,
    #[error("verification service unavailable: {0}")]
    VerifierUnavailable(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl CaptchaError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            CaptchaError::Config(_) => ClientCode::Config,
            CaptchaError::BadRequest(_) => ClientCode::BadRequest,
            CaptchaError::VerificationFailed => ClientCode::VerificationFailed,
            CaptchaError::VerifierUnavailable(_) => ClientCode::VerifierUnavailable,
            CaptchaError::Internal(_) => ClientCode::Internal,
        }
    }
}
