//! Verification service client.
//!
//! One round trip to the siteverify endpoint per submission. Any failure,
//! including transport errors, rejects the submission.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use sitecaptcha_core::error::{CaptchaError, Result};
use tracing::debug;

use crate::config::SiteRecaptchaConfig;

/// Checks a widget token with the verification service.
#[async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    hostname: Option<String>,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

pub struct SiteVerifyClient {
    client: Client,
    verify_url: String,
    secret: String,
    min_score: Option<f64>,
}

impl SiteVerifyClient {
    pub fn new(client: Client, cfg: &SiteRecaptchaConfig) -> Self {
        Self {
            client,
            verify_url: cfg.verify_url.clone(),
            secret: cfg.private_key.clone(),
            min_score: cfg.min_score,
        }
    }
}

#[async_trait]
impl Verifier for SiteVerifyClient {
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> Result<()> {
        if token.is_empty() {
            return Err(CaptchaError::VerificationFailed);
        }

        let mut form = vec![("secret", self.secret.as_str()), ("response", token)];
        if let Some(ip) = remote_ip {
            form.push(("remoteip", ip));
        }

        let resp: SiteVerifyResponse = self
            .client
            .post(&self.verify_url)
            .form(&form)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CaptchaError::VerifierUnavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| CaptchaError::VerifierUnavailable(format!("invalid siteverify response: {e}")))?;

        debug!(
            success = resp.success,
            score = ?resp.score,
            action = ?resp.action,
            hostname = ?resp.hostname,
            errors = ?resp.error_codes,
            "siteverify answered"
        );

        if !resp.success {
            return Err(CaptchaError::VerificationFailed);
        }
        if let (Some(min), Some(score)) = (self.min_score, resp.score) {
            if score < min {
                return Err(CaptchaError::VerificationFailed);
            }
        }
        Ok(())
    }
}
