//! Verification middleware.
//!
//! POST/PUT submissions to enforced paths are checked once with the site's
//! verifier. The token is read from urlencoded or multipart bodies; any
//! other body on an enforced path is rejected. On failure the site's failure
//! handler answers and the chain stops. Development hosts and everything
//! else pass through untouched.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::{ConnectInfo, FromRequest, Multipart, Request, State};
use axum::http::{header, HeaderMap, Method};
use axum::middleware::{from_fn_with_state, Next};
use axum::response::Response;
use axum::Router;
use bytes::Bytes;
use sitecaptcha_core::error::CaptchaError;
use tracing::{debug, warn};

use crate::registry::SiteRegistry;
use crate::site::{is_dev_host, SiteVerification};
use crate::widget::RESPONSE_FIELD;

/// Largest form body buffered for token extraction.
pub const MAX_FORM_BYTES: usize = 1024 * 1024;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// Middleware bound to one site.
pub async fn verify_submission(
    State(site): State<Arc<SiteVerification>>,
    req: Request,
    next: Next,
) -> Response {
    guard(&site, req, next).await
}

/// Middleware for a multi-site router: the site is picked by `Host`.
/// Requests for unknown hosts, or sites without a context, pass through.
pub async fn verify_for_host(
    State(sites): State<Arc<SiteRegistry>>,
    req: Request,
    next: Next,
) -> Response {
    let ctx = request_host(&req)
        .and_then(|h| sites.site_for_host(&h))
        .and_then(|name| sites.context(&name));
    match ctx {
        Some(ctx) => guard(&ctx, req, next).await,
        None => next.run(req).await,
    }
}

/// Layer `router` with verification for `site`.
pub fn with_verification<S>(router: Router<S>, site: Arc<SiteVerification>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(from_fn_with_state(site, verify_submission))
}

async fn guard(site: &SiteVerification, req: Request, next: Next) -> Response {
    if !matches!(*req.method(), Method::POST | Method::PUT) {
        return next.run(req).await;
    }
    let path = req.uri().path().to_string();
    if site.should_skip(&path) || request_host(&req).is_some_and(|h| is_dev_host(&h)) {
        return next.run(req).await;
    }

    let Some(kind) = body_kind(req.headers()) else {
        warn!(site = %site.site(), path = %path, "submission without form body");
        let err = CaptchaError::BadRequest("form body required".into());
        return site.failure_handler().on_failure(&err);
    };

    let remote_ip = remote_ip(&req);
    let (parts, body) = req.into_parts();
    let bytes: Bytes = match to_bytes(body, MAX_FORM_BYTES).await {
        Ok(b) => b,
        Err(e) => {
            warn!(site = %site.site(), path = %path, error = %e, "form body unreadable");
            let err = CaptchaError::BadRequest(format!("form body unreadable: {e}"));
            return site.failure_handler().on_failure(&err);
        }
    };

    let token = match kind {
        BodyKind::UrlEncoded => urlencoded_token(&bytes),
        BodyKind::Multipart => multipart_token(&parts.headers, bytes.clone()).await,
    }
    .unwrap_or_default();

    match site.verifier().verify(&token, remote_ip.as_deref()).await {
        Ok(()) => {
            debug!(site = %site.site(), path = %path, "captcha verified");
            next.run(Request::from_parts(parts, Body::from(bytes))).await
        }
        Err(e) => {
            warn!(site = %site.site(), path = %path, code = e.client_code().as_str(), error = %e, "captcha rejected");
            site.failure_handler().on_failure(&e)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    UrlEncoded,
    Multipart,
}

fn body_kind(headers: &HeaderMap) -> Option<BodyKind> {
    let mime = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())?
        .trim();
    if mime.eq_ignore_ascii_case(FORM_CONTENT_TYPE) {
        Some(BodyKind::UrlEncoded)
    } else if mime.eq_ignore_ascii_case(MULTIPART_CONTENT_TYPE) {
        Some(BodyKind::Multipart)
    } else {
        None
    }
}

fn urlencoded_token(body: &[u8]) -> Option<String> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body).ok()?;
    pairs
        .into_iter()
        .find(|(k, _)| k == RESPONSE_FIELD)
        .map(|(_, v)| v)
}

/// Token field of a multipart body. Malformed bodies yield `None`.
async fn multipart_token(headers: &HeaderMap, body: Bytes) -> Option<String> {
    let mut req = Request::new(Body::from(body));
    if let Some(ct) = headers.get(header::CONTENT_TYPE) {
        req.headers_mut().insert(header::CONTENT_TYPE, ct.clone());
    }
    let mut multipart = Multipart::from_request(req, &()).await.ok()?;
    while let Some(field) = multipart.next_field().await.ok()? {
        if field.name() == Some(RESPONSE_FIELD) {
            return field.text().await.ok();
        }
    }
    None
}

/// First `X-Forwarded-For` hop, else the peer address.
fn remote_ip(req: &Request) -> Option<String> {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(ip) = forwarded {
        return Some(ip.to_string());
    }
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

pub(crate) fn request_host(req: &Request) -> Option<String> {
    req.headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| req.uri().host().map(str::to_string))
}
