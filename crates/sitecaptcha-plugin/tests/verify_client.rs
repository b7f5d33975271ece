#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Json, Router};
use serde_json::json;
use sitecaptcha_core::error::CaptchaError;
use sitecaptcha_core::FormPolicyMap;
use sitecaptcha_plugin::config::SiteRecaptchaConfig;
use sitecaptcha_plugin::{SiteVerifyClient, Verifier};

type Posted = Arc<Mutex<Vec<HashMap<String, String>>>>;

// Answers by token: good, low (score 0.1), bad, boom (500), garbage (non-JSON).
async fn siteverify(State(posted): State<Posted>, Form(form): Form<HashMap<String, String>>) -> Response {
    let token = form.get("response").cloned().unwrap_or_default();
    posted.lock().unwrap().push(form);
    match token.as_str() {
        "good" => Json(json!({"success": true, "score": 0.9, "action": "contact", "hostname": "acme.test"})).into_response(),
        "low" => Json(json!({"success": true, "score": 0.1})).into_response(),
        "boom" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "garbage" => "<html>not json</html>".into_response(),
        _ => Json(json!({"success": false, "error-codes": ["invalid-input-response"]})).into_response(),
    }
}

async fn stub() -> (SocketAddr, Posted) {
    let posted: Posted = Arc::default();
    let app = Router::new()
        .route("/siteverify", post(siteverify))
        .with_state(Arc::clone(&posted));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, posted)
}

fn client(verify_url: String, min_score: Option<f64>) -> SiteVerifyClient {
    let cfg = SiteRecaptchaConfig {
        private_key: "secret-key".into(),
        site_key: "public-key".into(),
        forms: FormPolicyMap::new(),
        verify_url,
        min_score,
    };
    SiteVerifyClient::new(reqwest::Client::new(), &cfg)
}

#[tokio::test]
async fn accepted_token_posts_secret_response_and_remote_ip() {
    let (addr, posted) = stub().await;
    let c = client(format!("http://{addr}/siteverify"), Some(0.5));

    c.verify("good", Some("203.0.113.7")).await.unwrap();

    let posted = posted.lock().unwrap();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0]["secret"], "secret-key");
    assert_eq!(posted[0]["response"], "good");
    assert_eq!(posted[0]["remoteip"], "203.0.113.7");
}

#[tokio::test]
async fn remote_ip_is_omitted_when_unknown() {
    let (addr, posted) = stub().await;
    let c = client(format!("http://{addr}/siteverify"), None);

    c.verify("good", None).await.unwrap();
    assert!(!posted.lock().unwrap()[0].contains_key("remoteip"));
}

#[tokio::test]
async fn unsuccessful_answer_fails_verification() {
    let (addr, _) = stub().await;
    let c = client(format!("http://{addr}/siteverify"), None);
    let err = c.verify("bad", None).await.unwrap_err();
    assert!(matches!(err, CaptchaError::VerificationFailed), "{err}");
}

#[tokio::test]
async fn score_below_minimum_fails_verification() {
    let (addr, _) = stub().await;
    let strict = client(format!("http://{addr}/siteverify"), Some(0.5));
    let err = strict.verify("low", None).await.unwrap_err();
    assert!(matches!(err, CaptchaError::VerificationFailed), "{err}");

    let lenient = client(format!("http://{addr}/siteverify"), None);
    lenient.verify("low", None).await.unwrap();
}

#[tokio::test]
async fn server_error_and_bad_payload_mean_unavailable() {
    let (addr, _) = stub().await;
    let c = client(format!("http://{addr}/siteverify"), None);
    for token in ["boom", "garbage"] {
        let err = c.verify(token, None).await.unwrap_err();
        assert!(matches!(err, CaptchaError::VerifierUnavailable(_)), "{token}: {err}");
    }
}

#[tokio::test]
async fn unreachable_service_means_unavailable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let c = client(format!("http://{addr}/siteverify"), None);
    let err = c.verify("good", None).await.unwrap_err();
    assert!(matches!(err, CaptchaError::VerifierUnavailable(_)), "{err}");
}

#[tokio::test]
async fn empty_token_is_rejected_without_a_request() {
    let (addr, posted) = stub().await;
    let c = client(format!("http://{addr}/siteverify"), None);
    let err = c.verify("", Some("203.0.113.7")).await.unwrap_err();
    assert!(matches!(err, CaptchaError::VerificationFailed), "{err}");
    assert!(posted.lock().unwrap().is_empty());
}
