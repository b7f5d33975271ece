//! Reference host.
//!
//! Minimal multi-site server that drives the plugin the way a real host
//! would: sites are picked by `Host`, pages are rendered through the page
//! handlers, and every request passes the verification middleware.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::middleware::from_fn_with_state;
use axum::response::{Html, IntoResponse, Response};
use axum::Router;

use crate::middleware::verify_for_host;
use crate::registry::SiteRegistry;
use crate::render::{FormState, PageHandlers, RenderRequest};

/// Name given to the demo form rendered on every page.
pub const DEMO_FORM: &str = "contact";

#[derive(Clone)]
pub struct HostState {
    pub sites: Arc<SiteRegistry>,
    pub handlers: Arc<PageHandlers>,
}

pub fn build_router(sites: Arc<SiteRegistry>, handlers: Arc<PageHandlers>) -> Router {
    let state = HostState {
        sites: Arc::clone(&sites),
        handlers,
    };
    Router::new()
        .fallback(page)
        .layer(from_fn_with_state(sites, verify_for_host))
        .with_state(state)
}

async fn page(State(state): State<HostState>, method: Method, headers: HeaderMap, uri: Uri) -> Response {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let Some(site) = state.sites.site_for_host(&host) else {
        return (StatusCode::NOT_FOUND, "unknown site").into_response();
    };

    match method {
        Method::GET | Method::HEAD => {}
        Method::POST | Method::PUT => return (StatusCode::OK, "accepted").into_response(),
        _ => return StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }

    let req = RenderRequest {
        site,
        host,
        path: uri.path().to_string(),
    };
    match render_page(&state.handlers, &req) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(site = %req.site, path = %req.path, error = %e, "render failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn render_page(handlers: &PageHandlers, req: &RenderRequest) -> sitecaptcha_core::Result<String> {
    let style = handlers.render_style(req)?;
    let script = handlers.render_script(req)?;

    let mut form = FormState {
        name: DEMO_FORM.to_string(),
        body: "\n  <input name=\"message\">\n  <button type=\"submit\">Send</button>\n".to_string(),
    };
    handlers.render_form(req, &mut form)?;

    let path = escape_html(&req.path);
    Ok(format!(
        "<!doctype html>\n<html><head>{style}{script}</head>\n<body>\n<form method=\"post\" action=\"{path}\">\n{body}\n</form>\n</body></html>\n",
        body = form.body,
    ))
}

fn escape_html(v: &str) -> String {
    v.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
