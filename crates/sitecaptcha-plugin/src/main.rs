//! sitecaptcha reference host.
//!
//! - Loads `recaptcha.yml` and `sites.yaml` from `SITECAPTCHA_CONFIG_DIR`
//! - Registers the plugin, then every site
//! - Serves all sites on `SITECAPTCHA_LISTEN`

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use sitecaptcha_core::error::{CaptchaError, Result};
use sitecaptcha_plugin::plugin::{HostHandle, Plugin, PluginOptions};
use sitecaptcha_plugin::{config, host, PageHandlers, SiteRegistry};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "sitecaptcha-host failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let dir = PathBuf::from(std::env::var("SITECAPTCHA_CONFIG_DIR").unwrap_or_else(|_| ".".into()));
    let listen: SocketAddr = std::env::var("SITECAPTCHA_LISTEN")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()
        .map_err(|e| CaptchaError::Config(format!("SITECAPTCHA_LISTEN must be a valid SocketAddr: {e}")))?;

    let sites = Arc::new(SiteRegistry::new());
    let handlers = Arc::new(PageHandlers::new());

    let mut plugin = Plugin::default();
    let mut opts = PluginOptions::new();
    opts.set(plugin.render_key.clone(), HostHandle::Render(Arc::clone(&handlers)))
        .set(plugin.sites_register_key.clone(), HostHandle::Sites(Arc::clone(&sites)));
    plugin.init(&opts, &dir)?;

    let sites_file = config::load_sites_from_file(dir.join("sites.yaml"))?;
    for site in sites_file.sites {
        sites.add_site(site);
    }

    let app = host::build_router(sites, handlers);

    tracing::info!(%listen, "sitecaptcha-host starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| CaptchaError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(|e| CaptchaError::Internal(format!("server failed: {e}")))
}
