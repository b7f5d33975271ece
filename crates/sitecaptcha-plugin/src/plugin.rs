//! Plugin lifecycle.
//!
//! The host hands the plugin its render and site-registry handles under two
//! option keys. `init` loads the global catalog, hooks per-site setup into the
//! registry and attaches the render decorators.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use reqwest::Client;
use sitecaptcha_core::error::{CaptchaError, Result};
use sitecaptcha_core::{FormCatalog, FormPolicyMap};

use crate::config;
use crate::registry::SiteRegistry;
use crate::render::{page_setup, PageHandlers};
use crate::site::setup_site;

pub const DEFAULT_RENDER_KEY: &str = "render";
pub const DEFAULT_SITES_REGISTER_KEY: &str = "sites";

/// Typed handle the host registers under an option key.
#[derive(Clone)]
pub enum HostHandle {
    Render(Arc<PageHandlers>),
    Sites(Arc<SiteRegistry>),
}

/// Option bag passed to [`Plugin::init`].
#[derive(Default, Clone)]
pub struct PluginOptions {
    handles: HashMap<String, HostHandle>,
}

impl PluginOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, handle: HostHandle) -> &mut Self {
        self.handles.insert(key.into(), handle);
        self
    }

    pub fn render(&self, key: &str) -> Result<Arc<PageHandlers>> {
        match self.handles.get(key) {
            Some(HostHandle::Render(h)) => Ok(Arc::clone(h)),
            Some(_) => Err(CaptchaError::Config(format!("option {key} is not a render handle"))),
            None => Err(CaptchaError::Config(format!("missing option: {key}"))),
        }
    }

    pub fn sites(&self, key: &str) -> Result<Arc<SiteRegistry>> {
        match self.handles.get(key) {
            Some(HostHandle::Sites(h)) => Ok(Arc::clone(h)),
            Some(_) => Err(CaptchaError::Config(format!("option {key} is not a site registry"))),
            None => Err(CaptchaError::Config(format!("missing option: {key}"))),
        }
    }
}

pub struct Plugin {
    pub render_key: String,
    pub sites_register_key: String,
    /// Programmatic defaults; `recaptcha.yml` forms are appended at init.
    pub forms: FormCatalog,
    client: Client,
    initialized: bool,
}

impl Default for Plugin {
    fn default() -> Self {
        Self::new(DEFAULT_RENDER_KEY, DEFAULT_SITES_REGISTER_KEY)
    }
}

impl Plugin {
    pub fn new(render_key: impl Into<String>, sites_register_key: impl Into<String>) -> Self {
        Self {
            render_key: render_key.into(),
            sites_register_key: sites_register_key.into(),
            forms: Vec::new(),
            client: Client::new(),
            initialized: false,
        }
    }

    /// Use a preconfigured HTTP client for the verification calls.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_forms(mut self, forms: FormPolicyMap) -> Self {
        self.forms.push(forms);
        self
    }

    pub fn require_options(&self) -> [&str; 2] {
        [self.render_key.as_str(), self.sites_register_key.as_str()]
    }

    /// Load `<config_dir>/recaptcha.yml` and wire the plugin into the host.
    ///
    /// On error nothing is registered. Once wired, further calls fail with a
    /// `Config` error and leave the host untouched.
    pub fn init(&mut self, opts: &PluginOptions, config_dir: impl AsRef<Path>) -> Result<()> {
        if self.initialized {
            return Err(CaptchaError::Config("recaptcha plugin already initialized".into()));
        }
        let render = opts.render(&self.render_key)?;
        let sites = opts.sites(&self.sites_register_key)?;

        let cfg = config::load_plugin_config(config_dir).map_err(|e| {
            tracing::error!(error = %e, "recaptcha config load failed");
            e
        })?;

        let enabled = !cfg.disabled;
        if enabled {
            self.forms.extend(cfg.forms.into_iter().filter(|f| !f.is_empty()));
        } else {
            tracing::info!("recaptcha disabled by config");
        }

        let catalog = Arc::new(self.forms.clone());
        let client = self.client.clone();
        // Weak: the callback lives inside the registry it writes to.
        let registry = Arc::downgrade(&sites);
        sites.on_add(move |site| match setup_site(site, &catalog, enabled, &client) {
            Ok(Some(ctx)) => {
                if let Some(registry) = registry.upgrade() {
                    registry.insert_context(ctx);
                }
            }
            Ok(None) => tracing::debug!(site = %site.name, "no recaptcha section"),
            Err(e) => tracing::error!(site = %site.name, error = %e, "recaptcha site setup failed"),
        });

        page_setup(&render, sites);
        self.initialized = true;
        Ok(())
    }
}
