//! Per-site verification context.
//!
//! Built once when a site registers and shared read-only afterwards.

use std::sync::Arc;

use reqwest::Client;
use sitecaptcha_core::error::Result;
use sitecaptcha_core::policy::{self, Enforcement};
use sitecaptcha_core::{FormCatalog, FormPolicyMap};

use crate::config::{SiteConfig, SiteRecaptchaConfig};
use crate::failure::{DefaultFailureHandler, FailureHandler};
use crate::verify::{SiteVerifyClient, Verifier};
use crate::widget::Widget;

/// Development hosts are never challenged.
pub fn is_dev_host(host: &str) -> bool {
    host.contains("localhost")
}

pub struct SiteVerification {
    site: String,
    forms: Arc<FormPolicyMap>,
    widget: Widget,
    verifier: Arc<dyn Verifier>,
    failure: Arc<dyn FailureHandler>,
}

impl SiteVerification {
    pub fn new(
        site: impl Into<String>,
        forms: FormPolicyMap,
        widget: Widget,
        verifier: Arc<dyn Verifier>,
        failure: Arc<dyn FailureHandler>,
    ) -> Self {
        Self {
            site: site.into(),
            forms: Arc::new(forms),
            widget,
            verifier,
            failure,
        }
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn forms(&self) -> &FormPolicyMap {
        &self.forms
    }

    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    pub fn verifier(&self) -> &dyn Verifier {
        self.verifier.as_ref()
    }

    pub fn failure_handler(&self) -> &dyn FailureHandler {
        self.failure.as_ref()
    }

    /// Skip predicate: submissions to paths that cannot enforce are never
    /// verified.
    pub fn should_skip(&self, path: &str) -> bool {
        !policy::requires_verification(&self.forms, path)
    }

    /// Whole-path header markup check.
    pub fn covers(&self, path: &str) -> bool {
        policy::covers(&self.forms, path)
    }

    pub fn resolve(&self, path: &str, field: &str, body: &str) -> Enforcement {
        policy::resolve(&self.forms, path, field, body)
    }
}

impl std::fmt::Debug for SiteVerification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteVerification")
            .field("site", &self.site)
            .field("forms", &self.forms)
            .field("site_key", &self.widget.site_key())
            .finish_non_exhaustive()
    }
}

/// Build the context for `site`. `Ok(None)` when the site has no plugin
/// section; credential or policy errors fail this site only.
pub fn setup_site(
    site: &SiteConfig,
    catalog: &FormCatalog,
    enabled: bool,
    client: &Client,
) -> Result<Option<SiteVerification>> {
    let Some(cfg) = SiteRecaptchaConfig::from_site(site)? else {
        return Ok(None);
    };

    let forms = policy::merge(catalog, Some(&cfg.forms), enabled);
    tracing::info!(site = %site.name, paths = forms.len(), "recaptcha enabled for site");

    Ok(Some(SiteVerification::new(
        site.name.clone(),
        forms,
        Widget::new(cfg.site_key.clone()),
        Arc::new(SiteVerifyClient::new(client.clone(), &cfg)),
        Arc::new(DefaultFailureHandler),
    )))
}
