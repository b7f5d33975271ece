//! reCAPTCHA render decorators.

use std::sync::Arc;

use sitecaptcha_core::error::Result;
use sitecaptcha_core::policy::Enforcement;

use super::handlers::{FormHandler, FormState, PageHandlers, RenderRequest, ScriptHandler, StyleHandler};
use crate::registry::SiteRegistry;
use crate::site::{is_dev_host, SiteVerification};

pub const HANDLER_NAME: &str = "recaptcha";

fn context(sites: &SiteRegistry, req: &RenderRequest) -> Option<Arc<SiteVerification>> {
    if is_dev_host(&req.host) {
        return None;
    }
    sites.context(&req.site)
}

pub struct RecaptchaScript {
    sites: Arc<SiteRegistry>,
}

impl RecaptchaScript {
    pub fn new(sites: Arc<SiteRegistry>) -> Self {
        Self { sites }
    }
}

impl ScriptHandler for RecaptchaScript {
    fn name(&self) -> &'static str {
        HANDLER_NAME
    }

    fn render(&self, req: &RenderRequest, out: &mut String) -> Result<()> {
        if let Some(ctx) = context(&self.sites, req) {
            if ctx.covers(&req.path) {
                out.push_str(&ctx.widget().header_script());
            }
        }
        Ok(())
    }
}

pub struct RecaptchaStyle {
    sites: Arc<SiteRegistry>,
}

impl RecaptchaStyle {
    pub fn new(sites: Arc<SiteRegistry>) -> Self {
        Self { sites }
    }
}

impl StyleHandler for RecaptchaStyle {
    fn name(&self) -> &'static str {
        HANDLER_NAME
    }

    fn render(&self, req: &RenderRequest, out: &mut String) -> Result<()> {
        if let Some(ctx) = context(&self.sites, req) {
            if ctx.covers(&req.path) {
                out.push_str(&ctx.widget().header_style());
            }
        }
        Ok(())
    }
}

pub struct RecaptchaForm {
    sites: Arc<SiteRegistry>,
}

impl RecaptchaForm {
    pub fn new(sites: Arc<SiteRegistry>) -> Self {
        Self { sites }
    }
}

impl FormHandler for RecaptchaForm {
    fn name(&self) -> &'static str {
        HANDLER_NAME
    }

    fn render(&self, req: &RenderRequest, form: &mut FormState) -> Result<()> {
        let Some(ctx) = context(&self.sites, req) else {
            return Ok(());
        };

        let body = form.body.trim();
        match ctx.resolve(&req.path, &form.name, body) {
            Enforcement::Enforce { action } => {
                tracing::trace!(site = %req.site, path = %req.path, form = %form.name, %action, "wrapping form");
                form.body = ctx.widget().wrap_form(&action, body);
            }
            Enforcement::NotEnforced => {
                form.body = body.to_string();
            }
        }
        Ok(())
    }
}

/// Attach the three decorators to the host's page handlers.
pub fn page_setup(handlers: &PageHandlers, sites: Arc<SiteRegistry>) {
    handlers.append_script(Arc::new(RecaptchaScript::new(Arc::clone(&sites))));
    handlers.append_style(Arc::new(RecaptchaStyle::new(Arc::clone(&sites))));
    handlers.append_form(Arc::new(RecaptchaForm::new(sites)));
}
