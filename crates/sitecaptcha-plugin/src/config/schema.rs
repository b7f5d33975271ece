use std::collections::HashSet;

use serde::Deserialize;
use sitecaptcha_core::error::{CaptchaError, Result};
use sitecaptcha_core::FormPolicyMap;

/// Key of the plugin section inside a site's config store.
pub const CONFIG_KEY: &str = "recaptcha";

/// Global catalog (`recaptcha.yml`).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginConfig {
    #[serde(default)]
    pub disabled: bool,

    #[serde(default)]
    pub forms: Vec<FormPolicyMap>,
}

/// Site list loaded by the reference host.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SitesFile {
    pub version: u32,

    #[serde(default)]
    pub sites: Vec<SiteConfig>,
}

impl SitesFile {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(CaptchaError::Config(format!(
                "unsupported sites file version: {}",
                self.version
            )));
        }
        if self.sites.is_empty() {
            return Err(CaptchaError::Config("sites must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for site in &self.sites {
            if site.name.trim().is_empty() {
                return Err(CaptchaError::Config("site name must not be empty".into()));
            }
            if !seen.insert(site.name.as_str()) {
                return Err(CaptchaError::Config(format!("duplicate site: {}", site.name)));
            }
        }
        Ok(())
    }
}

/// Host-owned site description. `config` is the site's key/value store;
/// the plugin only reads its [`CONFIG_KEY`] entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    pub name: String,

    #[serde(default)]
    pub hosts: Vec<String>,

    #[serde(default)]
    pub config: serde_yaml::Mapping,
}

impl SiteConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hosts: Vec::new(),
            config: serde_yaml::Mapping::new(),
        }
    }
}

/// Per-site plugin section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteRecaptchaConfig {
    pub private_key: String,
    pub site_key: String,

    #[serde(default)]
    pub forms: FormPolicyMap,

    #[serde(default = "default_verify_url")]
    pub verify_url: String,

    /// Minimum v3 score; `None` accepts any successful response.
    #[serde(default)]
    pub min_score: Option<f64>,
}

impl SiteRecaptchaConfig {
    /// Read the plugin section of `site`. `Ok(None)` when the site has none.
    pub fn from_site(site: &SiteConfig) -> Result<Option<Self>> {
        let Some(raw) = site.config.get(CONFIG_KEY) else {
            return Ok(None);
        };
        let cfg: SiteRecaptchaConfig = serde_yaml::from_value(raw.clone()).map_err(|e| {
            CaptchaError::Config(format!("site {}: invalid {CONFIG_KEY} section: {e}", site.name))
        })?;
        cfg.validate()
            .map_err(|e| CaptchaError::Config(format!("site {}: {e}", site.name)))?;
        Ok(Some(cfg))
    }

    pub fn validate(&self) -> Result<()> {
        if self.private_key.trim().is_empty() {
            return Err(CaptchaError::Config("private_key must not be empty".into()));
        }
        if self.site_key.trim().is_empty() {
            return Err(CaptchaError::Config("site_key must not be empty".into()));
        }
        if let Some(score) = self.min_score {
            if !(0.0..=1.0).contains(&score) {
                return Err(CaptchaError::Config(
                    "min_score must be between 0.0 and 1.0".into(),
                ));
            }
        }
        Ok(())
    }
}

pub(crate) fn default_verify_url() -> String {
    "https://www.google.com/recaptcha/api/siteverify".into()
}
