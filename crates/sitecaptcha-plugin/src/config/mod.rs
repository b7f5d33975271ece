//! Plugin and site config loaders (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use sitecaptcha_core::error::{CaptchaError, Result};

pub use schema::{PluginConfig, SiteConfig, SiteRecaptchaConfig, SitesFile, CONFIG_KEY};

/// File name of the global catalog inside the host's config directory.
pub const PLUGIN_CONFIG_FILE: &str = "recaptcha.yml";

/// Load `<dir>/recaptcha.yml`. A missing file yields the default config.
pub fn load_plugin_config(dir: impl AsRef<Path>) -> Result<PluginConfig> {
    let path = dir.as_ref().join(PLUGIN_CONFIG_FILE);
    match fs::read_to_string(&path) {
        Ok(s) => load_plugin_config_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no recaptcha config, using defaults");
            Ok(PluginConfig::default())
        }
        Err(e) => Err(CaptchaError::Config(format!(
            "read {} failed: {e}",
            path.display()
        ))),
    }
}

pub fn load_plugin_config_from_str(s: &str) -> Result<PluginConfig> {
    // An empty file parses as YAML null.
    if s.trim().is_empty() {
        return Ok(PluginConfig::default());
    }
    serde_yaml::from_str(s).map_err(|e| CaptchaError::Config(format!("invalid yaml: {e}")))
}

pub fn load_sites_from_file(path: impl AsRef<Path>) -> Result<SitesFile> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)
        .map_err(|e| CaptchaError::Config(format!("read {} failed: {e}", path.display())))?;
    load_sites_from_str(&s)
}

pub fn load_sites_from_str(s: &str) -> Result<SitesFile> {
    let sites: SitesFile = serde_yaml::from_str(s)
        .map_err(|e| CaptchaError::Config(format!("invalid yaml: {e}")))?;
    sites.validate()?;
    Ok(sites)
}
