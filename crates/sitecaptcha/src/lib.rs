//! reCAPTCHA protection for multi-site hosts.
//!
//! `policy` holds the form catalog model and resolver; `plugin` holds config
//! loading, render decorators and the verification middleware. The most used
//! types are also re-exported at the root.

pub use sitecaptcha_core as policy;
pub use sitecaptcha_plugin as plugin;

pub use sitecaptcha_core::{CaptchaError, Enforcement, FormPolicyMap, PathPolicy, Result};
pub use sitecaptcha_plugin::middleware::{verify_for_host, with_verification};
pub use sitecaptcha_plugin::{PageHandlers, Plugin, SiteRegistry, SiteVerification, Verifier};
