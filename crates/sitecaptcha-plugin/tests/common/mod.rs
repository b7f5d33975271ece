//! Shared fixtures for plugin integration tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sitecaptcha_core::error::{CaptchaError, Result};
use sitecaptcha_core::FormPolicyMap;
use sitecaptcha_plugin::config::SiteConfig;
use sitecaptcha_plugin::{DefaultFailureHandler, SiteRegistry, SiteVerification, Verifier, Widget};

pub const SITE_KEY: &str = "site-key-123";

/// Accepts exactly one token, records every call.
#[derive(Default)]
pub struct MockVerifier {
    pub accept: String,
    pub calls: AtomicUsize,
    pub last: Mutex<Option<(String, Option<String>)>>,
}

impl MockVerifier {
    pub fn accepting(token: &str) -> Arc<Self> {
        Arc::new(Self {
            accept: token.to_string(),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Verifier for MockVerifier {
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((token.to_string(), remote_ip.map(str::to_string)));
        if token == "unreachable" {
            return Err(CaptchaError::VerifierUnavailable("connection refused".into()));
        }
        if !token.is_empty() && token == self.accept {
            Ok(())
        } else {
            Err(CaptchaError::VerificationFailed)
        }
    }
}

pub fn forms(yaml: &str) -> FormPolicyMap {
    if yaml.trim().is_empty() {
        return FormPolicyMap::new();
    }
    serde_yaml::from_str(yaml).expect("valid form map")
}

pub fn context(name: &str, yaml: &str, verifier: Arc<MockVerifier>) -> SiteVerification {
    SiteVerification::new(
        name,
        forms(yaml),
        Widget::new(SITE_KEY),
        verifier,
        Arc::new(DefaultFailureHandler),
    )
}

pub fn site(name: &str, hosts: &[&str], config_yaml: &str) -> SiteConfig {
    let mut s = SiteConfig::new(name);
    s.hosts = hosts.iter().map(|h| h.to_string()).collect();
    if !config_yaml.trim().is_empty() {
        s.config = serde_yaml::from_str(config_yaml).expect("valid site config");
    }
    s
}

/// Registry with one site `acme` on `acme.test` using `yaml` as its forms.
pub fn registry_with(yaml: &str, verifier: Arc<MockVerifier>) -> Arc<SiteRegistry> {
    let reg = Arc::new(SiteRegistry::new());
    reg.add_site(site("acme", &["acme.test"], ""));
    reg.insert_context(context("acme", yaml, verifier));
    reg
}
