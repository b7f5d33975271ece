//! Site registry.
//!
//! Host-side list of sites plus the per-site verification contexts the plugin
//! attaches to them. Callbacks are registered during setup; lookups after
//! that are read-only.

use std::sync::{Arc, RwLock};

use dashmap::DashMap;

use crate::config::SiteConfig;
use crate::render::handlers::{push, snapshot};
use crate::site::SiteVerification;

type OnAdd = Arc<dyn Fn(&SiteConfig) + Send + Sync>;

#[derive(Default)]
pub struct SiteRegistry {
    sites: DashMap<String, SiteConfig>,
    hosts: DashMap<String, String>,
    contexts: DashMap<String, Arc<SiteVerification>>,
    on_add: RwLock<Vec<OnAdd>>,
}

impl SiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` for every site added from now on, and for sites already
    /// registered.
    pub fn on_add(&self, f: impl Fn(&SiteConfig) + Send + Sync + 'static) {
        let f: OnAdd = Arc::new(f);
        push(&self.on_add, Arc::clone(&f));
        let existing: Vec<SiteConfig> = self.sites.iter().map(|e| e.value().clone()).collect();
        for site in &existing {
            f(site);
        }
    }

    pub fn add_site(&self, site: SiteConfig) {
        for host in &site.hosts {
            self.hosts.insert(normalize_host(host), site.name.clone());
        }
        self.sites.insert(site.name.clone(), site.clone());

        // Clone out so callbacks may touch the registry.
        for cb in snapshot(&self.on_add) {
            cb(&site);
        }
        tracing::debug!(site = %site.name, hosts = ?site.hosts, "site registered");
    }

    pub fn site(&self, name: &str) -> Option<SiteConfig> {
        self.sites.get(name).map(|e| e.value().clone())
    }

    pub fn site_names(&self) -> Vec<String> {
        self.sites.iter().map(|e| e.key().clone()).collect()
    }

    /// Site serving `host` (port ignored, case-insensitive).
    pub fn site_for_host(&self, host: &str) -> Option<String> {
        self.hosts.get(&normalize_host(host)).map(|e| e.value().clone())
    }

    pub fn insert_context(&self, ctx: SiteVerification) {
        self.contexts.insert(ctx.site().to_string(), Arc::new(ctx));
    }

    pub fn context(&self, site: &str) -> Option<Arc<SiteVerification>> {
        self.contexts.get(site).map(|e| Arc::clone(e.value()))
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim();
    // `host:port`; IPv6 literals keep their colons.
    let without_port = match host.rsplit_once(':') {
        Some((h, port)) if !h.ends_with(':') && port.chars().all(|c| c.is_ascii_digit()) => h,
        _ => host,
    };
    without_port.to_ascii_lowercase()
}
