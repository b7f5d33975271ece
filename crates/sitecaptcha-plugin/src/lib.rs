//! sitecaptcha plugin library entry.
//!
//! Wires configuration loading, per-site verification contexts, render
//! decorators and the verification middleware into a host. Consumed by the
//! reference host binary (`main.rs`) and by integration tests.

pub mod config;
pub mod failure;
pub mod host;
pub mod middleware;
pub mod plugin;
pub mod registry;
pub mod render;
pub mod site;
pub mod verify;
pub mod widget;

pub use failure::{DefaultFailureHandler, FailureHandler};
pub use plugin::Plugin;
pub use registry::SiteRegistry;
pub use render::PageHandlers;
pub use site::{setup_site, SiteVerification};
pub use verify::{SiteVerifyClient, Verifier};
pub use widget::Widget;
