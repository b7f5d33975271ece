//! sitecaptcha core: form-policy model, merge rules and path resolution.
//!
//! This crate owns the only real decision logic of the plugin: how global and
//! per-site form catalogs combine, and whether a given path/form submission
//! must carry a CAPTCHA token. It carries no HTTP or runtime dependencies so
//! it can be exercised without a host.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `CaptchaError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod markup;
pub mod policy;

/// Shared result type.
pub use error::{CaptchaError, Result};
pub use policy::{Enforcement, FormCatalog, FormPolicyMap, PathPolicy};
