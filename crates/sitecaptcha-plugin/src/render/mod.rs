//! Page render hooks.
//!
//! The host runs every registered handler while rendering a page: script and
//! style handlers append to the document head, form handlers may rewrite a
//! form body in place.

pub mod handlers;
pub mod recaptcha;

pub use handlers::{FormHandler, FormState, PageHandlers, RenderRequest, ScriptHandler, StyleHandler};
pub use recaptcha::{page_setup, RecaptchaForm, RecaptchaScript, RecaptchaStyle};
