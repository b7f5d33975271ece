//! reCAPTCHA v3 widget markup.
//!
//! Header script/style are fixed per site key. Form wrapping appends a hidden
//! token input and a submit hook that asks the widget for a token bound to
//! the form's action label.

/// Form field carrying the token back to the server.
pub const RESPONSE_FIELD: &str = "g-recaptcha-response";

const API_JS: &str = "https://www.google.com/recaptcha/api.js";
const BADGE_STYLE: &str = "<style>.grecaptcha-badge{visibility:hidden}</style>";

#[derive(Debug, Clone)]
pub struct Widget {
    site_key: String,
}

impl Widget {
    pub fn new(site_key: impl Into<String>) -> Self {
        Self {
            site_key: site_key.into(),
        }
    }

    pub fn site_key(&self) -> &str {
        &self.site_key
    }

    pub fn header_script(&self) -> String {
        format!(
            r#"<script src="{API_JS}?render={}"></script>"#,
            escape_attr(&self.site_key)
        )
    }

    pub fn header_style(&self) -> String {
        BADGE_STYLE.to_string()
    }

    /// `body` followed by the token input and the submit hook for `action`.
    pub fn wrap_form(&self, action: &str, body: &str) -> String {
        let key = escape_js(&self.site_key);
        let action = escape_js(&sanitize_action(action));
        format!(
            concat!(
                "{body}\n",
                r#"<input type="hidden" name="{field}">"#,
                "\n<script>(function(s){{var f=s.closest('form');if(!f)return;",
                "f.addEventListener('submit',function(e){{",
                "var i=f.querySelector('input[name=\"{field}\"]');if(i.value)return;e.preventDefault();",
                "grecaptcha.ready(function(){{grecaptcha.execute('{key}',{{action:'{action}'}})",
                ".then(function(t){{i.value=t;f.submit();}});}});}});",
                "}})(document.currentScript);</script>"
            ),
            body = body,
            field = RESPONSE_FIELD,
            key = key,
            action = action,
        )
    }
}

/// v3 action labels only allow `[A-Za-z0-9/_]`.
fn sanitize_action(action: &str) -> String {
    action
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '/' || c == '_' { c } else { '_' })
        .collect()
}

fn escape_attr(v: &str) -> String {
    v.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_js(v: &str) -> String {
    let mut out = String::with_capacity(v.len());
    for c in v.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '<' => out.push_str("\\x3c"),
            '>' => out.push_str("\\x3e"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}
