use std::sync::{Arc, PoisonError, RwLock};

use sitecaptcha_core::error::Result;

/// What a render hook knows about the request being rendered.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub site: String,
    pub host: String,
    /// Request path, leading `/` included.
    pub path: String,
}

/// Form being rendered. Handlers may replace `body`.
#[derive(Debug, Clone)]
pub struct FormState {
    pub name: String,
    pub body: String,
}

pub trait ScriptHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn render(&self, req: &RenderRequest, out: &mut String) -> Result<()>;
}

pub trait StyleHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn render(&self, req: &RenderRequest, out: &mut String) -> Result<()>;
}

pub trait FormHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn render(&self, req: &RenderRequest, form: &mut FormState) -> Result<()>;
}

/// Ordered handler lists, appended during setup and read per render.
#[derive(Default)]
pub struct PageHandlers {
    scripts: RwLock<Vec<Arc<dyn ScriptHandler>>>,
    styles: RwLock<Vec<Arc<dyn StyleHandler>>>,
    forms: RwLock<Vec<Arc<dyn FormHandler>>>,
}

impl PageHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_script(&self, h: Arc<dyn ScriptHandler>) {
        push(&self.scripts, h);
    }

    pub fn append_style(&self, h: Arc<dyn StyleHandler>) {
        push(&self.styles, h);
    }

    pub fn append_form(&self, h: Arc<dyn FormHandler>) {
        push(&self.forms, h);
    }

    pub fn script_names(&self) -> Vec<&'static str> {
        snapshot(&self.scripts).iter().map(|h| h.name()).collect()
    }

    pub fn style_names(&self) -> Vec<&'static str> {
        snapshot(&self.styles).iter().map(|h| h.name()).collect()
    }

    pub fn form_names(&self) -> Vec<&'static str> {
        snapshot(&self.forms).iter().map(|h| h.name()).collect()
    }

    pub fn render_script(&self, req: &RenderRequest) -> Result<String> {
        let mut out = String::new();
        for h in snapshot(&self.scripts) {
            h.render(req, &mut out)?;
        }
        Ok(out)
    }

    pub fn render_style(&self, req: &RenderRequest) -> Result<String> {
        let mut out = String::new();
        for h in snapshot(&self.styles) {
            h.render(req, &mut out)?;
        }
        Ok(out)
    }

    pub fn render_form(&self, req: &RenderRequest, form: &mut FormState) -> Result<()> {
        for h in snapshot(&self.forms) {
            h.render(req, form)?;
        }
        Ok(())
    }
}

// A panicking writer cannot leave a half-pushed `Vec`, so a poisoned list is
// still consistent and is used as-is.
pub(crate) fn push<T: ?Sized>(list: &RwLock<Vec<Arc<T>>>, h: Arc<T>) {
    list.write().unwrap_or_else(PoisonError::into_inner).push(h);
}

pub(crate) fn snapshot<T: ?Sized>(list: &RwLock<Vec<Arc<T>>>) -> Vec<Arc<T>> {
    list.read().unwrap_or_else(PoisonError::into_inner).clone()
}
