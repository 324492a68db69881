//! Error type shared by every behavior and browser adapter.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is fatal to the page. Each behavior logs its own failure at
//! the wiring boundary so the remaining behaviors still attach.

#[derive(Debug, thiserror::Error)]
pub enum EnhanceError {
    #[error("clipboard write failed: {0}")]
    Clipboard(String),
    #[error("storage write failed: {0}")]
    Storage(String),
    #[error("intersection watcher failed: {0}")]
    Observer(String),
    #[error("event listener failed: {0}")]
    Listener(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("no global window")]
    NoWindow,
    #[error("no document on window")]
    NoDocument,
}

impl From<serde_json::Error> for EnhanceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(feature = "browser")]
impl EnhanceError {
    /// Render a thrown JS value for the given error category.
    pub(crate) fn from_js(kind: fn(String) -> Self, value: &wasm_bindgen::JsValue) -> Self {
        kind(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}
