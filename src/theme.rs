//! Light/dark theme toggle persisted across reloads.
//!
//! The active theme is the root `data-theme` attribute; stylesheets key off
//! it. The stored preference is applied verbatim on startup. When nothing is
//! stored the attribute is left alone and the stylesheet default stands, so
//! "no theme" is `None` rather than an assumed literal.

use std::fmt;

use crate::config::ThemeConfig;
use crate::dom::{Document, Element, Store};
use crate::error::EnhanceError;

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Interpret a root attribute value. Only the exact literal `dark` is
    /// dark; anything else, including no attribute, reads as light.
    pub fn from_attribute(value: Option<&str>) -> Self {
        if value == Some(Self::Dark.as_str()) { Self::Dark } else { Self::Light }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct ThemeController<D: Document, S> {
    document: D,
    store: S,
    toggle: Option<D::Element>,
    config: ThemeConfig,
}

impl<D: Document, S: Clone> Clone for ThemeController<D, S> {
    fn clone(&self) -> Self {
        Self {
            document: self.document.clone(),
            store: self.store.clone(),
            toggle: self.toggle.clone(),
            config: self.config.clone(),
        }
    }
}

impl<D: Document, S: Store> ThemeController<D, S> {
    pub fn new(document: D, store: S, config: ThemeConfig) -> Self {
        let toggle = document.element_by_id(&config.toggle_id);
        Self { document, store, toggle, config }
    }

    pub fn has_toggle(&self) -> bool {
        self.toggle.is_some()
    }

    /// Current root attribute, `None` while the host default is in effect.
    pub fn active(&self) -> Option<String> {
        self.document.root_attribute(&self.config.attribute)
    }

    /// Stored preference, if any.
    pub fn saved(&self) -> Option<String> {
        self.store.get(&self.config.storage_key)
    }

    /// Set the root attribute, persist the value and swap the toggle icon.
    ///
    /// The value is not validated. A failed storage write is logged and the
    /// attribute still changes.
    pub fn apply(&self, theme: &str) {
        self.document.set_root_attribute(&self.config.attribute, theme);

        if let Err(err) = self.store.set(&self.config.storage_key, theme) {
            log::warn!("theme preference not saved: {err}");
        }

        let Some(toggle) = &self.toggle else {
            log::debug!("no #{}; skipping theme icon", self.config.toggle_id);
            return;
        };
        let (from, to) = if theme == Theme::Dark.as_str() {
            (&self.config.moon_class, &self.config.sun_class)
        } else {
            (&self.config.sun_class, &self.config.moon_class)
        };
        toggle.replace_class(from, to);
    }

    /// Re-apply the stored preference. Returns what was applied.
    pub fn restore(&self) -> Option<String> {
        let saved = self.saved().filter(|value| !value.is_empty())?;
        self.apply(&saved);
        Some(saved)
    }

    /// Flip between dark and light based on the current root attribute.
    pub fn toggle(&self) -> Theme {
        let next = Theme::from_attribute(self.active().as_deref()).opposite();
        self.apply(next.as_str());
        log::debug!("theme switched to {next}");
        next
    }
}

/// Result of [`wire`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThemeWiring {
    pub restored: Option<String>,
    pub toggle: bool,
}

/// Restore the saved theme and attach the toggle handler if there is a toggle.
pub fn wire<D: Document, S: Store>(
    document: &D,
    store: &S,
    config: &ThemeConfig,
) -> Result<ThemeWiring, EnhanceError> {
    let controller = ThemeController::new(document.clone(), store.clone(), config.clone());
    let restored = controller.restore();

    let Some(toggle) = controller.toggle.clone() else {
        return Ok(ThemeWiring { restored, toggle: false });
    };
    toggle.on_click(Box::new(move || {
        controller.toggle();
    }))?;
    Ok(ThemeWiring { restored, toggle: true })
}
