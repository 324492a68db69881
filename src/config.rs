//! Page configuration: ids, selectors, class names and tunables.
//!
//! Defaults match the portfolio markup. A page can override any subset by
//! embedding `<script type="application/json" id="folio-config">{...}</script>`;
//! missing fields keep their defaults.

use std::time::Duration;

use serde::Deserialize;

use crate::consts;
use crate::dom::{Document, Element};
use crate::error::EnhanceError;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub menu_id: String,
    pub toggle_id: String,
    pub close_id: String,
    pub link_selector: String,
    pub shown_class: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            menu_id: consts::NAV_MENU_ID.to_owned(),
            toggle_id: consts::NAV_TOGGLE_ID.to_owned(),
            close_id: consts::NAV_CLOSE_ID.to_owned(),
            link_selector: consts::NAV_LINK_SELECTOR.to_owned(),
            shown_class: consts::SHOW_MENU_CLASS.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub selector: String,
    pub base_class: String,
    pub visible_class: String,
    pub toggle_threshold: f64,
    pub once_threshold: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: consts::REVEAL_SELECTOR.to_owned(),
            base_class: consts::REVEAL_CLASS.to_owned(),
            visible_class: consts::VISIBLE_CLASS.to_owned(),
            toggle_threshold: consts::TOGGLE_REVEAL_THRESHOLD,
            once_threshold: consts::ONCE_REVEAL_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub toggle_id: String,
    pub attribute: String,
    pub storage_key: String,
    pub moon_class: String,
    pub sun_class: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            toggle_id: consts::THEME_TOGGLE_ID.to_owned(),
            attribute: consts::THEME_ATTRIBUTE.to_owned(),
            storage_key: consts::THEME_STORAGE_KEY.to_owned(),
            moon_class: consts::MOON_ICON_CLASS.to_owned(),
            sun_class: consts::SUN_ICON_CLASS.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CopyConfig {
    pub button_selector: String,
    pub source_data_key: String,
    pub success_markup: String,
    pub feedback_ms: u64,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            button_selector: consts::COPY_BUTTON_SELECTOR.to_owned(),
            source_data_key: consts::COPY_SOURCE_DATA_KEY.to_owned(),
            success_markup: consts::COPY_SUCCESS_MARKUP.to_owned(),
            feedback_ms: consts::COPY_FEEDBACK_MS,
        }
    }
}

impl CopyConfig {
    pub fn feedback(&self) -> Duration {
        Duration::from_millis(self.feedback_ms)
    }
}

/// Everything `enhance` needs to know about the page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    pub menu: MenuConfig,
    pub reveal: RevealConfig,
    pub theme: ThemeConfig,
    pub copy: CopyConfig,
}

impl EnhanceConfig {
    /// Parse a (possibly partial) JSON override and validate the result.
    pub fn from_json(raw: &str) -> Result<Self, EnhanceError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read overrides from the config element if the page has one.
    ///
    /// A malformed override is logged and the defaults are used instead.
    pub fn discover<D: Document>(document: &D) -> Self {
        let Some(element) = document.element_by_id(consts::CONFIG_ELEMENT_ID) else {
            return Self::default();
        };
        match Self::from_json(&element.inner_html()) {
            Ok(config) => {
                log::debug!("using config overrides from #{}", consts::CONFIG_ELEMENT_ID);
                config
            }
            Err(err) => {
                log::warn!("ignoring #{}: {err}", consts::CONFIG_ELEMENT_ID);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), EnhanceError> {
        check_threshold("reveal.toggle_threshold", self.reveal.toggle_threshold)?;
        check_threshold("reveal.once_threshold", self.reveal.once_threshold)?;

        let required = [
            ("menu.menu_id", &self.menu.menu_id),
            ("menu.shown_class", &self.menu.shown_class),
            ("reveal.selector", &self.reveal.selector),
            ("reveal.base_class", &self.reveal.base_class),
            ("reveal.visible_class", &self.reveal.visible_class),
            ("theme.attribute", &self.theme.attribute),
            ("theme.storage_key", &self.theme.storage_key),
            ("copy.button_selector", &self.copy.button_selector),
            ("copy.source_data_key", &self.copy.source_data_key),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(EnhanceError::Config(format!("{name} must not be empty")));
        }

        if self.copy.feedback_ms == 0 {
            return Err(EnhanceError::Config("copy.feedback_ms must be positive".to_owned()));
        }
        Ok(())
    }
}

fn check_threshold(name: &str, value: f64) -> Result<(), EnhanceError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EnhanceError::Config(format!("{name} must be within 0..=1, got {value}")))
    }
}
