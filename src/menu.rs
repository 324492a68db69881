//! Collapsible navigation menu.
//!
//! The open/closed state lives entirely in the presence of the shown class on
//! the menu container; there is nothing to keep in sync.

use crate::config::MenuConfig;
use crate::dom::{Document, Element};
use crate::error::EnhanceError;

#[cfg(test)]
#[path = "menu_test.rs"]
mod menu_test;

/// Handle to the menu container. Every operation is a no-op when the page
/// has no container.
#[derive(Clone)]
pub struct Menu<E> {
    container: Option<E>,
    shown_class: String,
}

impl<E: Element> Menu<E> {
    pub fn new(container: Option<E>, shown_class: &str) -> Self {
        Self { container, shown_class: shown_class.to_owned() }
    }

    pub fn open(&self) {
        if let Some(container) = &self.container {
            container.add_class(&self.shown_class);
        }
    }

    pub fn close(&self) {
        if let Some(container) = &self.container {
            container.remove_class(&self.shown_class);
        }
    }

    pub fn is_open(&self) -> bool {
        self.container.as_ref().is_some_and(|c| c.has_class(&self.shown_class))
    }
}

/// Count of controls that received a click handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuWiring {
    pub toggle: bool,
    pub close: bool,
    pub links: usize,
}

/// Attach the toggle, close and link handlers. Missing controls are skipped.
pub fn wire<D: Document>(document: &D, config: &MenuConfig) -> Result<MenuWiring, EnhanceError> {
    let menu = Menu::new(document.element_by_id(&config.menu_id), &config.shown_class);
    if menu.container.is_none() {
        log::debug!("no #{} on page; menu controls are inert", config.menu_id);
    }

    let mut wiring = MenuWiring::default();

    if let Some(toggle) = document.element_by_id(&config.toggle_id) {
        let menu = menu.clone();
        toggle.on_click(Box::new(move || menu.open()))?;
        wiring.toggle = true;
    }

    if let Some(close) = document.element_by_id(&config.close_id) {
        let menu = menu.clone();
        close.on_click(Box::new(move || menu.close()))?;
        wiring.close = true;
    }

    for link in document.query_all(&config.link_selector) {
        let menu = menu.clone();
        link.on_click(Box::new(move || menu.close()))?;
        wiring.links += 1;
    }

    Ok(wiring)
}
