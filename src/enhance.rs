//! Page bootstrap: wire every behavior against a set of ports.
//!
//! Behaviors are independent. Each one is wired in isolation and a failure
//! is logged and recorded in the [`Wiring`] report without stopping the rest.
//! A document is enhanced at most once; later calls leave it untouched.

use crate::config::EnhanceConfig;
use crate::consts::ENHANCED_ATTRIBUTE;
use crate::copy;
use crate::dom::{Clipboard, Document, Scheduler, Store, Viewport};
use crate::error::EnhanceError;
use crate::menu::{self, MenuWiring};
use crate::reveal::{self, RevealPolicy};
use crate::theme::{self, ThemeWiring};

#[cfg(test)]
#[path = "enhance_test.rs"]
mod enhance_test;

/// What `enhance` managed to attach.
#[derive(Debug, Default)]
pub struct Wiring {
    pub menu: Option<MenuWiring>,
    pub theme: Option<ThemeWiring>,
    /// Elements tracked by the reveal watchers.
    pub reveal_targets: usize,
    /// Policies whose watcher started.
    pub reveal_watchers: Vec<RevealPolicy>,
    pub copy_controls: usize,
    pub failures: Vec<EnhanceError>,
    /// Set when the document was enhanced earlier and nothing was attached.
    pub already_enhanced: bool,
}

impl Wiring {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The browser surface `enhance` runs against.
pub struct Enhancer<D, S, C, T, V> {
    pub document: D,
    pub store: S,
    pub clipboard: C,
    pub scheduler: T,
    pub viewport: V,
    pub config: EnhanceConfig,
}

impl<D, S, C, T, V> Enhancer<D, S, C, T, V>
where
    D: Document,
    S: Store,
    C: Clipboard,
    T: Scheduler,
    V: Viewport<Element = D::Element>,
{
    /// Attach the menu, both reveal watchers, the theme toggle and the copy
    /// controls.
    pub fn enhance(&self) -> Wiring {
        let mut wiring = Wiring::default();
        if self.document.root_attribute(ENHANCED_ATTRIBUTE).is_some() {
            log::debug!("page already enhanced; skipping");
            wiring.already_enhanced = true;
            return wiring;
        }
        self.document.set_root_attribute(ENHANCED_ATTRIBUTE, "");

        match menu::wire(&self.document, &self.config.menu) {
            Ok(menu) => wiring.menu = Some(menu),
            Err(err) => wiring.failures.push(err),
        }

        let targets = self.document.query_all(&self.config.reveal.selector);
        wiring.reveal_targets = targets.len();
        let [toggling, once] = reveal::policies(&self.config.reveal);

        self.start_reveal(&targets, toggling, &mut wiring);

        match theme::wire(&self.document, &self.store, &self.config.theme) {
            Ok(theme) => wiring.theme = Some(theme),
            Err(err) => wiring.failures.push(err),
        }

        self.start_reveal(&targets, once, &mut wiring);

        match copy::wire(&self.document, &self.clipboard, &self.scheduler, &self.config.copy) {
            Ok(count) => wiring.copy_controls = count,
            Err(err) => wiring.failures.push(err),
        }

        for err in &wiring.failures {
            log::warn!("page behavior not attached: {err}");
        }
        log::info!(
            "page enhanced: {} reveal targets, {} watchers, {} copy controls",
            wiring.reveal_targets,
            wiring.reveal_watchers.len(),
            wiring.copy_controls
        );
        wiring
    }

    fn start_reveal(&self, targets: &[D::Element], policy: RevealPolicy, wiring: &mut Wiring) {
        match reveal::observe(&self.viewport, targets, policy, &self.config.reveal) {
            Ok(()) => wiring.reveal_watchers.push(policy),
            Err(err) => wiring.failures.push(err),
        }
    }
}
