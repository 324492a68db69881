//! Scroll-triggered reveal animations.
//!
//! Two policies share one driver. `Toggle` keeps the visible class in sync
//! with the viewport on every crossing; `Once` adds it the first time and then
//! releases the target from its watcher. The page runs both at once over the
//! same targets, each with its own watcher and threshold, and they are kept
//! separate because their end states differ.

use crate::config::RevealConfig;
use crate::dom::{Element, Intersection, Viewport};
use crate::error::EnhanceError;

#[cfg(test)]
#[path = "reveal_test.rs"]
mod reveal_test;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevealPolicy {
    /// Show while visible, hide again when scrolled away.
    Toggle { threshold: f64 },
    /// Show on first sight, then stop watching.
    Once { threshold: f64 },
}

impl RevealPolicy {
    pub fn threshold(self) -> f64 {
        match self {
            Self::Toggle { threshold } | Self::Once { threshold } => threshold,
        }
    }

    /// Apply one intersection batch. Returns the targets to release.
    pub fn apply<E: Element>(self, entries: &[Intersection<E>], visible_class: &str) -> Vec<E> {
        let mut released = Vec::new();
        for entry in entries {
            let visible = entry.is_visible();
            match self {
                Self::Toggle { .. } => {
                    if visible {
                        entry.target.add_class(visible_class);
                    } else {
                        entry.target.remove_class(visible_class);
                    }
                }
                Self::Once { .. } => {
                    if visible {
                        entry.target.add_class(visible_class);
                        released.push(entry.target.clone());
                    }
                }
            }
        }
        released
    }
}

/// Mark each target with the base class and start a watcher for `policy`.
pub fn observe<V: Viewport>(
    viewport: &V,
    targets: &[V::Element],
    policy: RevealPolicy,
    config: &RevealConfig,
) -> Result<(), EnhanceError> {
    for target in targets {
        target.add_class(&config.base_class);
    }
    let visible_class = config.visible_class.clone();
    viewport.watch(
        policy.threshold(),
        targets,
        Box::new(move |entries: &[Intersection<V::Element>]| policy.apply(entries, &visible_class)),
    )
}

/// The two policies the page runs, in wiring order.
pub fn policies(config: &RevealConfig) -> [RevealPolicy; 2] {
    [
        RevealPolicy::Toggle { threshold: config.toggle_threshold },
        RevealPolicy::Once { threshold: config.once_threshold },
    ]
}
