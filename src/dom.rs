//! Ports between the page behaviors and the browser.
//!
//! ARCHITECTURE
//! ============
//! Behaviors are generic over these traits so their logic runs natively in
//! tests against in-memory fakes. The `web` module (feature `browser`)
//! implements them for `web_sys` types. Everything is single-threaded; the
//! `'static` bounds exist because handlers outlive the wiring call.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::error::EnhanceError;

/// Click handler attached to an element for the lifetime of the page.
pub type ClickHandler = Box<dyn FnMut()>;

/// Intersection batch handler. Returns the targets the watcher should stop
/// tracking.
pub type ChangeHandler<E> = Box<dyn FnMut(&[Intersection<E>]) -> Vec<E>>;

/// A future spawned onto the page's event loop.
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Handle to a live element in the document.
pub trait Element: Clone + 'static {
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;

    /// Replace `from` with `to` in the class list. Returns `false` and leaves
    /// the list untouched when `from` is not present.
    fn replace_class(&self, from: &str, to: &str) -> bool;

    /// Value of the `data-{key}` attribute.
    fn data(&self, key: &str) -> Option<String>;

    fn inner_html(&self) -> String;
    fn set_inner_html(&self, markup: &str);

    /// Rendered text, as the user sees it.
    fn inner_text(&self) -> String;

    fn on_click(&self, handler: ClickHandler) -> Result<(), EnhanceError>;
}

/// The parsed page.
pub trait Document: Clone + 'static {
    type Element: Element;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// All elements matching a CSS selector list, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    fn root_attribute(&self, name: &str) -> Option<String>;
    fn set_root_attribute(&self, name: &str, value: &str);
}

/// Persistent key-value store surviving reloads.
pub trait Store: Clone + 'static {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), EnhanceError>;
}

/// One entry of an intersection batch.
#[derive(Debug, Clone)]
pub struct Intersection<E> {
    pub target: E,
    pub is_intersecting: bool,
    /// Fraction of the target's area inside the viewport, `0.0..=1.0`.
    pub ratio: f64,
}

impl<E> Intersection<E> {
    /// Whether the target counts as on screen. The watcher threshold only
    /// decides when a notification is queued; an entry that is intersecting
    /// at all is visible, so targets taller than the viewport still reveal.
    pub fn is_visible(&self) -> bool {
        self.is_intersecting
    }
}

/// Source of viewport intersection notifications.
pub trait Viewport: Clone + 'static {
    type Element: Element;

    /// Start one watcher with `threshold` over `targets`. The watcher stays
    /// alive for the page's lifetime.
    fn watch(
        &self,
        threshold: f64,
        targets: &[Self::Element],
        on_change: ChangeHandler<Self::Element>,
    ) -> Result<(), EnhanceError>;
}

/// System clipboard.
pub trait Clipboard: Clone + 'static {
    fn write_text(&self, text: String) -> impl Future<Output = Result<(), EnhanceError>>;
}

/// Timers and local task spawning.
pub trait Scheduler: Clone + 'static {
    /// Token for a scheduled task; passing it to [`Scheduler::cancel`] stops
    /// the task from running.
    type Handle: 'static;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle;
    fn cancel(&self, handle: Self::Handle);
    fn spawn(&self, task: LocalTask);
}
