//! `web_sys` adapters for the ports in [`crate::dom`] and the wasm entry point.
//!
//! Only compiled with the `browser` feature. JS exceptions are rendered into
//! [`EnhanceError`] values; calls whose failure leaves nothing to recover
//! (class list edits) are logged at debug level.

use std::future::Future;
use std::time::Duration;

use gloo_timers::callback::Timeout;
use js_sys::{Array, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::config::EnhanceConfig;
use crate::dom::{
    ChangeHandler, ClickHandler, Clipboard, Document, Element, Intersection, LocalTask, Scheduler, Store, Viewport,
};
use crate::enhance::{Enhancer, Wiring};
use crate::error::EnhanceError;

// =============================================================
// Element / Document
// =============================================================

#[derive(Clone, Debug)]
pub struct WebElement(web_sys::Element);

fn log_js_failure(action: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        log::debug!("{action} failed: {err:?}");
    }
}

impl Element for WebElement {
    fn add_class(&self, class: &str) {
        log_js_failure("classList.add", self.0.class_list().add_1(class));
    }

    fn remove_class(&self, class: &str) {
        log_js_failure("classList.remove", self.0.class_list().remove_1(class));
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn replace_class(&self, from: &str, to: &str) -> bool {
        match self.0.class_list().replace(from, to) {
            Ok(replaced) => replaced,
            Err(err) => {
                log::debug!("classList.replace failed: {err:?}");
                false
            }
        }
    }

    fn data(&self, key: &str) -> Option<String> {
        self.0.get_attribute(&format!("data-{key}"))
    }

    fn inner_html(&self) -> String {
        self.0.inner_html()
    }

    fn set_inner_html(&self, markup: &str) {
        self.0.set_inner_html(markup);
    }

    fn inner_text(&self) -> String {
        match self.0.dyn_ref::<HtmlElement>() {
            Some(html) => html.inner_text(),
            None => self.0.text_content().unwrap_or_default(),
        }
    }

    fn on_click(&self, handler: ClickHandler) -> Result<(), EnhanceError> {
        let closure = Closure::wrap(handler);
        self.0
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(|err| EnhanceError::from_js(EnhanceError::Listener, &err))?;
        // Listeners live as long as the page.
        closure.forget();
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct WebDocument(web_sys::Document);

impl Document for WebDocument {
    type Element = WebElement;

    fn element_by_id(&self, id: &str) -> Option<WebElement> {
        self.0.get_element_by_id(id).map(WebElement)
    }

    fn query_all(&self, selector: &str) -> Vec<WebElement> {
        let list = match self.0.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                log::warn!("bad selector {selector:?}: {err:?}");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|index| list.get(index))
            .filter_map(|node| match node.dyn_into::<web_sys::Element>() {
                Ok(element) => Some(WebElement(element)),
                Err(_) => None,
            })
            .collect()
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        self.0.document_element()?.get_attribute(name)
    }

    fn set_root_attribute(&self, name: &str, value: &str) {
        if let Some(root) = self.0.document_element() {
            log_js_failure("setAttribute", root.set_attribute(name, value));
        }
    }
}

// =============================================================
// Storage
// =============================================================

/// `localStorage`, or nothing when the browser withholds it.
#[derive(Clone, Debug)]
pub struct WebStore(Option<web_sys::Storage>);

impl WebStore {
    pub fn local(window: &web_sys::Window) -> Self {
        match window.local_storage() {
            Ok(storage) => Self(storage),
            Err(err) => {
                log::warn!("localStorage unavailable: {err:?}");
                Self(None)
            }
        }
    }
}

impl Store for WebStore {
    fn get(&self, key: &str) -> Option<String> {
        let storage = self.0.as_ref()?;
        match storage.get_item(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("localStorage read failed: {err:?}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), EnhanceError> {
        let Some(storage) = &self.0 else {
            return Err(EnhanceError::Storage("localStorage unavailable".to_owned()));
        };
        storage
            .set_item(key, value)
            .map_err(|err| EnhanceError::from_js(EnhanceError::Storage, &err))
    }
}

// =============================================================
// Viewport
// =============================================================

#[derive(Clone, Debug, Default)]
pub struct WebViewport;

fn to_intersection(value: JsValue) -> Option<Intersection<WebElement>> {
    let Ok(entry) = value.dyn_into::<IntersectionObserverEntry>() else {
        return None;
    };
    Some(Intersection {
        target: WebElement(entry.target()),
        is_intersecting: entry.is_intersecting(),
        ratio: entry.intersection_ratio(),
    })
}

impl Viewport for WebViewport {
    type Element = WebElement;

    fn watch(
        &self,
        threshold: f64,
        targets: &[WebElement],
        mut on_change: ChangeHandler<WebElement>,
    ) -> Result<(), EnhanceError> {
        let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
            let batch: Vec<Intersection<WebElement>> = entries.iter().filter_map(to_intersection).collect();
            for target in on_change(batch.as_slice()) {
                observer.unobserve(&target.0);
            }
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            .map_err(|err| EnhanceError::from_js(EnhanceError::Observer, &err))?;
        for target in targets {
            observer.observe(&target.0);
        }
        callback.forget();
        Ok(())
    }
}

// =============================================================
// Clipboard
// =============================================================

#[derive(Clone, Debug)]
pub struct WebClipboard(web_sys::Navigator);

impl WebClipboard {
    /// `navigator.clipboard` is undefined outside secure contexts, so look it
    /// up per write instead of assuming it exists.
    fn clipboard(&self) -> Result<web_sys::Clipboard, EnhanceError> {
        let value = Reflect::get(&self.0, &JsValue::from_str("clipboard"))
            .map_err(|err| EnhanceError::from_js(EnhanceError::Clipboard, &err))?;
        if value.is_undefined() || value.is_null() {
            return Err(EnhanceError::Clipboard("navigator.clipboard is unavailable".to_owned()));
        }
        value
            .dyn_into::<web_sys::Clipboard>()
            .map_err(|value| EnhanceError::from_js(EnhanceError::Clipboard, &value))
    }
}

impl Clipboard for WebClipboard {
    fn write_text(&self, text: String) -> impl Future<Output = Result<(), EnhanceError>> {
        let promise = self.clipboard().map(|clipboard| clipboard.write_text(&text));
        async move {
            JsFuture::from(promise?)
                .await
                .map(drop)
                .map_err(|err| EnhanceError::from_js(EnhanceError::Clipboard, &err))
        }
    }
}

// =============================================================
// Scheduler
// =============================================================

#[derive(Clone, Debug, Default)]
pub struct WebScheduler;

/// Browser timeout id. Unlike a live `Timeout`, dropping it never touches the
/// callback, so the revert task may drop its own handle.
#[derive(Debug)]
pub struct TimeoutId(JsValue);

impl Scheduler for WebScheduler {
    type Handle = TimeoutId;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimeoutId {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        TimeoutId(Timeout::new(millis, task).forget())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cancel(&self, handle: TimeoutId) {
        let (Some(window), Some(id)) = (web_sys::window(), handle.0.as_f64()) else {
            return;
        };
        window.clear_timeout_with_handle(id as i32);
    }

    fn spawn(&self, task: LocalTask) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

// =============================================================
// Entry points
// =============================================================

type BrowserEnhancer = Enhancer<WebDocument, WebStore, WebClipboard, WebScheduler, WebViewport>;

fn browser_enhancer() -> Result<BrowserEnhancer, EnhanceError> {
    let window = web_sys::window().ok_or(EnhanceError::NoWindow)?;
    let document = WebDocument(window.document().ok_or(EnhanceError::NoDocument)?);
    let config = EnhanceConfig::discover(&document);
    Ok(Enhancer {
        store: WebStore::local(&window),
        clipboard: WebClipboard(window.navigator()),
        scheduler: WebScheduler,
        viewport: WebViewport,
        document,
        config,
    })
}

fn run() -> Result<Wiring, EnhanceError> {
    Ok(browser_enhancer()?.enhance())
}

/// Run `enhance` now if the document is parsed, otherwise on `DOMContentLoaded`.
fn when_parsed() -> Result<(), EnhanceError> {
    let document = web_sys::window()
        .ok_or(EnhanceError::NoWindow)?
        .document()
        .ok_or(EnhanceError::NoDocument)?;

    if document.ready_state() != "loading" {
        run()?;
        return Ok(());
    }

    let on_ready = Closure::once_into_js(move || {
        if let Err(err) = run() {
            log::error!("page enhancement failed: {err}");
        }
    });
    document
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
        .map_err(|err| EnhanceError::from_js(EnhanceError::Listener, &err))
}

/// wasm start hook: install logging, then enhance the page once it is parsed.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("console logger not installed: {err}")));
    }
    if let Err(err) = when_parsed() {
        log::error!("page enhancement failed: {err}");
    }
}
