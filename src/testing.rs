//! In-memory fakes for every port in [`crate::dom`], used by the unit tests.
//!
//! The fakes keep just enough browser behavior to exercise the page logic:
//! a flat element list with simple selector matching, watchers that deliver
//! batches on demand, a manual clock and a local executor.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::{Future, ready};
use std::rc::Rc;
use std::time::Duration;

use futures::executor::{LocalPool, LocalSpawner};
use futures::task::LocalSpawnExt;

use crate::dom::{ChangeHandler, ClickHandler, Clipboard, Document, Element, Intersection, LocalTask, Scheduler, Store, Viewport};
use crate::error::EnhanceError;

// =============================================================
// Elements
// =============================================================

#[derive(Default)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    data: HashMap<String, String>,
    html: String,
    text: String,
    handlers: Vec<ClickHandler>,
}

#[derive(Clone, Default)]
pub struct FakeElement(Rc<RefCell<Node>>);

impl FakeElement {
    pub fn new(tag: &str) -> Self {
        let node = Node { tag: tag.to_owned(), ..Node::default() };
        Self(Rc::new(RefCell::new(node)))
    }

    pub fn with_id(self, id: &str) -> Self {
        self.0.borrow_mut().id = Some(id.to_owned());
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_data(self, key: &str, value: &str) -> Self {
        self.0.borrow_mut().data.insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn with_html(self, markup: &str) -> Self {
        self.set_inner_html(markup);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.0.borrow_mut().text = text.to_owned();
        self
    }

    pub fn classes(&self) -> Vec<String> {
        self.0.borrow().classes.clone()
    }

    pub fn handler_count(&self) -> usize {
        self.0.borrow().handlers.len()
    }

    /// Dispatch a click to every registered handler.
    pub fn click(&self) {
        let mut handlers = std::mem::take(&mut self.0.borrow_mut().handlers);
        for handler in &mut handlers {
            handler();
        }
        let mut node = self.0.borrow_mut();
        handlers.append(&mut node.handlers);
        node.handlers = handlers;
    }

    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn matches(&self, selector: &str) -> bool {
        let node = self.0.borrow();
        if let Some(id) = selector.strip_prefix('#') {
            node.id.as_deref() == Some(id)
        } else if let Some(class) = selector.strip_prefix('.') {
            node.classes.iter().any(|c| c == class)
        } else {
            node.tag == selector
        }
    }
}

impl std::fmt::Debug for FakeElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = self.0.borrow();
        f.debug_struct("FakeElement")
            .field("tag", &node.tag)
            .field("id", &node.id)
            .field("classes", &node.classes)
            .finish_non_exhaustive()
    }
}

impl Element for FakeElement {
    fn add_class(&self, class: &str) {
        let mut node = self.0.borrow_mut();
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_owned());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|c| c != class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    fn replace_class(&self, from: &str, to: &str) -> bool {
        let mut node = self.0.borrow_mut();
        let Some(pos) = node.classes.iter().position(|c| c == from) else {
            return false;
        };
        if node.classes.iter().any(|c| c == to) {
            node.classes.remove(pos);
        } else {
            node.classes[pos] = to.to_owned();
        }
        true
    }

    fn data(&self, key: &str) -> Option<String> {
        self.0.borrow().data.get(key).cloned()
    }

    fn inner_html(&self) -> String {
        self.0.borrow().html.clone()
    }

    fn set_inner_html(&self, markup: &str) {
        markup.clone_into(&mut self.0.borrow_mut().html);
    }

    fn inner_text(&self) -> String {
        self.0.borrow().text.clone()
    }

    fn on_click(&self, handler: ClickHandler) -> Result<(), EnhanceError> {
        self.0.borrow_mut().handlers.push(handler);
        Ok(())
    }
}

// =============================================================
// Document
// =============================================================

#[derive(Default)]
struct Page {
    root: HashMap<String, String>,
    elements: Vec<FakeElement>,
}

#[derive(Clone, Default)]
pub struct FakeDocument(Rc<RefCell<Page>>);

impl FakeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `element` to the page and return a handle to it.
    pub fn insert(&self, element: FakeElement) -> FakeElement {
        self.0.borrow_mut().elements.push(element.clone());
        element
    }
}

impl Document for FakeDocument {
    type Element = FakeElement;

    fn element_by_id(&self, id: &str) -> Option<FakeElement> {
        self.0
            .borrow()
            .elements
            .iter()
            .find(|el| el.0.borrow().id.as_deref() == Some(id))
            .cloned()
    }

    fn query_all(&self, selector: &str) -> Vec<FakeElement> {
        let parts: Vec<&str> = selector.split(',').map(str::trim).collect();
        self.0
            .borrow()
            .elements
            .iter()
            .filter(|el| parts.iter().any(|part| el.matches(part)))
            .cloned()
            .collect()
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().root.get(name).cloned()
    }

    fn set_root_attribute(&self, name: &str, value: &str) {
        self.0.borrow_mut().root.insert(name.to_owned(), value.to_owned());
    }
}

// =============================================================
// Store
// =============================================================

#[derive(Default)]
struct Entries {
    values: HashMap<String, String>,
    writes: usize,
    read_only: bool,
}

#[derive(Clone, Default)]
pub struct FakeStore(Rc<RefCell<Entries>>);

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.0.borrow_mut().values.insert(key.to_owned(), value.to_owned());
        store
    }

    /// Make every subsequent write fail, like a full or disabled localStorage.
    pub fn make_read_only(&self) {
        self.0.borrow_mut().read_only = true;
    }

    pub fn writes(&self) -> usize {
        self.0.borrow().writes
    }
}

impl Store for FakeStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.borrow().values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), EnhanceError> {
        let mut entries = self.0.borrow_mut();
        if entries.read_only {
            return Err(EnhanceError::Storage("QuotaExceededError".to_owned()));
        }
        entries.writes += 1;
        entries.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

// =============================================================
// Viewport
// =============================================================

struct Watcher {
    threshold: f64,
    /// Tracked targets with the ratio last seen for each.
    targets: Vec<(FakeElement, f64)>,
    handler: Option<ChangeHandler<FakeElement>>,
    deliveries: usize,
}

impl Watcher {
    /// Browsers queue an entry only when the target starts or stops
    /// intersecting, or when its ratio crosses the threshold.
    fn crosses(&self, from: f64, to: f64) -> bool {
        (from > 0.0) != (to > 0.0) || (from >= self.threshold) != (to >= self.threshold)
    }
}

#[derive(Default)]
struct Watchers {
    list: Vec<Watcher>,
    refuse: bool,
}

#[derive(Clone, Default)]
pub struct FakeViewport(Rc<RefCell<Watchers>>);

impl FakeViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `watch` call fail.
    pub fn refuse_watchers(&self) {
        self.0.borrow_mut().refuse = true;
    }

    pub fn watcher_count(&self) -> usize {
        self.0.borrow().list.len()
    }

    pub fn threshold(&self, watcher: usize) -> Option<f64> {
        self.0.borrow().list.get(watcher).map(|w| w.threshold)
    }

    /// Notifications delivered to `watcher` so far.
    pub fn deliveries(&self, watcher: usize) -> usize {
        self.0.borrow().list.get(watcher).map_or(0, |w| w.deliveries)
    }

    pub fn is_tracking(&self, watcher: usize, target: &FakeElement) -> bool {
        self.0
            .borrow()
            .list
            .get(watcher)
            .is_some_and(|w| w.targets.iter().any(|(t, _)| t.same(target)))
    }

    /// Move `target` so `ratio` of it is on screen and notify every watcher
    /// still tracking it for which the move is a crossing. Targets start
    /// fully off screen.
    pub fn scroll(&self, target: &FakeElement, ratio: f64) {
        let count = self.watcher_count();
        for index in 0..count {
            self.deliver(index, target, ratio);
        }
    }

    fn deliver(&self, index: usize, target: &FakeElement, ratio: f64) {
        let handler = {
            let mut watchers = self.0.borrow_mut();
            let Some(watcher) = watchers.list.get_mut(index) else {
                return;
            };
            let Some(pos) = watcher.targets.iter().position(|(t, _)| t.same(target)) else {
                return;
            };
            let from = watcher.targets[pos].1;
            watcher.targets[pos].1 = ratio;
            if !watcher.crosses(from, ratio) {
                return;
            }
            watcher.deliveries += 1;
            watcher.handler.take()
        };
        let Some(mut handler) = handler else {
            return;
        };

        let batch = [Intersection { target: target.clone(), is_intersecting: ratio > 0.0, ratio }];
        let released = handler(batch.as_slice());

        let mut watchers = self.0.borrow_mut();
        if let Some(watcher) = watchers.list.get_mut(index) {
            watcher.targets.retain(|(t, _)| !released.iter().any(|r| r.same(t)));
            watcher.handler = Some(handler);
        }
    }
}

impl Viewport for FakeViewport {
    type Element = FakeElement;

    fn watch(
        &self,
        threshold: f64,
        targets: &[FakeElement],
        on_change: ChangeHandler<FakeElement>,
    ) -> Result<(), EnhanceError> {
        let mut watchers = self.0.borrow_mut();
        if watchers.refuse {
            return Err(EnhanceError::Observer("IntersectionObserver is not defined".to_owned()));
        }
        let targets = targets.iter().map(|t| (t.clone(), 0.0)).collect();
        watchers.list.push(Watcher { threshold, targets, handler: Some(on_change), deliveries: 0 });
        Ok(())
    }
}

// =============================================================
// Clipboard
// =============================================================

#[derive(Default)]
struct ClipboardState {
    writes: Vec<String>,
    denial: Option<String>,
}

#[derive(Clone, Default)]
pub struct FakeClipboard(Rc<RefCell<ClipboardState>>);

impl FakeClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every subsequent write with `reason`.
    pub fn deny(&self, reason: &str) {
        self.0.borrow_mut().denial = Some(reason.to_owned());
    }

    pub fn writes(&self) -> Vec<String> {
        self.0.borrow().writes.clone()
    }
}

impl Clipboard for FakeClipboard {
    fn write_text(&self, text: String) -> impl Future<Output = Result<(), EnhanceError>> {
        let mut state = self.0.borrow_mut();
        state.writes.push(text);
        let result = match &state.denial {
            Some(reason) => Err(EnhanceError::Clipboard(reason.clone())),
            None => Ok(()),
        };
        ready(result)
    }
}

// =============================================================
// Scheduler
// =============================================================

struct Timer {
    id: u64,
    due_ms: u64,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct Clock {
    now_ms: u64,
    next_id: u64,
    timers: Vec<Timer>,
}

/// Manual clock plus a single-threaded executor.
#[derive(Clone)]
pub struct FakeScheduler {
    clock: Rc<RefCell<Clock>>,
    pool: Rc<RefCell<LocalPool>>,
    spawner: LocalSpawner,
}

impl FakeScheduler {
    pub fn new() -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self { clock: Rc::new(RefCell::new(Clock::default())), pool: Rc::new(RefCell::new(pool)), spawner }
    }

    /// Poll spawned tasks until none can make progress.
    pub fn run_until_stalled(&self) {
        self.pool.borrow_mut().run_until_stalled();
    }

    pub fn pending_timers(&self) -> usize {
        self.clock.borrow().timers.len()
    }

    /// Move the clock forward, running timers as they come due.
    pub fn advance(&self, by: Duration) {
        let target = {
            let clock = self.clock.borrow();
            clock.now_ms + u64::try_from(by.as_millis()).unwrap_or(u64::MAX)
        };
        loop {
            let due = {
                let mut clock = self.clock.borrow_mut();
                let next = clock
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due_ms <= target)
                    .min_by_key(|(_, t)| (t.due_ms, t.id))
                    .map(|(index, _)| index);
                next.map(|index| {
                    let timer = clock.timers.remove(index);
                    clock.now_ms = timer.due_ms;
                    timer.task
                })
            };
            match due {
                Some(task) => task(),
                None => break,
            }
        }
        self.clock.borrow_mut().now_ms = target;
    }
}

impl Default for FakeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for FakeScheduler {
    type Handle = u64;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> u64 {
        let mut clock = self.clock.borrow_mut();
        clock.next_id += 1;
        let id = clock.next_id;
        let due_ms = clock.now_ms + u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        clock.timers.push(Timer { id, due_ms, task });
        id
    }

    fn cancel(&self, handle: u64) {
        self.clock.borrow_mut().timers.retain(|t| t.id != handle);
    }

    fn spawn(&self, task: LocalTask) {
        if let Err(err) = self.spawner.spawn_local(task) {
            log::error!("fake executor is gone: {err}");
        }
    }
}
