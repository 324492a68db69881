//! Copy-to-clipboard controls with transient success feedback.
//!
//! Each `.copy-btn` names the id of the element whose text it copies through
//! `data-copy`. After a successful write the control shows a checkmark and
//! reverts after a delay.
//!
//! CONCURRENCY
//! ===========
//! The revert is a cancellable task owned by the control. A second success
//! inside the feedback window cancels the pending revert, keeps the markup
//! captured the first time, and schedules a fresh one, so the control never
//! "reverts" to the checkmark.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::CopyConfig;
use crate::dom::{Clipboard, Document, Element, Scheduler};
use crate::error::EnhanceError;

#[cfg(test)]
#[path = "copy_test.rs"]
mod copy_test;

/// Revert waiting to restore a control's markup.
struct PendingRevert<H> {
    original: String,
    handle: H,
}

type PendingSlot<H> = Rc<RefCell<Option<PendingRevert<H>>>>;

/// One copy control and everything it needs to react to a click.
pub struct CopyControl<D: Document, C, T: Scheduler> {
    button: D::Element,
    document: D,
    clipboard: C,
    scheduler: T,
    config: Rc<CopyConfig>,
    pending: PendingSlot<T::Handle>,
}

impl<D: Document, C: Clone, T: Scheduler> Clone for CopyControl<D, C, T> {
    fn clone(&self) -> Self {
        Self {
            button: self.button.clone(),
            document: self.document.clone(),
            clipboard: self.clipboard.clone(),
            scheduler: self.scheduler.clone(),
            config: Rc::clone(&self.config),
            pending: Rc::clone(&self.pending),
        }
    }
}

impl<D: Document, C: Clipboard, T: Scheduler> CopyControl<D, C, T> {
    pub fn new(button: D::Element, document: D, clipboard: C, scheduler: T, config: Rc<CopyConfig>) -> Self {
        Self { button, document, clipboard, scheduler, config, pending: Rc::new(RefCell::new(None)) }
    }

    /// Text this control would copy right now, `None` when the reference is
    /// missing or points at nothing.
    pub fn source_text(&self) -> Option<String> {
        let id = self.button.data(&self.config.source_data_key)?;
        let source = self.document.element_by_id(&id)?;
        Some(source.inner_text())
    }

    pub fn has_pending_revert(&self) -> bool {
        self.pending.borrow().is_some()
    }

    /// Click handler: start the clipboard write on the event loop.
    pub fn activate(&self) {
        let Some(text) = self.source_text() else {
            log::debug!("copy control has no source element; ignoring click");
            return;
        };
        let control = self.clone();
        self.scheduler.spawn(Box::pin(async move {
            if let Err(err) = control.copy(text).await {
                log::error!("failed to copy text: {err}");
            }
        }));
    }

    /// Write `text` and show feedback on success.
    pub async fn copy(&self, text: String) -> Result<(), EnhanceError> {
        self.clipboard.write_text(text).await?;
        self.show_success();
        Ok(())
    }

    fn show_success(&self) {
        let previous = self.pending.borrow_mut().take();
        let original = match previous {
            Some(PendingRevert { original, handle }) => {
                self.scheduler.cancel(handle);
                original
            }
            None => self.button.inner_html(),
        };
        self.button.set_inner_html(&self.config.success_markup);

        let button = self.button.clone();
        let slot = Rc::clone(&self.pending);
        let restore = original.clone();
        let handle = self.scheduler.schedule(
            self.config.feedback(),
            Box::new(move || {
                slot.borrow_mut().take();
                button.set_inner_html(&restore);
            }),
        );
        *self.pending.borrow_mut() = Some(PendingRevert { original, handle });
    }
}

/// Attach a click handler to every copy control. Returns how many were wired.
pub fn wire<D: Document, C: Clipboard, T: Scheduler>(
    document: &D,
    clipboard: &C,
    scheduler: &T,
    config: &CopyConfig,
) -> Result<usize, EnhanceError> {
    let config = Rc::new(config.clone());
    let buttons = document.query_all(&config.button_selector);
    for button in &buttons {
        let control =
            CopyControl::new(button.clone(), document.clone(), clipboard.clone(), scheduler.clone(), Rc::clone(&config));
        button.on_click(Box::new(move || control.activate()))?;
    }
    Ok(buttons.len())
}
