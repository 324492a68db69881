//! Client-side enhancements for a static portfolio page.
//!
//! This crate is compiled to WebAssembly and loaded by the page. Once the
//! document is parsed it attaches behavior to the existing markup: a
//! collapsible navigation menu, scroll-triggered reveal animations, a
//! persisted light/dark theme toggle and copy-to-clipboard controls.
//!
//! All page logic is written against the ports in [`dom`], so it runs and is
//! tested natively. The `browser` feature adds the `web_sys` adapters and the
//! wasm start hook.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`enhance`] | Bootstrap that wires every behavior and reports what attached |
//! | [`menu`] | Navigation menu open/close |
//! | [`reveal`] | Toggling and one-shot reveal watchers |
//! | [`theme`] | Theme restore, apply and toggle |
//! | [`copy`] | Copy controls with cancellable success feedback |
//! | [`dom`] | Port traits for the document, storage, viewport, clipboard and timers |
//! | [`config`] | Page configuration with JSON overrides |
//! | [`consts`] | Default ids, selectors, classes and tunables |
//! | [`error`] | Shared error type |

pub mod config;
pub mod consts;
pub mod copy;
pub mod dom;
pub mod enhance;
pub mod error;
pub mod menu;
pub mod reveal;
pub mod theme;

#[cfg(feature = "browser")]
pub mod web;

#[cfg(test)]
mod testing;

pub use config::EnhanceConfig;
pub use enhance::{Enhancer, Wiring};
pub use error::EnhanceError;
