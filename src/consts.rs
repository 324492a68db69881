//! Default ids, selectors, class names and tunables for the portfolio page.
//!
//! [`crate::config::EnhanceConfig::default`] is built from these values; the
//! page can override any of them through the `#folio-config` element.

// ── Navigation menu ─────────────────────────────────────────────

pub const NAV_MENU_ID: &str = "nav-menu";
pub const NAV_TOGGLE_ID: &str = "nav-toggle";
pub const NAV_CLOSE_ID: &str = "nav-close";
pub const NAV_LINK_SELECTOR: &str = ".nav__link";

/// Class that makes the navigation panel visible.
pub const SHOW_MENU_CLASS: &str = "show-menu";

// ── Scroll reveal ───────────────────────────────────────────────

pub const REVEAL_SELECTOR: &str = "section, .experience__item, .work__card, .testimonial__card, .skill__item";

/// Base class carrying the off-screen style; applied to every target at setup.
pub const REVEAL_CLASS: &str = "reveal";
pub const VISIBLE_CLASS: &str = "visible";

/// Visible-area fraction for the repeating show/hide watcher.
pub const TOGGLE_REVEAL_THRESHOLD: f64 = 0.15;

/// Visible-area fraction for the reveal-once watcher.
pub const ONCE_REVEAL_THRESHOLD: f64 = 0.1;

// ── Theme ───────────────────────────────────────────────────────

pub const THEME_TOGGLE_ID: &str = "theme-toggle";
pub const THEME_ATTRIBUTE: &str = "data-theme";
pub const THEME_STORAGE_KEY: &str = "theme";
pub const MOON_ICON_CLASS: &str = "bx-moon";
pub const SUN_ICON_CLASS: &str = "bx-sun";

// ── Copy to clipboard ───────────────────────────────────────────

pub const COPY_BUTTON_SELECTOR: &str = ".copy-btn";

/// `data-*` key on a copy control naming the id of the element to copy.
pub const COPY_SOURCE_DATA_KEY: &str = "copy";

pub const COPY_SUCCESS_MARKUP: &str = "<i class='bx bx-check' style='color: #10B981;'></i>";

/// How long the success checkmark stays before the original markup returns.
pub const COPY_FEEDBACK_MS: u64 = 1500;

// ── Bootstrap ───────────────────────────────────────────────────

/// Id of the optional `<script type="application/json">` holding config overrides.
pub const CONFIG_ELEMENT_ID: &str = "folio-config";

/// Root attribute marking a document whose behaviors are already attached.
pub const ENHANCED_ATTRIBUTE: &str = "data-folio-enhanced";
