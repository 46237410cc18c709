//! # VPOP Overlay Library (vpop-overlay)
//!
//! Word-to-video pop-up overlay engine for a page content script.
//!
//! **Purpose:** Turn a text selection into a floating, draggable video popup:
//! resolve the word through a media mapping, queue it, display it, and
//! expire, close, or keep it according to configuration.
//!
//! **Architecture:** a single-owner `PopupManager` state machine driven by
//! `OverlayRuntime`, an event loop over page events and expiry deadlines.
//! The page itself sits behind the `PageHost` trait.

pub mod config;
pub mod error;
pub mod host;
pub mod lookup;
pub mod playback;
pub mod popup;
pub mod runtime;
pub mod selection;

pub use config::{OverlayConfig, PopupConfig};
pub use error::{Error, Result};
pub use popup::{PopupId, PopupManager};
pub use runtime::{OverlayRuntime, PageEvent, PageEvents};
