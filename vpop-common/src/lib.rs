//! # VPOP Common Library
//!
//! Shared code for the video pop-up overlay crates:
//! - Error type
//! - Configuration file discovery and logging configuration
//! - Event types (OverlayEvent enum) and the EventBus
//! - Time helpers

pub mod config;
pub mod error;
pub mod events;
pub mod time;

pub use error::{Error, Result};
pub use events::{EventBus, OverlayEvent};
