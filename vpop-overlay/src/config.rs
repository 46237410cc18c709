//! Configuration for the overlay engine
//!
//! The content script historically shipped as several near-identical
//! variants (word-anchored, stacked top-right, permanent single popup).
//! Each difference between them is a setting here rather than a code path
//! picked at compile time.
//!
//! # Settings Sources Priority
//!
//! 1. Command-line arguments
//! 2. `VPOP_CONFIG` environment variable (config file path)
//! 3. Per-user TOML configuration file
//! 4. Built-in defaults (code constants)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use vpop_common::config::{load_toml_or_default, LoggingConfig};

/// Where a new popup is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PositionMode {
    /// Below-left of the current text selection
    Anchored,
    /// Fixed corner, stacked vertically
    #[default]
    StackedCorner,
    /// One popup only; each new word replaces it
    SinglePermanent,
}

impl std::fmt::Display for PositionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionMode::Anchored => write!(f, "anchored"),
            PositionMode::StackedCorner => write!(f, "stacked-corner"),
            PositionMode::SinglePermanent => write!(f, "single-permanent"),
        }
    }
}

impl std::str::FromStr for PositionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "anchored" | "word" => Ok(PositionMode::Anchored),
            "stacked-corner" | "top-right" => Ok(PositionMode::StackedCorner),
            "single-permanent" | "permanent" => Ok(PositionMode::SinglePermanent),
            other => Err(Error::Config(format!("Unknown position mode '{}'", other))),
        }
    }
}

/// How the playback queue treats a new entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum QueuePolicy {
    /// Append unless the same word is already waiting
    #[default]
    AppendDedup,
    /// Drop everything waiting and keep only the newest entry
    ReplaceSingle,
}

/// How many popups may play at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Concurrency {
    /// One playback slot gated by the playing flag
    #[default]
    SingleSlot,
    /// Every dequeued entry is shown (bounded by `max_visible`)
    Multi,
}

/// Popup lifecycle and layout settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PopupConfig {
    pub position: PositionMode,
    pub queue_policy: QueuePolicy,
    pub concurrency: Concurrency,

    /// Keep the popup on screen after its media ends
    pub persistent: bool,

    /// Free the playback slot when a persistent popup's media ends, so the
    /// next queued word plays without an explicit close
    pub release_slot_on_persistent_end: bool,

    /// Total plays of a non-persistent popup before it closes
    pub replay_count: u32,

    /// Lifetime of a non-persistent popup
    pub lifetime_ms: u64,

    /// Vertical distance between stacked popups
    pub stack_spacing_px: u32,

    /// Distance of the stack from the top and right viewport edges
    pub corner_inset_px: u32,

    /// Gap between the selection's bottom edge and an anchored popup
    pub selection_offset_px: u32,

    /// Right margin applied to the host page while stacked popups show
    pub page_shift_px: u32,

    /// Upper bound on simultaneously visible popups in multi mode
    pub max_visible: Option<usize>,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            position: PositionMode::StackedCorner,
            queue_policy: QueuePolicy::AppendDedup,
            concurrency: Concurrency::SingleSlot,
            persistent: true,
            release_slot_on_persistent_end: true,
            replay_count: 1,
            lifetime_ms: 10_000,
            stack_spacing_px: 290,
            corner_inset_px: 10,
            selection_offset_px: 20,
            page_shift_px: 320,
            max_visible: None,
        }
    }
}

/// Upper bound for pixel settings; keeps stacked offsets inside CSS range
pub const MAX_PIXELS: u32 = 10_000;

impl PopupConfig {
    /// Reject values that would make the lifecycle degenerate
    pub fn validate(&self) -> Result<()> {
        if self.replay_count == 0 {
            return Err(Error::Config("replay_count must be at least 1".to_string()));
        }
        if self.lifetime_ms == 0 {
            return Err(Error::Config("lifetime_ms must be positive".to_string()));
        }
        if self.stack_spacing_px == 0 {
            return Err(Error::Config("stack_spacing_px must be positive".to_string()));
        }
        for (name, px) in [
            ("stack_spacing_px", self.stack_spacing_px),
            ("corner_inset_px", self.corner_inset_px),
            ("selection_offset_px", self.selection_offset_px),
            ("page_shift_px", self.page_shift_px),
        ] {
            if px > MAX_PIXELS {
                return Err(Error::Config(format!(
                    "{} must be at most {} (got {})",
                    name, MAX_PIXELS, px
                )));
            }
        }
        if self.max_visible == Some(0) {
            return Err(Error::Config("max_visible must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Popup lifetime as a Duration
    pub fn lifetime(&self) -> Duration {
        Duration::from_millis(self.lifetime_ms)
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    /// JSON object mapping words to media paths
    pub mapping_path: PathBuf,

    /// Base against which relative media paths are resolved
    pub asset_root: String,

    pub popup: PopupConfig,

    pub logging: LoggingConfig,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            mapping_path: PathBuf::from("mediaMapping.json"),
            asset_root: ".".to_string(),
            popup: PopupConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl OverlayConfig {
    /// Load from an optional file path, falling back to defaults, then validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: OverlayConfig = load_toml_or_default(path)?;
        config.popup.validate()?;
        Ok(config)
    }
}
