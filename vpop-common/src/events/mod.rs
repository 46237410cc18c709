//! Event types for the overlay event system
//!
//! Every popup lifecycle transition is published on the EventBus as an
//! `OverlayEvent`. Subscribers are optional; the engine never blocks on them.

mod popup_types;

pub use popup_types::{CloseReason, DropReason};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Overlay event types
///
/// Serializable so a page binding can forward them to a devtools panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OverlayEvent {
    /// A resolved word was accepted into the playback queue
    EntryQueued {
        word: String,
        media_ref: String,
        /// Queue length after insertion
        queue_len: usize,
        /// Older entries discarded by the replace-single policy
        replaced: usize,
        timestamp: DateTime<Utc>,
    },

    /// A selection produced no queue entry
    SelectionDropped {
        word: String,
        reason: DropReason,
        timestamp: DateTime<Utc>,
    },

    /// A popup was mounted on the page
    PopupShown {
        popup_id: Uuid,
        word: String,
        media_ref: String,
        /// Stacking offset in pixels (0 outside stacked-corner mode)
        top_offset: u32,
        timestamp: DateTime<Utc>,
    },

    /// A popup's media reached its end
    PlaybackEnded {
        popup_id: Uuid,
        play_count: u32,
        /// True when the media was restarted instead of finishing
        replaying: bool,
        timestamp: DateTime<Utc>,
    },

    /// A popup was unmounted
    PopupClosed {
        popup_id: Uuid,
        word: String,
        reason: CloseReason,
        timestamp: DateTime<Utc>,
    },

    /// The single playback slot became free
    SlotReleased {
        popup_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// Stacked popups were repositioned after a close
    LayoutReflowed {
        /// Offsets in display order
        offsets: Vec<u32>,
        timestamp: DateTime<Utc>,
    },

    /// Host page margin toggled
    PageShiftChanged {
        margin_px: Option<u32>,
        timestamp: DateTime<Utc>,
    },
}

impl OverlayEvent {
    /// Short name for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            OverlayEvent::EntryQueued { .. } => "EntryQueued",
            OverlayEvent::SelectionDropped { .. } => "SelectionDropped",
            OverlayEvent::PopupShown { .. } => "PopupShown",
            OverlayEvent::PlaybackEnded { .. } => "PlaybackEnded",
            OverlayEvent::PopupClosed { .. } => "PopupClosed",
            OverlayEvent::SlotReleased { .. } => "SlotReleased",
            OverlayEvent::LayoutReflowed { .. } => "LayoutReflowed",
            OverlayEvent::PageShiftChanged { .. } => "PageShiftChanged",
        }
    }
}

/// One-to-many event broadcaster
///
/// Thin wrapper over `tokio::sync::broadcast`. Slow subscribers lose the
/// oldest events once `capacity` is exceeded.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<OverlayEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Examples
    ///
    /// ```
    /// use vpop_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(64);
    /// assert_eq!(event_bus.capacity(), 64);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<OverlayEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: OverlayEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
