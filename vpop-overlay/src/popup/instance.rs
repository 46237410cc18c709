//! Popup instance record

use super::drag::DragController;
use crate::config::PositionMode;
use crate::host::{PopupView, Position, POPUP_HEIGHT_PX, POPUP_WIDTH_PX};
use crate::lookup::MediaRef;
use tokio::time::Instant;
use uuid::Uuid;

/// Popup identifier. Never reused, so a stale timer or event for a closed
/// popup can never hit a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PopupId(Uuid);

impl PopupId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for PopupId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for PopupId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PopupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One visible popup
#[derive(Debug)]
pub struct PopupInstance {
    pub id: PopupId,
    pub word: String,
    pub media_ref: MediaRef,
    pub position_mode: PositionMode,

    /// Stacking offset (stacked-corner mode only, 0 otherwise)
    pub top_offset: u32,

    /// Completed plays of the media
    pub play_count: u32,

    pub is_persistent: bool,

    /// Auto-close time for non-persistent popups
    pub expiry_deadline: Option<Instant>,

    /// Layout-assigned position before drag translation
    pub(crate) base_position: Position,

    pub(crate) drag: DragController,
}

impl PopupInstance {
    /// Effective on-screen position (layout position plus drag offset)
    pub fn position(&self) -> Position {
        let (dx, dy) = self.drag.offset();
        self.base_position.translated(dx, dy)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expiry_deadline.is_some_and(|deadline| deadline <= now)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Render description handed to the page
    pub fn view(&self) -> PopupView {
        PopupView {
            id: self.id,
            label: format!("Word: {}", self.word),
            media_ref: self.media_ref.clone(),
            position: self.position(),
            width_px: POPUP_WIDTH_PX,
            height_px: POPUP_HEIGHT_PX,
            autoplay: true,
            controls: true,
        }
    }
}
