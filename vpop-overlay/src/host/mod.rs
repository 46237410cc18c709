//! Host page surface
//!
//! Everything the overlay does to the page goes through `PageHost`: reading
//! the selection geometry, mounting and moving popup elements, driving
//! their media element, and toggling the page margin.

mod headless;

pub use headless::{HeadlessPage, MediaState, MountedPopup};

use crate::lookup::MediaRef;
use crate::popup::PopupId;

/// Rendered popup width in pixels
pub const POPUP_WIDTH_PX: u32 = 320;

/// Rendered popup height in pixels
pub const POPUP_HEIGHT_PX: u32 = 270;

/// Pointer location in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Bounding box of the current text selection plus page scroll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub scroll_x: i32,
    pub scroll_y: i32,
}

/// Popup placement in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Offset from the page's top-left corner
    Absolute { top: i32, left: i32 },
    /// Offset from the viewport's top-right corner
    Corner { top: i32, right: i32 },
}

impl Position {
    /// Shift by a pointer delta
    pub fn translated(self, dx: i32, dy: i32) -> Self {
        match self {
            Position::Absolute { top, left } => Position::Absolute {
                top: top + dy,
                left: left + dx,
            },
            Position::Corner { top, right } => Position::Corner {
                top: top + dy,
                right: right - dx,
            },
        }
    }

    pub fn top(&self) -> i32 {
        match self {
            Position::Absolute { top, .. } | Position::Corner { top, .. } => *top,
        }
    }
}

/// What the page renders for one popup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupView {
    pub id: PopupId,
    /// Label text above the video
    pub label: String,
    pub media_ref: MediaRef,
    pub position: Position,
    pub width_px: u32,
    pub height_px: u32,
    pub autoplay: bool,
    pub controls: bool,
}

/// Page operations the overlay depends on
///
/// Implementations must tear down every listener they attached for a popup
/// in `unmount`.
pub trait PageHost {
    /// Geometry of the current selection, if any
    fn selection_bounds(&self) -> Option<SelectionBounds>;

    /// Insert the popup element and start its media
    fn mount(&mut self, view: &PopupView);

    /// Remove the popup element and its listeners
    fn unmount(&mut self, id: PopupId);

    fn move_to(&mut self, id: PopupId, position: Position);

    /// Seek to start and play again
    fn restart_media(&mut self, id: PopupId);

    fn stop_media(&mut self, id: PopupId);

    /// Apply (`Some`) or remove (`None`) the page's right margin
    fn set_page_shift(&mut self, margin_px: Option<u32>);
}
