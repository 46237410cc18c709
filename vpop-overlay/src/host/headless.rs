//! In-memory page used by the CLI harness and tests

use super::{PageHost, PopupView, Position, SelectionBounds};
use crate::popup::PopupId;
use tracing::{debug, trace};

/// Media element state of a mounted popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaState {
    Playing,
    Stopped,
}

/// A popup element currently in the headless page
#[derive(Debug, Clone)]
pub struct MountedPopup {
    pub view: PopupView,
    pub position: Position,
    pub media: MediaState,
    /// Times the media was started (mount + restarts)
    pub starts: u32,
}

/// Page that keeps its DOM as a list of mounted popups
#[derive(Debug, Default)]
pub struct HeadlessPage {
    mounted: Vec<MountedPopup>,
    selection: Option<SelectionBounds>,
    page_shift: Option<u32>,
    mounts_total: usize,
}

impl HeadlessPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the user selecting text at the given geometry
    pub fn set_selection(&mut self, bounds: Option<SelectionBounds>) {
        self.selection = bounds;
    }

    /// Mounted popups in document order
    pub fn mounted(&self) -> &[MountedPopup] {
        &self.mounted
    }

    pub fn popup(&self, id: PopupId) -> Option<&MountedPopup> {
        self.mounted.iter().find(|m| m.view.id == id)
    }

    pub fn position_of(&self, id: PopupId) -> Option<Position> {
        self.popup(id).map(|m| m.position)
    }

    pub fn page_shift(&self) -> Option<u32> {
        self.page_shift
    }

    /// Popups ever mounted
    pub fn mounts_total(&self) -> usize {
        self.mounts_total
    }

    fn popup_mut(&mut self, id: PopupId) -> Option<&mut MountedPopup> {
        self.mounted.iter_mut().find(|m| m.view.id == id)
    }
}

impl PageHost for HeadlessPage {
    fn selection_bounds(&self) -> Option<SelectionBounds> {
        self.selection
    }

    fn mount(&mut self, view: &PopupView) {
        debug!("mount {} '{}' at {:?}", view.id, view.label, view.position);
        self.mounts_total += 1;
        self.mounted.push(MountedPopup {
            view: view.clone(),
            position: view.position,
            media: if view.autoplay {
                MediaState::Playing
            } else {
                MediaState::Stopped
            },
            starts: u32::from(view.autoplay),
        });
    }

    fn unmount(&mut self, id: PopupId) {
        debug!("unmount {}", id);
        self.mounted.retain(|m| m.view.id != id);
    }

    fn move_to(&mut self, id: PopupId, position: Position) {
        trace!("move {} to {:?}", id, position);
        if let Some(popup) = self.popup_mut(id) {
            popup.position = position;
        }
    }

    fn restart_media(&mut self, id: PopupId) {
        if let Some(popup) = self.popup_mut(id) {
            popup.media = MediaState::Playing;
            popup.starts += 1;
        }
    }

    fn stop_media(&mut self, id: PopupId) {
        if let Some(popup) = self.popup_mut(id) {
            popup.media = MediaState::Stopped;
        }
    }

    fn set_page_shift(&mut self, margin_px: Option<u32>) {
        debug!("page shift {:?}", margin_px);
        self.page_shift = margin_px;
    }
}
