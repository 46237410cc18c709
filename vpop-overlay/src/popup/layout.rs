//! Popup registry and positioning
//!
//! The registry is the single source of truth for what is on screen. Stack
//! offsets are recomputed from its order on every change rather than patched
//! incrementally, so a removal can never leave a gap.

use super::instance::{PopupId, PopupInstance};
use crate::config::PositionMode;
use crate::host::{Position, SelectionBounds};

/// Vertical offset of the `index`-th stacked popup
///
/// Saturates instead of wrapping for absurd stacks.
pub fn stacked_offset(index: usize, spacing_px: u32) -> u32 {
    u32::try_from(index)
        .unwrap_or(u32::MAX)
        .saturating_mul(spacing_px)
}

/// Top-right corner placement for a stacking offset
pub fn corner_position(offset_px: u32, inset_px: u32) -> Position {
    Position::Corner {
        top: to_css_px(inset_px.saturating_add(offset_px)),
        right: to_css_px(inset_px),
    }
}

fn to_css_px(px: u32) -> i32 {
    i32::try_from(px).unwrap_or(i32::MAX)
}

/// Below-left of the selection, in page coordinates
pub fn anchored_position(bounds: SelectionBounds, gap_px: u32) -> Position {
    Position::Absolute {
        top: bounds
            .bottom
            .saturating_add(bounds.scroll_y)
            .saturating_add(to_css_px(gap_px)),
        left: bounds.left.saturating_add(bounds.scroll_x),
    }
}

/// Visible popups in display order plus the page-shift state
#[derive(Debug, Default)]
pub struct LayoutState {
    popups: Vec<PopupInstance>,
    page_shift: Option<u32>,
}

impl LayoutState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, popup: PopupInstance) {
        self.popups.push(popup);
    }

    pub fn remove(&mut self, id: PopupId) -> Option<PopupInstance> {
        let index = self.popups.iter().position(|p| p.id == id)?;
        Some(self.popups.remove(index))
    }

    pub fn get(&self, id: PopupId) -> Option<&PopupInstance> {
        self.popups.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PopupId) -> Option<&mut PopupInstance> {
        self.popups.iter_mut().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &PopupInstance> {
        self.popups.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PopupInstance> {
        self.popups.iter_mut()
    }

    pub fn ids(&self) -> Vec<PopupId> {
        self.popups.iter().map(|p| p.id).collect()
    }

    pub fn len(&self) -> usize {
        self.popups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.popups.is_empty()
    }

    /// Number of popups taking part in the corner stack
    pub fn stacked_count(&self) -> usize {
        self.stacked().count()
    }

    fn stacked(&self) -> impl Iterator<Item = &PopupInstance> {
        self.popups
            .iter()
            .filter(|p| p.position_mode == PositionMode::StackedCorner)
    }

    /// Reassign stack offsets from registry order.
    ///
    /// Returns the popups whose offset changed, with their new effective
    /// position, so the page can be updated.
    pub fn reflow(&mut self, spacing_px: u32, inset_px: u32) -> Vec<(PopupId, Position)> {
        let mut moved = Vec::new();
        let stacked = self
            .popups
            .iter_mut()
            .filter(|p| p.position_mode == PositionMode::StackedCorner);

        for (index, popup) in stacked.enumerate() {
            let offset = stacked_offset(index, spacing_px);
            if popup.top_offset != offset {
                popup.top_offset = offset;
                popup.base_position = corner_position(offset, inset_px);
                moved.push((popup.id, popup.position()));
            }
        }
        moved
    }

    /// Stack offsets in display order
    pub fn stacked_offsets(&self) -> Vec<u32> {
        self.stacked().map(|p| p.top_offset).collect()
    }

    /// Margin the page should carry for the current visible set
    pub fn desired_page_shift(&self, margin_px: u32) -> Option<u32> {
        (self.stacked_count() > 0).then_some(margin_px)
    }

    pub fn page_shift(&self) -> Option<u32> {
        self.page_shift
    }

    /// Record a new page shift; returns false if it was already applied
    pub fn set_page_shift(&mut self, margin_px: Option<u32>) -> bool {
        if self.page_shift == margin_px {
            return false;
        }
        self.page_shift = margin_px;
        true
    }
}
