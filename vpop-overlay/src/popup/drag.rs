//! Per-popup pointer drag
//!
//! Each popup owns one controller; it is dropped with the popup, so no drag
//! state outlives the element it moves.

use crate::host::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging {
        last: Point,
    },
}

/// Drag state machine: Idle → Dragging → Idle
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
    offset_x: i32,
    offset_y: i32,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer pressed inside the popup
    pub fn begin(&mut self, at: Point) {
        self.state = DragState::Dragging { last: at };
    }

    /// Pointer moved; returns the delta since the previous event while dragging
    pub fn drag_to(&mut self, at: Point) -> Option<(i32, i32)> {
        let DragState::Dragging { last } = self.state else {
            return None;
        };
        let delta = (at.x - last.x, at.y - last.y);
        self.offset_x += delta.0;
        self.offset_y += delta.1;
        self.state = DragState::Dragging { last: at };
        Some(delta)
    }

    /// Pointer released; returns whether a drag was in progress
    pub fn end(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = DragState::Idle;
        was_dragging
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Total translation applied by all drags so far
    pub fn offset(&self) -> (i32, i32) {
        (self.offset_x, self.offset_y)
    }
}
