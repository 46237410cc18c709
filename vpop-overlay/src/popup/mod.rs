//! Popup lifecycle: instances, layout, drag, and the manager state machine

pub mod drag;
pub mod instance;
pub mod layout;
pub mod manager;

pub use drag::DragController;
pub use instance::{PopupId, PopupInstance};
pub use layout::LayoutState;
pub use manager::PopupManager;
