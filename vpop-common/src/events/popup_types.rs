//! Popup lifecycle supporting types

use serde::{Deserialize, Serialize};

/// Why a popup left the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum CloseReason {
    /// Close button clicked
    Manual,
    /// Lifetime elapsed (non-persistent popups)
    Expired,
    /// Media finished and the popup is not persistent
    PlaybackEnded,
    /// Superseded by a newer word in single-permanent mode
    Replaced,
    /// Overlay detached from the page
    Teardown,
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CloseReason::Manual => write!(f, "Manual"),
            CloseReason::Expired => write!(f, "Expired"),
            CloseReason::PlaybackEnded => write!(f, "PlaybackEnded"),
            CloseReason::Replaced => write!(f, "Replaced"),
            CloseReason::Teardown => write!(f, "Teardown"),
        }
    }
}

/// Why a selection never became a queue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum DropReason {
    /// Word absent from the media mapping
    NotFound,
    /// Mapping could not be fetched
    Transport,
    /// Mapping fetched but not a word → path object
    Malformed,
    /// Word already waiting in the queue
    Duplicate,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::NotFound => write!(f, "NotFound"),
            DropReason::Transport => write!(f, "Transport"),
            DropReason::Malformed => write!(f, "Malformed"),
            DropReason::Duplicate => write!(f, "Duplicate"),
        }
    }
}
