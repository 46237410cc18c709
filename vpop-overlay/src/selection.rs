//! Selection listener
//!
//! Turns the page's pointer-up selection text into a resolved word. Empty
//! selections are ignored silently; lookup misses and failures are logged
//! and dropped, never surfaced to the user.

use crate::lookup::{LookupError, LookupService, MediaRef};
use std::sync::Arc;
use tracing::{info, warn};
use vpop_common::events::DropReason;

/// Trim and lowercase a selection; `None` when nothing is left
pub fn normalize_selection(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// Outcome of resolving one selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Word has media; feed it to the queue
    Found { word: String, media_ref: MediaRef },
    /// Nothing to do
    Dropped { word: String, reason: DropReason },
}

/// Resolves selections through a lookup service
pub struct SelectionListener<L> {
    lookup: Arc<L>,
}

impl<L> Clone for SelectionListener<L> {
    fn clone(&self) -> Self {
        Self {
            lookup: Arc::clone(&self.lookup),
        }
    }
}

impl<L: LookupService> SelectionListener<L> {
    pub fn new(lookup: Arc<L>) -> Self {
        Self { lookup }
    }

    /// Resolve raw selection text. `None` for empty selections.
    pub async fn resolve(&self, selection: &str) -> Option<Resolution> {
        let word = normalize_selection(selection)?;

        let resolution = match self.lookup.resolve(&word).await {
            Ok(Some(media_ref)) => Resolution::Found { word, media_ref },
            Ok(None) => {
                info!("No video found for the selected text: {}", word);
                Resolution::Dropped {
                    word,
                    reason: DropReason::NotFound,
                }
            }
            Err(LookupError::Transport(e)) => {
                warn!("Error fetching media mapping for '{}': {}", word, e);
                Resolution::Dropped {
                    word,
                    reason: DropReason::Transport,
                }
            }
            Err(LookupError::Malformed(e)) => {
                warn!("Media mapping unusable for '{}': {}", word, e);
                Resolution::Dropped {
                    word,
                    reason: DropReason::Malformed,
                }
            }
        };
        Some(resolution)
    }
}
