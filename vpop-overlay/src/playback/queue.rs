//! Playback queue
//!
//! Ordered collection of resolved (word, media) pairs waiting for a popup.
//! Entries only arrive here after the lookup stage resolved them.

use crate::config::QueuePolicy;
use crate::lookup::MediaRef;
use std::collections::VecDeque;
use tracing::debug;

/// Resolved word waiting for display
///
/// Immutable once created; consumed exactly once by the popup manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    /// Media URI to play
    pub media_ref: MediaRef,

    /// Normalized selected word
    pub word: String,

    /// Insertion ordinal (monotonic per queue)
    pub inserted_at: u64,
}

/// Result of an enqueue attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// Appended to the back of the queue
    Queued,
    /// Queue cleared first; carries how many entries were dropped
    Replaced(usize),
    /// Same word already waiting; nothing inserted
    Duplicate,
}

impl EnqueueOutcome {
    /// True when an entry was inserted
    pub fn accepted(&self) -> bool {
        !matches!(self, EnqueueOutcome::Duplicate)
    }
}

/// FIFO queue with a configurable insertion policy
#[derive(Debug)]
pub struct PlaybackQueue {
    entries: VecDeque<QueueEntry>,
    policy: QueuePolicy,
    next_ordinal: u64,
}

impl PlaybackQueue {
    /// Create an empty queue
    pub fn new(policy: QueuePolicy) -> Self {
        Self {
            entries: VecDeque::new(),
            policy,
            next_ordinal: 0,
        }
    }

    pub fn policy(&self) -> QueuePolicy {
        self.policy
    }

    /// Insert a resolved word according to the queue policy
    pub fn enqueue(&mut self, word: impl Into<String>, media_ref: MediaRef) -> EnqueueOutcome {
        let word = word.into();

        let outcome = match self.policy {
            QueuePolicy::AppendDedup => {
                if self.contains_word(&word) {
                    debug!("'{}' already queued, skipping", word);
                    return EnqueueOutcome::Duplicate;
                }
                EnqueueOutcome::Queued
            }
            QueuePolicy::ReplaceSingle => {
                let dropped = self.entries.len();
                self.entries.clear();
                EnqueueOutcome::Replaced(dropped)
            }
        };

        let inserted_at = self.next_ordinal;
        self.next_ordinal += 1;
        self.entries.push_back(QueueEntry {
            media_ref,
            word,
            inserted_at,
        });

        debug!(
            "Enqueued entry #{} ({:?}), queue length {}",
            inserted_at,
            outcome,
            self.entries.len()
        );
        outcome
    }

    /// Remove and return the oldest entry
    pub fn dequeue_front(&mut self) -> Option<QueueEntry> {
        self.entries.pop_front()
    }

    /// Peek at the oldest entry
    pub fn front(&self) -> Option<&QueueEntry> {
        self.entries.front()
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.entries.iter().any(|e| e.word == word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every waiting entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for PlaybackQueue {
    fn default() -> Self {
        Self::new(QueuePolicy::default())
    }
}
