//! Playback queue

pub mod queue;

pub use queue::{EnqueueOutcome, PlaybackQueue, QueueEntry};
