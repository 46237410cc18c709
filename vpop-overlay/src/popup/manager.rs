//! Popup lifecycle manager
//!
//! Owns the playback queue, the registry of visible popups, and the single
//! playback slot. Every page-affecting transition runs to completion inside
//! one call, so the layout is never observed half-updated.
//!
//! Popup states: `Idle → Displaying → Closed`. A close (manual, expiry,
//! playback end, replacement) is what drains the queue.

use super::instance::{PopupId, PopupInstance};
use super::layout::{anchored_position, corner_position, stacked_offset, LayoutState};
use super::drag::DragController;
use crate::config::{Concurrency, PopupConfig, PositionMode};
use crate::host::{PageHost, Point};
use crate::lookup::MediaRef;
use crate::playback::{EnqueueOutcome, PlaybackQueue, QueueEntry};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use vpop_common::events::{CloseReason, DropReason, EventBus, OverlayEvent};
use vpop_common::time;

/// Queue + popup state machine over a page host
pub struct PopupManager<H: PageHost> {
    config: PopupConfig,
    host: H,
    queue: PlaybackQueue,
    layout: LayoutState,

    /// Popup holding the single playback slot (the playing flag)
    slot_owner: Option<PopupId>,

    events: EventBus,

    /// Popups ever shown
    shown_total: usize,
}

impl<H: PageHost> PopupManager<H> {
    pub fn new(config: PopupConfig, host: H) -> Self {
        Self::with_event_bus(config, host, EventBus::default())
    }

    pub fn with_event_bus(config: PopupConfig, host: H, events: EventBus) -> Self {
        info!(
            "Popup manager attached: position={}, queue={:?}, concurrency={:?}, persistent={}",
            config.position, config.queue_policy, config.concurrency, config.persistent
        );
        Self {
            queue: PlaybackQueue::new(config.queue_policy),
            config,
            host,
            layout: LayoutState::new(),
            slot_owner: None,
            events,
            shown_total: 0,
        }
    }

    pub fn config(&self) -> &PopupConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn queue(&self) -> &PlaybackQueue {
        &self.queue
    }

    /// Visible popups in display order
    pub fn visible(&self) -> impl Iterator<Item = &PopupInstance> {
        self.layout.iter()
    }

    pub fn visible_count(&self) -> usize {
        self.layout.len()
    }

    pub fn get(&self, id: PopupId) -> Option<&PopupInstance> {
        self.layout.get(id)
    }

    /// Newest visible popup showing `word`
    pub fn find_by_word(&self, word: &str) -> Option<PopupId> {
        self.layout.iter().rev().find(|p| p.word == word).map(|p| p.id)
    }

    /// Playing flag: a popup occupies the playback slot
    pub fn is_playing(&self) -> bool {
        self.slot_owner.is_some()
    }

    pub fn slot_owner(&self) -> Option<PopupId> {
        self.slot_owner
    }

    /// Popups ever shown by this manager
    pub fn shown_total(&self) -> usize {
        self.shown_total
    }

    /// Stack offsets of visible stacked-corner popups, in display order
    pub fn stacked_offsets(&self) -> Vec<u32> {
        self.layout.stacked_offsets()
    }

    /// Accept a resolved word and play it if the slot is free
    pub fn enqueue(&mut self, word: impl Into<String>, media_ref: MediaRef) -> EnqueueOutcome {
        let word = word.into();
        let outcome = self.queue.enqueue(word.clone(), media_ref.clone());

        match outcome {
            EnqueueOutcome::Duplicate => {
                debug!("'{}' is already waiting, selection dropped", word);
                self.events.emit_lossy(OverlayEvent::SelectionDropped {
                    word,
                    reason: DropReason::Duplicate,
                    timestamp: time::now(),
                });
                return outcome;
            }
            EnqueueOutcome::Queued | EnqueueOutcome::Replaced(_) => {
                let replaced = match outcome {
                    EnqueueOutcome::Replaced(n) => n,
                    _ => 0,
                };
                self.events.emit_lossy(OverlayEvent::EntryQueued {
                    word,
                    media_ref: media_ref.to_string(),
                    queue_len: self.queue.len(),
                    replaced,
                    timestamp: time::now(),
                });
            }
        }

        self.drain_queue();
        outcome
    }

    /// Show the front queue entry if a slot is available.
    ///
    /// Safe to call at any time: with the slot occupied or the queue empty
    /// it does nothing.
    pub fn play_next(&mut self) -> Option<PopupId> {
        if self.queue.is_empty() {
            debug!("No more videos in the queue");
            return None;
        }
        if !self.slot_available() {
            debug!(
                "Slot occupied, {} entr{} waiting",
                self.queue.len(),
                if self.queue.len() == 1 { "y" } else { "ies" }
            );
            return None;
        }

        let entry = self.queue.dequeue_front()?;

        if self.config.position == PositionMode::SinglePermanent {
            for id in self.layout.ids() {
                self.remove_popup(id, CloseReason::Replaced);
            }
        }

        Some(self.show(entry))
    }

    /// Close a popup and let the queue advance.
    ///
    /// Returns false (and does nothing) if the popup is already gone.
    pub fn close(&mut self, id: PopupId, reason: CloseReason) -> bool {
        if !self.remove_popup(id, reason) {
            debug!("Close for unknown popup {} ignored", id);
            return false;
        }
        self.reflow();
        self.update_page_shift();
        self.drain_queue();
        true
    }

    /// The popup's media element reached its end
    pub fn on_playback_ended(&mut self, id: PopupId) {
        let replay_count = self.config.replay_count;
        let Some(popup) = self.layout.get_mut(id) else {
            debug!("Playback end for unknown popup {} ignored", id);
            return;
        };
        popup.play_count += 1;
        let play_count = popup.play_count;
        let persistent = popup.is_persistent;

        let replaying = !persistent && play_count < replay_count;
        self.events.emit_lossy(OverlayEvent::PlaybackEnded {
            popup_id: id.as_uuid(),
            play_count,
            replaying,
            timestamp: time::now(),
        });

        if replaying {
            debug!("Replaying popup {} ({}/{})", id, play_count + 1, replay_count);
            self.host.restart_media(id);
            return;
        }

        if !persistent {
            self.close(id, CloseReason::PlaybackEnded);
            return;
        }

        // Persistent: the popup stays on screen with its media stopped
        self.host.stop_media(id);
        if self.config.release_slot_on_persistent_end && self.slot_owner == Some(id) {
            self.release_slot(id);
            self.drain_queue();
        }
    }

    /// Close every non-persistent popup whose lifetime has elapsed
    pub fn expire_due(&mut self, now: Instant) -> usize {
        let expired: Vec<PopupId> = self
            .layout
            .iter()
            .filter(|p| p.is_expired(now))
            .map(|p| p.id)
            .collect();

        for id in &expired {
            info!("Popup {} lifetime elapsed", id);
            self.close(*id, CloseReason::Expired);
        }
        expired.len()
    }

    /// Earliest pending expiry
    pub fn next_deadline(&self) -> Option<Instant> {
        self.layout.iter().filter_map(|p| p.expiry_deadline).min()
    }

    /// Pointer pressed on a popup; starts its drag
    pub fn pointer_down(&mut self, id: PopupId, at: Point) -> bool {
        match self.layout.get_mut(id) {
            Some(popup) => {
                popup.drag.begin(at);
                true
            }
            None => false,
        }
    }

    /// Document pointer move; translates every popup being dragged
    pub fn pointer_move(&mut self, at: Point) {
        let mut moved = Vec::new();
        for popup in self.layout.iter_mut() {
            if popup.drag.drag_to(at).is_some() {
                moved.push((popup.id, popup.position()));
            }
        }
        for (id, position) in moved {
            self.host.move_to(id, position);
        }
    }

    /// Document pointer up; ends all drags
    pub fn pointer_up(&mut self) {
        for popup in self.layout.iter_mut() {
            popup.drag.end();
        }
    }

    /// Detach from the page: unmount everything, forget the queue
    pub fn teardown(&mut self) {
        let waiting = self.queue.len();
        self.queue.clear();
        for id in self.layout.ids() {
            self.remove_popup(id, CloseReason::Teardown);
        }
        self.update_page_shift();
        info!("Popup manager detached ({} queued entries dropped)", waiting);
    }

    fn slot_available(&self) -> bool {
        if self.config.position == PositionMode::SinglePermanent {
            return true;
        }
        match self.config.concurrency {
            Concurrency::SingleSlot => self.slot_owner.is_none(),
            Concurrency::Multi => self
                .config
                .max_visible
                .map_or(true, |max| self.layout.len() < max),
        }
    }

    fn drain_queue(&mut self) {
        while self.play_next().is_some() {}
    }

    fn show(&mut self, entry: QueueEntry) -> PopupId {
        let id = PopupId::new();
        let now = Instant::now();
        let mode = self.config.position;

        let (top_offset, base_position) = match mode {
            PositionMode::StackedCorner => {
                let offset = stacked_offset(self.layout.stacked_count(), self.config.stack_spacing_px);
                (offset, corner_position(offset, self.config.corner_inset_px))
            }
            PositionMode::Anchored => match self.host.selection_bounds() {
                Some(bounds) => (0, anchored_position(bounds, self.config.selection_offset_px)),
                None => {
                    warn!("No selection geometry for '{}', placing in corner", entry.word);
                    (0, corner_position(0, self.config.corner_inset_px))
                }
            },
            PositionMode::SinglePermanent => (0, corner_position(0, self.config.corner_inset_px)),
        };

        let persistent = self.config.persistent;
        let popup = PopupInstance {
            id,
            word: entry.word,
            media_ref: entry.media_ref,
            position_mode: mode,
            top_offset,
            play_count: 0,
            is_persistent: persistent,
            expiry_deadline: (!persistent).then(|| now + self.config.lifetime()),
            base_position,
            drag: DragController::new(),
        };

        info!("Now playing: {} for word: {}", popup.media_ref, popup.word);
        self.host.mount(&popup.view());
        self.events.emit_lossy(OverlayEvent::PopupShown {
            popup_id: id.as_uuid(),
            word: popup.word.clone(),
            media_ref: popup.media_ref.to_string(),
            top_offset,
            timestamp: time::now(),
        });
        self.layout.insert(popup);
        self.shown_total += 1;

        if self.config.concurrency == Concurrency::SingleSlot
            || mode == PositionMode::SinglePermanent
        {
            self.slot_owner = Some(id);
        }

        self.update_page_shift();
        id
    }

    /// Unmount without reflow or draining
    fn remove_popup(&mut self, id: PopupId, reason: CloseReason) -> bool {
        let Some(popup) = self.layout.remove(id) else {
            return false;
        };
        self.host.unmount(id);
        if self.slot_owner == Some(id) {
            self.release_slot(id);
        }

        info!("Closed popup {} for word '{}' ({})", id, popup.word, reason);
        self.events.emit_lossy(OverlayEvent::PopupClosed {
            popup_id: id.as_uuid(),
            word: popup.word,
            reason,
            timestamp: time::now(),
        });
        true
    }

    fn release_slot(&mut self, id: PopupId) {
        self.slot_owner = None;
        self.events.emit_lossy(OverlayEvent::SlotReleased {
            popup_id: id.as_uuid(),
            timestamp: time::now(),
        });
    }

    fn reflow(&mut self) {
        if self.layout.stacked_count() == 0 {
            return;
        }
        let moved = self
            .layout
            .reflow(self.config.stack_spacing_px, self.config.corner_inset_px);
        if moved.is_empty() {
            return;
        }
        for (id, position) in &moved {
            self.host.move_to(*id, *position);
        }
        debug!("Reflowed {} stacked popup(s)", moved.len());
        self.events.emit_lossy(OverlayEvent::LayoutReflowed {
            offsets: self.layout.stacked_offsets(),
            timestamp: time::now(),
        });
    }

    fn update_page_shift(&mut self) {
        let desired = self.layout.desired_page_shift(self.config.page_shift_px);
        if self.layout.set_page_shift(desired) {
            self.host.set_page_shift(desired);
            self.events.emit_lossy(OverlayEvent::PageShiftChanged {
                margin_px: desired,
                timestamp: time::now(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueuePolicy;
    use crate::host::{HeadlessPage, MediaState, Position, SelectionBounds};
    use std::time::Duration;

    fn media(name: &str) -> MediaRef {
        MediaRef::new(format!("{}.mp4", name))
    }

    fn manager(config: PopupConfig) -> PopupManager<HeadlessPage> {
        PopupManager::new(config, HeadlessPage::new())
    }

    fn single_slot() -> PopupConfig {
        PopupConfig {
            release_slot_on_persistent_end: false,
            ..PopupConfig::default()
        }
    }

    fn transient(replay_count: u32) -> PopupConfig {
        PopupConfig {
            persistent: false,
            replay_count,
            ..PopupConfig::default()
        }
    }

    #[test]
    fn test_enqueue_while_idle_shows_popup_at_slot_zero() {
        let mut mgr = manager(single_slot());
        mgr.enqueue("fetch", MediaRef::new("a.mp4"));

        assert!(mgr.is_playing());
        assert_eq!(mgr.visible_count(), 1);
        let popup = mgr.visible().next().unwrap();
        assert_eq!(popup.word, "fetch");
        assert_eq!(popup.top_offset, 0);
        assert_eq!(mgr.slot_owner(), Some(popup.id));
        assert_eq!(mgr.host().mounted()[0].view.media_ref.as_str(), "a.mp4");
        assert!(mgr.queue().is_empty());
    }

    #[test]
    fn test_second_word_waits_until_first_closes() {
        let mut mgr = manager(single_slot());
        mgr.enqueue("fetch", media("fetch"));
        let first = mgr.slot_owner().unwrap();

        mgr.enqueue("throw", media("throw"));
        assert_eq!(mgr.visible_count(), 1);
        assert_eq!(mgr.queue().len(), 1);
        assert_eq!(mgr.slot_owner(), Some(first));

        assert!(mgr.close(first, CloseReason::Manual));
        assert_eq!(mgr.visible_count(), 1);
        assert!(mgr.queue().is_empty());
        assert_eq!(mgr.visible().next().unwrap().word, "throw");
    }

    #[test]
    fn test_same_word_twice_before_play_is_one_entry() {
        let mut mgr = manager(single_slot());
        mgr.enqueue("fetch", media("fetch"));
        mgr.enqueue("throw", media("throw"));
        let outcome = mgr.enqueue("throw", media("throw"));

        assert_eq!(outcome, EnqueueOutcome::Duplicate);
        assert_eq!(mgr.queue().len(), 1);
    }

    #[test]
    fn test_replace_single_keeps_latest_waiting_word() {
        let mut mgr = manager(PopupConfig {
            queue_policy: QueuePolicy::ReplaceSingle,
            ..single_slot()
        });
        mgr.enqueue("fetch", media("fetch"));
        mgr.enqueue("throw", media("throw"));
        mgr.enqueue("catch", media("catch"));

        assert_eq!(mgr.queue().len(), 1);
        assert_eq!(mgr.queue().front().unwrap().word, "catch");

        let first = mgr.slot_owner().unwrap();
        mgr.close(first, CloseReason::Manual);
        assert_eq!(mgr.visible().next().unwrap().word, "catch");
        assert_eq!(mgr.shown_total(), 2);
    }

    #[test]
    fn test_play_next_is_reentrant_safe() {
        let mut mgr = manager(single_slot());
        mgr.enqueue("fetch", media("fetch"));
        mgr.enqueue("throw", media("throw"));

        assert!(mgr.play_next().is_none());
        assert!(mgr.play_next().is_none());
        assert_eq!(mgr.visible_count(), 1);
        assert_eq!(mgr.host().mounts_total(), 1);
    }

    #[test]
    fn test_close_missing_popup_is_noop() {
        let mut mgr = manager(single_slot());
        mgr.enqueue("fetch", media("fetch"));
        let id = mgr.slot_owner().unwrap();

        assert!(mgr.close(id, CloseReason::Manual));
        assert!(!mgr.close(id, CloseReason::Manual));
        assert!(!mgr.close(PopupId::new(), CloseReason::Expired));
        assert!(!mgr.is_playing());
    }

    #[test]
    fn test_non_persistent_end_closes_and_drains() {
        let mut mgr = manager(transient(1));
        mgr.enqueue("fetch", media("fetch"));
        mgr.enqueue("throw", media("throw"));
        let first = mgr.slot_owner().unwrap();

        mgr.on_playback_ended(first);

        assert!(mgr.get(first).is_none());
        assert_eq!(mgr.visible().next().unwrap().word, "throw");
        assert!(mgr.queue().is_empty());
    }

    #[test]
    fn test_replay_count_restarts_before_closing() {
        let mut mgr = manager(transient(2));
        mgr.enqueue("fetch", media("fetch"));
        let id = mgr.slot_owner().unwrap();

        mgr.on_playback_ended(id);
        assert_eq!(mgr.get(id).unwrap().play_count, 1);
        assert_eq!(mgr.host().popup(id).unwrap().starts, 2);

        mgr.on_playback_ended(id);
        assert!(mgr.get(id).is_none());
        assert!(!mgr.is_playing());
    }

    #[test]
    fn test_persistent_end_keeps_popup_and_slot() {
        let mut mgr = manager(single_slot());
        mgr.enqueue("fetch", media("fetch"));
        mgr.enqueue("throw", media("throw"));
        let id = mgr.slot_owner().unwrap();

        mgr.on_playback_ended(id);

        assert!(mgr.get(id).is_some());
        assert_eq!(mgr.slot_owner(), Some(id));
        assert_eq!(mgr.host().popup(id).unwrap().media, MediaState::Stopped);
        assert_eq!(mgr.queue().len(), 1);
    }

    #[test]
    fn test_persistent_end_with_slot_release_stacks_next() {
        let mut mgr = manager(PopupConfig::default());
        mgr.enqueue("fetch", media("fetch"));
        mgr.enqueue("throw", media("throw"));
        let first = mgr.slot_owner().unwrap();

        mgr.on_playback_ended(first);

        assert!(mgr.get(first).is_some());
        assert_eq!(mgr.visible_count(), 2);
        assert_eq!(mgr.stacked_offsets(), vec![0, 290]);
        assert_ne!(mgr.slot_owner(), Some(first));
        assert!(mgr.is_playing());
    }

    #[test]
    fn test_stacked_offsets_have_no_gaps_after_close() {
        let mut mgr = manager(PopupConfig {
            concurrency: Concurrency::Multi,
            ..PopupConfig::default()
        });
        for word in ["a", "b", "c", "d"] {
            mgr.enqueue(word, media(word));
        }
        assert_eq!(mgr.stacked_offsets(), vec![0, 290, 580, 870]);

        let second = mgr.find_by_word("b").unwrap();
        mgr.close(second, CloseReason::Manual);
        assert_eq!(mgr.stacked_offsets(), vec![0, 290, 580]);

        let c = mgr.find_by_word("c").unwrap();
        assert_eq!(
            mgr.host().position_of(c),
            Some(Position::Corner { top: 300, right: 10 })
        );
    }

    #[test]
    fn test_find_by_word_prefers_newest_popup() {
        let mut mgr = manager(PopupConfig {
            concurrency: Concurrency::Multi,
            ..PopupConfig::default()
        });
        mgr.enqueue("fetch", media("fetch"));
        let older = mgr.find_by_word("fetch").unwrap();
        // Already on screen, so no longer queued; a second selection shows again
        mgr.enqueue("fetch", media("fetch"));

        assert_eq!(mgr.visible_count(), 2);
        let newer = mgr.find_by_word("fetch").unwrap();
        assert_ne!(newer, older);
        assert_eq!(mgr.get(newer).unwrap().top_offset, 290);
    }

    #[test]
    fn test_multi_respects_max_visible() {
        let mut mgr = manager(PopupConfig {
            concurrency: Concurrency::Multi,
            max_visible: Some(2),
            ..PopupConfig::default()
        });
        for word in ["a", "b", "c"] {
            mgr.enqueue(word, media(word));
        }
        assert_eq!(mgr.visible_count(), 2);
        assert_eq!(mgr.queue().len(), 1);
        assert!(!mgr.is_playing());

        let a = mgr.find_by_word("a").unwrap();
        mgr.close(a, CloseReason::Manual);
        assert_eq!(mgr.visible_count(), 2);
        assert!(mgr.find_by_word("c").is_some());
    }

    #[test]
    fn test_page_shift_follows_visible_set() {
        let mut mgr = manager(single_slot());
        assert_eq!(mgr.host().page_shift(), None);

        mgr.enqueue("fetch", media("fetch"));
        assert_eq!(mgr.host().page_shift(), Some(320));

        let id = mgr.slot_owner().unwrap();
        mgr.close(id, CloseReason::Manual);
        assert_eq!(mgr.host().page_shift(), None);
    }

    #[test]
    fn test_anchored_mode_uses_selection_and_no_shift() {
        let mut page = HeadlessPage::new();
        page.set_selection(Some(SelectionBounds {
            left: 200,
            top: 380,
            right: 260,
            bottom: 400,
            scroll_x: 0,
            scroll_y: 1000,
        }));
        let mut mgr = PopupManager::new(
            PopupConfig {
                position: PositionMode::Anchored,
                ..single_slot()
            },
            page,
        );
        mgr.enqueue("fetch", media("fetch"));

        let id = mgr.slot_owner().unwrap();
        assert_eq!(
            mgr.host().position_of(id),
            Some(Position::Absolute { top: 1420, left: 200 })
        );
        assert_eq!(mgr.host().page_shift(), None);
    }

    #[test]
    fn test_anchored_without_selection_falls_back_to_corner() {
        let mut mgr = manager(PopupConfig {
            position: PositionMode::Anchored,
            ..single_slot()
        });
        mgr.enqueue("fetch", media("fetch"));
        let id = mgr.slot_owner().unwrap();
        assert_eq!(
            mgr.host().position_of(id),
            Some(Position::Corner { top: 10, right: 10 })
        );
    }

    #[test]
    fn test_single_permanent_replaces_outright() {
        let mut mgr = manager(PopupConfig {
            position: PositionMode::SinglePermanent,
            ..single_slot()
        });
        mgr.enqueue("fetch", media("fetch"));
        let first = mgr.slot_owner().unwrap();
        mgr.enqueue("throw", media("throw"));

        assert_eq!(mgr.visible_count(), 1);
        assert!(mgr.get(first).is_none());
        assert_eq!(mgr.visible().next().unwrap().word, "throw");
        assert_eq!(mgr.host().mounted().len(), 1);
        assert!(mgr.queue().is_empty());
    }

    #[test]
    fn test_expiry_closes_non_persistent_popup() {
        let mut mgr = manager(transient(1));
        mgr.enqueue("fetch", media("fetch"));
        let id = mgr.slot_owner().unwrap();
        let deadline = mgr.next_deadline().unwrap();

        assert_eq!(mgr.expire_due(deadline - Duration::from_millis(1)), 0);
        assert!(mgr.get(id).is_some());

        assert_eq!(mgr.expire_due(deadline), 1);
        assert!(mgr.get(id).is_none());
        assert!(mgr.next_deadline().is_none());
    }

    #[test]
    fn test_persistent_popups_have_no_deadline() {
        let mut mgr = manager(single_slot());
        mgr.enqueue("fetch", media("fetch"));
        assert!(mgr.next_deadline().is_none());
        assert_eq!(mgr.expire_due(Instant::now() + Duration::from_secs(3600)), 0);
    }

    #[test]
    fn test_drag_moves_only_grabbed_popup() {
        let mut mgr = manager(PopupConfig {
            concurrency: Concurrency::Multi,
            ..PopupConfig::default()
        });
        mgr.enqueue("a", media("a"));
        mgr.enqueue("b", media("b"));
        let a = mgr.find_by_word("a").unwrap();
        let b = mgr.find_by_word("b").unwrap();

        assert!(mgr.pointer_down(a, Point::new(500, 50)));
        mgr.pointer_move(Point::new(450, 70));
        mgr.pointer_up();
        mgr.pointer_move(Point::new(0, 0));

        assert_eq!(
            mgr.host().position_of(a),
            Some(Position::Corner { top: 30, right: 60 })
        );
        assert_eq!(
            mgr.host().position_of(b),
            Some(Position::Corner { top: 300, right: 10 })
        );
        assert!(!mgr.pointer_down(PopupId::new(), Point::new(0, 0)));
    }

    #[test]
    fn test_reflow_preserves_drag_offset() {
        let mut mgr = manager(PopupConfig {
            concurrency: Concurrency::Multi,
            ..PopupConfig::default()
        });
        mgr.enqueue("a", media("a"));
        mgr.enqueue("b", media("b"));
        let a = mgr.find_by_word("a").unwrap();
        let b = mgr.find_by_word("b").unwrap();

        mgr.pointer_down(b, Point::new(0, 0));
        mgr.pointer_move(Point::new(-20, 5));
        mgr.pointer_up();
        mgr.close(a, CloseReason::Manual);

        assert_eq!(
            mgr.host().position_of(b),
            Some(Position::Corner { top: 15, right: 30 })
        );
    }

    #[test]
    fn test_teardown_clears_everything() {
        let mut mgr = manager(single_slot());
        mgr.enqueue("fetch", media("fetch"));
        mgr.enqueue("throw", media("throw"));

        mgr.teardown();

        assert_eq!(mgr.visible_count(), 0);
        assert!(mgr.queue().is_empty());
        assert!(!mgr.is_playing());
        assert!(mgr.host().mounted().is_empty());
        assert_eq!(mgr.host().page_shift(), None);
    }

    #[test]
    fn test_events_published_for_lifecycle() {
        let mut mgr = manager(transient(1));
        let mut rx = mgr.events().subscribe();

        mgr.enqueue("fetch", media("fetch"));
        let id = mgr.slot_owner().unwrap();
        mgr.on_playback_ended(id);

        let kinds: Vec<&str> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| e.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                "EntryQueued",
                "PopupShown",
                "PageShiftChanged",
                "PlaybackEnded",
                "SlotReleased",
                "PopupClosed",
                "PageShiftChanged",
            ]
        );
    }
}
