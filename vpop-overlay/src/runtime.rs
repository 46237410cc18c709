//! Overlay event loop
//!
//! One task owns the `PopupManager` and handles page events one at a time,
//! so no handler ever observes another half-finished. Lookups run as
//! separate tasks and come back through the same channel as
//! `PageEvent::Resolved`, which lets other selections interleave while a
//! lookup is pending. Expiry timers are a single sleep on the earliest
//! popup deadline; closing a popup removes its deadline, so a stale timer
//! has nothing to close.

use crate::config::PopupConfig;
use crate::error::{Error, Result};
use crate::host::{PageHost, Point};
use crate::lookup::LookupService;
use crate::popup::{PopupId, PopupManager};
use crate::selection::{normalize_selection, Resolution, SelectionListener};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};
use vpop_common::events::{CloseReason, EventBus, OverlayEvent};
use vpop_common::time;

/// Events delivered by the page binding
#[derive(Debug, Clone)]
pub enum PageEvent {
    /// Pointer released anywhere on the document; ends any drag and carries
    /// the selection text
    PointerUp { selection: String },

    /// Pointer pressed inside a popup
    PopupPointerDown { id: PopupId, at: Point },

    /// Pointer moved over the document
    PointerMove { at: Point },

    /// A popup's media element fired its ended event
    MediaEnded { id: PopupId },

    /// A popup's close button was clicked
    CloseClicked { id: PopupId },

    /// Lookup continuation (posted by the runtime itself)
    Resolved(Resolution),

    /// Detach from the page
    Shutdown,
}

/// Sender side handed to the page binding
#[derive(Debug, Clone)]
pub struct PageEvents {
    tx: mpsc::UnboundedSender<PageEvent>,
}

impl PageEvents {
    pub fn send(&self, event: PageEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| Error::Runtime("overlay runtime has stopped".to_string()))
    }

    pub fn pointer_up(&self, selection: impl Into<String>) -> Result<()> {
        self.send(PageEvent::PointerUp {
            selection: selection.into(),
        })
    }

    pub fn media_ended(&self, id: PopupId) -> Result<()> {
        self.send(PageEvent::MediaEnded { id })
    }

    pub fn close_clicked(&self, id: PopupId) -> Result<()> {
        self.send(PageEvent::CloseClicked { id })
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send(PageEvent::Shutdown)
    }
}

/// Event loop owning the popup manager
pub struct OverlayRuntime<H: PageHost, L: LookupService> {
    manager: PopupManager<H>,
    listener: SelectionListener<L>,
    tx: mpsc::UnboundedSender<PageEvent>,
    rx: mpsc::UnboundedReceiver<PageEvent>,
}

impl<H: PageHost, L: LookupService> OverlayRuntime<H, L> {
    /// Attach to a page. Returns the runtime and the page's event sender.
    pub fn new(config: PopupConfig, host: H, lookup: Arc<L>) -> (Self, PageEvents) {
        Self::with_event_bus(config, host, lookup, EventBus::default())
    }

    pub fn with_event_bus(
        config: PopupConfig,
        host: H,
        lookup: Arc<L>,
        events: EventBus,
    ) -> (Self, PageEvents) {
        let (tx, rx) = mpsc::unbounded_channel();
        let runtime = Self {
            manager: PopupManager::with_event_bus(config, host, events),
            listener: SelectionListener::new(lookup),
            tx: tx.clone(),
            rx,
        };
        (runtime, PageEvents { tx })
    }

    pub fn manager(&self) -> &PopupManager<H> {
        &self.manager
    }

    /// Run until `Shutdown`, then tear down and hand back the manager
    pub async fn run(mut self) -> PopupManager<H> {
        info!("Overlay runtime started");

        loop {
            let deadline = self.manager.next_deadline();
            tokio::select! {
                event = self.rx.recv() => {
                    // The runtime holds a sender, so the channel never closes under us
                    let Some(event) = event else { break };
                    if !self.handle(event) {
                        break;
                    }
                }
                _ = sleep_until(deadline) => {
                    self.manager.expire_due(Instant::now());
                }
            }
        }

        self.manager.teardown();
        info!("Overlay runtime stopped");
        self.manager
    }

    /// Apply one page event. Returns false on shutdown.
    pub fn handle(&mut self, event: PageEvent) -> bool {
        match event {
            PageEvent::PointerUp { selection } => {
                self.manager.pointer_up();
                self.spawn_lookup(selection);
            }
            PageEvent::PopupPointerDown { id, at } => {
                self.manager.pointer_down(id, at);
            }
            PageEvent::PointerMove { at } => self.manager.pointer_move(at),
            PageEvent::MediaEnded { id } => self.manager.on_playback_ended(id),
            PageEvent::CloseClicked { id } => {
                self.manager.close(id, CloseReason::Manual);
            }
            PageEvent::Resolved(Resolution::Found { word, media_ref }) => {
                self.manager.enqueue(word, media_ref);
            }
            PageEvent::Resolved(Resolution::Dropped { word, reason }) => {
                self.manager.events().emit_lossy(OverlayEvent::SelectionDropped {
                    word,
                    reason,
                    timestamp: time::now(),
                });
            }
            PageEvent::Shutdown => return false,
        }
        true
    }

    fn spawn_lookup(&self, selection: String) {
        if normalize_selection(&selection).is_none() {
            return;
        }
        debug!("Resolving selection {:?}", selection);

        let listener = self.listener.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if let Some(resolution) = listener.resolve(&selection).await {
                // Runtime gone means the overlay was detached; drop the result
                let _ = tx.send(PageEvent::Resolved(resolution));
            }
        });
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
