//! Shared helpers for overlay integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use vpop_common::events::OverlayEvent;
use vpop_overlay::config::PopupConfig;
use vpop_overlay::host::HeadlessPage;
use vpop_overlay::lookup::{LookupService, StaticLookup};
use vpop_overlay::{OverlayRuntime, PageEvents, PopupManager};

/// Running overlay plus the handles a test needs
pub struct TestOverlay {
    pub page: PageEvents,
    pub events: broadcast::Receiver<OverlayEvent>,
    pub handle: JoinHandle<PopupManager<HeadlessPage>>,
}

impl TestOverlay {
    /// Shut down and return the torn-down manager
    pub async fn stop(self) -> PopupManager<HeadlessPage> {
        self.page.shutdown().unwrap();
        timeout(Duration::from_secs(60), self.handle)
            .await
            .expect("runtime did not stop")
            .expect("runtime panicked")
    }
}

/// Lookup table used by most tests
pub fn words() -> StaticLookup {
    StaticLookup::new()
        .with("fetch", "videos/fetch.mp4")
        .with("throw", "videos/throw.mp4")
        .with("catch", "videos/catch.mp4")
}

/// Spawn a runtime over a headless page
pub fn start<L: LookupService>(config: PopupConfig, lookup: L) -> TestOverlay {
    let (runtime, page) = OverlayRuntime::new(config, HeadlessPage::new(), Arc::new(lookup));
    let events = runtime.manager().events().subscribe();
    let handle = tokio::spawn(runtime.run());
    TestOverlay {
        page,
        events,
        handle,
    }
}

/// Next event, failing the test if none arrives
pub async fn next_event(rx: &mut broadcast::Receiver<OverlayEvent>) -> OverlayEvent {
    timeout(Duration::from_secs(60), rx.recv())
        .await
        .expect("timed out waiting for overlay event")
        .expect("event bus closed")
}

/// Skip events until one matches
pub async fn wait_for<F>(rx: &mut broadcast::Receiver<OverlayEvent>, matches: F) -> OverlayEvent
where
    F: Fn(&OverlayEvent) -> bool,
{
    loop {
        let event = next_event(rx).await;
        if matches(&event) {
            return event;
        }
    }
}

/// Wait for the next popup to be shown; returns (popup id, word)
pub async fn wait_shown(rx: &mut broadcast::Receiver<OverlayEvent>) -> (uuid::Uuid, String) {
    match wait_for(rx, |e| matches!(e, OverlayEvent::PopupShown { .. })).await {
        OverlayEvent::PopupShown { popup_id, word, .. } => (popup_id, word),
        _ => unreachable!(),
    }
}
