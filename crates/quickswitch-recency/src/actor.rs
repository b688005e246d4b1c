//! Single-owner task wrapping a [`RecencyTracker`].
//!
//! Events are queued on an unbounded channel and applied strictly in the
//! order they were sent. Readers get owned snapshots; nothing outside the
//! task ever touches the list.

use async_trait::async_trait;
use quickswitch_ids::{TabId, WindowId};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

use crate::{Error, RecencyTracker, Result, StateStore, TabEvent, WindowFocusState};

/// Read-only access to the current recency ordering.
#[async_trait]
pub trait RecencyView: Send + Sync {
    /// Snapshot of the recency list, most recent first.
    async fn recent_tabs(&self) -> Vec<TabId>;
}

/// Cheap, clonable handle to the tracker task.
#[derive(Clone, Debug)]
pub struct RecencyHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl RecencyHandle {
    /// Queue a lifecycle event. Returns immediately; ordering is preserved.
    pub fn send(&self, event: TabEvent) {
        if self.tx.send(Command::Event(event)).is_err() {
            debug!(?event, "recency task gone; dropping event");
        }
    }

    /// Queue a window focus change.
    ///
    /// The receiver yields the activation mark taken when the change was
    /// applied; pass it to [`Self::focus_lookup`] with the window's active tab.
    pub fn window_focused(&self, window: WindowId) -> oneshot::Receiver<u64> {
        let (tx, rx) = oneshot::channel();
        if self
            .tx
            .send(Command::FocusChanged {
                window,
                respond: tx,
            })
            .is_err()
        {
            debug!(%window, "recency task gone; dropping focus change");
        }
        rx
    }

    /// Queue the active tab found for a focused window. Ignored if a real
    /// activation or another focus change got there first.
    pub fn focus_lookup(&self, window: WindowId, tab: TabId, mark: u64) {
        if self
            .tx
            .send(Command::FocusLookup { window, tab, mark })
            .is_err()
        {
            debug!(%window, "recency task gone; dropping focus lookup");
        }
    }

    /// Queue a restored list to be merged behind already-applied events.
    pub fn merge_restored(&self, restored: Vec<TabId>) {
        if self.tx.send(Command::MergeRestored(restored)).is_err() {
            debug!("recency task gone; dropping restored list");
        }
    }

    /// Current focus bookkeeping.
    pub async fn focus(&self) -> WindowFocusState {
        let (tx, rx) = oneshot::channel();
        let _ = self.tx.send(Command::Focus { respond: tx });
        rx.await.unwrap_or_default()
    }

    /// Snapshot the list and persist it to `store`.
    pub async fn save(&self, store: &dyn StateStore) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(Command::Snapshot { respond: tx })
            .map_err(|_| Error::Stopped)?;
        let recent = rx.await.map_err(|_| Error::Stopped)?;
        store.save(&recent).await
    }
}

#[async_trait]
impl RecencyView for RecencyHandle {
    async fn recent_tabs(&self) -> Vec<TabId> {
        let (tx, rx) = oneshot::channel();
        let _ = self.tx.send(Command::Snapshot { respond: tx });
        rx.await.unwrap_or_default()
    }
}

/// Tracker task constructor.
pub struct Recency;

impl Recency {
    /// Spawn the tracker task on the current runtime and return a handle.
    ///
    /// The task ends once every handle has been dropped.
    pub fn spawn(tracker: RecencyTracker) -> RecencyHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_actor(rx, tracker));
        RecencyHandle { tx }
    }
}

enum Command {
    Event(TabEvent),
    MergeRestored(Vec<TabId>),
    FocusChanged {
        window: WindowId,
        respond: oneshot::Sender<u64>,
    },
    FocusLookup {
        window: WindowId,
        tab: TabId,
        mark: u64,
    },
    Snapshot {
        respond: oneshot::Sender<Vec<TabId>>,
    },
    Focus {
        respond: oneshot::Sender<WindowFocusState>,
    },
}

async fn run_actor(mut rx: mpsc::UnboundedReceiver<Command>, mut tracker: RecencyTracker) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            Command::Event(event) => tracker.apply(event),
            Command::MergeRestored(list) => {
                tracker.merge_restored(list);
                trace!(len = tracker.recent_tabs().len(), "merged restored recency");
            }
            Command::FocusChanged { window, respond } => {
                tracker.on_window_focus_changed(window);
                let _ = respond.send(tracker.activations());
            }
            Command::FocusLookup { window, tab, mark } => {
                tracker.on_focus_lookup(window, tab, mark);
            }
            Command::Snapshot { respond } => {
                let _ = respond.send(tracker.recent_tabs().to_vec());
            }
            Command::Focus { respond } => {
                let _ = respond.send(tracker.focus());
            }
        }
    }
    debug!("recency task stopped");
}
