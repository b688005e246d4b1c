//! Native-messaging host: the stdio loop and lifecycle wiring.
//!
//! The read loop never awaits a browser call itself. Answers to the host's
//! own requests arrive on the same stream, so anything that talks to the
//! browser runs in a spawned task while the loop keeps draining input.

use std::{sync::Arc, time::Duration};

use futures::{SinkExt, StreamExt};
use parking_lot::RwLock;
use quickswitch_browser::{Browser, Tab};
use quickswitch_engine::{Engine, LabelTemplate, SearchOptions, default_providers};
use quickswitch_ids::{TabId, WindowId};
use quickswitch_picker::{DmenuPicker, Picker};
use quickswitch_protocol::{Error as ProtocolError, Inbound, Outbound, host_codec};
use quickswitch_recency::{Recency, RecencyHandle, RecencyTracker, StateStore, TabEvent};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::mpsc,
    time,
};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, error, info, warn};

use crate::{Result, remote::RemoteBrowser};

/// How long to wait for queued frames to flush after input ends.
const FLUSH_GRACE: Duration = Duration::from_secs(1);

/// Channel name the options page connects with.
const OPTIONS_CHANNEL: &str = "options";

/// The picker currently in use, with the settings it was built from.
#[derive(Clone)]
struct PickerSlot {
    command: String,
    args: Vec<String>,
    picker: Arc<dyn Picker>,
}

/// Everything a running host needs besides its streams.
pub struct HostOptions {
    /// Loaded user configuration.
    pub config: config::Config,
    /// Durable home of the recency snapshot.
    pub store: Arc<dyn StateStore>,
    /// Picker to use instead of one built from `config.picker`.
    pub picker: Option<Arc<dyn Picker>>,
}

/// Dispatches inbound messages. Cheap to clone into spawned tasks.
#[derive(Clone)]
pub struct Host {
    out: mpsc::UnboundedSender<Outbound>,
    browser: Arc<RemoteBrowser>,
    recency: RecencyHandle,
    store: Arc<dyn StateStore>,
    engine: Engine,
    picker: Arc<RwLock<PickerSlot>>,
    template: Arc<LabelTemplate>,
}

impl Host {
    /// Build a host whose outbound frames are queued on `out`.
    pub fn new(out: mpsc::UnboundedSender<Outbound>, options: HostOptions) -> Self {
        let HostOptions {
            config,
            store,
            picker,
        } = options;
        let browser = Arc::new(RemoteBrowser::new(out.clone()));
        let recency = Recency::spawn(RecencyTracker::new());

        let providers = default_providers(browser.clone(), Arc::new(recency.clone()))
            .into_iter()
            .filter(|p| config.provider_enabled(p.kind()))
            .collect();
        let engine =
            Engine::new(browser.clone(), providers).with_timeout(config.provider_timeout());

        let picker = picker.unwrap_or_else(|| {
            Arc::new(DmenuPicker::new(
                config.picker.command.clone(),
                config.picker.args.clone(),
            ))
        });
        let slot = PickerSlot {
            command: config.picker.command.clone(),
            args: config.picker.args.clone(),
            picker,
        };

        Self {
            out,
            browser,
            recency,
            store,
            engine,
            picker: Arc::new(RwLock::new(slot)),
            template: Arc::new(LabelTemplate::new(&config.template)),
        }
    }

    /// Handle to the recency tracker.
    pub fn recency(&self) -> &RecencyHandle {
        &self.recency
    }

    fn send(&self, msg: Outbound) {
        if self.out.send(msg).is_err() {
            debug!("output closed; dropping frame");
        }
    }

    /// React to one inbound message. Never blocks on the browser.
    pub fn dispatch(&self, msg: Inbound) {
        match msg {
            Inbound::Startup => {
                info!("startup; restoring recency state");
                let host = self.clone();
                tokio::spawn(async move { host.restore().await });
            }
            Inbound::Suspend => {
                info!("suspend; saving recency state");
                let host = self.clone();
                tokio::spawn(async move { host.save().await });
            }
            Inbound::TabActivated { tab_id, window_id } => {
                self.recency.send(TabEvent::Activated {
                    window: window_id,
                    tab: tab_id,
                });
            }
            Inbound::TabRemoved { tab_id } => self.recency.send(TabEvent::Removed(tab_id)),
            Inbound::TabReplaced {
                added_tab_id,
                removed_tab_id,
            } => self.recency.send(TabEvent::Replaced {
                added: added_tab_id,
                removed: removed_tab_id,
            }),
            Inbound::WindowFocusChanged { window_id } => self.on_window_focus(window_id),
            Inbound::Action { tab, mode, query } => {
                let host = self.clone();
                let options = SearchOptions { mode, query };
                tokio::spawn(async move { host.cycle(tab, options).await });
            }
            Inbound::Connect { name } => self.on_connect(&name),
            Inbound::PickerChanged { command, args } => self.set_picker(command, args),
            Inbound::Response { id, result, error } => self.browser.resolve(id, result, error),
        }
    }

    fn on_window_focus(&self, window: WindowId) {
        if window.is_none() {
            self.recency.send(TabEvent::WindowFocusChanged(window));
            return;
        }
        // Switching windows activates that window's current tab without a
        // tab activation event. The answer can arrive after newer events, so
        // the tracker only applies it if nothing overtook it.
        let mark = self.recency.window_focused(window);
        let host = self.clone();
        tokio::spawn(async move {
            let Ok(mark) = mark.await else {
                return;
            };
            match host.browser.active_tab(window).await {
                Ok(Some(tab)) => {
                    if let Some(id) = tab.id {
                        host.recency.focus_lookup(window, id, mark);
                    }
                }
                Ok(None) => debug!(?window, "focused window has no active tab"),
                Err(e) => warn!(?window, error = %e, "active tab lookup failed"),
            }
        });
    }

    fn on_connect(&self, name: &str) {
        if name == OPTIONS_CHANNEL {
            let slot = self.picker.read().clone();
            self.send(Outbound::Options {
                command: slot.command,
                args: slot.args,
            });
        } else {
            warn!(%name, "unknown connection");
            self.send(Outbound::Error {
                message: format!("Unknown type of connection: {name}"),
            });
        }
    }

    fn set_picker(&self, command: String, args: Vec<String>) {
        if command.trim().is_empty() {
            warn!("ignoring picker change with empty command");
            return;
        }
        info!(%command, ?args, "picker changed");
        let picker = Arc::new(DmenuPicker::new(command.clone(), args.clone()));
        *self.picker.write() = PickerSlot {
            command,
            args,
            picker,
        };
    }

    /// Load the persisted list, reconcile it with live tabs and merge it in.
    ///
    /// If the live tabs cannot be queried the saved list is merged as is;
    /// stale ids in it are harmless and dropping it would lose it at the
    /// next save.
    pub async fn restore(&self) {
        let restored = match self.browser.query_tabs().await {
            Ok(tabs) => {
                let live: Vec<TabId> = tabs.iter().filter_map(|t| t.id).collect();
                RecencyTracker::restore(self.store.as_ref(), &live).await
            }
            Err(e) => {
                warn!(error = %e, "live tab query failed; restoring saved list unreconciled");
                match self.store.load().await {
                    Ok(Some(saved)) => RecencyTracker::from_list(saved),
                    Ok(None) => return,
                    Err(e) => {
                        warn!(error = %e, "saved recency unreadable");
                        return;
                    }
                }
            }
        };
        let list = restored.recent_tabs().to_vec();
        info!(tabs = list.len(), "recency restored");
        self.recency.merge_restored(list);
    }

    /// Persist the current list. Failures are logged; the next start falls
    /// back to live tab order.
    pub async fn save(&self) {
        match self.recency.save(self.store.as_ref()).await {
            Ok(()) => debug!("recency saved"),
            Err(e) => warn!(error = %e, "saving recency state failed"),
        }
    }

    async fn cycle(&self, tab: Tab, options: SearchOptions) {
        let picker = self.picker.read().picker.clone();
        match self
            .engine
            .run_cycle(&tab, &options, picker.as_ref(), &self.template)
            .await
        {
            Ok(report) => self.send(Outbound::CycleFinished {
                selected: report.selected,
                activated: report.activated,
                failed: report.failed,
            }),
            Err(e) => {
                error!(error = %e, "switcher cycle failed");
                self.send(Outbound::Error {
                    message: e.to_string(),
                });
            }
        }
    }

    /// Input ended: fail outstanding requests and save state.
    pub async fn shutdown(&self) {
        self.browser.close();
        self.save().await;
    }
}

async fn write_loop<W>(writer: W, mut rx: mpsc::UnboundedReceiver<Outbound>)
where
    W: AsyncWrite + Unpin,
{
    let mut frames = FramedWrite::new(writer, host_codec());
    while let Some(msg) = rx.recv().await {
        if let Err(e) = frames.send(msg).await {
            error!(error = %e, "failed to write frame");
            if matches!(e, ProtocolError::Io(_)) {
                break;
            }
        }
    }
}

/// Serve the native-messaging protocol on `reader`/`writer` until input ends.
pub async fn run<R, W>(reader: R, writer: W, options: HostOptions) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let writer_task = tokio::spawn(write_loop(writer, out_rx));
    let host = Host::new(out_tx, options);

    let mut frames = FramedRead::new(reader, host_codec());
    let mut outcome = Ok(());
    while let Some(frame) = frames.next().await {
        match frame {
            Ok(Ok(msg)) => host.dispatch(msg),
            Ok(Err(e)) => {
                warn!(error = %e, "malformed message");
                host.send(Outbound::Error {
                    message: format!("malformed message: {e}"),
                });
            }
            Err(e) => {
                error!(error = %e, "input stream failed");
                outcome = Err(e.into());
                break;
            }
        }
    }
    info!("input closed; shutting down");
    host.shutdown().await;
    drop(host);
    if time::timeout(FLUSH_GRACE, writer_task).await.is_err() {
        debug!("output still busy at exit");
    }
    outcome
}
