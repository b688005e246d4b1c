use std::sync::Arc;

use async_trait::async_trait;
use quickswitch_browser::{Browser, Session, Tab};
use quickswitch_ids::SessionId;
use quickswitch_protocol::{Suggestion, SuggestionKind};
use tracing::debug;

use super::{Provider, SearchContext};
use crate::Result;

/// Tabs captured by a session: the tab itself, or every tab of a window.
fn session_tabs(session: &Session) -> impl Iterator<Item = &Tab> {
    session
        .tab
        .iter()
        .chain(session.window.iter().flat_map(|w| w.tabs.iter()))
}

/// Restorable parts of a session tab. Tabs without a session id are skipped.
fn restorable(tab: &Tab) -> Option<(SessionId, String, String)> {
    let Some(session_id) = tab.session_id.clone() else {
        debug!(url = ?tab.url, "session tab without session id skipped");
        return None;
    };
    Some((
        session_id,
        tab.title.clone().unwrap_or_default(),
        tab.url.clone().unwrap_or_default(),
    ))
}

/// Recently closed tabs; closed windows expand to one entry per tab.
pub struct ClosedTabs {
    browser: Arc<dyn Browser>,
}

impl ClosedTabs {
    /// Read recently closed sessions from `browser`.
    pub fn new(browser: Arc<dyn Browser>) -> Self {
        Self { browser }
    }
}

#[async_trait]
impl Provider for ClosedTabs {
    fn kind(&self) -> SuggestionKind {
        SuggestionKind::ClosedTab
    }

    async fn suggestions(&self, _cx: &SearchContext) -> Result<Vec<Suggestion>> {
        let sessions = self.browser.recently_closed().await?;
        Ok(sessions
            .iter()
            .flat_map(session_tabs)
            .filter_map(restorable)
            .map(|(session_id, title, url)| Suggestion::ClosedTab {
                session_id,
                title,
                url,
            })
            .collect())
    }
}

/// Tabs open on other devices, tagged with the device name.
pub struct SyncedTabs {
    browser: Arc<dyn Browser>,
}

impl SyncedTabs {
    /// Read other devices' sessions from `browser`.
    pub fn new(browser: Arc<dyn Browser>) -> Self {
        Self { browser }
    }
}

#[async_trait]
impl Provider for SyncedTabs {
    fn kind(&self) -> SuggestionKind {
        SuggestionKind::SyncedTab
    }

    async fn suggestions(&self, _cx: &SearchContext) -> Result<Vec<Suggestion>> {
        let devices = self.browser.devices().await?;
        let mut out = Vec::new();
        for device in &devices {
            let tabs = device.sessions.iter().flat_map(session_tabs);
            for (session_id, title, url) in tabs.filter_map(restorable) {
                out.push(Suggestion::SyncedTab {
                    device_name: device.device_name.clone(),
                    session_id,
                    title,
                    url,
                });
            }
        }
        Ok(out)
    }
}
