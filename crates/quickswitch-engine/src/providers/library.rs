use std::sync::Arc;

use async_trait::async_trait;
use quickswitch_browser::{BookmarkNode, Browser, DownloadQuery};
use quickswitch_protocol::{Suggestion, SuggestionKind};

use super::{Provider, SearchContext};
use crate::Result;

/// Final path segment of a download's file name, for either separator.
pub fn download_title(filename: &str) -> &str {
    filename.rsplit(['/', '\\']).next().unwrap_or(filename)
}

/// Depth-first walk collecting every node that has a URL.
fn flatten_bookmarks(nodes: &[BookmarkNode], out: &mut Vec<Suggestion>) {
    for node in nodes {
        if let Some(url) = &node.url {
            out.push(Suggestion::Bookmark {
                title: node.title.clone(),
                url: url.clone(),
            });
        }
        flatten_bookmarks(&node.children, out);
    }
}

/// Bookmarks, flattened; folders are skipped.
pub struct Bookmarks {
    browser: Arc<dyn Browser>,
}

impl Bookmarks {
    /// Read the bookmark tree from `browser`.
    pub fn new(browser: Arc<dyn Browser>) -> Self {
        Self { browser }
    }
}

#[async_trait]
impl Provider for Bookmarks {
    fn kind(&self) -> SuggestionKind {
        SuggestionKind::Bookmark
    }

    async fn suggestions(&self, _cx: &SearchContext) -> Result<Vec<Suggestion>> {
        let roots = self.browser.bookmark_tree().await?;
        let mut out = Vec::new();
        flatten_bookmarks(&roots, &mut out);
        Ok(out)
    }
}

/// Reading-list entries.
pub struct ReadingList {
    browser: Arc<dyn Browser>,
}

impl ReadingList {
    /// Read reading-list entries from `browser`.
    pub fn new(browser: Arc<dyn Browser>) -> Self {
        Self { browser }
    }
}

#[async_trait]
impl Provider for ReadingList {
    fn kind(&self) -> SuggestionKind {
        SuggestionKind::ReadingList
    }

    async fn suggestions(&self, _cx: &SearchContext) -> Result<Vec<Suggestion>> {
        Ok(self
            .browser
            .reading_list()
            .await?
            .into_iter()
            .map(|e| Suggestion::ReadingList {
                title: e.title,
                url: e.url,
            })
            .collect())
    }
}

/// History entries matching the search query; no query matches everything.
pub struct History {
    browser: Arc<dyn Browser>,
}

impl History {
    /// Search history through `browser`.
    pub fn new(browser: Arc<dyn Browser>) -> Self {
        Self { browser }
    }
}

#[async_trait]
impl Provider for History {
    fn kind(&self) -> SuggestionKind {
        SuggestionKind::History
    }

    async fn suggestions(&self, cx: &SearchContext) -> Result<Vec<Suggestion>> {
        let text = cx.query.as_deref().unwrap_or_default();
        Ok(self
            .browser
            .search_history(text)
            .await?
            .into_iter()
            .filter_map(|h| {
                let url = h.url?;
                Some(Suggestion::History {
                    title: h.title.unwrap_or_default(),
                    url,
                })
            })
            .collect())
    }
}

/// Completed downloads whose file still exists.
pub struct Downloads {
    browser: Arc<dyn Browser>,
}

impl Downloads {
    /// List downloads from `browser`.
    pub fn new(browser: Arc<dyn Browser>) -> Self {
        Self { browser }
    }
}

#[async_trait]
impl Provider for Downloads {
    fn kind(&self) -> SuggestionKind {
        SuggestionKind::Download
    }

    async fn suggestions(&self, _cx: &SearchContext) -> Result<Vec<Suggestion>> {
        let query = DownloadQuery::completed();
        let items = self.browser.search_downloads(query).await?;
        Ok(items
            .into_iter()
            .filter(|d| query.matches(d))
            .map(|d| Suggestion::Download {
                download_id: d.id,
                title: download_title(&d.filename).to_string(),
                url: d.final_url.or(d.url).unwrap_or_default(),
            })
            .collect())
    }
}
