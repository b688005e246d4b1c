//! Per-record decoding for browser query results.

use std::result::Result as StdResult;

use serde::{
    Deserialize, Deserializer,
    de::{DeserializeOwned, Error as DeError},
};
use serde_json::Value;
use tracing::warn;

use crate::{Error, Result};

/// Decode a JSON array record by record, dropping records that do not fit `T`.
///
/// A `null` result decodes as an empty list. Anything other than an array or
/// `null` is an error for the whole call.
pub fn decode_records<T: DeserializeOwned>(method: &str, value: Value) -> Result<Vec<T>> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => {
            return Err(Error::Decode {
                method: method.to_string(),
                source: DeError::custom(format!("expected array, got {other}")),
            });
        }
    };
    Ok(keep_valid(method, items))
}

/// Decode each element, logging and skipping the ones that do not fit `T`.
fn keep_valid<T: DeserializeOwned>(what: &str, items: Vec<Value>) -> Vec<T> {
    let total = items.len();
    let out: Vec<T> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(what, error = %e, "dropping malformed record");
                None
            }
        })
        .collect();
    if out.len() < total {
        warn!(what, dropped = total - out.len(), total, "partial batch");
    }
    out
}

/// Field deserializer for nested record lists (bookmark children, window
/// tabs, device sessions). A bad element is dropped instead of failing the
/// record that holds it; `null` reads as empty.
pub(crate) fn nested<'de, D, T>(deserializer: D) -> StdResult<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(keep_valid("nested", items))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{BookmarkNode, Device, DownloadItem, Session, Tab};

    #[test]
    fn drops_only_the_bad_record() {
        let value = json!([
            {"id": 1, "windowId": 1},
            {"id": "not-a-number", "windowId": 1},
            {"id": 3, "windowId": 2}
        ]);
        let tabs: Vec<Tab> = decode_records("tabs.query", value).unwrap();
        assert_eq!(tabs.len(), 2);
    }

    #[test]
    fn null_is_empty() {
        let items: Vec<DownloadItem> = decode_records("downloads.search", Value::Null).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn non_array_is_an_error() {
        let res: Result<Vec<Tab>> = decode_records("tabs.query", json!({"id": 1}));
        assert!(matches!(res, Err(Error::Decode { .. })));
    }

    #[test]
    fn bad_bookmark_inside_a_folder_drops_only_that_leaf() {
        let value = json!([{
            "id": "0",
            "title": "root",
            "children": [
                {"id": "1", "title": "good", "url": "https://a.test"},
                {"id": "2", "title": "bad", "url": 42},
                {"id": "3", "title": "folder", "children": [
                    {"id": "4", "title": "good2", "url": "https://b.test"},
                    {"id": "5", "title": ["nope"]}
                ]}
            ]
        }]);
        let roots: Vec<BookmarkNode> = decode_records("bookmarks.getTree", value).unwrap();
        assert_eq!(roots.len(), 1);
        let children = &roots[0].children;
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].title, "good");
        assert_eq!(children[1].children.len(), 1);
        assert_eq!(children[1].children[0].title, "good2");
    }

    #[test]
    fn bad_tab_keeps_the_rest_of_its_window() {
        let value = json!([{
            "window": {"sessionId": "w1", "tabs": [
                {"id": 1, "windowId": 1, "sessionId": "t1"},
                {"id": "x", "windowId": 1},
            ]}
        }]);
        let sessions: Vec<Session> = decode_records("sessions.getRecentlyClosed", value).unwrap();
        assert_eq!(sessions.len(), 1);
        let window = sessions[0].window.as_ref().unwrap();
        assert_eq!(window.tabs.len(), 1);
    }

    #[test]
    fn bad_session_keeps_the_rest_of_its_device() {
        let value = json!([{
            "deviceName": "laptop",
            "sessions": [
                {"lastModified": "yesterday"},
                {"lastModified": 5, "tab": {"id": 2, "windowId": 1, "sessionId": "s"}},
            ]
        }]);
        let devices: Vec<Device> = decode_records("sessions.getDevices", value).unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].sessions.len(), 1);
        assert_eq!(devices[0].sessions[0].last_modified, 5);
    }
}
