use quickswitch_ids::{TabId, WindowId};
use quickswitch_recency::{
    JsonFileStore, MemoryStore, RECENT_TABS_KEY, Recency, RecencyTracker, RecencyView,
    StateStore, TabEvent,
};

fn ids(raw: &[i32]) -> Vec<TabId> {
    raw.iter().copied().map(TabId::new).collect()
}

#[tokio::test]
async fn file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("nested").join("state.json"));
    assert_eq!(store.load().await.unwrap(), None);

    store.save(&ids(&[5, 3, 9])).await.unwrap();
    assert_eq!(store.load().await.unwrap(), Some(ids(&[5, 3, 9])));

    let raw = std::fs::read_to_string(store.path()).unwrap();
    assert!(raw.contains(RECENT_TABS_KEY));
}

#[tokio::test]
async fn corrupt_file_falls_back_to_live_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, b"{ not json").unwrap();
    let store = JsonFileStore::new(&path);
    assert!(store.load().await.is_err());

    let tracker = RecencyTracker::restore(&store, &ids(&[1, 2, 3])).await;
    assert_eq!(tracker.recent_tabs(), ids(&[1, 2, 3]));
}

#[tokio::test]
async fn restore_without_snapshot_uses_live_order() {
    let store = MemoryStore::new();
    let tracker = RecencyTracker::restore(&store, &ids(&[4, 2, 8])).await;
    assert_eq!(tracker.recent_tabs(), ids(&[4, 2, 8]));
}

#[tokio::test]
async fn restore_reconciles_with_live_tabs() {
    let store = MemoryStore::with(ids(&[7, 3, 1, 3]));
    let tracker = RecencyTracker::restore(&store, &ids(&[1, 2, 3])).await;
    assert_eq!(tracker.recent_tabs(), ids(&[3, 1]));
}

#[tokio::test]
async fn save_then_restore_is_identical() {
    let handle = Recency::spawn(RecencyTracker::new());
    for tab in [1, 2, 3, 2, 4] {
        handle.send(TabEvent::Activated {
            window: WindowId::new(1),
            tab: TabId::new(tab),
        });
    }
    let store = MemoryStore::new();
    handle.save(&store).await.unwrap();
    let before = handle.recent_tabs().await;
    assert_eq!(before, ids(&[4, 2, 3, 1]));

    let restored = RecencyTracker::restore(&store, &before).await;
    assert_eq!(restored.recent_tabs(), before.as_slice());
}

#[tokio::test]
async fn handle_applies_events_in_order() {
    let handle = Recency::spawn(RecencyTracker::from_list(ids(&[1, 2, 3])));
    handle.send(TabEvent::Removed(TabId::new(2)));
    handle.send(TabEvent::Replaced {
        added: TabId::new(10),
        removed: TabId::new(3),
    });
    handle.send(TabEvent::WindowFocusChanged(WindowId::NONE));
    handle.send(TabEvent::Activated {
        window: WindowId::new(2),
        tab: TabId::new(10),
    });
    assert_eq!(handle.recent_tabs().await, ids(&[10, 1]));
    let focus = handle.focus().await;
    assert!(focus.focus_lost);
    assert_eq!(focus.window, None);
}

#[tokio::test]
async fn merge_restored_after_early_events() {
    let handle = Recency::spawn(RecencyTracker::new());
    handle.send(TabEvent::Activated {
        window: WindowId::new(1),
        tab: TabId::new(6),
    });
    handle.merge_restored(ids(&[2, 6, 4]));
    assert_eq!(handle.recent_tabs().await, ids(&[6, 2, 4]));
}
