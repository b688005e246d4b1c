use quickswitch_picker::{MockPicker, pad_index, pick_items};

#[derive(Clone, Debug, PartialEq)]
struct Item {
    name: &'static str,
}

fn template(item: &Item, index: usize, width: usize) -> String {
    format!("{} {}", pad_index(index, width), item.name)
}

#[tokio::test]
async fn selection_comes_back_as_items() {
    let items: Vec<Item> = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k"]
        .into_iter()
        .map(|name| Item { name })
        .collect();
    let picker = MockPicker::new();
    picker.select_lines(&[10, 2]);
    let picked = pick_items(&picker, &items, template).await.unwrap();
    assert_eq!(picked, vec![Item { name: "k" }, Item { name: "c" }]);
    let input = &picker.inputs()[0];
    assert!(input.starts_with("00 a\n01 b\n"));
    assert!(input.ends_with("10 k"));
}

#[tokio::test]
async fn injected_lines_are_ignored() {
    let items = vec![Item { name: "a" }];
    let picker = MockPicker::new();
    picker.respond("rm -rf /\n0 a\n");
    let picked = pick_items(&picker, &items, template).await.unwrap();
    assert_eq!(picked, items);
}

#[tokio::test]
async fn picker_failure_propagates() {
    let items = vec![Item { name: "a" }];
    let picker = MockPicker::new();
    picker.set_fail(true);
    assert!(pick_items(&picker, &items, template).await.is_err());
}
