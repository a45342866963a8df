//! Integration tests for ordered tables

use lineage_foundation::OrderedTable;

#[test]
fn insertion_order_is_kept() {
    let table = OrderedTable::new()
        .insert("file1", 1)
        .insert("file2", 2)
        .insert("concatenated", 3);
    assert_eq!(
        table.names().collect::<Vec<_>>(),
        ["file1", "file2", "concatenated"]
    );
    assert_eq!(table.position("concatenated"), Some(2));
}

#[test]
fn replacing_keeps_position() {
    let table = OrderedTable::new().insert("a", 1).insert("b", 2);
    let replaced = table.insert("a", 10);
    assert_eq!(replaced.names().collect::<Vec<_>>(), ["a", "b"]);
    assert_eq!(replaced.get("a"), Some(&10));
    assert_eq!(replaced.len(), 2);
}

#[test]
fn snapshots_are_independent() {
    let parent = OrderedTable::new().insert("a", 1);
    let child = parent.insert("b", 2);
    assert_eq!(parent.len(), 1);
    assert!(!parent.contains("b"));
    assert_eq!(child.len(), 2);
}

#[test]
fn collects_from_pairs() {
    let table: OrderedTable<i32> = [("x", 1), ("y", 2)].into_iter().collect();
    assert_eq!(table.iter().collect::<Vec<_>>(), [("x", &1), ("y", &2)]);
}
