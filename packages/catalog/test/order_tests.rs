//! Ordering & Cleanup Tests

use indexmap::IndexMap;
use lingua_catalog::message::{Catalog, CatalogMessage, Entry, Origin};
use lingua_catalog::order::{clean_obsolete, order_by_message_id, order_by_origin};
use lingua_catalog::CatalogError;

fn message_at(origins: Vec<(&str, Option<u32>)>) -> CatalogMessage {
    CatalogMessage {
        origin: origins
            .into_iter()
            .map(|(file, line)| Origin::new(file, line))
            .collect(),
        ..Default::default()
    }
}

fn flat(keys: Vec<(&str, CatalogMessage)>) -> Catalog {
    keys.into_iter()
        .map(|(key, message)| (key.to_string(), Entry::Message(message)))
        .collect()
}

fn keys(catalog: &Catalog) -> Vec<&str> {
    catalog.keys().map(String::as_str).collect()
}

#[test]
fn should_order_keys_alphabetically() {
    let catalog = flat(vec![
        ("b", CatalogMessage::default()),
        ("a", CatalogMessage::default()),
        ("c", CatalogMessage::default()),
    ]);

    let ordered = order_by_message_id(catalog);

    assert_eq!(keys(&ordered), vec!["a", "b", "c"]);
}

#[test]
fn should_order_context_bucket_keys_independently() {
    let mut bucket = IndexMap::new();
    bucket.insert("z".to_string(), CatalogMessage::default());
    bucket.insert("a".to_string(), CatalogMessage::default());
    let mut catalog = flat(vec![("b", CatalogMessage::default())]);
    catalog.insert("menu".to_string(), Entry::Context(bucket));

    let ordered = order_by_message_id(catalog);

    let menu = ordered["menu"].as_context().unwrap();
    assert_eq!(menu.keys().collect::<Vec<_>>(), vec!["a", "z"]);
}

#[test]
fn should_order_by_first_origin() {
    let catalog = flat(vec![
        ("a", message_at(vec![("z.js", Some(1))])),
        ("b", message_at(vec![("a.js", Some(5))])),
    ]);

    let ordered = order_by_origin(catalog).unwrap();

    assert_eq!(keys(&ordered), vec!["b", "a"]);
}

#[test]
fn should_compare_lines_numerically_within_one_file() {
    let catalog = flat(vec![
        ("later", message_at(vec![("app.js", Some(10))])),
        ("early", message_at(vec![("app.js", Some(2))])),
    ]);

    let ordered = order_by_origin(catalog).unwrap();

    assert_eq!(keys(&ordered), vec!["early", "later"]);
}

#[test]
fn should_use_the_earliest_origin_as_the_sort_key() {
    let catalog = flat(vec![
        ("multi", message_at(vec![("z.js", Some(9)), ("a.js", Some(1))])),
        ("single", message_at(vec![("b.js", Some(1))])),
    ]);

    let ordered = order_by_origin(catalog).unwrap();

    assert_eq!(keys(&ordered), vec!["multi", "single"]);
}

#[test]
fn should_keep_encounter_order_on_origin_ties() {
    let catalog = flat(vec![
        ("first", message_at(vec![("app.js", Some(3))])),
        ("second", message_at(vec![("app.js", Some(3))])),
    ]);

    let ordered = order_by_origin(catalog).unwrap();

    assert_eq!(keys(&ordered), vec!["first", "second"]);
}

#[test]
fn should_fail_ordering_by_origin_without_origins() {
    let catalog = flat(vec![("untracked", CatalogMessage::default())]);

    match order_by_origin(catalog) {
        Err(CatalogError::MissingOrigin { id }) => assert_eq!(id, "untracked"),
        other => panic!("expected MissingOrigin, got {other:?}"),
    }
}

#[test]
fn should_remove_obsolete_messages() {
    let mut dead = CatalogMessage::default();
    dead.obsolete = true;
    let catalog = flat(vec![("alive", CatalogMessage::default()), ("dead", dead)]);

    let cleaned = clean_obsolete(catalog);

    assert_eq!(keys(&cleaned), vec!["alive"]);
}

#[test]
fn should_drop_a_fully_obsolete_context_bucket() {
    let mut dead = CatalogMessage::default();
    dead.obsolete = true;
    let mut bucket = IndexMap::new();
    bucket.insert("Open".to_string(), dead);
    let mut catalog = Catalog::new();
    catalog.insert("menu".to_string(), Entry::Context(bucket));

    let cleaned = clean_obsolete(catalog);

    assert!(cleaned.is_empty());
}

#[test]
fn should_keep_a_partially_live_context_bucket() {
    let mut dead = CatalogMessage::default();
    dead.obsolete = true;
    let mut bucket = IndexMap::new();
    bucket.insert("Open".to_string(), CatalogMessage::default());
    bucket.insert("Close".to_string(), dead);
    let mut catalog = Catalog::new();
    catalog.insert("menu".to_string(), Entry::Context(bucket));

    let cleaned = clean_obsolete(catalog);

    let menu = cleaned["menu"].as_context().unwrap();
    assert_eq!(menu.keys().collect::<Vec<_>>(), vec!["Open"]);
}
