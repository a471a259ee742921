mod common;

use common::{builder, temp_path};
use json_vault::{json, Error, RootKind, ValidationError, Value};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

fn open_dict(name: &str) -> (tempfile::TempDir, std::sync::Arc<json_vault::Database>) {
    let (dir, path) = temp_path(name);
    let db = builder(&path).root(RootKind::Object).open().unwrap();
    (dir, db)
}

#[test]
fn get_or_falls_back() {
    let (_dir, db) = open_dict("get_or");
    let dict = db.dict().unwrap();
    dict.insert("a", &1).unwrap();
    assert_eq!(dict.get_or("a", json!(0)).unwrap(), json!(1));
    assert_eq!(dict.get_or("b", json!("fallback")).unwrap(), json!("fallback"));
    assert!(matches!(dict.get("b"), Err(Error::Key(_))));
}

#[test]
fn insert_returns_previous() {
    let (_dir, db) = open_dict("insert_prev");
    let dict = db.dict().unwrap();
    assert_eq!(dict.insert("k", "v1").unwrap(), None);
    assert_eq!(dict.insert("k", "v2").unwrap(), Some(json!("v1")));
    assert!(dict.contains_key("k").unwrap());
}

#[test]
fn keys_values_items_keep_insertion_order() {
    let (_dir, db) = open_dict("order");
    let dict = db.dict().unwrap();
    dict.insert("z", &1).unwrap();
    dict.insert("a", &2).unwrap();
    dict.insert("m", &3).unwrap();

    assert_eq!(dict.keys().unwrap().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    assert_eq!(
        dict.values().unwrap().collect::<Vec<_>>(),
        vec![json!(1), json!(2), json!(3)]
    );
    let items: Vec<(String, Value)> = dict.items().unwrap().collect();
    assert_eq!(items[1], ("a".to_string(), json!(2)));
}

#[test]
fn key_iteration_is_a_snapshot() {
    let (_dir, db) = open_dict("snapshot");
    let dict = db.dict().unwrap();
    dict.insert("a", &1).unwrap();
    let keys = dict.keys().unwrap();
    dict.insert("b", &2).unwrap();
    assert_eq!(keys.count(), 1);
}

#[test]
fn pop_missing_returns_fallback() {
    let (_dir, db) = open_dict("pop_fallback");
    let dict = db.dict().unwrap();
    dict.insert("present", &true).unwrap();
    assert_eq!(
        dict.pop("missing", json!("fallback")).unwrap(),
        json!("fallback")
    );
    assert_eq!(dict.pop("present", Value::Null).unwrap(), json!(true));
    assert!(dict.is_empty().unwrap());
}

#[test]
fn pop_last_removes_most_recent() {
    let (_dir, db) = open_dict("pop_last");
    let dict = db.dict().unwrap();
    dict.insert("first", &1).unwrap();
    dict.insert("second", &2).unwrap();
    dict.insert("first", &10).unwrap();
    assert_eq!(dict.pop_last().unwrap(), ("second".to_string(), json!(2)));
    assert_eq!(dict.pop_last().unwrap(), ("first".to_string(), json!(10)));
    assert!(matches!(dict.pop_last(), Err(Error::Key(_))));
}

#[test]
fn pop_preserves_order_of_the_rest() {
    let (_dir, db) = open_dict("pop_order");
    let dict = db.dict().unwrap();
    for k in ["a", "b", "c", "d"] {
        dict.insert(k, k).unwrap();
    }
    dict.pop("b", Value::Null).unwrap();
    assert_eq!(dict.keys().unwrap().collect::<Vec<_>>(), vec!["a", "c", "d"]);
}

#[test]
fn set_default_only_inserts_once() {
    let (_dir, db) = open_dict("set_default");
    let dict = db.dict().unwrap();
    assert_eq!(dict.set_default("n", &1).unwrap(), json!(1));
    assert_eq!(dict.set_default("n", &2).unwrap(), json!(1));
    assert_eq!(db.copy(), json!({"n": 1}));
}

#[test]
fn update_merges_maps_and_structs() {
    #[derive(Serialize)]
    struct Profile {
        name: &'static str,
        age: u8,
    }

    let (_dir, db) = open_dict("update");
    let dict = db.dict().unwrap();
    dict.insert("name", "old").unwrap();
    dict.update(&Profile {
        name: "new",
        age: 30,
    })
    .unwrap();
    let mut more = BTreeMap::new();
    more.insert("city".to_string(), "Oslo");
    dict.update(&more).unwrap();
    assert_eq!(db.copy(), json!({"name": "new", "age": 30, "city": "Oslo"}));
}

#[test]
fn update_rejects_whole_batch() {
    let (_dir, db) = open_dict("update_reject");
    let dict = db.dict().unwrap();
    dict.insert("keep", &1).unwrap();

    let mut bad = HashMap::new();
    bad.insert(1, "one");
    let err = dict.update(&bad).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::NonStringKey(_))
    ));

    #[derive(Serialize)]
    struct Batch {
        fine: i32,
        broken: f64,
    }
    let err = dict
        .update(&Batch {
            fine: 1,
            broken: f64::INFINITY,
        })
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(db.copy(), json!({"keep": 1}));
}

#[test]
fn update_needs_entries() {
    let (_dir, db) = open_dict("update_shape");
    let dict = db.dict().unwrap();
    assert!(matches!(dict.update(&[1, 2]), Err(Error::TypeMismatch(_))));
}

#[test]
fn dict_view_on_array_root_is_rejected() {
    let (_dir, path) = temp_path("dict_on_array");
    let db = builder(&path).root(RootKind::Array).open().unwrap();
    assert!(matches!(db.dict(), Err(Error::TypeMismatch(_))));
}
