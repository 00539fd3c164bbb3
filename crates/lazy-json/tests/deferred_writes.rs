use lazy_json::{Json, SmartPath};

#[test]
fn autovivification_fills_holes_with_null() {
    let doc = Json::new();
    doc.get("a[0].b").set(&123).unwrap();
    assert_eq!(doc.raw_string(), r#"{"a":[{"b":123}]}"#);

    doc.get("a[2]").set(&true).unwrap();
    assert_eq!(doc.raw_string(), r#"{"a":[{"b":123},null,true]}"#);
}

#[test]
fn unwritten_placeholders_leave_no_trace() {
    let doc = Json::from_text(r#"{"a":1}"#);
    let deep = doc.get("x.y[3].z");
    assert!(!deep.exists());
    assert_eq!(deep.raw_string(), "");
    assert_eq!(doc.raw_string(), r#"{"a":1}"#);
}

#[test]
fn negative_index_resolves_at_commit() {
    let doc = Json::from_text("[]");
    let first = doc.array_index(-1);
    let second = doc.array_index(-1);
    first.set(&1).unwrap();
    assert_eq!(doc.raw_string(), "[1]");
    second.set(&2).unwrap();
    assert_eq!(doc.raw_string(), "[2]");
    assert_eq!(first.int(), 1);
}

#[test]
fn last_write_wins_same_slot() {
    let doc = Json::new();
    let one = doc.get("k");
    let two = doc.get("k");
    two.set(&2).unwrap();
    one.set(&1).unwrap();
    assert_eq!(doc.raw_string(), r#"{"k":1}"#);
    two.set(&3).unwrap();
    assert_eq!(doc.raw_string(), r#"{"k":1}"#);
}

#[test]
fn sibling_paths_share_intermediates() {
    let doc = Json::new();
    let x = doc.get("cfg.db.host");
    let y = doc.get("cfg.db.port");
    let z = doc.get("cfg.name");
    y.set(&5432).unwrap();
    x.set("localhost").unwrap();
    z.set("svc").unwrap();
    assert_eq!(
        doc.raw_string(),
        r#"{"cfg":{"db":{"port":5432,"host":"localhost"},"name":"svc"}}"#
    );
}

#[test]
fn intermediate_placeholder_merges_into_occupied_slot() {
    let doc = Json::new();
    let x = doc.get("a.x");
    let y = doc.get("a.y");
    x.set(&1).unwrap();
    y.set(&2).unwrap();
    assert_eq!(doc.raw_string(), r#"{"a":{"x":1,"y":2}}"#);
    assert_eq!(doc.get("a.x").int(), 1);
}

#[test]
fn removal_is_idempotent() {
    let doc = Json::from_text(r#"{"a":1,"b":[1,2]}"#);
    let a = doc.get("a");
    a.remove();
    a.remove();
    assert_eq!(doc.raw_string(), r#"{"b":[1,2]}"#);

    doc.get("never.attached").remove();
    doc.get("b[9]").remove();
    assert_eq!(doc.raw_string(), r#"{"b":[1,2]}"#);
}

#[test]
fn removed_cell_keeps_its_value_but_writes_stay_local() {
    let doc = Json::from_text(r#"{"a":{"x":1}}"#);
    let a = doc.get("a");
    a.remove();
    assert_eq!(a.raw_string(), r#"{"x":1}"#);
    a.get("x").set(&2).unwrap();
    assert_eq!(a.raw_string(), r#"{"x":2}"#);
    assert_eq!(doc.raw_string(), "{}");
}

#[test]
fn kind_switch_orphans_old_children() {
    let doc = Json::from_text(r#"{"a":1}"#);
    let a = doc.get("a");
    doc.array_index(0).set("x").unwrap();
    assert_eq!(doc.raw_string(), r#"["x"]"#);
    assert_eq!(a.raw_string(), "1");
    a.set(&5).unwrap();
    assert_eq!(doc.raw_string(), r#"["x"]"#);
}

#[test]
fn stale_placeholder_is_discarded() {
    let doc = Json::from_text(r#"{"a":1}"#);
    let deep = doc.get("a.b");
    doc.get("a").set("replaced").unwrap();
    deep.set(&2).unwrap();
    assert_eq!(doc.raw_string(), r#"{"a":"replaced"}"#);
    assert_eq!(deep.int(), 2);
}

#[test]
fn stale_after_root_kind_switch() {
    let doc = Json::new();
    let key = doc.get("k");
    let idx = doc.array_index(0);
    idx.set(&1).unwrap();
    key.set(&2).unwrap();
    assert_eq!(doc.raw_string(), "[1]");
}

#[test]
fn unchanged_scalar_becomes_container() {
    let doc = Json::from_text(r#"{"a":1}"#);
    doc.get("a.b").set(&2).unwrap();
    assert_eq!(doc.raw_string(), r#"{"a":{"b":2}}"#);
}

#[test]
fn untouched_members_stay_verbatim() {
    let doc = Json::from_text(r#"{"big": 1.000000000000000000001, "s": "é", "o": {"k": [1, 2]}}"#);
    doc.get("new").set(&1).unwrap();
    assert_eq!(
        doc.raw_string(),
        r#"{"big":1.000000000000000000001,"s":"é","o":{"k": [1, 2]},"new":1}"#
    );
}

#[test]
fn no_html_escaping() {
    let doc = Json::new();
    doc.get("<tag>").set("a&b").unwrap();
    assert_eq!(doc.raw_string(), r#"{"<tag>":"a&b"}"#);
}

#[test]
fn duplicate_keys_are_kept_structurally() {
    let doc = Json::from_text(r#"{"a":1,"b":2,"a":3}"#);
    assert_eq!(doc.get("a").int(), 3);
    assert_eq!(doc.keys(), ["a", "b", "a"]);
    assert_eq!(doc.len(), 3);

    doc.get("b").set(&0).unwrap();
    assert_eq!(doc.raw_string(), r#"{"a":3,"b":0,"a":3}"#);

    doc.get("a").remove();
    assert_eq!(doc.raw_string(), r#"{"b":0,"a":null}"#);

    // The leftover occurrence picks up the new value too.
    doc.get("a").set(&9).unwrap();
    assert_eq!(doc.raw_string(), r#"{"b":0,"a":9,"a":9}"#);
    assert_eq!(doc.keys(), ["b", "a", "a"]);
}

#[test]
fn compiled_path_is_reusable() {
    let path = SmartPath::parse("items[-1].id").unwrap();
    let one = Json::from_text(r#"{"items":[{"id":1},{"id":2}]}"#);
    let two = Json::from_text(r#"{"items":[{"id":7}]}"#);
    assert_eq!(one.get_path(&path).int(), 2);
    assert_eq!(two.get_path(&path).int(), 7);
}

#[test]
fn numeric_key_creates_object_on_absent_value() {
    let doc = Json::new();
    doc.get("list.0").set(&1).unwrap();
    assert_eq!(doc.raw_string(), r#"{"list":{"0":1}}"#);
}

#[test]
fn embedded_placeholder_commits_into_wrapper() {
    let doc = Json::from_text(r#"{"s":"{}"}"#);
    doc.get("s.k").set("v").unwrap();
    assert_eq!(doc.raw_string(), r#"{"s":"{\"k\":\"v\"}"}"#);
    assert_eq!(doc.get("s.k").str(), "v");
}
