//! End-to-end tests for the shredding pipeline

use serde_json::{json, Value};
use shaledb::{
    DocPath, DocumentId, DocumentLimits, IdStrategy, IndexingProjector, ShreddedDocument,
    Shredder,
};
use uuid::Uuid;

fn path(s: &str) -> DocPath {
    s.parse().unwrap()
}

fn shredder() -> Shredder {
    Shredder::new(DocumentLimits::default())
}

fn shred(doc: Value) -> ShreddedDocument {
    shredder().shred(&doc).unwrap()
}

// === Identity ===

#[test]
fn generated_id_is_first_property_of_serialized_text() {
    let record = shred(json!({"z": 26, "a": 1}));
    assert!(record.doc_json().starts_with("{\"_id\":"));
    // Remaining properties keep their incoming order.
    let reparsed: Value = serde_json::from_str(record.doc_json()).unwrap();
    let keys: Vec<&String> = reparsed.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["_id", "z", "a"]);
}

#[test]
fn existing_id_is_reordered_not_regenerated() {
    let record = shred(json!({"data": 1, "_id": 42}));
    assert_eq!(
        record.id(),
        &DocumentId::Number(serde_json::Number::from(42))
    );
    let reparsed: Value = serde_json::from_str(record.doc_json()).unwrap();
    let keys: Vec<&String> = reparsed.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["_id", "data"]);
}

#[test]
fn each_id_strategy_round_trips_through_shred() {
    for (strategy, expect_wrapped) in [
        (IdStrategy::LegacyUuid, false),
        (IdStrategy::WrappedUuid, true),
        (IdStrategy::WrappedUuidV6, true),
        (IdStrategy::WrappedUuidV7, true),
        (IdStrategy::WrappedObjectId, true),
    ] {
        let shredder = Shredder::with_id_strategy(DocumentLimits::default(), strategy);
        let record = shredder.shred(&json!({"a": 1})).unwrap();
        match record.id() {
            DocumentId::String(s) => {
                assert!(!expect_wrapped, "{:?} should wrap", strategy);
                assert!(Uuid::parse_str(s).is_ok());
            }
            DocumentId::Uuid(_) | DocumentId::ObjectId(_) => {
                assert!(expect_wrapped, "{:?} should not wrap", strategy)
            }
            other => panic!("unexpected id {:?} for {:?}", other, strategy),
        }
    }
}

#[test]
fn extension_ids_survive_shredding() {
    let doc = json!({"_id": {"$uuid": "123e4567-e89b-42d3-a456-426614174000"}, "a": 1});
    let record = shred(doc);
    assert!(matches!(record.id(), DocumentId::Uuid(_)));
    assert!(record
        .doc_json()
        .starts_with("{\"_id\":{\"$uuid\":\"123e4567-e89b-42d3-a456-426614174000\"}"));

    let date_doc = json!({"_id": {"$date": 1672531200000i64}});
    let record = shredder().shred(&date_doc).unwrap();
    assert!(matches!(record.id(), DocumentId::Date(_)));
}

// === Facts over a realistic document ===

#[test]
fn full_document_produces_expected_fact_collections() {
    let record = shred(json!({
        "_id": "order-1",
        "customer": {"name": "Ada", "vip": true},
        "items": [
            {"sku": "a1", "qty": 2},
            {"sku": "b2", "qty": 1}
        ],
        "total": 31.5,
        "note": null
    }));

    // Existence covers every addressable path.
    for p in [
        "_id",
        "customer",
        "customer.name",
        "customer.vip",
        "items",
        "items.0",
        "items.0.sku",
        "items.0.qty",
        "items.1",
        "items.1.sku",
        "items.1.qty",
        "total",
        "note",
    ] {
        assert!(record.exist_keys().contains(&path(p)), "missing {}", p);
    }

    // One typed scalar fact per leaf.
    assert_eq!(record.query_text_values()[&path("_id")], "order-1");
    assert_eq!(record.query_text_values()[&path("customer.name")], "Ada");
    assert!(record.query_bool_values()[&path("customer.vip")]);
    assert_eq!(record.query_number_values()[&path("total")].as_f64(), Some(31.5));
    assert!(record.query_null_values().contains(&path("note")));

    // Container facts.
    assert!(record.sub_doc_equals().contains_key(&path("customer")));
    assert!(record.sub_doc_equals().contains_key(&path("items.0")));
    assert_eq!(record.array_size()[&path("items")], 2);
    assert!(record.array_equals().contains_key(&path("items")));
    assert_eq!(
        record
            .array_contains()
            .iter()
            .filter(|k| k.path == path("items"))
            .count(),
        2
    );
}

#[test]
fn shred_is_idempotent() {
    let doc = json!({
        "_id": "d",
        "nested": {"a": [1, {"b": null}], "c": "text"},
        "$vector": [0.1, 0.2],
        "flag": false
    });
    assert_eq!(shred(doc.clone()), shred(doc));
}

#[test]
fn identical_subtrees_share_digests_across_documents() {
    let a = shred(json!({"_id": "a", "sub": {"x": 1, "y": [true]}}));
    let b = shred(json!({"_id": "b", "sub": {"x": 1, "y": [true]}}));
    assert_eq!(
        a.sub_doc_equals()[&path("sub")],
        b.sub_doc_equals()[&path("sub")]
    );
}

#[test]
fn property_order_changes_sub_document_digest() {
    let ab: Value = serde_json::from_str(r#"{"_id":"d","sub":{"a":1,"b":2}}"#).unwrap();
    let ba: Value = serde_json::from_str(r#"{"_id":"d","sub":{"b":2,"a":1}}"#).unwrap();
    assert_ne!(
        shred(ab).sub_doc_equals()[&path("sub")],
        shred(ba).sub_doc_equals()[&path("sub")]
    );
}

#[test]
fn element_order_changes_array_digest_but_not_containment() {
    let fwd = shred(json!({"_id": "d", "arr": ["x", "y"]}));
    let rev = shred(json!({"_id": "d", "arr": ["y", "x"]}));
    assert_ne!(
        fwd.array_equals()[&path("arr")],
        rev.array_equals()[&path("arr")]
    );
    assert_eq!(fwd.array_contains(), rev.array_contains());
}

// === Limits ===

#[test]
fn array_boundary_is_exact() {
    let limits = DocumentLimits::with_small_limits();
    let shredder = Shredder::new(limits.clone());

    let at_limit: Vec<i64> = (0..limits.max_array_length as i64).collect();
    assert!(shredder.shred(&json!({"_id": "d", "arr": at_limit})).is_ok());

    let over: Vec<i64> = (0..=limits.max_array_length as i64).collect();
    let err = shredder
        .shred(&json!({"_id": "d", "arr": over}))
        .unwrap_err();
    assert_eq!(err.code(), "SHRED_DOC_LIMIT_VIOLATION");
    let msg = err.to_string();
    assert!(msg.contains(&format!("({})", limits.max_array_length + 1)));
    assert!(msg.contains(&format!("({})", limits.max_array_length)));
}

#[test]
fn structural_violations_surface_with_codes() {
    let limits = DocumentLimits::with_small_limits();
    let shredder = Shredder::new(limits.clone());

    let err = shredder.shred(&json!({"bad name": 1})).unwrap_err();
    assert_eq!(err.code(), "SHRED_DOC_KEY_NAME_VIOLATION");

    let key = "k".repeat(limits.max_property_path_length + 1);
    let err = shredder.shred(&json!({ key: 1 })).unwrap_err();
    assert_eq!(err.code(), "SHRED_DOC_LIMIT_VIOLATION");

    let err = shredder.shred(&json!([1])).unwrap_err();
    assert_eq!(err.code(), "SHRED_BAD_DOCUMENT_TYPE");
}

// === Vector fields ===

#[test]
fn vector_and_vectorize_facts() {
    let record = shred(json!({
        "_id": "d",
        "$vector": [1.0, -2.5, 3.25],
        "$vectorize": "the source text"
    }));
    assert_eq!(
        record.query_vector_values()[&path("$vector")],
        vec![1.0, -2.5, 3.25]
    );
    assert!(record.query_vectorize_values().contains(&path("$vectorize")));
    // Neither produces generic array/string facts.
    assert!(record.array_size().is_empty());
    assert!(record.query_text_values().len() == 1); // only _id
}

#[test]
fn vector_error_cases() {
    assert_eq!(
        shredder()
            .shred(&json!({"_id": "d", "$vector": []}))
            .unwrap_err()
            .code(),
        "SHRED_BAD_VECTOR_SIZE"
    );
    assert_eq!(
        shredder()
            .shred(&json!({"_id": "d", "$vector": {"not": "array"}}))
            .unwrap_err()
            .code(),
        "SHRED_BAD_VECTOR_TYPE"
    );
}

// === Projection ===

#[test]
fn excluded_branches_are_unindexed_but_stored() {
    let projector = IndexingProjector::excluding(["private"]);
    let doc = json!({"_id": "d", "public": 1, "private": {"secret": true}});
    let record = shredder().shred_with(&doc, None, &projector).unwrap();

    assert!(record.exist_keys().contains(&path("public")));
    assert!(!record.exist_keys().contains(&path("private")));
    assert!(!record.exist_keys().contains(&path("private.secret")));
    assert!(record.doc_json().contains("secret"));
}

#[test]
fn include_projection_keeps_id() {
    let projector = IndexingProjector::including(["kept"]);
    let doc = json!({"_id": "d", "kept": 1, "dropped": 2});
    let record = shredder().shred_with(&doc, None, &projector).unwrap();
    assert!(record.exist_keys().contains(&path("_id")));
    assert!(record.exist_keys().contains(&path("kept")));
    assert!(!record.exist_keys().contains(&path("dropped")));
}

#[test]
fn tx_id_is_carried() {
    let tx = Uuid::new_v4();
    let record = shredder()
        .shred_with(&json!({"_id": "d"}), Some(tx), &IndexingProjector::identity())
        .unwrap();
    assert_eq!(record.tx_id(), Some(tx));
}
