#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use strata_core::{OptionPath, StrataError};
    use strata_nested::{Tree, flatten, get, get_mut, has, remove, set};

    fn path(key: &str) -> OptionPath {
        OptionPath::parse(key).unwrap()
    }

    fn tree(value: Value) -> Tree {
        value.as_object().cloned().expect("fixture must be an object")
    }

    // ── get / has ──────────────────────────────────────────────

    #[test]
    fn test_get_top_level() {
        let t = tree(json!({ "port": 8080 }));
        assert_eq!(get(&t, &path("port")), Some(&json!(8080)));
        assert_eq!(get(&t, &path("host")), None);
    }

    #[test]
    fn test_get_nested() {
        let t = tree(json!({ "db": { "pool": { "max": 10 } } }));
        assert_eq!(get(&t, &path("db.pool.max")), Some(&json!(10)));
        assert_eq!(get(&t, &path("db.pool")), Some(&json!({ "max": 10 })));
    }

    #[test]
    fn test_get_missing_intermediate_creates_nothing() {
        let t = tree(json!({ "a": 1 }));
        assert_eq!(get(&t, &path("x.y.z")), None);
        assert_eq!(t, tree(json!({ "a": 1 })));
    }

    #[test]
    fn test_get_through_scalar_is_absent() {
        let t = tree(json!({ "a": 1 }));
        assert_eq!(get(&t, &path("a.b")), None);
        assert!(!has(&t, &path("a.b")));
    }

    #[test]
    fn test_has_counts_falsy_values() {
        let t = tree(json!({
            "zero": 0,
            "empty": "",
            "off": false,
            "nothing": null,
            "nested": { "none": null }
        }));
        for key in ["zero", "empty", "off", "nothing", "nested.none"] {
            assert!(has(&t, &path(key)), "{key} should be present");
        }
        assert!(!has(&t, &path("nested.other")));
        assert!(!has(&t, &path("missing.none")));
    }

    #[test]
    fn test_get_mut_edits_in_place() {
        let mut t = tree(json!({ "db": { "port": 5432 } }));
        *get_mut(&mut t, &path("db.port")).unwrap() = json!(6543);
        assert_eq!(get(&t, &path("db.port")), Some(&json!(6543)));
        assert!(get_mut(&mut t, &path("db.host")).is_none());
    }

    // ── set ────────────────────────────────────────────────────

    #[test]
    fn test_set_then_get_on_empty() {
        for key in ["a", "a.b", "a.b.c.d"] {
            let mut t = Tree::new();
            set(&mut t, &path(key), json!("v")).unwrap();
            assert!(has(&t, &path(key)));
            assert_eq!(get(&t, &path(key)), Some(&json!("v")));
        }
    }

    #[test]
    fn test_set_creates_intermediates() {
        let mut t = Tree::new();
        set(&mut t, &path("db.host"), json!("x")).unwrap();
        set(&mut t, &path("db.port"), json!(5432)).unwrap();
        assert_eq!(Value::Object(t), json!({ "db": { "host": "x", "port": 5432 } }));
    }

    #[test]
    fn test_set_returns_previous_value() {
        let mut t = tree(json!({ "a": 1 }));
        assert_eq!(set(&mut t, &path("a"), json!(2)).unwrap(), Some(json!(1)));
        assert_eq!(set(&mut t, &path("b"), json!(3)).unwrap(), None);
    }

    #[test]
    fn test_set_replaces_object_with_scalar() {
        let mut t = tree(json!({ "db": { "host": "x" } }));
        set(&mut t, &path("db"), json!(false)).unwrap();
        assert_eq!(Value::Object(t), json!({ "db": false }));
    }

    #[test]
    fn test_set_through_scalar_replaces_it() {
        let mut t = tree(json!({ "db": "sqlite" }));
        set(&mut t, &path("db.host"), json!("x")).unwrap();
        assert_eq!(Value::Object(t), json!({ "db": { "host": "x" } }));
    }

    #[test]
    fn test_set_leaves_siblings_alone() {
        let mut t = tree(json!({ "db": { "host": "x", "port": 1 }, "debug": true }));
        set(&mut t, &path("db.port"), json!(2)).unwrap();
        assert_eq!(
            Value::Object(t),
            json!({ "db": { "host": "x", "port": 2 }, "debug": true })
        );
    }

    // ── remove ─────────────────────────────────────────────────

    #[test]
    fn test_remove_after_set() {
        let mut t = Tree::new();
        set(&mut t, &path("a.b.c"), json!(1)).unwrap();
        assert_eq!(remove(&mut t, &path("a.b.c")), Some(json!(1)));
        assert!(!has(&t, &path("a.b.c")));
        // Intermediate levels stay behind.
        assert!(has(&t, &path("a.b")));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut t = tree(json!({ "a": { "b": 1, "c": 2 } }));
        remove(&mut t, &path("a.b"));
        let once = t.clone();
        assert_eq!(remove(&mut t, &path("a.b")), None);
        assert_eq!(t, once);
    }

    #[test]
    fn test_remove_missing_intermediate_is_noop() {
        let mut t = tree(json!({ "a": 1 }));
        assert_eq!(remove(&mut t, &path("x.y")), None);
        assert_eq!(remove(&mut t, &path("a.b")), None);
        assert_eq!(t, tree(json!({ "a": 1 })));
    }

    #[test]
    fn test_remove_preserves_sibling_order() {
        let mut t = tree(json!({ "a": 1, "b": 2, "c": 3 }));
        remove(&mut t, &path("a"));
        let keys: Vec<&String> = t.keys().collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    // ── arrays ─────────────────────────────────────────────────

    #[test]
    fn test_get_and_has_index_into_arrays() {
        let t = tree(json!({
            "tags": ["a", "b"],
            "servers": [{ "host": "x" }, { "host": "y" }]
        }));
        assert_eq!(get(&t, &path("tags.0")), Some(&json!("a")));
        assert_eq!(get(&t, &path("tags.1")), Some(&json!("b")));
        assert_eq!(get(&t, &path("servers.1.host")), Some(&json!("y")));
        assert!(has(&t, &path("tags.0")));
        assert!(has(&t, &path("servers.0.host")));
        for key in ["tags.2", "tags.01", "tags.+1", "tags.x", "servers.0.port"] {
            assert!(!has(&t, &path(key)), "{key} should be absent");
        }
    }

    #[test]
    fn test_get_mut_edits_array_element() {
        let mut t = tree(json!({ "servers": [{ "host": "x" }] }));
        *get_mut(&mut t, &path("servers.0.host")).unwrap() = json!("y");
        assert_eq!(Value::Object(t), json!({ "servers": [{ "host": "y" }] }));
    }

    #[test]
    fn test_set_array_element_keeps_array() {
        let mut t = tree(json!({ "tags": ["a", "b"] }));
        let previous = set(&mut t, &path("tags.0"), json!("z")).unwrap();
        assert_eq!(previous, Some(json!("a")));
        assert_eq!(Value::Object(t), json!({ "tags": ["z", "b"] }));
    }

    #[test]
    fn test_set_one_past_end_appends() {
        let mut t = tree(json!({ "tags": ["a", "b"], "servers": [] }));
        assert_eq!(set(&mut t, &path("tags.2"), json!("c")).unwrap(), None);
        set(&mut t, &path("servers.0.host"), json!("x")).unwrap();
        assert_eq!(
            Value::Object(t),
            json!({ "tags": ["a", "b", "c"], "servers": [{ "host": "x" }] })
        );
    }

    #[test]
    fn test_set_inside_array_element() {
        let mut t = tree(json!({ "servers": [{ "host": "x" }, 7] }));
        set(&mut t, &path("servers.0.port"), json!(80)).unwrap();
        set(&mut t, &path("servers.1.host"), json!("y")).unwrap();
        assert_eq!(
            Value::Object(t),
            json!({ "servers": [{ "host": "x", "port": 80 }, { "host": "y" }] })
        );
    }

    #[test]
    fn test_set_bad_array_index_is_conflict() {
        let mut t = tree(json!({ "tags": ["a", "b"] }));
        for key in ["tags.5", "tags.x", "tags.01", "tags.3.name"] {
            let err = set(&mut t, &path(key), json!("z")).unwrap_err();
            assert!(
                matches!(err, StrataError::PathConflict { ref path, .. } if path == key),
                "{key}: {err}"
            );
        }
        assert_eq!(Value::Object(t), json!({ "tags": ["a", "b"] }));
    }

    #[test]
    fn test_remove_through_array() {
        let mut t = tree(json!({ "servers": [{ "host": "x", "port": 1 }] }));
        assert_eq!(remove(&mut t, &path("servers.0.port")), Some(json!(1)));
        assert_eq!(Value::Object(t), json!({ "servers": [{ "host": "x" }] }));
    }

    #[test]
    fn test_remove_array_element_is_noop() {
        let mut t = tree(json!({ "tags": ["a", "b"] }));
        assert_eq!(remove(&mut t, &path("tags.0")), None);
        assert_eq!(remove(&mut t, &path("tags.9.x")), None);
        assert_eq!(Value::Object(t), json!({ "tags": ["a", "b"] }));
    }

    // ── flatten ────────────────────────────────────────────────

    #[test]
    fn test_flatten_leaves_in_order() {
        let t = tree(json!({
            "debug": true,
            "db": { "host": "x", "pool": { "max": 5 } },
            "tags": ["a", "b"]
        }));
        let leaves: Vec<(String, Value)> = flatten(&t)
            .unwrap()
            .into_iter()
            .map(|(p, v)| (p.to_string(), v))
            .collect();
        assert_eq!(
            leaves,
            vec![
                ("debug".to_string(), json!(true)),
                ("db.host".to_string(), json!("x")),
                ("db.pool.max".to_string(), json!(5)),
                ("tags".to_string(), json!(["a", "b"])),
            ]
        );
    }

    #[test]
    fn test_flatten_keeps_empty_object_as_leaf() {
        let t = tree(json!({ "extra": {} }));
        let leaves = flatten(&t).unwrap();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].0.to_string(), "extra");
        assert_eq!(leaves[0].1, json!({}));
    }

    #[test]
    fn test_flatten_rejects_dotted_key() {
        let t = tree(json!({ "db": { "a.b": 1 } }));
        assert!(flatten(&t).is_err());
    }

    #[test]
    fn test_flatten_then_set_rebuilds_tree() {
        let original = tree(json!({ "a": { "b": 1, "c": { "d": [1, 2] } }, "e": null }));
        let mut rebuilt = Tree::new();
        for (p, v) in flatten(&original).unwrap() {
            set(&mut rebuilt, &p, v).unwrap();
        }
        assert_eq!(rebuilt, original);
    }
}
