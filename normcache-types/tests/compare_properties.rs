use normcache_types::{compare_ids, compare_values};
use proptest::prelude::*;
use serde_json::Value;

/// Strategy over JSON values shaped like query variables: primitives,
/// arrays, and string-keyed objects, nested a few levels deep.
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-z]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn compare_values_is_symmetric(a in arb_json(), b in arb_json()) {
        prop_assert_eq!(compare_values(&a, &b), compare_values(&b, &a));
    }

    #[test]
    fn compare_values_is_reflexive(a in arb_json()) {
        prop_assert!(compare_values(&a, &a));
    }

    #[test]
    fn compare_ids_is_symmetric(a in arb_json(), b in arb_json()) {
        prop_assert_eq!(compare_ids(&a, &b), compare_ids(&b, &a));
    }

    #[test]
    fn compare_ids_reflexive_only_for_primitives(a in arb_json()) {
        let valid = a.is_string() || a.is_number();
        prop_assert_eq!(compare_ids(&a, &a), valid);
    }
}
