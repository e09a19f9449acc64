use super::*;
use proptest::prelude::*;

const PROJECT: &str = "project";
const NAMESPACE: &str = "namespace";

#[test]
fn id_or_name_accessors_match_variant() {
    let id = IdOrName::from(1);
    assert_eq!(id.id(), Some(1));
    assert_eq!(id.name(), None);

    let name = IdOrName::from("1");
    assert_eq!(name.id(), None);
    assert_eq!(name.name(), Some("1"));

    assert_eq!(IdOrName::from(1), IdOrName::Id(1));
    assert_eq!(IdOrName::from("1"), IdOrName::Name("1".to_string()));
}

#[test]
fn id_or_name_orders_ids_before_names() {
    assert!(IdOrName::from(2) < IdOrName::from("1"));
    assert!(IdOrName::from(i64::MAX) < IdOrName::from(""));
    assert!(IdOrName::from(1) < IdOrName::from(2));
    assert!(IdOrName::from(-5) < IdOrName::from(0));
    assert!(IdOrName::from("1") < IdOrName::from("2"));
    assert!(IdOrName::from("a") < IdOrName::from("ab"));
}

#[test]
fn key_sort_matches_store_order() {
    let k = Key::new(PROJECT, "kind1", 1).with_namespace(NAMESPACE);
    let k2 = k.child("kind2", "a");
    let k3 = k.child("kind2", "b");
    let k4 = Key::new(PROJECT, "kind1", "a").with_namespace(NAMESPACE);
    let k5 = Key::new(PROJECT, "kind1", "a");

    let mut keys = vec![
        k5.clone(),
        k.clone(),
        k4.clone(),
        k3.clone(),
        k2.clone(),
        k2.clone(),
        k.clone(),
    ];
    sort_keys(&mut keys);

    assert_eq!(keys, vec![k5, k.clone(), k, k2.clone(), k2, k3, k4]);
}

#[test]
fn key_sort_orders_ids_numerically() {
    let k1 = Key::new(PROJECT, "kind", 2);
    let k2 = Key::new(PROJECT, "kind", 1);
    let mut keys = vec![k1.clone(), k2.clone()];
    sort_keys(&mut keys);

    assert_eq!(keys, vec![k2, k1]);
}

#[test]
fn key_sort_orders_names_lexicographically() {
    let k1 = Key::new(PROJECT, "kind", "2");
    let k2 = Key::new(PROJECT, "kind", "1");
    let mut keys = vec![k1.clone(), k2.clone()];
    sort_keys(&mut keys);

    assert_eq!(keys, vec![k2, k1]);
}

#[test]
fn key_sort_puts_ids_before_names() {
    let k1 = Key::new(PROJECT, "kind", "1");
    let k2 = Key::new(PROJECT, "kind", 2);
    let mut keys = vec![k1.clone(), k2.clone()];
    sort_keys(&mut keys);

    assert_eq!(keys, vec![k2, k1]);
}

#[test]
fn key_siblings_order_by_kind_before_id() {
    let parent = Key::new(PROJECT, "Author", 7);
    let book = parent.child("Book", 900);
    let review = parent.child("Review", 1);

    assert_eq!(compare_keys(&book, &review), Ordering::Less);
}

#[test]
fn key_accessors_and_parent() {
    let root = Key::new(PROJECT, "Author", 7).with_namespace(NAMESPACE);
    let child = root.child("Book", "dune");

    assert_eq!(child.project(), PROJECT);
    assert_eq!(child.namespace(), Some(NAMESPACE));
    assert_eq!(child.kind(), "Book");
    assert_eq!(child.id_or_name(), &IdOrName::from("dune"));
    assert_eq!(child.path().len(), 2);
    assert_eq!(child.parent(), Some(root.clone()));
    assert_eq!(root.parent(), None);
    assert!(root.is_ancestor_of(&child));
    assert!(!child.is_ancestor_of(&root));
    assert!(!root.is_ancestor_of(&root));
}

#[test]
fn key_display_renders_full_path() {
    let key = Key::new(PROJECT, "Author", 7)
        .with_namespace(NAMESPACE)
        .child("Book", "dune");

    assert_eq!(key.to_string(), "project/namespace/Author(7)/Book('dune')");
}

#[test]
fn key_decoding_rejects_empty_path() {
    let key = Key::new(PROJECT, "Author", 7).child("Book", "dune");
    let json = serde_json::to_string(&key).expect("key should serialize");
    let decoded: Key = serde_json::from_str(&json).expect("key should deserialize");
    assert_eq!(decoded, key);

    let empty = r#"{"project":"project","namespace":null,"path":[]}"#;
    let err = serde_json::from_str::<Key>(empty).unwrap_err();
    assert!(err.to_string().contains("at least one element"), "error: {err}");
}

///
/// Properties
///

fn arb_id_or_name() -> impl Strategy<Value = IdOrName> {
    prop_oneof![
        any::<i64>().prop_map(IdOrName::Id),
        "[a-z0-9]{0,6}".prop_map(IdOrName::Name),
    ]
}

fn arb_key() -> impl Strategy<Value = Key> {
    (
        prop_oneof![Just("p1"), Just("p2")],
        prop::option::of(prop_oneof![Just("ns1"), Just("ns2")]),
        prop::collection::vec((prop_oneof![Just("A"), Just("B")], arb_id_or_name()), 1..4),
    )
        .prop_map(|(project, namespace, path)| {
            let mut elements = path.into_iter();
            let (kind, id) = elements.next().expect("path strategy yields at least one element");
            let mut key = Key::new(project, kind, id);
            if let Some(namespace) = namespace {
                key = key.with_namespace(namespace);
            }
            for (kind, id) in elements {
                key = key.child(kind, id);
            }
            key
        })
}

proptest! {
    #[test]
    fn id_always_precedes_name_property(id in any::<i64>(), name in "[a-zA-Z0-9]{0,8}") {
        prop_assert!(IdOrName::Id(id) < IdOrName::Name(name));
    }

    #[test]
    fn id_or_name_matches_natural_order_property(a in any::<i64>(), b in any::<i64>()) {
        prop_assert_eq!(IdOrName::Id(a).cmp(&IdOrName::Id(b)), a.cmp(&b));
    }

    #[test]
    fn ancestor_precedes_descendant_property(
        key in arb_key(),
        kind in prop_oneof![Just("A"), Just("B")],
        id in arb_id_or_name(),
    ) {
        let child = key.child(kind, id);

        prop_assert!(key < child);
        prop_assert!(key.is_ancestor_of(&child));
    }

    #[test]
    fn sorting_sorted_keys_is_idempotent_property(keys in prop::collection::vec(arb_key(), 0..24)) {
        let mut once = keys;
        sort_keys(&mut once);
        let mut twice = once.clone();
        sort_keys(&mut twice);

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn key_ordering_is_antisymmetric_property(a in arb_key(), b in arb_key()) {
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        prop_assert_eq!(a.cmp(&b) == Ordering::Equal, a == b);
    }
}
