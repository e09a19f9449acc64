use super::*;

#[test]
fn builder_collects_filters_orders_and_page() {
    let query = Query::for_kind("Book")
        .project("project")
        .namespace("ns")
        .filter(Filter::new("genre", CompareOp::Eq, "sci-fi"))
        .order_by("title")
        .order_by_desc("year")
        .project_property("title")
        .limit(50)
        .offset(5);

    assert_eq!(query.kind.as_deref(), Some("Book"));
    assert_eq!(query.project.as_deref(), Some("project"));
    assert_eq!(query.namespace.as_deref(), Some("ns"));
    assert_eq!(
        query.filters,
        vec![Filter::new("genre", CompareOp::Eq, Value::from("sci-fi"))]
    );
    assert_eq!(query.order, vec![Order::asc("title"), Order::desc("year")]);
    assert_eq!(query.projection, vec!["title".to_string()]);
    assert_eq!(query.limit, Some(50));
    assert_eq!(query.offset, Some(5));
}

#[test]
fn compare_op_renders_store_symbols() {
    let rendered: Vec<String> = [
        CompareOp::Lt,
        CompareOp::Lte,
        CompareOp::Eq,
        CompareOp::Gt,
        CompareOp::Gte,
    ]
    .iter()
    .map(ToString::to_string)
    .collect();

    assert_eq!(rendered, vec!["<", "<=", "=", ">", ">="]);
    assert!(!CompareOp::Eq.is_inequality());
    assert!(CompareOp::Gte.is_inequality());
}

#[test]
fn key_bounds_read_injected_key_filters_only() {
    let lower = Key::new("p", "Book", 1);
    let upper = Key::new("p", "Book", 9);
    let query = Query::for_kind("Book")
        .filter(Filter::new("prop1", CompareOp::Gte, 4_i64))
        .filter(Filter::key_gte(lower.clone()))
        .filter(Filter::key_lt(upper.clone()));

    assert_eq!(query.key_lower_bound(), Some(&lower));
    assert_eq!(query.key_upper_bound(), Some(&upper));
    assert_eq!(query.property_filters().count(), 1);
    assert_eq!(
        Filter::key_lt(upper).to_string(),
        "__key__ < key(p/Book(9))"
    );
}

#[test]
fn query_without_key_filters_has_no_bounds() {
    let query = Query::for_kind("Book").filter(Filter::new("prop1", CompareOp::Gt, "value1"));

    assert_eq!(query.key_lower_bound(), None);
    assert_eq!(query.key_upper_bound(), None);
}

#[test]
fn query_serializes_for_worker_handoff() {
    let query = Query::for_kind("Book")
        .filter(Filter::key_gte(Key::new("p", "Book", "a").child("Page", 3)))
        .limit(10);

    let json = serde_json::to_string(&query).expect("query should serialize");
    let decoded: Query = serde_json::from_str(&json).expect("query should deserialize");

    assert_eq!(decoded, query);
}
