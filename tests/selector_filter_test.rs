//! 选择器解析与元数据过滤测试

use flare_naming_core::ErrorCode;
use flare_naming_core::naming::{
    InMemoryRegistry, Instance, MetadataFilter, Selector, SelectorFactor, Service,
};

const NAMESPACE: &str = "public";

fn create_test_registry() -> InMemoryRegistry {
    let registry = InMemoryRegistry::new();
    registry
        .add_or_replace_service(
            Service::new(NAMESPACE, "svcA")
                .with_metadata("env", "prod")
                .with_instance(Instance::new("10.0.0.1", 8080).with_metadata("zone", "a")),
        )
        .expect("store svcA");
    registry
        .add_or_replace_service(
            Service::new(NAMESPACE, "svcB")
                .with_metadata("env", "staging")
                .with_instance(Instance::new("10.0.0.2", 8080).with_metadata("zone", "b"))
                .with_instance(Instance::new("10.0.0.3", 8080).with_metadata("zone", "a")),
        )
        .expect("store svcB");
    registry
        .add_or_replace_service(Service::new(NAMESPACE, "svcC").with_metadata("env", "prod"))
        .expect("store svcC");
    registry
}

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_service_metadata_selector() {
    let registry = create_test_registry();
    let selector =
        Selector::parse(r#"{"type":"label","expression":"SERVICE.metadata.env = 'prod'"}"#)
            .expect("valid selector");

    let filtered = MetadataFilter::new(&registry, NAMESPACE)
        .apply(names(&["svcC", "svcB", "svcA"]), &selector);

    assert_eq!(filtered, names(&["svcC", "svcA"]));
}

#[test]
fn test_instance_metadata_selector_matches_any_instance() {
    let registry = create_test_registry();
    let selector =
        Selector::parse(r#"{"type":"label","expression":"INSTANCE.metadata.zone='a'"}"#)
            .expect("valid selector");

    let filtered = MetadataFilter::new(&registry, NAMESPACE)
        .apply(names(&["svcA", "svcB", "svcC"]), &selector);

    assert_eq!(filtered, names(&["svcA", "svcB"]));
}

#[test]
fn test_none_and_blank_selectors_pass_through() {
    let registry = create_test_registry();
    let filter = MetadataFilter::new(&registry, NAMESPACE);
    let input = names(&["svcB", "missing", "svcA"]);

    for document in [
        r#"{"type":"none"}"#,
        r#"{"type":"label","expression":"   "}"#,
        r#"{"type":"label"}"#,
        "",
    ] {
        let selector = Selector::parse(document).expect("valid selector");
        assert_eq!(filter.apply(input.clone(), &selector), input, "{}", document);
    }
}

#[test]
fn test_unknown_selector_type_is_rejected() {
    let err = Selector::parse(r#"{"type":"range","expression":"SERVICE.metadata.env='prod'"}"#)
        .expect_err("unknown type must fail");
    assert_eq!(err.code(), ErrorCode::UnknownSelectorType);
    assert!(err.is_client_error());

    let err = Selector::parse(r#"{"expression":"SERVICE.metadata.env='prod'"}"#)
        .expect_err("missing type must fail");
    assert_eq!(err.code(), ErrorCode::InvalidSelector);
}

#[test]
fn test_malformed_expression_is_rejected() {
    let err = Selector::parse(r#"{"type":"label","expression":"SERVICE.metadata.env"}"#)
        .expect_err("clause without '=' must fail");
    assert_eq!(err.code(), ErrorCode::MalformedExpression);

    let err = Selector::parse("{not json").expect_err("broken json must fail");
    assert_eq!(err.code(), ErrorCode::DeserializationError);
}

#[test]
fn test_unknown_factor_is_ignored() {
    let registry = create_test_registry();
    let selector =
        Selector::parse(r#"{"type":"label","expression":"CONSUMER.label.env = 'prod'"}"#)
            .expect("unknown factor still parses");

    let clause = selector.clause().expect("clause present");
    assert_eq!(clause.factor, SelectorFactor::Other("CONSUMER".to_string()));

    let input = names(&["svcB", "missing", "svcA"]);
    let filtered = MetadataFilter::new(&registry, NAMESPACE).apply(input.clone(), &selector);
    assert_eq!(filtered, input);
}

#[test]
fn test_missing_services_are_dropped() {
    let registry = create_test_registry();
    let filter = MetadataFilter::new(&registry, NAMESPACE);

    let filtered = filter.filter(
        names(&["svcA", "deleted", "svcC"]),
        &SelectorFactor::Service,
        "env",
        "prod",
    );
    assert_eq!(filtered, names(&["svcA", "svcC"]));

    let filtered = filter.filter(names(&["deleted"]), &SelectorFactor::Instance, "zone", "a");
    assert!(filtered.is_empty());
}

#[test]
fn test_missing_key_and_coercion_never_match() {
    let registry = InMemoryRegistry::new();
    registry
        .add_or_replace_service(Service::new(NAMESPACE, "svc").with_metadata("port", "08"))
        .expect("store svc");
    let filter = MetadataFilter::new(&registry, NAMESPACE);

    assert!(filter
        .filter(names(&["svc"]), &SelectorFactor::Service, "port", "8")
        .is_empty());
    assert!(filter
        .filter(names(&["svc"]), &SelectorFactor::Service, "absent", "")
        .is_empty());
}

#[test]
fn test_label_selector_serializes_derived_labels() {
    let selector =
        Selector::parse(r#"{"type":"label","expression":"SERVICE.metadata.env = 'prod'"}"#)
            .expect("valid selector");

    let value = serde_json::to_value(&selector).expect("serializable");
    assert_eq!(value["type"], "label");
    assert_eq!(value["expression"], "SERVICE.metadata.env = 'prod'");
    let labels: Vec<&str> = value["labels"]
        .as_array()
        .expect("labels array")
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(labels, vec!["'prod'", "SERVICE", "env", "metadata"]);

    let reparsed: Selector = serde_json::from_value(value).expect("deserializable");
    assert_eq!(reparsed, selector);

    let none = serde_json::to_value(Selector::None).expect("serializable");
    assert_eq!(none, serde_json::json!({"type": "none"}));
}

#[test]
fn test_service_removed_during_listing_is_dropped() {
    use flare_naming_core::naming::ServiceRegistry;

    let registry = create_test_registry();
    let selector =
        Selector::parse(r#"{"type":"label","expression":"SERVICE.metadata.env = 'prod'"}"#)
            .expect("valid selector");

    let listed = registry.list_service_names(NAMESPACE);
    assert_eq!(listed, names(&["svcA", "svcB", "svcC"]));

    let removed = registry.remove_service(NAMESPACE, "svcA").expect("svcA existed");
    assert_eq!(removed.name, "svcA");
    assert!(registry.remove_service(NAMESPACE, "svcA").is_none());

    let filtered = MetadataFilter::new(&registry, NAMESPACE).apply(listed, &selector);
    assert_eq!(filtered, names(&["svcC"]));
}
