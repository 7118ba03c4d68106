//! Tests for the BPMN element factories and catalog

use bpmn_tag_tree::factory::{
    self, ElementArgs, ElementCategory, ElementKind, event, flow, gateway, task,
};
use bpmn_tag_tree::tree::TagError;

#[test]
fn test_factories_fix_tag_names() {
    let cases = [
        (event::start_event(ElementArgs::new()).unwrap(), "startEvent"),
        (event::end_event(ElementArgs::new()).unwrap(), "endEvent"),
        (
            event::error_event_definition(ElementArgs::new()).unwrap(),
            "errorEventDefinition",
        ),
        (
            gateway::exclusive_gateway(ElementArgs::new()).unwrap(),
            "exclusiveGateway",
        ),
        (
            gateway::parallel_gateway(ElementArgs::new()).unwrap(),
            "parallelGateway",
        ),
        (
            gateway::inclusive_gateway(ElementArgs::new()).unwrap(),
            "inclusiveGateway",
        ),
        (task::user_task(ElementArgs::new()).unwrap(), "userTask"),
        (task::service_task(ElementArgs::new()).unwrap(), "serviceTask"),
        (flow::sequence_flow(ElementArgs::new()).unwrap(), "sequenceFlow"),
    ];

    for (tag, name) in cases {
        assert_eq!(tag.tag_name(), name);
    }
}

#[test]
fn test_sequence_flow_factory() {
    let flow = flow::sequence_flow(
        ElementArgs::new()
            .with_id("f1")
            .with_attribute("sourceRef", "a")
            .with_attribute("target", "b"),
    )
    .unwrap();
    assert_eq!(flow.id().as_deref(), Some("f1"));
    assert_eq!(flow.to_string(), r#"<sequenceFlow sourceRef="a" target="b"/>"#);
    assert_eq!(ElementKind::SequenceFlow.missing_attributes(&flow), vec!["id"]);
}

#[test]
fn test_start_event_with_nested_error_definition() {
    let error = event::error_event_definition(ElementArgs::new()).unwrap();
    let start = event::start_event(ElementArgs::identified("s1").with_child(&error)).unwrap();

    assert_eq!(error.parent(), Some(start.clone()));
    assert_eq!(start.get_element_by_id("s1"), None);
    assert_eq!(
        start.to_string(),
        r#"<startEvent id="s1"><errorEventDefinition/></startEvent>"#
    );
}

#[test]
fn test_process_assembled_from_factories() {
    let process = factory::create("userTask", ElementArgs::identified("review")).unwrap();
    let gateway = gateway::exclusive_gateway(
        ElementArgs::identified("g1").with_attribute("default", "f2"),
    )
    .unwrap();
    assert!(ElementKind::ExclusiveGateway.missing_attributes(&gateway).is_empty());

    process.append_child(&gateway);
    assert_eq!(process.get_element_by_id("g1"), Some(gateway));
}

#[test]
fn test_create_unknown_kind() {
    assert!(matches!(
        factory::create("lane", ElementArgs::new()),
        Err(TagError::InvalidConfig(_))
    ));
}

#[test]
fn test_catalog_schema() {
    assert_eq!(
        ElementKind::SequenceFlow.required_attributes(),
        &["id", "sourceRef", "target"]
    );
    assert!(ElementKind::ErrorEventDefinition.required_attributes().is_empty());
    assert_eq!(
        ElementKind::ExclusiveGateway.required_attributes(),
        &["id", "default"]
    );
    assert_eq!(ElementKind::UserTask.category(), ElementCategory::Task);

    let total: usize = ElementCategory::ALL
        .into_iter()
        .map(|c| ElementKind::by_category(c).count())
        .sum();
    assert_eq!(total, factory::CATALOG.len());
}

#[test]
fn test_catalog_entry_json() {
    let entry = serde_json::to_value(ElementKind::SequenceFlow.describe()).unwrap();
    assert_eq!(
        entry,
        serde_json::json!({
            "tagName": "sequenceFlow",
            "category": "flow",
            "requiredAttributes": ["id", "sourceRef", "target"],
            "optionalAttributes": ["name"]
        })
    );
}

#[test]
fn test_element_args_from_json() {
    let args: ElementArgs = serde_json::from_str(
        r#"{"id": "t1", "attribute": {"id": "t1", "name": "Check"}, "children": ["note"]}"#,
    )
    .unwrap();
    let task = ElementKind::ServiceTask.build(args).unwrap();
    assert_eq!(task.to_string(), r#"<serviceTask id="t1" name="Check">note</serviceTask>"#);
}
