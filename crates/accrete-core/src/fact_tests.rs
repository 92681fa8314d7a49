use super::{Fact, FactError, Value};

#[test]
fn builder_keeps_field_order() {
    let fact = Fact::new("Order").with("id", 1).with("amount", 9.5);
    let names: Vec<_> = fact.fields().map(|(k, _)| k).collect();
    assert_eq!(names, ["id", "amount"]);
    insta::assert_snapshot!(fact.to_string(), @"Order(id: 1, amount: 9.5)");
}

#[test]
fn from_json_converts_scalars() {
    let fact = Fact::from_json("Order", r#"{"id": 3, "amount": 12.5, "paid": true, "note": null}"#)
        .unwrap();
    assert_eq!(fact.object_type(), "Order");
    assert_eq!(fact.field("id"), Some(&Value::Int(3)));
    assert_eq!(fact.field("amount"), Some(&Value::Float(12.5)));
    assert_eq!(fact.field("paid"), Some(&Value::Bool(true)));
    assert_eq!(fact.field("note"), Some(&Value::Null));
}

#[test]
fn from_json_nests_objects_as_facts() {
    let fact = Fact::from_json("Order", r#"{"customer": {"name": "ada"}}"#).unwrap();
    let customer = fact.field("customer").and_then(Value::as_fact).unwrap();
    assert_eq!(customer.object_type(), "object");
    assert_eq!(customer.field("name"), Some(&Value::from("ada")));
}

#[test]
fn from_json_rejects_non_objects() {
    let err = Fact::from_json("Order", "[1, 2]").unwrap_err();
    assert!(matches!(err, FactError::NotAnObject("array")));
}

#[test]
fn serializes_with_type_tag() {
    let fact = Fact::new("Order").with("amount", 2);
    let json = serde_json::to_string(&fact).unwrap();
    insta::assert_snapshot!(json, @r#"{"$type":"Order","amount":2}"#);
}
