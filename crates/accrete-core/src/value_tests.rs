use std::cmp::Ordering;

use super::{Fact, Value, ValueType};

#[test]
fn value_types() {
    assert_eq!(Value::Int(1).value_type(), ValueType::Integer);
    assert_eq!(Value::Float(1.0).value_type(), ValueType::Numeric);
    assert_eq!(Value::Null.value_type(), ValueType::Any);
    assert_eq!(
        Value::from(Fact::new("Order")).value_type(),
        ValueType::Object("Order".into())
    );
}

#[test]
fn mixed_numeric_comparison() {
    assert_eq!(Value::Int(2).compare(&Value::Float(2.5)), Some(Ordering::Less));
    assert_eq!(Value::Float(3.0).compare(&Value::Int(3)), Some(Ordering::Equal));
    assert_eq!(Value::from("b").compare(&Value::from("a")), Some(Ordering::Greater));
    assert_eq!(Value::from("a").compare(&Value::Int(1)), None);
}

#[test]
fn display() {
    let list = Value::List(vec![Value::Int(1), Value::Float(2.0), Value::from("x")]);
    insta::assert_snapshot!(list.to_string(), @r#"[1, 2.0, "x"]"#);
}
