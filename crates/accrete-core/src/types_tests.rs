use super::ValueType;

#[test]
fn host_type_names_map_to_semantic_types() {
    assert_eq!(ValueType::from_type_name("int"), ValueType::Integer);
    assert_eq!(ValueType::from_type_name("Long"), ValueType::Integer);
    assert_eq!(ValueType::from_type_name("double"), ValueType::Numeric);
    assert_eq!(ValueType::from_type_name("Number"), ValueType::Numeric);
    assert_eq!(ValueType::from_type_name("String"), ValueType::Text);
    assert_eq!(ValueType::from_type_name("List"), ValueType::List);
    assert_eq!(ValueType::from_type_name("Object"), ValueType::Any);
}

#[test]
fn unknown_type_names_are_objects() {
    assert_eq!(
        ValueType::from_type_name("Order"),
        ValueType::Object("Order".to_owned())
    );
}

#[test]
fn display() {
    insta::assert_snapshot!(ValueType::Numeric.to_string(), @"numeric");
    insta::assert_snapshot!(ValueType::Object("Order".into()).to_string(), @"Order");
}
