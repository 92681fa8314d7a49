use accrete_core::{ReadAccessor, ValueType};

use super::{Declaration, DeclarationScope, Pattern, RequiredDeclarations, collect_required};
use crate::Error;
use crate::analyze::ReferencedBindings;

fn scope() -> DeclarationScope {
    let mut order = Pattern::new(0, ValueType::Object("Order".into()));
    order.add_declaration("$o", ReadAccessor::self_reference(ValueType::Object("Order".into())));
    order.add_declaration("$amount", ReadAccessor::field("amount", ValueType::Numeric));

    let mut scope = DeclarationScope::new();
    scope.declare_pattern(&order);
    scope.declare(Declaration::new(
        "$c",
        1,
        ReadAccessor::self_reference(ValueType::Object("Customer".into())),
    ));
    scope
}

fn referencing(names: &[&str]) -> ReferencedBindings {
    let mut bindings = ReferencedBindings::new();
    for name in names {
        bindings.add_declaration(*name);
    }
    bindings
}

#[test]
fn visible_declarations_keep_binding_order() {
    let scope = scope();

    let names: Vec<_> = scope.visible_declarations().keys().cloned().collect();
    assert_eq!(names, ["$o", "$amount", "$c"]);
    assert_eq!(scope.get("$amount").unwrap().value_type(), &ValueType::Numeric);
    assert_eq!(scope.get("$c").unwrap().pattern_offset(), 1);
}

#[test]
fn later_declaration_shadows() {
    let mut scope = scope();
    scope.declare(Declaration::new("$c", 4, ReadAccessor::self_reference(ValueType::Any)));

    assert_eq!(scope.len(), 3);
    assert_eq!(scope.get("$c").unwrap().pattern_offset(), 4);
}

#[test]
fn collect_required_projects_references() {
    let scope = scope();
    let mut required = RequiredDeclarations::new();

    let found = collect_required(
        &referencing(&["$c", "$o"]),
        scope.visible_declarations(),
        &mut required,
    )
    .unwrap();

    let names: Vec<_> = found.iter().map(Declaration::identifier).collect();
    assert_eq!(names, ["$c", "$o"]);
    assert_eq!(required.len(), 2);
}

#[test]
fn collect_required_merges_without_duplicates() {
    let scope = scope();
    let visible = scope.visible_declarations();
    let mut required = RequiredDeclarations::new();

    collect_required(&referencing(&["$o"]), visible, &mut required).unwrap();
    collect_required(&referencing(&["$c", "$o"]), visible, &mut required).unwrap();

    let names: Vec<_> = required.iter().map(Declaration::identifier).collect();
    assert_eq!(names, ["$o", "$c"]);
}

#[test]
fn collect_required_rejects_unknown_names() {
    let scope = scope();
    let mut required = RequiredDeclarations::new();

    let err = collect_required(
        &referencing(&["$o", "$ghost"]),
        scope.visible_declarations(),
        &mut required,
    )
    .unwrap_err();

    assert!(matches!(err, Error::UnresolvedDeclaration(ref name) if name == "$ghost"));
    assert_eq!(err.to_string(), "declaration `$ghost` is referenced but not in scope");
}

#[test]
fn empty_references_need_nothing() {
    let scope = scope();
    let mut required = RequiredDeclarations::new();

    let found = collect_required(
        &ReferencedBindings::new(),
        scope.visible_declarations(),
        &mut required,
    )
    .unwrap();

    assert!(found.is_empty());
    assert!(required.is_empty());
}
