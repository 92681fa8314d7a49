use accrete_core::ValueType;

use super::{
    ConditionDescr, GroupKind, PatternDescr, PatternSourceBuilder, RuleConditionElement,
    SourceBuilder,
};
use crate::config::BuilderConfig;
use crate::context::{Package, RuleBuildContext};

fn order() -> PatternDescr {
    PatternDescr::new("Order")
        .bind_as("$o")
        .field("$amount", "amount", "double")
}

fn build(descr: &ConditionDescr) -> Option<RuleConditionElement> {
    let config = BuilderConfig::default();
    let package = Package::new("org.acme");
    let mut ctx = RuleBuildContext::new("R1", &config, &package);
    ctx.allocate_offset();
    PatternSourceBuilder.build(&mut ctx, descr)
}

#[test]
fn pattern_binds_object_and_fields() {
    let element = build(&order().into()).unwrap();

    let pattern = element.as_pattern().unwrap();
    assert_eq!(pattern.offset(), 1);
    assert_eq!(pattern.object_type(), &ValueType::Object("Order".into()));
    assert_eq!(
        pattern.declaration("$amount").unwrap().value_type(),
        &ValueType::Numeric
    );
    let names: Vec<_> = element.outer_declarations().into_keys().collect();
    assert_eq!(names, ["$o", "$amount"]);
    assert!(!element.is_multi_pattern());
}

#[test]
fn group_allocates_offsets_in_order() {
    let descr = ConditionDescr::And(vec![
        order().into(),
        PatternDescr::new("Customer").bind_as("$c").into(),
    ]);

    let element = build(&descr).unwrap();

    let offsets: Vec<_> = element.patterns().iter().map(|p| p.offset()).collect();
    assert_eq!(offsets, [1, 2]);
    assert_eq!(element.first_offset(), Some(1));
    assert!(element.is_multi_pattern());
    assert_eq!(element.outer_declarations().len(), 3);
}

#[test]
fn negated_children_bind_nothing_outward() {
    let descr = ConditionDescr::And(vec![
        order().into(),
        ConditionDescr::Not(Box::new(PatternDescr::new("Refund").bind_as("$r").into())),
    ]);

    let element = build(&descr).unwrap();

    assert!(element.outer_declarations().contains_key("$o"));
    assert!(!element.outer_declarations().contains_key("$r"));
    let RuleConditionElement::Group(group) = &element else {
        panic!("expected a group");
    };
    assert_eq!(group.children()[1].patterns().len(), 1);
    assert!(matches!(&group.children()[1], RuleConditionElement::Group(g) if g.kind() == GroupKind::Not));
}

#[test]
fn empty_groups_do_not_build() {
    assert!(build(&ConditionDescr::Or(Vec::new())).is_none());
    assert!(build(&ConditionDescr::And(vec![PatternDescr::new(" ").into()])).is_none());
}

#[test]
fn validity() {
    assert!(ConditionDescr::from(order()).is_valid());
    assert!(!ConditionDescr::And(Vec::new()).is_valid());
    assert!(!ConditionDescr::Exists(Box::new(PatternDescr::new("").into())).is_valid());
}

#[test]
fn single_child_and_desugars() {
    let descr = ConditionDescr::And(vec![ConditionDescr::And(vec![order().into()])]);

    assert_eq!(descr.desugar(), ConditionDescr::Pattern(order()));
}
