use indoc::indoc;

use super::{AccumulateDescr, AccumulateKind, InlineDescr};
use crate::Error;
use crate::analyze::Attribute;
use crate::compile::CompileKind;
use crate::diagnostics::DiagnosticKind;
use crate::scope::Declaration;
use crate::source::PatternDescr;
use crate::test_utils::{Fixture, MockCompiler, orders};

fn dollar_orders() -> PatternDescr {
    PatternDescr::new("Order").bind_as("$o")
}

#[test]
fn inline_without_reverse_cannot_retract() {
    let fixture = Fixture::default();
    let compiler = MockCompiler::new();
    let descr = AccumulateDescr::inline(
        dollar_orders(),
        InlineDescr::new("int x=0;", "x += $o.getAmount();", "x"),
    );

    let built = fixture.build(&compiler, &descr).unwrap();

    let node = built.node();
    assert!(matches!(node.kind(), AccumulateKind::Single(_)));
    let required: Vec<_> = node
        .required_declarations()
        .iter()
        .map(Declaration::identifier)
        .collect();
    assert_eq!(required, ["$o"]);
    assert!(!node.supports_incremental_retract());
    assert!(built.diagnostics.is_empty());
    assert_eq!(compiler.unit_names(), ["Accumulate0"]);
}

#[test]
fn inline_with_reverse_can_retract() {
    let fixture = Fixture::default();
    let descr = AccumulateDescr::inline(
        dollar_orders(),
        InlineDescr::new("int x=0;", "x += $o.getAmount();", "x")
            .reverse("x -= $o.getAmount();"),
    );

    let built = fixture.build(&MockCompiler::new(), &descr).unwrap();

    assert!(built.node().supports_incremental_retract());
}

#[test]
fn init_locals_are_hoisted_into_attributes() {
    let fixture = Fixture::default();
    let compiler = MockCompiler::new();
    let descr = AccumulateDescr::inline(
        dollar_orders(),
        InlineDescr::new(
            indoc! {r#"
                int total = 0;
                String label = "";
            "#},
            "total += $o.getAmount();",
            "label + total",
        ),
    );

    fixture.build(&compiler, &descr).unwrap();

    let requests = compiler.requests();
    let CompileKind::Inline(body) = &requests[0].kind else {
        panic!("expected an inline unit");
    };
    assert_eq!(body.init_code, "total = 0;label = \"\";");
    assert_eq!(
        body.attributes,
        [Attribute::new("total", "int"), Attribute::new("label", "String")]
    );
    assert_eq!(body.action_code, "total += $o.getAmount();");
}

#[test]
fn references_are_unioned_across_fragments() {
    let fixture = Fixture::default();
    let compiler = MockCompiler::new();
    let descr = AccumulateDescr::inline(
        orders(),
        InlineDescr::new(
            "double limit = $c.limit;",
            "if ($amount < limit) { total += $amount * rate; }",
            "o == null ? 0 : total",
        )
        .reverse("total -= $amount * rate;"),
    );

    let built = fixture.build(&compiler, &descr).unwrap();

    let required: Vec<_> = built
        .node()
        .required_declarations()
        .iter()
        .map(Declaration::identifier)
        .collect();
    assert_eq!(required, ["$c", "$amount", "o"]);
    let request = &compiler.requests()[0];
    assert!(request.required_globals.contains_key("rate"));
}

#[test]
fn reverse_code_is_analyzed_on_its_own() {
    let fixture = Fixture::default();
    let descr = AccumulateDescr::inline(
        orders(),
        InlineDescr::new("int n = 0;", "n++;", "n").reverse("n -= $c.weight;"),
    );

    let built = fixture.build(&MockCompiler::new(), &descr).unwrap();

    let required: Vec<_> = built
        .node()
        .required_declarations()
        .iter()
        .map(Declaration::identifier)
        .collect();
    assert_eq!(required, ["$c"]);
}

#[test]
fn broken_fragment_is_reported() {
    let fixture = Fixture::default();
    let descr = AccumulateDescr::inline(
        dollar_orders(),
        InlineDescr::new("int x = 0;", "x += $o.getAmount(;", "x"),
    );

    let built = fixture.build(&MockCompiler::new(), &descr).unwrap();

    assert!(built.node.is_none());
    let message = built.diagnostics.iter().next().unwrap();
    assert_eq!(message.kind(), DiagnosticKind::AccumulateAnalysisFailed);
    assert_eq!(
        message.message(),
        "accumulate code could not be analyzed: unbalanced `(` at offset 17"
    );
}

#[test]
fn result_referencing_unknown_name_is_not_a_build_error() {
    // Unknown names are not references; only the analyzer/scope contract can fail.
    let fixture = Fixture::default();
    let descr = AccumulateDescr::inline(
        dollar_orders(),
        InlineDescr::new("int x = 0;", "x++;", "totl"),
    );

    let built = fixture.build(&MockCompiler::new(), &descr);

    assert!(!matches!(built, Err(Error::UnresolvedDeclaration(_))));
    assert!(built.unwrap().node.is_some());
}
