use accrete_core::{ReadAccessor, ValueType};
use indexmap::IndexMap;
use indoc::indoc;

use super::{AnalyzeError, AvailableBindings, ExpressionAnalyzer, FragmentKind, LexicalAnalyzer};
use crate::scope::Declaration;

fn available() -> AvailableBindings {
    let mut visible = IndexMap::new();
    for (offset, name) in ["$o", "$c"].into_iter().enumerate() {
        visible.insert(
            name.to_owned(),
            Declaration::new(name, offset, ReadAccessor::self_reference(ValueType::Any)),
        );
    }
    let mut globals = IndexMap::new();
    globals.insert("rate".to_owned(), ValueType::Numeric);
    AvailableBindings::new(&visible, &globals)
}

fn referenced(code: &str, kind: FragmentKind) -> Vec<String> {
    let analysis = LexicalAnalyzer.analyze(code, kind, &available()).unwrap();
    analysis.bindings.declarations().map(str::to_owned).collect()
}

#[test]
fn declarations_in_first_reference_order() {
    let names = referenced("$c.limit - $o.amount + $o.tax", FragmentKind::Expression);

    assert_eq!(names, ["$c", "$o"]);
}

#[test]
fn member_access_is_not_a_reference() {
    let names = referenced("order.$o", FragmentKind::Expression);

    assert!(names.is_empty());
}

#[test]
fn unknown_names_are_ignored() {
    let names = referenced("Math.max(a, b)", FragmentKind::Expression);

    assert!(names.is_empty());
}

#[test]
fn globals_are_reported_with_type() {
    let analysis = LexicalAnalyzer
        .analyze("$o.amount * rate", FragmentKind::Expression, &available())
        .unwrap();

    assert_eq!(
        analysis.bindings.globals().get("rate"),
        Some(&ValueType::Numeric)
    );
    assert!(analysis.bindings.references_declaration("$o"));
}

#[test]
fn strings_and_comments_are_skipped() {
    let code = indoc! {r#"
        // $c is not used here
        total += $o.amount; /* $c */
        label = "$c";
    "#};

    assert_eq!(referenced(code, FragmentKind::Block), ["$o"]);
}

#[test]
fn block_locals_are_found() {
    let code = "int x = 0, y; final java.util.List<String> names = new ArrayList();";
    let analysis = LexicalAnalyzer
        .analyze(code, FragmentKind::Block, &available())
        .unwrap();

    let locals: Vec<_> = analysis
        .locals
        .iter()
        .map(|l| {
            let names: Vec<_> = l.identifiers.iter().map(|i| i.name.as_str()).collect();
            (l.type_name.as_str(), names)
        })
        .collect();
    assert_eq!(
        locals,
        vec![
            ("int", vec!["x", "y"]),
            ("java.util.List<String>", vec!["names"]),
        ]
    );
    assert_eq!(&code[analysis.locals[0].identifiers[0].range], "x = 0");
    assert_eq!(&code[analysis.locals[0].range], "int x = 0, y");
}

#[test]
fn statements_are_not_locals() {
    let code = "x = 1; return x; list.add($o); total += 2;";
    let analysis = LexicalAnalyzer
        .analyze(code, FragmentKind::Block, &available())
        .unwrap();

    assert!(analysis.locals.is_empty());
}

#[test]
fn expressions_have_no_locals() {
    let analysis = LexicalAnalyzer
        .analyze("int x", FragmentKind::Expression, &available())
        .unwrap();

    assert!(analysis.locals.is_empty());
}

#[test]
fn locals_shadow_declarations() {
    let names = referenced("$c.count(); Object $o = null; $o.toString();", FragmentKind::Block);

    assert_eq!(names, ["$c"]);
}

#[test]
fn unterminated_string_fails() {
    let err = LexicalAnalyzer
        .analyze(r#"label = "abc"#, FragmentKind::Block, &available())
        .unwrap_err();

    assert!(matches!(err, AnalyzeError::Syntax { offset: 8, .. }));
}

#[test]
fn unbalanced_delimiters_fail() {
    let err = LexicalAnalyzer
        .analyze("sum($o.amount", FragmentKind::Expression, &available())
        .unwrap_err();
    assert_eq!(
        err,
        AnalyzeError::Unbalanced {
            delimiter: '(',
            offset: 3
        }
    );

    let err = LexicalAnalyzer
        .analyze("a)", FragmentKind::Expression, &available())
        .unwrap_err();
    assert_eq!(
        err,
        AnalyzeError::Unbalanced {
            delimiter: ')',
            offset: 1
        }
    );
}
