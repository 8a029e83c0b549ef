use super::*;
use crate::source_location::SourceLocation;

fn loc() -> SourceLocation {
    SourceLocation::new("test.zil", 1, 1)
}

fn atom(name: &str) -> ZilExpression {
    ZilExpression::Atom(name.to_string(), loc())
}

fn list(items: Vec<ZilExpression>) -> ZilExpression {
    ZilExpression::List(items, loc())
}

#[test]
fn defines_and_retrieves_a_macro() {
    let mut mp = MacroProcessor::new();
    assert!(mp.define_macro("DOUBLE", vec![Parameter::new("X")], atom("X"), loc()));
    assert!(mp.get_macro("DOUBLE").is_some());
}

#[test]
fn redefinition_is_rejected_and_diagnosed() {
    let mut mp = MacroProcessor::new();
    mp.define_macro("M", vec![], atom("A"), loc());
    let ok = mp.define_macro("M", vec![], atom("B"), loc());
    assert!(!ok);
    assert_eq!(mp.get_diagnostics().len(), 1);
    assert_eq!(mp.get_diagnostics()[0].code, "macro-redefinition");
}

#[test]
fn expands_simple_substitution() {
    let mut mp = MacroProcessor::new();
    mp.define_macro("ID", vec![Parameter::new("X")], ZilExpression::LocalVariable("X".into(), loc()), loc());
    match mp.expand_macro("ID", &[ZilExpression::Number(5, loc())], &loc()) {
        ExpandMacroResult::Success(e) => assert_eq!(e, ZilExpression::Number(5, loc())),
        ExpandMacroResult::Error(_) => panic!("expected success"),
    }
}

#[test]
fn undefined_macro_reports_diagnostic() {
    let mut mp = MacroProcessor::new();
    match mp.expand_macro("NOPE", &[], &loc()) {
        ExpandMacroResult::Error(d) => assert_eq!(d.code, "undefined-macro"),
        ExpandMacroResult::Success(_) => panic!("expected error"),
    }
    assert_eq!(mp.get_diagnostics().len(), 1);
}

#[test]
fn argument_count_mismatch_is_diagnosed() {
    let mut mp = MacroProcessor::new();
    mp.define_macro("PAIR", vec![Parameter::new("A"), Parameter::new("B")], atom("A"), loc());
    match mp.expand_macro("PAIR", &[ZilExpression::Number(1, loc())], &loc()) {
        ExpandMacroResult::Error(d) => assert_eq!(d.code, "argument-count-mismatch"),
        ExpandMacroResult::Success(_) => panic!("expected error"),
    }
}

#[test]
fn form_body_strips_marker_after_substitution() {
    let mut mp = MacroProcessor::new();
    // <DEFMAC INC (X) <FORM + .X 1>>
    let body = list(vec![atom("FORM"), atom("+"), ZilExpression::LocalVariable("X".into(), loc()), ZilExpression::Number(1, loc())]);
    mp.define_macro("INC", vec![Parameter::new("X")], body, loc());
    match mp.expand_macro("INC", &[ZilExpression::Number(41, loc())], &loc()) {
        ExpandMacroResult::Success(e) => {
            assert_eq!(
                e,
                list(vec![atom("+"), ZilExpression::Number(41, loc()), ZilExpression::Number(1, loc())])
            );
        }
        ExpandMacroResult::Error(_) => panic!("expected success"),
    }
}

#[test]
fn malformed_form_with_only_marker_is_returned_unchanged() {
    let mut mp = MacroProcessor::new();
    let body = list(vec![atom("FORM")]);
    mp.define_macro("EMPTY", vec![], body.clone(), loc());
    match mp.expand_macro("EMPTY", &[], &loc()) {
        ExpandMacroResult::Success(e) => assert_eq!(e, body),
        ExpandMacroResult::Error(_) => panic!("expected success"),
    }
}

#[test]
fn substitution_does_not_rename_unbound_local_variables() {
    let mut mp = MacroProcessor::new();
    // <DEFMAC FOO (X) <SET .TEMP .X>> — .TEMP isn't a parameter, stays put.
    let body = list(vec![
        atom("SET"),
        ZilExpression::LocalVariable("TEMP".into(), loc()),
        ZilExpression::LocalVariable("X".into(), loc()),
    ]);
    mp.define_macro("FOO", vec![Parameter::new("X")], body, loc());
    match mp.expand_macro("FOO", &[ZilExpression::Number(9, loc())], &loc()) {
        ExpandMacroResult::Success(e) => {
            let items = e.as_list().unwrap();
            assert_eq!(items[1], ZilExpression::LocalVariable("TEMP".into(), loc()));
            assert_eq!(items[2], ZilExpression::Number(9, loc()));
        }
        ExpandMacroResult::Error(_) => panic!("expected success"),
    }
}

#[test]
fn expand_expression_recurses_into_nested_calls() {
    let mut mp = MacroProcessor::new();
    mp.define_macro("ID", vec![Parameter::new("X")], ZilExpression::LocalVariable("X".into(), loc()), loc());
    // <TELL <ID 5>>
    let expr = list(vec![atom("TELL"), list(vec![atom("ID"), ZilExpression::Number(5, loc())])]);
    let expanded = mp.expand_expression(&expr);
    let items = expanded.as_list().unwrap();
    assert_eq!(items[1], ZilExpression::Number(5, loc()));
}

#[test]
fn direct_recursion_is_left_unexpanded_without_diagnostic() {
    let mut mp = MacroProcessor::new();
    // <DEFMAC LOOP () <LOOP>> — expands to itself forever without the cycle guard.
    let body = list(vec![atom("LOOP")]);
    mp.define_macro("LOOP", vec![], body, loc());
    let expr = list(vec![atom("LOOP")]);
    let expanded = mp.expand_expression(&expr);
    assert_eq!(expanded.list_head(), Some("LOOP"));
    assert!(mp.get_diagnostics().is_empty());
}

#[test]
fn debug_tracing_records_successful_expansions() {
    let mut mp = MacroProcessor::new();
    mp.define_macro("ID", vec![Parameter::new("X")], ZilExpression::LocalVariable("X".into(), loc()), loc());
    mp.set_debug_tracing(true);
    mp.expand_macro("ID", &[ZilExpression::Number(1, loc())], &loc());
    assert_eq!(mp.get_expansion_trace().len(), 1);
    assert_eq!(mp.get_expansion_trace()[0].macro_name, "ID");

    mp.set_debug_tracing(false);
    assert!(mp.get_expansion_trace().is_empty());
}

#[test]
fn clear_diagnostics_empties_the_list() {
    let mut mp = MacroProcessor::new();
    mp.expand_macro("NOPE", &[], &loc());
    assert_eq!(mp.get_diagnostics().len(), 1);
    mp.clear_diagnostics();
    assert!(mp.get_diagnostics().is_empty());
}
