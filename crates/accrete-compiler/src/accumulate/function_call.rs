use accrete_core::ReadAccessor;
use indexmap::IndexMap;
use rowan::TextRange;

use super::builder::{AccumulateBuilder, ClauseScope};
use super::descr::{AccumulateDescr, FunctionCallDescr};
use super::node::{Accumulate, AccumulateKind};
use super::wiring::ResultWiring;
use crate::Result;
use crate::analyze::FragmentKind;
use crate::compile::{CompileKind, CompileRequest};
use crate::context::RuleBuildContext;
use crate::diagnostics::DiagnosticKind;
use crate::scope::{Declaration, Pattern, RequiredDeclarations, collect_required};
use crate::source::RuleConditionElement;

impl AccumulateBuilder<'_> {
    pub(super) fn build_function_calls(
        &self,
        ctx: &mut RuleBuildContext<'_>,
        descr: &AccumulateDescr,
        calls: &[FunctionCallDescr],
        source: RuleConditionElement,
        scope: &ClauseScope,
        result_pattern: &mut Pattern,
    ) -> Result<Option<Accumulate>> {
        let wiring = ResultWiring::for_functions(calls.len());
        let mut required = RequiredDeclarations::new();
        let mut accumulators = Vec::with_capacity(calls.len());
        let mut bindings: Vec<(String, ReadAccessor)> = Vec::new();

        let mut functions = Vec::with_capacity(calls.len());
        for call in calls {
            let Some(function) = ctx.resolve_function(&call.function) else {
                ctx.report(DiagnosticKind::UnknownAccumulateFunction, call_range(descr, call))
                    .message(&call.function)
                    .emit();
                return Ok(None);
            };
            functions.push(function);
        }

        for (index, (call, function)) in calls.iter().zip(functions).enumerate() {
            let range = call_range(descr, call);

            if let Some(bind) = &call.bind {
                let rule_scope = ctx.scope().visible_declarations();
                if is_duplicate(bind, result_pattern, rule_scope, &bindings) {
                    ctx.report(DiagnosticKind::DuplicateDeclaration, range)
                        .message(bind)
                        .emit();
                } else {
                    let accessor = wiring.accessor(index, function.result_type());
                    bindings.push((bind.clone(), accessor));
                }
            }

            if call.params.len() > 1 && ctx.config().warns_ignored_arguments() {
                ctx.report(DiagnosticKind::IgnoredArguments, range)
                    .message(&call.function)
                    .emit();
            }

            let expression = call.first_argument();
            let Some(analysis) =
                self.analyze(ctx, range, expression, FragmentKind::Expression, scope)
            else {
                return Ok(None);
            };
            let required_declarations =
                collect_required(&analysis.bindings, &scope.visible, &mut required)?;

            let request = CompileRequest {
                unit_name: format!("accumulateExpression{}", ctx.next_id()),
                kind: CompileKind::FunctionCall {
                    function,
                    expression: expression.to_owned(),
                },
                required_declarations,
                required_globals: analysis.bindings.globals().clone(),
                inner_declarations: scope.inner_declarations.clone(),
                read_locals_from_tuple: scope.read_locals_from_tuple,
            };
            let Some(accumulator) = self.compile(ctx, range, request) else {
                return Ok(None);
            };
            accumulators.push(accumulator);
        }

        for (identifier, accessor) in bindings {
            result_pattern.add_declaration(&identifier, accessor);
        }

        let supports_incremental_retract = accumulators.iter().all(|a| a.supports_reverse());
        let kind = if descr.is_multi_function() {
            AccumulateKind::Multi(accumulators)
        } else {
            let Some(accumulator) = accumulators.pop() else {
                return Ok(None);
            };
            AccumulateKind::Single(accumulator)
        };

        Ok(Some(Accumulate::new(
            source,
            required.into_vec(),
            kind,
            supports_incremental_retract,
        )))
    }
}

/// The call's own range, or the clause's when the call has none.
fn call_range(descr: &AccumulateDescr, call: &FunctionCallDescr) -> TextRange {
    if call.range.is_empty() {
        descr.range
    } else {
        call.range
    }
}

/// A result binding collides with the result pattern's own declarations, the
/// rule scope, or a binding made earlier in the same clause. The source's
/// declarations stay inside the clause and never collide.
fn is_duplicate(
    identifier: &str,
    result_pattern: &Pattern,
    rule_scope: &IndexMap<String, Declaration>,
    pending: &[(String, ReadAccessor)],
) -> bool {
    result_pattern.declaration(identifier).is_some()
        || rule_scope.contains_key(identifier)
        || pending.iter().any(|(name, _)| name == identifier)
}
