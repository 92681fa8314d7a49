use std::sync::Arc;

use indexmap::IndexMap;
use rowan::TextRange;
use tracing::{debug, instrument};

use super::descr::{AccumulateBody, AccumulateDescr};
use super::node::Accumulate;
use crate::Result;
use crate::analyze::{AnalysisResult, AvailableBindings, ExpressionAnalyzer, FragmentKind};
use crate::compile::{Accumulator, CompileRequest, ExpressionCompiler};
use crate::context::RuleBuildContext;
use crate::diagnostics::DiagnosticKind;
use crate::scope::{Declaration, Pattern};
use crate::source::{RuleConditionElement, SourceBuilder};

/// Builds `accumulate` clauses into aggregation nodes.
///
/// Holds the three collaborators a build needs; all per-rule state lives in
/// the [`RuleBuildContext`].
#[derive(Clone, Copy)]
pub struct AccumulateBuilder<'a> {
    pub(super) sources: &'a dyn SourceBuilder,
    pub(super) analyzer: &'a dyn ExpressionAnalyzer,
    pub(super) compiler: &'a dyn ExpressionCompiler,
}

/// What code inside one accumulate clause can see.
pub(super) struct ClauseScope {
    /// Rule-scope declarations plus the source's outer declarations.
    pub(super) visible: IndexMap<String, Declaration>,
    pub(super) available: AvailableBindings,
    /// The source's outer declarations, sorted by identifier.
    pub(super) inner_declarations: Vec<Declaration>,
    pub(super) read_locals_from_tuple: bool,
}

impl<'a> AccumulateBuilder<'a> {
    pub fn new(
        sources: &'a dyn SourceBuilder,
        analyzer: &'a dyn ExpressionAnalyzer,
        compiler: &'a dyn ExpressionCompiler,
    ) -> Self {
        Self {
            sources,
            analyzer,
            compiler,
        }
    }

    /// Build `descr` into an aggregation node.
    ///
    /// Result bindings are added to `result_pattern`, the pattern consuming
    /// the node's output. `Ok(None)` means the clause could not be built;
    /// user errors have been reported to `ctx`. `Err` is reserved for
    /// disagreements between the analyzer and the declaration scope.
    #[instrument(level = "debug", skip_all, fields(rule = %ctx.rule_name()))]
    pub fn build(
        &self,
        ctx: &mut RuleBuildContext<'_>,
        descr: &AccumulateDescr,
        result_pattern: &mut Pattern,
    ) -> Result<Option<Accumulate>> {
        let Some(input) = descr.input.as_ref().filter(|_| descr.has_valid_input()) else {
            debug!("accumulate has no valid input");
            return Ok(None);
        };
        if matches!(&descr.body, AccumulateBody::Functions(calls) if calls.is_empty()) {
            debug!("accumulate calls no functions");
            return Ok(None);
        }

        let input = input.clone().desugar();
        let Some(source) = self.sources.build(ctx, &input) else {
            debug!("accumulate source could not be built");
            return Ok(None);
        };

        let scope = Self::clause_scope(ctx, &source);
        let accumulate = match &descr.body {
            AccumulateBody::Functions(calls) => {
                self.build_function_calls(ctx, descr, calls, source, &scope, result_pattern)?
            }
            AccumulateBody::Inline(inline) => {
                self.build_inline(ctx, descr, inline, source, &scope)?
            }
        };

        if let Some(node) = &accumulate {
            debug!(
                accumulators = node.accumulators().len(),
                required = node.required_declarations().len(),
                multi = node.is_multi_function(),
                "built accumulate"
            );
        }
        Ok(accumulate)
    }

    fn clause_scope(ctx: &RuleBuildContext<'_>, source: &RuleConditionElement) -> ClauseScope {
        let outer = source.outer_declarations();

        let mut visible = ctx.scope().visible_declarations().clone();
        visible.extend(outer.iter().map(|(k, v)| (k.clone(), v.clone())));

        let mut inner_declarations: Vec<Declaration> = outer.into_values().collect();
        inner_declarations.sort_by(|a, b| a.identifier().cmp(b.identifier()));

        ClauseScope {
            available: AvailableBindings::new(&visible, ctx.package().globals()),
            visible,
            inner_declarations,
            read_locals_from_tuple: source.is_multi_pattern(),
        }
    }

    /// Analyze one fragment, reporting failures against the clause.
    pub(super) fn analyze(
        &self,
        ctx: &mut RuleBuildContext<'_>,
        range: TextRange,
        code: &str,
        kind: FragmentKind,
        scope: &ClauseScope,
    ) -> Option<AnalysisResult> {
        match self.analyzer.analyze(code, kind, &scope.available) {
            Ok(analysis) => Some(analysis),
            Err(err) => {
                ctx.report(DiagnosticKind::AccumulateAnalysisFailed, range)
                    .message(err.to_string())
                    .emit();
                None
            }
        }
    }

    /// Compile one unit, reporting failures against the clause.
    pub(super) fn compile(
        &self,
        ctx: &mut RuleBuildContext<'_>,
        range: TextRange,
        request: CompileRequest,
    ) -> Option<Arc<dyn Accumulator>> {
        let unit_name = request.unit_name.clone();
        match self.compiler.compile(request) {
            Ok(accumulator) => {
                debug!(unit = %unit_name, "compiled accumulator");
                Some(accumulator)
            }
            Err(err) => {
                ctx.report(DiagnosticKind::AccumulateCompileFailed, range)
                    .message(err.to_string())
                    .emit();
                None
            }
        }
    }
}
