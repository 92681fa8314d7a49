use super::builder::{AccumulateBuilder, ClauseScope};
use super::descr::{AccumulateDescr, InlineDescr};
use super::node::{Accumulate, AccumulateKind};
use crate::Result;
use crate::analyze::{FragmentKind, ReferencedBindings, hoist_locals};
use crate::compile::{CompileKind, CompileRequest, InlineBody};
use crate::context::RuleBuildContext;
use crate::scope::{RequiredDeclarations, collect_required};
use crate::source::RuleConditionElement;

impl AccumulateBuilder<'_> {
    pub(super) fn build_inline(
        &self,
        ctx: &mut RuleBuildContext<'_>,
        descr: &AccumulateDescr,
        inline: &InlineDescr,
        source: RuleConditionElement,
        scope: &ClauseScope,
    ) -> Result<Option<Accumulate>> {
        let unit_name = format!("Accumulate{}", ctx.next_id());
        let range = descr.range;

        let Some(init) = self.analyze(ctx, range, &inline.init_code, FragmentKind::Block, scope)
        else {
            return Ok(None);
        };
        let Some(action) =
            self.analyze(ctx, range, &inline.action_code, FragmentKind::Block, scope)
        else {
            return Ok(None);
        };
        let reverse = match &inline.reverse_code {
            Some(code) => match self.analyze(ctx, range, code, FragmentKind::Block, scope) {
                Some(analysis) => Some(analysis),
                None => return Ok(None),
            },
            None => None,
        };
        let Some(result) =
            self.analyze(ctx, range, &inline.result_code, FragmentKind::Expression, scope)
        else {
            return Ok(None);
        };

        let mut bindings = ReferencedBindings::new();
        bindings.merge(&init.bindings);
        bindings.merge(&action.bindings);
        if let Some(reverse) = &reverse {
            bindings.merge(&reverse.bindings);
        }
        bindings.merge(&result.bindings);

        let mut required = RequiredDeclarations::new();
        let required_declarations = collect_required(&bindings, &scope.visible, &mut required)?;

        let hoisted = hoist_locals(&inline.init_code, &init.locals);
        let request = CompileRequest {
            unit_name,
            kind: CompileKind::Inline(InlineBody {
                init_code: hoisted.code,
                attributes: hoisted.attributes,
                action_code: inline.action_code.clone(),
                reverse_code: inline.reverse_code.clone(),
                result_code: inline.result_code.clone(),
            }),
            required_declarations,
            required_globals: bindings.globals().clone(),
            inner_declarations: scope.inner_declarations.clone(),
            read_locals_from_tuple: scope.read_locals_from_tuple,
        };
        let Some(accumulator) = self.compile(ctx, range, request) else {
            return Ok(None);
        };

        Ok(Some(Accumulate::new(
            source,
            required.into_vec(),
            AccumulateKind::Single(accumulator),
            inline.reverse_code.is_some(),
        )))
    }
}
