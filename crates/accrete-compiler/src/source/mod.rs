//! Building condition descriptors into source elements.
//!
//! The accumulate builder delegates its input condition to a
//! [`SourceBuilder`]. [`PatternSourceBuilder`] is the reference builder: it
//! allocates tuple offsets and binds pattern and field declarations.

mod descr;
mod element;

#[cfg(test)]
mod tests;

use accrete_core::{ReadAccessor, ValueType};

use crate::context::RuleBuildContext;
use crate::scope::Pattern;

pub use descr::{ConditionDescr, FieldBindingDescr, PatternDescr};
pub use element::{GroupElement, GroupKind, RuleConditionElement};

/// Builds a condition descriptor into a source element.
///
/// `None` means the source cannot be built; the caller gives up silently and
/// the builder is expected to have reported why.
pub trait SourceBuilder {
    fn build(
        &self,
        ctx: &mut RuleBuildContext<'_>,
        descr: &ConditionDescr,
    ) -> Option<RuleConditionElement>;
}

/// Builds patterns and groups, one tuple offset per pattern.
#[derive(Clone, Copy, Debug, Default)]
pub struct PatternSourceBuilder;

impl PatternSourceBuilder {
    fn build_pattern(ctx: &mut RuleBuildContext<'_>, descr: &PatternDescr) -> Pattern {
        let object_type = ValueType::from_type_name(&descr.object_type);
        let mut pattern = Pattern::new(ctx.allocate_offset(), object_type.clone());
        if let Some(identifier) = &descr.identifier {
            pattern.add_declaration(identifier, ReadAccessor::self_reference(object_type));
        }
        for binding in &descr.bindings {
            let value_type = ValueType::from_type_name(&binding.type_name);
            pattern.add_declaration(
                &binding.identifier,
                ReadAccessor::field(&binding.field, value_type),
            );
        }
        tracing::trace!(
            object_type = %descr.object_type,
            offset = pattern.offset(),
            "built source pattern"
        );
        pattern
    }

    fn build_group(
        &self,
        ctx: &mut RuleBuildContext<'_>,
        kind: GroupKind,
        children: &[ConditionDescr],
    ) -> Option<RuleConditionElement> {
        if children.is_empty() {
            return None;
        }
        let children = children
            .iter()
            .map(|child| self.build(ctx, child))
            .collect::<Option<Vec<_>>>()?;
        Some(RuleConditionElement::Group(GroupElement::new(kind, children)))
    }
}

impl SourceBuilder for PatternSourceBuilder {
    fn build(
        &self,
        ctx: &mut RuleBuildContext<'_>,
        descr: &ConditionDescr,
    ) -> Option<RuleConditionElement> {
        match descr {
            ConditionDescr::Pattern(pattern) => {
                if pattern.object_type.trim().is_empty() {
                    return None;
                }
                Some(RuleConditionElement::Pattern(Self::build_pattern(
                    ctx, pattern,
                )))
            }
            ConditionDescr::And(children) => self.build_group(ctx, GroupKind::And, children),
            ConditionDescr::Or(children) => self.build_group(ctx, GroupKind::Or, children),
            ConditionDescr::Not(inner) => {
                self.build_group(ctx, GroupKind::Not, std::slice::from_ref(inner.as_ref()))
            }
            ConditionDescr::Exists(inner) => {
                self.build_group(ctx, GroupKind::Exists, std::slice::from_ref(inner.as_ref()))
            }
        }
    }
}
