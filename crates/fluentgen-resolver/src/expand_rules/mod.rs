//! Specialized expanders.
//!
//! Pre-pass resolvers for constructs the host may not have flattened yet.
//! Each stage answers `Ok(None)` ("not applicable") or a finished
//! [`TypeInfo`]; the first `Some` short-circuits category dispatch. Stages run
//! in a fixed order and each one is gated by its [`ResolverOptions`] toggle.
//!
//! [`ResolverOptions`]: crate::options::ResolverOptions

pub mod assignability;
pub mod conditional;
pub mod mapped;
pub mod template_literal;
pub mod utility;

use crate::error::Result;
use crate::generics::GenericContext;
use crate::introspection::{TypeHandle, TypeIntrospection};
use crate::resolver::TypeResolver;
use crate::types::TypeInfo;

/// Stage identifiers, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpanderStage {
    Utility,
    Mapped,
    Conditional,
    TemplateLiteral,
}

impl ExpanderStage {
    pub const ORDER: [ExpanderStage; 4] = [
        ExpanderStage::Utility,
        ExpanderStage::Mapped,
        ExpanderStage::Conditional,
        ExpanderStage::TemplateLiteral,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ExpanderStage::Utility => "utility",
            ExpanderStage::Mapped => "mapped",
            ExpanderStage::Conditional => "conditional",
            ExpanderStage::TemplateLiteral => "template-literal",
        }
    }
}

/// Collapse a member list: nothing is `never`, one member stands alone.
pub fn union_or_single(mut members: Vec<TypeInfo>) -> TypeInfo {
    match members.len() {
        0 => TypeInfo::Never,
        1 => members.remove(0),
        _ => TypeInfo::Union { members },
    }
}

impl<C: TypeIntrospection + ?Sized> TypeResolver<'_, C> {
    fn stage_enabled(&self, stage: ExpanderStage) -> bool {
        match stage {
            ExpanderStage::Utility => self.options.expand_utility_types,
            ExpanderStage::Mapped => self.options.resolve_mapped_types,
            ExpanderStage::Conditional => self.options.resolve_conditional_types,
            ExpanderStage::TemplateLiteral => self.options.resolve_template_literals,
        }
    }

    pub(crate) async fn expand(
        &mut self,
        ty: TypeHandle,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<Option<TypeInfo>> {
        for stage in ExpanderStage::ORDER {
            if !self.stage_enabled(stage) {
                continue;
            }
            let expanded = match stage {
                ExpanderStage::Utility => self.expand_utility(ty, depth, generics).await?,
                ExpanderStage::Mapped => self.expand_mapped(ty, depth, generics).await?,
                ExpanderStage::Conditional => {
                    self.expand_conditional(ty, depth, generics).await?
                }
                ExpanderStage::TemplateLiteral => {
                    self.expand_template_literal(ty, depth, generics).await?
                }
            };
            if let Some(info) = expanded {
                tracing::trace!(stage = stage.as_str(), handle = %ty, "expander applied");
                return Ok(Some(info));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
#[path = "../../tests/expander_tests.rs"]
mod tests;
