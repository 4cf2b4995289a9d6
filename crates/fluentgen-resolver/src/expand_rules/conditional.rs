//! Conditional-type expander: `C extends E ? X : Y` left unresolved by the
//! host.
//!
//! - An unbound generic check type cannot be decided and yields a symbolic
//!   `Generic` carrying the conditional's text.
//! - A distributive conditional whose check type is a generic parameter bound
//!   to a union is evaluated once per member, with the parameter rebound to
//!   that member, and the results are flattened into one union.
//! - Otherwise the branch is picked by approximate assignability.

use crate::error::Result;
use crate::expand_rules::assignability::is_assignable_approx;
use crate::expand_rules::union_or_single;
use crate::generics::GenericContext;
use crate::introspection::{
    ConditionalParts, TypeClass, TypeFlags, TypeHandle, TypeIntrospection,
};
use crate::resolver::TypeResolver;
use crate::types::TypeInfo;

impl<C: TypeIntrospection + ?Sized> TypeResolver<'_, C> {
    pub(crate) async fn expand_conditional(
        &mut self,
        ty: TypeHandle,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<Option<TypeInfo>> {
        if !self.checker.flags(ty).contains(TypeFlags::CONDITIONAL) {
            return Ok(None);
        }
        let Some(parts) = self.checker.get_conditional_parts(ty) else {
            return Ok(None);
        };

        let check = self.resolve_type(parts.check, depth + 1, generics).await?;
        if matches!(check, TypeInfo::Generic { .. }) {
            return Ok(Some(TypeInfo::Generic {
                name: self.checker.type_to_string(ty),
            }));
        }

        let distributes = parts.distributive
            && self.checker.classify(parts.check)? == TypeClass::GenericParameter;
        if distributes {
            match &check {
                TypeInfo::Union { members } => {
                    let param = self.generic_param_name(parts.check);
                    let mut results = Vec::new();
                    for member in members {
                        let mut scoped = generics.child();
                        scoped.bind(param.clone(), member.clone());
                        let branch = self
                            .evaluate_conditional(&parts, member, depth, &mut scoped)
                            .await?;
                        match branch {
                            TypeInfo::Union { members } => results.extend(members),
                            TypeInfo::Never => {}
                            other => results.push(other),
                        }
                    }
                    return Ok(Some(union_or_single(results)));
                }
                // Distributing over an empty union yields nothing.
                TypeInfo::Never => return Ok(Some(TypeInfo::Never)),
                _ => {}
            }
        }

        let branch = self
            .evaluate_conditional(&parts, &check, depth, generics)
            .await?;
        Ok(Some(branch))
    }

    async fn evaluate_conditional(
        &mut self,
        parts: &ConditionalParts,
        check: &TypeInfo,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<TypeInfo> {
        let extends = self.resolve_type(parts.extends, depth + 1, generics).await?;
        let branch = if is_assignable_approx(check, &extends) {
            parts.true_type
        } else {
            parts.false_type
        };
        self.resolve_type(branch, depth + 1, generics).await
    }
}
