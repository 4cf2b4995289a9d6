//! Generic parameter resolution.
//!
//! Substitution semantics: when the active context binds the parameter, the
//! binding *is* the result, so the same syntactic `T` resolves differently at
//! every call site. An unbound parameter is registered (with its constraint
//! and default) and comes back as a symbolic `Generic` node.

use crate::error::Result;
use crate::generics::GenericContext;
use crate::introspection::{TypeHandle, TypeIntrospection};
use crate::resolver::TypeResolver;
use crate::types::{GenericParam, TypeInfo};

impl<C: TypeIntrospection + ?Sized> TypeResolver<'_, C> {
    pub(crate) fn generic_param_name(&self, ty: TypeHandle) -> String {
        self.checker
            .get_symbol_name(ty)
            .unwrap_or_else(|| self.checker.type_to_string(ty))
    }

    pub(crate) async fn resolve_generic_parameter(
        &mut self,
        ty: TypeHandle,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<TypeInfo> {
        let name = self.generic_param_name(ty);
        if let Some(bound) = generics.get_resolved_type(&name) {
            return Ok(bound.clone());
        }

        if !generics.is_registered(&name) {
            let constraint = match self.checker.get_constraint(ty) {
                Some(constraint) => Some(self.resolve_type(constraint, depth + 1, generics).await?),
                None => None,
            };
            let default = match self.checker.get_default(ty) {
                Some(default) => Some(self.resolve_type(default, depth + 1, generics).await?),
                None => None,
            };
            tracing::trace!(%name, "registering generic parameter");
            generics.register_generic_param(GenericParam {
                name: name.clone(),
                constraint,
                default,
            });
        }

        Ok(TypeInfo::Generic { name })
    }
}
