//! Category resolvers: one per fundamental shape.
//!
//! These run after every specialized expander has declined. Dispatch is a
//! single exhaustive match over the host's [`TypeClass`]; type operators and
//! built-in platform types are recognized first because the host classifies
//! them as plain objects.

pub mod builtin;
pub mod collection;
pub mod composite;
pub mod generic_param;
pub mod object;
pub mod operators;
pub mod primitive;

use crate::error::Result;
use crate::generics::GenericContext;
use crate::introspection::{TypeClass, TypeHandle, TypeIntrospection};
use crate::resolver::TypeResolver;
use crate::types::TypeInfo;

impl<C: TypeIntrospection + ?Sized> TypeResolver<'_, C> {
    pub(crate) async fn resolve_category(
        &mut self,
        ty: TypeHandle,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<TypeInfo> {
        let class = self.checker.classify(ty)?;

        if let Some(info) = self
            .resolve_type_operator(ty, &class, depth, generics)
            .await?
        {
            return Ok(info);
        }

        match class {
            TypeClass::Primitive(kind) => Ok(primitive::resolve_primitive(kind)),
            TypeClass::Literal(value) => Ok(self.resolve_literal(ty, value)),
            TypeClass::Array => self.resolve_array(ty, depth, generics).await,
            TypeClass::Tuple => self.resolve_tuple(ty, depth, generics).await,
            TypeClass::Union => self.resolve_union(ty, depth, generics).await,
            TypeClass::Intersection => self.resolve_intersection(ty, depth, generics).await,
            TypeClass::Enum => Ok(self.resolve_enum(ty)),
            TypeClass::GenericParameter => {
                self.resolve_generic_parameter(ty, depth, generics).await
            }
            TypeClass::Object if builtin::is_builtin(self.checker, ty) => {
                self.resolve_builtin(ty, depth, generics).await
            }
            TypeClass::Object => self.resolve_object(ty, depth, generics).await,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/category_tests.rs"]
mod tests;
