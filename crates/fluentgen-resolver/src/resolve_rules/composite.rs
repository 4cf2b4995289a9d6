//! Union and intersection resolution.
//!
//! Members are resolved in declaration order and kept as-is: no reduction,
//! no deduplication, and an empty member list stays empty.

use crate::error::Result;
use crate::generics::GenericContext;
use crate::introspection::{TypeHandle, TypeIntrospection};
use crate::resolver::TypeResolver;
use crate::types::TypeInfo;

impl<C: TypeIntrospection + ?Sized> TypeResolver<'_, C> {
    async fn resolve_members(
        &mut self,
        handles: Vec<TypeHandle>,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<Vec<TypeInfo>> {
        let mut members = Vec::with_capacity(handles.len());
        for member in handles {
            members.push(self.resolve_type(member, depth + 1, generics).await?);
        }
        Ok(members)
    }

    pub(crate) async fn resolve_union(
        &mut self,
        ty: TypeHandle,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<TypeInfo> {
        let handles = self.checker.get_union_members(ty)?;
        let members = self.resolve_members(handles, depth, generics).await?;
        Ok(TypeInfo::Union { members })
    }

    pub(crate) async fn resolve_intersection(
        &mut self,
        ty: TypeHandle,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<TypeInfo> {
        let handles = self.checker.get_intersection_members(ty)?;
        let members = self.resolve_members(handles, depth, generics).await?;
        Ok(TypeInfo::Intersection { members })
    }
}
