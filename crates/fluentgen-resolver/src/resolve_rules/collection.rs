//! Array and tuple resolution.

use crate::error::Result;
use crate::generics::GenericContext;
use crate::introspection::{TypeHandle, TypeIntrospection};
use crate::resolver::TypeResolver;
use crate::types::TypeInfo;

/// Textual readonly heuristic over a canonical rendering.
pub fn has_readonly_prefix(text: &str) -> bool {
    let text = text.trim_start();
    text.starts_with("readonly ") || text.starts_with("ReadonlyArray<")
}

impl<C: TypeIntrospection + ?Sized> TypeResolver<'_, C> {
    /// Structural readonly signal wins; the text prefix is consulted only when
    /// the host exposes none.
    pub(crate) fn is_readonly_collection(&self, ty: TypeHandle) -> bool {
        match self.checker.is_readonly(ty) {
            Some(readonly) => readonly,
            None => has_readonly_prefix(&self.checker.type_to_string(ty)),
        }
    }

    pub(crate) async fn resolve_array(
        &mut self,
        ty: TypeHandle,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<TypeInfo> {
        let element = self.checker.get_array_element_type(ty)?;
        let element_type = self.resolve_type(element, depth + 1, generics).await?;
        Ok(TypeInfo::Array {
            element_type: Box::new(element_type),
            readonly: self.is_readonly_collection(ty),
        })
    }

    pub(crate) async fn resolve_tuple(
        &mut self,
        ty: TypeHandle,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<TypeInfo> {
        let handles = self.checker.get_tuple_elements(ty)?;
        let mut elements = Vec::with_capacity(handles.len());
        for element in handles {
            elements.push(self.resolve_type(element, depth + 1, generics).await?);
        }
        Ok(TypeInfo::Tuple {
            elements,
            readonly: self.is_readonly_collection(ty),
        })
    }
}
