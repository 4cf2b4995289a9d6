//! Mapped-type expander.
//!
//! Two shapes the host may leave unexpanded:
//!
//! 1. A pure index-signature shape (`{ [k: string]: V }`, string or number
//!    key, no enumerated properties) becomes an `Object` whose only member
//!    is its index signature. Name, type arguments, unbound generics and
//!    location are filled as for any other object.
//! 2. A named mapped shape still waiting for type arguments (`Foo<T>` with no
//!    concrete members) becomes a symbolic `Generic` carrying its display
//!    text. When the host reports mapped-type flags, only a mapped type whose
//!    instantiation is pending qualifies.

use crate::error::Result;
use crate::generics::GenericContext;
use crate::introspection::{TypeClass, TypeFlags, TypeHandle, TypeIntrospection};
use crate::resolve_rules::builtin;
use crate::resolve_rules::object::is_meaningful_name;
use crate::resolver::TypeResolver;
use crate::types::{IndexKeyKind, ObjectInfo, TypeInfo};

impl<C: TypeIntrospection + ?Sized> TypeResolver<'_, C> {
    pub(crate) async fn expand_mapped(
        &mut self,
        ty: TypeHandle,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<Option<TypeInfo>> {
        if self.checker.classify(ty)? != TypeClass::Object
            || builtin::is_builtin(self.checker, ty)
            || !self.checker.get_properties(ty)?.is_empty()
            || !self.checker.get_call_signatures(ty).is_empty()
        {
            return Ok(None);
        }

        let signatures = self.checker.get_index_signatures(ty);
        if !signatures.is_empty() {
            let keyed_by_string_or_number = signatures
                .iter()
                .any(|sig| matches!(sig.key, IndexKeyKind::String | IndexKeyKind::Number));
            if !keyed_by_string_or_number {
                return Ok(None);
            }
            let mut type_arguments = Vec::new();
            for arg in self.checker.get_type_arguments(ty) {
                type_arguments.push(self.resolve_type(arg, depth + 1, generics).await?);
            }
            let type_params = self.checker.get_type_parameters(ty);
            let mut scoped = if type_params.is_empty() || type_arguments.is_empty() {
                None
            } else {
                Some(
                    self.bind_type_arguments(&type_params, &type_arguments, depth, generics)
                        .await?,
                )
            };
            let ctx: &mut GenericContext = match scoped.as_mut() {
                Some(scoped) => scoped,
                None => generics,
            };

            let index_signature = self.resolve_index_signature(ty, depth, ctx).await?;
            let name = self
                .checker
                .get_symbol_name(ty)
                .filter(|name| is_meaningful_name(name));
            return Ok(Some(TypeInfo::Object(ObjectInfo {
                name,
                properties: Vec::new(),
                index_signature,
                generic_params: ctx.get_unresolved_generics(),
                type_arguments,
                source_location: self
                    .checker
                    .get_declaration_locations(ty)
                    .into_iter()
                    .next(),
            })));
        }

        let has_name = self
            .checker
            .get_symbol_name(ty)
            .is_some_and(|name| is_meaningful_name(&name));
        let text = self.checker.type_to_string(ty);
        let flags = self.checker.flags(ty);
        let pending =
            !flags.contains(TypeFlags::MAPPED) || flags.contains(TypeFlags::GENERIC_MAPPED);
        let aliased = self.checker.get_aliased_type(ty).is_some();
        if has_name && !aliased && text.contains('<') && pending {
            tracing::trace!(ty = %text, "unresolved generic mapped type");
            return Ok(Some(TypeInfo::Generic { name: text }));
        }
        Ok(None)
    }
}
