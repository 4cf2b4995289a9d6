//! Object and interface resolution.
//!
//! An alias that can be flattened without losing structure resolves straight
//! through to its target. Everything else becomes an `Object` node assembled
//! from: properties, index signature, unresolved generic parameters, type
//! arguments, source location.
//!
//! Type arguments are resolved before the properties because they are bound
//! positionally to the declaration's type parameters in a child
//! [`GenericContext`]; the properties then see those bindings.

use crate::error::Result;
use crate::generics::GenericContext;
use crate::introspection::{
    DeclarationMember, PropertySymbol, SignatureDecl, TypeHandle, TypeIntrospection,
};
use crate::resolver::TypeResolver;
use crate::types::{
    FunctionInfo, IndexKeyKind, IndexSignature, ObjectInfo, ParameterInfo, PropertyInfo, TypeInfo,
};
use rustc_hash::FxHashSet;

/// Anonymous shapes carry compiler sentinel names such as `__type` or
/// `__object`; those are never emitted.
pub fn is_meaningful_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with("__")
}

impl<C: TypeIntrospection + ?Sized> TypeResolver<'_, C> {
    /// Flattening is lossless when the alias declares no properties of its
    /// own, or exactly the target's property set.
    fn can_flatten_alias(&self, alias: TypeHandle, target: TypeHandle) -> Result<bool> {
        let alias_props = self.checker.get_properties(alias)?;
        if alias_props.is_empty() {
            return Ok(true);
        }
        let target_props = self.checker.get_properties(target)?;
        let alias_names: FxHashSet<&str> = alias_props.iter().map(|p| p.name.as_str()).collect();
        let target_names: FxHashSet<&str> =
            target_props.iter().map(|p| p.name.as_str()).collect();
        Ok(alias_names == target_names)
    }

    pub(crate) async fn resolve_object(
        &mut self,
        ty: TypeHandle,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<TypeInfo> {
        if let Some(target) = self.checker.get_aliased_type(ty) {
            if target != ty && self.can_flatten_alias(ty, target)? {
                tracing::trace!(alias = %self.checker.type_to_string(ty), "flattening alias");
                return self.resolve_type(target, depth + 1, generics).await;
            }
        }

        let declared = self.checker.get_properties(ty)?;
        if declared.is_empty() {
            if let Some(signature) = self.checker.get_call_signatures(ty).into_iter().next() {
                return self.resolve_function(signature, depth, generics).await;
            }
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

        let properties = self.resolve_properties(declared, depth, ctx).await?;
        let index_signature = self.resolve_index_signature(ty, depth, ctx).await?;
        let generic_params = ctx.get_unresolved_generics();

        let name = self
            .checker
            .get_symbol_name(ty)
            .filter(|name| is_meaningful_name(name));
        let source_location = self
            .checker
            .get_declaration_locations(ty)
            .into_iter()
            .next();

        Ok(TypeInfo::Object(ObjectInfo {
            name,
            properties,
            index_signature,
            generic_params,
            type_arguments,
            source_location,
        }))
    }

    /// Child scope binding each declared parameter to its argument, or to the
    /// parameter's default when the argument is missing.
    pub(crate) async fn bind_type_arguments(
        &mut self,
        type_params: &[TypeHandle],
        type_arguments: &[TypeInfo],
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<GenericContext> {
        let mut scoped = generics.child();
        for (position, param) in type_params.iter().enumerate() {
            let name = self.generic_param_name(*param);
            let binding = match type_arguments.get(position) {
                // The declaration referring to its own parameter binds nothing.
                Some(TypeInfo::Generic { name: arg }) if *arg == name => continue,
                Some(arg) => arg.clone(),
                None => match self.checker.get_default(*param) {
                    Some(default) => self.resolve_type(default, depth + 1, generics).await?,
                    None => continue,
                },
            };
            scoped.bind(name, binding);
        }
        Ok(scoped)
    }

    pub(crate) async fn resolve_properties(
        &mut self,
        declared: Vec<PropertySymbol>,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<Vec<PropertyInfo>> {
        let mut properties = Vec::with_capacity(declared.len());
        for prop in declared {
            let ty = self.resolve_type(prop.ty, depth + 1, generics).await?;
            properties.push(PropertyInfo {
                name: prop.name,
                ty,
                optional: prop.optional,
                readonly: prop.readonly,
            });
        }
        Ok(properties)
    }

    /// Readonly modifier of the index signature for `key`, found by walking
    /// the declaration's member nodes.
    pub(crate) fn index_signature_readonly(&self, ty: TypeHandle, key: IndexKeyKind) -> bool {
        self.checker
            .get_declaration_members(ty)
            .iter()
            .any(|member| {
                matches!(
                    member,
                    DeclarationMember::IndexSignature { key: k, readonly: true } if *k == key
                )
            })
    }

    /// The string index signature if present, else the number one, else any.
    pub(crate) async fn resolve_index_signature(
        &mut self,
        ty: TypeHandle,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<Option<IndexSignature>> {
        let signatures = self.checker.get_index_signatures(ty);
        let chosen = signatures
            .iter()
            .find(|sig| sig.key == IndexKeyKind::String)
            .or_else(|| signatures.iter().find(|sig| sig.key == IndexKeyKind::Number))
            .or_else(|| signatures.first())
            .copied();
        let Some(signature) = chosen else {
            return Ok(None);
        };

        let value_type = self.resolve_type(signature.value, depth + 1, generics).await?;
        Ok(Some(IndexSignature {
            key_type: signature.key,
            value_type: Box::new(value_type),
            readonly: self.index_signature_readonly(ty, signature.key),
        }))
    }

    async fn resolve_function(
        &mut self,
        signature: SignatureDecl,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<TypeInfo> {
        let mut parameters = Vec::with_capacity(signature.parameters.len());
        for param in signature.parameters {
            let ty = self.resolve_type(param.ty, depth + 1, generics).await?;
            parameters.push(ParameterInfo {
                name: param.name,
                ty,
                optional: param.optional,
                rest: param.rest,
            });
        }
        let return_type = self
            .resolve_type(signature.return_type, depth + 1, generics)
            .await?;
        Ok(TypeInfo::Function(FunctionInfo {
            parameters,
            return_type: Box::new(return_type),
        }))
    }
}
