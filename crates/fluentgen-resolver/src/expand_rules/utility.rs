//! Selection/filtering expander: Pick, Omit, Partial, Required, Readonly,
//! Record, Exclude, Extract, NonNullable.
//!
//! Engages only when the host left the construct unexpanded, which shows up
//! as an object handle with zero concrete properties. The result is derived
//! from the already resolved target rather than by re-implementing the
//! host's type algebra.

use crate::error::Result;
use crate::expand_rules::assignability::is_assignable_approx;
use crate::expand_rules::union_or_single;
use crate::generics::GenericContext;
use crate::introspection::{TypeClass, TypeHandle, TypeIntrospection};
use crate::resolver::TypeResolver;
use crate::types::{
    IndexKeyKind, IndexSignature, ObjectInfo, PrimitiveKind, PropertyInfo, TypeInfo,
};
use fluentgen_common::limits::MAX_LITERAL_EXTRACTION_DEPTH;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilityKind {
    Pick,
    Omit,
    Partial,
    Required,
    Readonly,
    Record,
    Exclude,
    Extract,
    NonNullable,
}

impl UtilityKind {
    /// Recognize a utility by symbol name and argument count.
    pub fn from_symbol(name: &str, arity: usize) -> Option<Self> {
        let kind = match (name, arity) {
            ("Pick", 2) => Self::Pick,
            ("Omit", 2) => Self::Omit,
            ("Partial", 1) => Self::Partial,
            ("Required", 1) => Self::Required,
            ("Readonly", 1) => Self::Readonly,
            ("Record", 2) => Self::Record,
            ("Exclude", 2) => Self::Exclude,
            ("Extract", 2) => Self::Extract,
            ("NonNullable", 1) => Self::NonNullable,
            _ => return None,
        };
        Some(kind)
    }
}

/// Finite set of property keys denoted by a resolved key type.
///
/// Literals contribute their key text; unions contribute every member's keys;
/// `keyof` of a resolved object contributes its property names. Anything else
/// (a primitive, an unbound generic) has no finite key set.
pub fn literal_keys(info: &TypeInfo) -> Option<Vec<String>> {
    let mut keys = Vec::new();
    collect_literal_keys(info, 0, &mut keys).then_some(keys)
}

fn collect_literal_keys(info: &TypeInfo, depth: u32, keys: &mut Vec<String>) -> bool {
    if depth > MAX_LITERAL_EXTRACTION_DEPTH {
        return false;
    }
    match info {
        TypeInfo::Literal { value } => {
            keys.push(value.to_key_text());
            true
        }
        TypeInfo::Union { members } => members
            .iter()
            .all(|member| collect_literal_keys(member, depth + 1, keys)),
        TypeInfo::Keyof { target } => match target.as_ref() {
            TypeInfo::Object(obj) if obj.index_signature.is_none() => {
                keys.extend(obj.properties.iter().map(|prop| prop.name.clone()));
                true
            }
            _ => false,
        },
        TypeInfo::Never => true,
        _ => false,
    }
}

fn index_key_kind(key: &TypeInfo) -> IndexKeyKind {
    if key.is_primitive(PrimitiveKind::Number) {
        IndexKeyKind::Number
    } else if key.is_primitive(PrimitiveKind::Symbol) {
        IndexKeyKind::Symbol
    } else {
        IndexKeyKind::String
    }
}

/// Anonymous copy of `target` that keeps its unresolved generic list.
fn derived_object(target: &ObjectInfo) -> ObjectInfo {
    ObjectInfo {
        generic_params: target.generic_params.clone(),
        ..ObjectInfo::default()
    }
}

impl<C: TypeIntrospection + ?Sized> TypeResolver<'_, C> {
    pub(crate) async fn expand_utility(
        &mut self,
        ty: TypeHandle,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<Option<TypeInfo>> {
        if self.checker.classify(ty)? != TypeClass::Object {
            return Ok(None);
        }
        let Some(symbol) = self.checker.get_symbol_name(ty) else {
            return Ok(None);
        };
        let args = self.checker.get_type_arguments(ty);
        let Some(kind) = UtilityKind::from_symbol(&symbol, args.len()) else {
            return Ok(None);
        };
        if !self.checker.get_properties(ty)?.is_empty() {
            return Ok(None);
        }

        let mut resolved = Vec::with_capacity(args.len());
        for arg in args {
            resolved.push(self.resolve_type(arg, depth + 1, generics).await?);
        }
        tracing::trace!(utility = ?kind, "expanding utility type");
        Ok(apply_utility(kind, &resolved))
    }
}

/// Apply `kind` to its resolved arguments; `None` when the arguments do not
/// have the shape the utility needs (e.g. Pick over a non-literal key set).
pub fn apply_utility(kind: UtilityKind, args: &[TypeInfo]) -> Option<TypeInfo> {
    match kind {
        UtilityKind::Pick | UtilityKind::Omit => {
            let [target, keys] = args else { return None };
            let target = target.as_object()?;
            let keys: FxHashSet<String> = literal_keys(keys)?.into_iter().collect();
            let keep_listed = kind == UtilityKind::Pick;
            let mut result = derived_object(target);
            result.properties = target
                .properties
                .iter()
                .filter(|prop| keys.contains(&prop.name) == keep_listed)
                .cloned()
                .collect();
            if kind == UtilityKind::Omit {
                result.index_signature = target.index_signature.clone();
            }
            Some(TypeInfo::Object(result))
        }
        UtilityKind::Partial | UtilityKind::Required | UtilityKind::Readonly => {
            let [target] = args else { return None };
            let target = target.as_object()?;
            let mut result = derived_object(target);
            result.index_signature = target.index_signature.clone();
            result.properties = target.properties.clone();
            for prop in &mut result.properties {
                match kind {
                    UtilityKind::Partial => prop.optional = true,
                    UtilityKind::Required => prop.optional = false,
                    _ => prop.readonly = true,
                }
            }
            if kind == UtilityKind::Readonly {
                if let Some(sig) = result.index_signature.as_mut() {
                    sig.readonly = true;
                }
            }
            Some(TypeInfo::Object(result))
        }
        UtilityKind::Record => {
            let [keys, value] = args else { return None };
            let mut result = ObjectInfo::default();
            match literal_keys(keys) {
                Some(names) => {
                    result.properties = names
                        .into_iter()
                        .map(|name| PropertyInfo::new(name, value.clone()))
                        .collect();
                }
                None => {
                    result.index_signature = Some(IndexSignature {
                        key_type: index_key_kind(keys),
                        value_type: Box::new(value.clone()),
                        readonly: false,
                    });
                }
            }
            Some(TypeInfo::Object(result))
        }
        UtilityKind::Exclude | UtilityKind::Extract => {
            let [source, filter] = args else { return None };
            let keep_assignable = kind == UtilityKind::Extract;
            let members = source
                .union_members()
                .iter()
                .filter(|member| is_assignable_approx(member, filter) == keep_assignable)
                .cloned()
                .collect();
            Some(union_or_single(members))
        }
        UtilityKind::NonNullable => {
            let [source] = args else { return None };
            let members = source
                .union_members()
                .iter()
                .filter(|member| !member.is_nullish())
                .cloned()
                .collect();
            Some(union_or_single(members))
        }
    }
}
