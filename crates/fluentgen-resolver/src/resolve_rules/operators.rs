//! Type operators: `keyof T`, `typeof value`, `T[K]`.
//!
//! Recognized through the host's structural flags first. When the host
//! exposes no flag for an operator, and only for handles it classifies as
//! plain objects, the canonical text is decomposed instead and the operand
//! names are looked up through the host.

use crate::error::Result;
use crate::generics::GenericContext;
use crate::introspection::{TypeClass, TypeFlags, TypeHandle, TypeIntrospection};
use crate::resolve_rules::primitive::parse_literal_text;
use crate::resolver::TypeResolver;
use crate::types::TypeInfo;

/// Operator shape extracted from canonical text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorText<'t> {
    Keyof(&'t str),
    Typeof(&'t str),
    Index { object: &'t str, index: &'t str },
}

/// Decompose `keyof X`, `typeof X` or `X[Y]`.
///
/// Array suffixes (`X[]`) and tuples (`[A, B]`) are not indexed accesses.
pub fn parse_operator_text(text: &str) -> Option<OperatorText<'_>> {
    let text = text.trim();
    if let Some(operand) = text.strip_prefix("keyof ") {
        return Some(OperatorText::Keyof(operand.trim()));
    }
    if let Some(operand) = text.strip_prefix("typeof ") {
        return Some(OperatorText::Typeof(operand.trim()));
    }
    let inner = text.strip_suffix(']')?;
    if inner.ends_with('[') {
        return None;
    }

    // Find the '[' that opens the trailing bracket group.
    let mut nesting = 0usize;
    let mut open = None;
    for (i, ch) in inner.char_indices().rev() {
        match ch {
            ']' => nesting += 1,
            '[' if nesting == 0 => {
                open = Some(i);
                break;
            }
            '[' => nesting -= 1,
            _ => {}
        }
    }
    let open = open?;
    let object = inner[..open].trim();
    let index = inner[open + 1..].trim();
    if object.is_empty() || index.is_empty() {
        return None;
    }
    Some(OperatorText::Index { object, index })
}

impl<C: TypeIntrospection + ?Sized> TypeResolver<'_, C> {
    pub(crate) async fn resolve_type_operator(
        &mut self,
        ty: TypeHandle,
        class: &TypeClass,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<Option<TypeInfo>> {
        let flags = self.checker.flags(ty);

        if flags.contains(TypeFlags::KEYOF) {
            if let Some(operand) = self.checker.get_operator_operand(ty) {
                let target = self.resolve_type(operand, depth + 1, generics).await?;
                return Ok(Some(TypeInfo::Keyof {
                    target: Box::new(target),
                }));
            }
        }
        if flags.contains(TypeFlags::TYPEOF) {
            if let Some(operand) = self.checker.get_operator_operand(ty) {
                let target = self.resolve_type(operand, depth + 1, generics).await?;
                return Ok(Some(TypeInfo::Typeof {
                    target: Box::new(target),
                }));
            }
        }
        if flags.contains(TypeFlags::INDEXED_ACCESS) {
            if let Some((object, index)) = self.checker.get_indexed_access_parts(ty) {
                let object = self.resolve_type(object, depth + 1, generics).await?;
                let index = self.resolve_type(index, depth + 1, generics).await?;
                return Ok(Some(TypeInfo::Index {
                    object: Box::new(object),
                    index: Box::new(index),
                }));
            }
        }

        if !matches!(class, TypeClass::Object) {
            return Ok(None);
        }
        let text = self.checker.type_to_string(ty);
        let Some(operator) = parse_operator_text(&text) else {
            return Ok(None);
        };
        tracing::trace!(ty = %text, ?operator, "type operator from text");

        match operator {
            OperatorText::Keyof(operand) => {
                let Some(target) = self.resolve_named(ty, operand, depth, generics).await? else {
                    return Ok(None);
                };
                Ok(Some(TypeInfo::Keyof {
                    target: Box::new(target),
                }))
            }
            OperatorText::Typeof(operand) => {
                let Some(target) = self.resolve_named(ty, operand, depth, generics).await? else {
                    return Ok(None);
                };
                Ok(Some(TypeInfo::Typeof {
                    target: Box::new(target),
                }))
            }
            OperatorText::Index { object, index } => {
                let Some(object) = self.resolve_named(ty, object, depth, generics).await? else {
                    return Ok(None);
                };
                let index = match parse_literal_text(index) {
                    Some(value) => TypeInfo::literal(value),
                    None => match self.resolve_named(ty, index, depth, generics).await? {
                        Some(index) => index,
                        None => return Ok(None),
                    },
                };
                Ok(Some(TypeInfo::Index {
                    object: Box::new(object),
                    index: Box::new(index),
                }))
            }
        }
    }

    /// Resolve a type by name through the host, refusing to loop back onto
    /// the operator handle itself.
    async fn resolve_named(
        &mut self,
        origin: TypeHandle,
        name: &str,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<Option<TypeInfo>> {
        match self.checker.lookup_type(name) {
            Some(handle) if handle != origin => {
                Ok(Some(self.resolve_type(handle, depth + 1, generics).await?))
            }
            _ => Ok(None),
        }
    }
}
