//! Template-literal expander.
//!
//! A template with no placeholders is a plain string literal. Otherwise each
//! placeholder is resolved and must contribute a finite set of concrete
//! values (a literal, or a union of literals); the cartesian product of those
//! sets, interleaved with the text spans, gives one literal per combination.
//! A placeholder without enumerable values (`string`, an unbound generic),
//! or a product beyond the configured ceiling, yields a symbolic `Generic`
//! carrying the template's raw text instead.

use crate::error::Result;
use crate::generics::GenericContext;
use crate::introspection::{TypeFlags, TypeHandle, TypeIntrospection};
use crate::resolver::TypeResolver;
use crate::types::{LiteralValue, TypeInfo};

/// Concrete strings a resolved placeholder can contribute.
pub fn template_values(info: &TypeInfo) -> Option<Vec<String>> {
    match info {
        TypeInfo::Literal { value } => Some(vec![value.to_key_text()]),
        TypeInfo::Union { members } => {
            let mut values = Vec::with_capacity(members.len());
            for member in members {
                values.push(member.as_literal()?.to_key_text());
            }
            Some(values)
        }
        _ => None,
    }
}

/// Interleave `texts` with every combination drawn from `value_sets`, in
/// placeholder order. `texts` holds one more span than there are sets.
pub fn expand_combinations(texts: &[String], value_sets: &[Vec<String>]) -> Vec<String> {
    let head = texts.first().cloned().unwrap_or_default();
    let mut combinations = vec![head];
    for (position, values) in value_sets.iter().enumerate() {
        let tail = texts.get(position + 1).map(String::as_str).unwrap_or("");
        let mut next = Vec::with_capacity(combinations.len() * values.len());
        for prefix in &combinations {
            for value in values {
                next.push(format!("{prefix}{value}{tail}"));
            }
        }
        combinations = next;
    }
    combinations
}

impl<C: TypeIntrospection + ?Sized> TypeResolver<'_, C> {
    pub(crate) async fn expand_template_literal(
        &mut self,
        ty: TypeHandle,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<Option<TypeInfo>> {
        if !self.checker.flags(ty).contains(TypeFlags::TEMPLATE_LITERAL) {
            return Ok(None);
        }
        let Some(parts) = self.checker.get_template_parts(ty) else {
            return Ok(None);
        };
        if parts.types.is_empty() {
            return Ok(Some(TypeInfo::string_literal(parts.texts.concat())));
        }

        let raw_text = self.checker.type_to_string(ty);
        let mut value_sets = Vec::with_capacity(parts.types.len());
        for placeholder in &parts.types {
            let resolved = self.resolve_type(*placeholder, depth + 1, generics).await?;
            match template_values(&resolved) {
                Some(values) => value_sets.push(values),
                None => return Ok(Some(TypeInfo::Generic { name: raw_text })),
            }
        }

        let limit = self.options.template_expansion_limit;
        let total = value_sets
            .iter()
            .try_fold(1usize, |acc, values| acc.checked_mul(values.len()));
        match total {
            Some(0) => return Ok(Some(TypeInfo::Never)),
            Some(count) if count <= limit => {
                tracing::trace!(ty = %raw_text, combinations = count, "expanding template literal");
            }
            _ => {
                tracing::debug!(ty = %raw_text, limit, "template literal expansion over limit");
                return Ok(Some(TypeInfo::Generic { name: raw_text }));
            }
        }

        let mut literals: Vec<TypeInfo> = expand_combinations(&parts.texts, &value_sets)
            .into_iter()
            .map(|text| TypeInfo::literal(LiteralValue::String(text)))
            .collect();
        if literals.len() == 1 {
            return Ok(literals.pop());
        }
        Ok(Some(TypeInfo::Union { members: literals }))
    }
}
