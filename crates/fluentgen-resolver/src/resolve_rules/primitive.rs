//! Primitive, literal and enum resolution.

use crate::introspection::{TypeHandle, TypeIntrospection};
use crate::resolver::TypeResolver;
use crate::types::{LiteralValue, PrimitiveKind, TypeInfo};

/// `unknown` and `never` get their own variants; everything else is a
/// `Primitive`.
pub fn resolve_primitive(kind: PrimitiveKind) -> TypeInfo {
    TypeInfo::primitive(kind)
}

/// Parse a literal from its canonical rendering (`"a"`, `42`, `true`, `10n`).
pub fn parse_literal_text(text: &str) -> Option<LiteralValue> {
    let text = text.trim();
    match text {
        "true" => return Some(LiteralValue::Boolean(true)),
        "false" => return Some(LiteralValue::Boolean(false)),
        _ => {}
    }
    let quoted = text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .or_else(|| text.strip_prefix('\'').and_then(|rest| rest.strip_suffix('\'')));
    if let Some(inner) = quoted {
        return Some(LiteralValue::String(inner.replace("\\\"", "\"")));
    }
    if let Some(digits) = text.strip_suffix('n') {
        if !digits.is_empty() && digits.trim_start_matches('-').bytes().all(|b| b.is_ascii_digit()) {
            return Some(LiteralValue::BigInt(digits.to_string()));
        }
    }
    text.parse::<f64>().ok().map(LiteralValue::Number)
}

impl<C: TypeIntrospection + ?Sized> TypeResolver<'_, C> {
    /// Literal whose value the host could not read directly falls back to the
    /// intrinsic name (boolean literals), then to the rendered text.
    pub(crate) fn resolve_literal(&self, ty: TypeHandle, value: Option<LiteralValue>) -> TypeInfo {
        if let Some(value) = value {
            return TypeInfo::literal(value);
        }
        match self.checker.get_intrinsic_name(ty).as_deref() {
            Some("true") => return TypeInfo::literal(LiteralValue::Boolean(true)),
            Some("false") => return TypeInfo::literal(LiteralValue::Boolean(false)),
            _ => {}
        }
        let text = self.checker.type_to_string(ty);
        match parse_literal_text(&text) {
            Some(value) => TypeInfo::literal(value),
            None => {
                tracing::trace!(ty = %text, "unreadable literal");
                TypeInfo::Unknown
            }
        }
    }

    /// Name-only marker; member values are not enumerated.
    pub(crate) fn resolve_enum(&self, ty: TypeHandle) -> TypeInfo {
        let name = self
            .checker
            .get_symbol_name(ty)
            .unwrap_or_else(|| self.checker.type_to_string(ty));
        TypeInfo::Enum { name }
    }
}
