//! Resolved type model.
//!
//! `TypeInfo` is the structured, serializable description of a resolved type
//! handed to the builder code generator. It is a closed tagged union: every
//! consumer matches on it exhaustively.
//!
//! The tree is always acyclic. A recursive occurrence of a type inside its own
//! ancestry is replaced by a [`TypeInfo::Reference`] carrying the canonical text
//! of the type that was already being resolved.

use fluentgen_common::js_number_to_string;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Host primitive classification.
///
/// `Unknown` and `Never` exist so the host can classify them, but the resolver
/// never emits them inside [`TypeInfo::Primitive`]; they map to the dedicated
/// [`TypeInfo::Unknown`] and [`TypeInfo::Never`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
    Null,
    Undefined,
    Void,
    Any,
    Object,
    Unknown,
    Never,
}

impl PrimitiveKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::BigInt => "bigint",
            Self::Symbol => "symbol",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Void => "void",
            Self::Any => "any",
            Self::Object => "object",
            Self::Unknown => "unknown",
            Self::Never => "never",
        }
    }

    /// Null-like kinds removed by non-nullable stripping.
    pub const fn is_nullish(self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }
}

/// Literal value carried by [`TypeInfo::Literal`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    /// Stored without the trailing `n`.
    BigInt(String),
}

impl LiteralValue {
    /// Text this literal contributes when spliced into a template literal
    /// or used as a property key.
    pub fn to_key_text(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Number(n) => js_number_to_string(*n),
            Self::Boolean(b) => b.to_string(),
            Self::BigInt(digits) => digits.clone(),
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            Self::Number(n) => f.write_str(&js_number_to_string(*n)),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::BigInt(digits) => write!(f, "{digits}n"),
        }
    }
}

/// Key kind of an index signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKeyKind {
    String,
    Number,
    Symbol,
}

impl IndexKeyKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Symbol => "symbol",
        }
    }
}

/// A property of an object shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeInfo,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
}

impl PropertyInfo {
    pub fn new(name: impl Into<String>, ty: TypeInfo) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            readonly: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSignature {
    pub key_type: IndexKeyKind,
    pub value_type: Box<TypeInfo>,
    #[serde(default)]
    pub readonly: bool,
}

/// A generic parameter that is known but not bound at the emitting site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericParam {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<TypeInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<TypeInfo>,
}

impl GenericParam {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: None,
            default: None,
        }
    }
}

/// Where a declaration lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectInfo {
    /// Present only for meaningful identifiers; anonymous shapes omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub properties: Vec<PropertyInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_signature: Option<IndexSignature>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_params: Vec<GenericParam>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_arguments: Vec<TypeInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_location: Option<SourceLocation>,
}

impl ObjectInfo {
    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.iter().find(|prop| prop.name == name)
    }

    pub fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(|prop| prop.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeInfo,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub rest: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInfo {
    pub parameters: Vec<ParameterInfo>,
    pub return_type: Box<TypeInfo>,
}

/// A fully resolved type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TypeInfo {
    Primitive {
        name: PrimitiveKind,
    },
    Literal {
        value: LiteralValue,
    },
    Array {
        element_type: Box<TypeInfo>,
        #[serde(default)]
        readonly: bool,
    },
    Tuple {
        elements: Vec<TypeInfo>,
        #[serde(default)]
        readonly: bool,
    },
    Object(ObjectInfo),
    Union {
        members: Vec<TypeInfo>,
    },
    Intersection {
        members: Vec<TypeInfo>,
    },
    /// Symbolic generic: an unbound parameter, or a construct that needs
    /// concrete type arguments before it can be expanded.
    Generic {
        name: String,
    },
    /// Stand-in for a type already being resolved higher up the chain, or an
    /// opaque platform type.
    Reference {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        type_arguments: Vec<TypeInfo>,
    },
    Enum {
        name: String,
    },
    Function(FunctionInfo),
    Keyof {
        target: Box<TypeInfo>,
    },
    Typeof {
        target: Box<TypeInfo>,
    },
    Index {
        object: Box<TypeInfo>,
        index: Box<TypeInfo>,
    },
    Unknown,
    Never,
}

impl TypeInfo {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Unknown => Self::Unknown,
            PrimitiveKind::Never => Self::Never,
            name => Self::Primitive { name },
        }
    }

    pub fn string() -> Self {
        Self::Primitive {
            name: PrimitiveKind::String,
        }
    }

    pub fn number() -> Self {
        Self::Primitive {
            name: PrimitiveKind::Number,
        }
    }

    pub fn boolean() -> Self {
        Self::Primitive {
            name: PrimitiveKind::Boolean,
        }
    }

    pub fn literal(value: LiteralValue) -> Self {
        Self::Literal { value }
    }

    pub fn string_literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: LiteralValue::String(value.into()),
        }
    }

    pub fn number_literal(value: f64) -> Self {
        Self::Literal {
            value: LiteralValue::Number(value),
        }
    }

    pub fn generic(name: impl Into<String>) -> Self {
        Self::Generic { name: name.into() }
    }

    /// Cycle-breaking stand-in for `name`.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference {
            name: name.into(),
            type_arguments: Vec::new(),
        }
    }

    pub fn array(element: TypeInfo) -> Self {
        Self::Array {
            element_type: Box::new(element),
            readonly: false,
        }
    }

    pub fn object(info: ObjectInfo) -> Self {
        Self::Object(info)
    }

    pub fn union(members: Vec<TypeInfo>) -> Self {
        Self::Union { members }
    }

    /// The variant name, as used in the serialized `kind` tag.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Primitive { .. } => "primitive",
            Self::Literal { .. } => "literal",
            Self::Array { .. } => "array",
            Self::Tuple { .. } => "tuple",
            Self::Object(_) => "object",
            Self::Union { .. } => "union",
            Self::Intersection { .. } => "intersection",
            Self::Generic { .. } => "generic",
            Self::Reference { .. } => "reference",
            Self::Enum { .. } => "enum",
            Self::Function(_) => "function",
            Self::Keyof { .. } => "keyof",
            Self::Typeof { .. } => "typeof",
            Self::Index { .. } => "index",
            Self::Unknown => "unknown",
            Self::Never => "never",
        }
    }

    pub fn as_object(&self) -> Option<&ObjectInfo> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&LiteralValue> {
        match self {
            Self::Literal { value } => Some(value),
            _ => None,
        }
    }

    /// Union members, or the type itself as a single-member slice.
    pub fn union_members(&self) -> &[TypeInfo] {
        match self {
            Self::Union { members } => members,
            other => std::slice::from_ref(other),
        }
    }

    pub fn is_primitive(&self, kind: PrimitiveKind) -> bool {
        matches!(self, Self::Primitive { name } if *name == kind)
    }

    pub fn is_any(&self) -> bool {
        self.is_primitive(PrimitiveKind::Any)
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Primitive { name } if name.is_nullish())
    }

    fn needs_parens_in_array(&self) -> bool {
        matches!(
            self,
            Self::Union { .. } | Self::Intersection { .. } | Self::Function(_) | Self::Keyof { .. }
        )
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[TypeInfo], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_type_arguments(f: &mut fmt::Formatter<'_>, args: &[TypeInfo]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    f.write_str("<")?;
    write_joined(f, args, ", ")?;
    f.write_str(">")
}

impl fmt::Display for ObjectInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            f.write_str(name)?;
            return write_type_arguments(f, &self.type_arguments);
        }
        if self.properties.is_empty() && self.index_signature.is_none() {
            return f.write_str("{}");
        }
        f.write_str("{ ")?;
        for prop in &self.properties {
            if prop.readonly {
                f.write_str("readonly ")?;
            }
            write!(f, "{}", prop.name)?;
            if prop.optional {
                f.write_str("?")?;
            }
            write!(f, ": {}; ", prop.ty)?;
        }
        if let Some(index) = &self.index_signature {
            if index.readonly {
                f.write_str("readonly ")?;
            }
            write!(
                f,
                "[key: {}]: {}; ",
                index.key_type.as_str(),
                index.value_type
            )?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive { name } => f.write_str(name.as_str()),
            Self::Literal { value } => write!(f, "{value}"),
            Self::Array {
                element_type,
                readonly,
            } => {
                if *readonly {
                    f.write_str("readonly ")?;
                }
                if element_type.needs_parens_in_array() {
                    write!(f, "({element_type})[]")
                } else {
                    write!(f, "{element_type}[]")
                }
            }
            Self::Tuple { elements, readonly } => {
                if *readonly {
                    f.write_str("readonly ")?;
                }
                f.write_str("[")?;
                write_joined(f, elements, ", ")?;
                f.write_str("]")
            }
            Self::Object(obj) => write!(f, "{obj}"),
            Self::Union { members } if members.is_empty() => f.write_str("never"),
            Self::Union { members } => write_joined(f, members, " | "),
            Self::Intersection { members } if members.is_empty() => f.write_str("unknown"),
            Self::Intersection { members } => write_joined(f, members, " & "),
            Self::Generic { name } | Self::Enum { name } => f.write_str(name),
            Self::Reference {
                name,
                type_arguments,
            } => {
                f.write_str(name)?;
                write_type_arguments(f, type_arguments)
            }
            Self::Function(func) => {
                f.write_str("(")?;
                for (i, param) in func.parameters.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if param.rest {
                        f.write_str("...")?;
                    }
                    f.write_str(&param.name)?;
                    if param.optional {
                        f.write_str("?")?;
                    }
                    write!(f, ": {}", param.ty)?;
                }
                write!(f, ") => {}", func.return_type)
            }
            Self::Keyof { target } => write!(f, "keyof {target}"),
            Self::Typeof { target } => write!(f, "typeof {target}"),
            Self::Index { object, index } => write!(f, "{object}[{index}]"),
            Self::Unknown => f.write_str("unknown"),
            Self::Never => f.write_str("never"),
        }
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
