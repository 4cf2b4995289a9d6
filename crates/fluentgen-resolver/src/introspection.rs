//! Type Introspection Interface.
//!
//! The host type-checking service is consumed through [`TypeIntrospection`].
//! The resolver never parses, binds, or checks anything itself: it only asks
//! the host to classify opaque [`TypeHandle`]s and to expose their members.
//!
//! Queries beyond the core classification (`get_template_parts`,
//! `get_conditional_parts`, ...) have conservative defaults so a host can
//! implement only what its checker actually exposes. A default of "nothing"
//! means "the host has no structural signal", which makes the resolver fall
//! back to its textual heuristics or skip the corresponding expander.

use crate::types::{IndexKeyKind, LiteralValue, PrimitiveKind, SourceLocation};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Opaque, host-owned type handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeHandle(pub u32);

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fundamental shape of a type as classified by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class", content = "value", rename_all = "camelCase")]
pub enum TypeClass {
    Primitive(PrimitiveKind),
    /// `None` when the host cannot read the literal's value directly.
    Literal(Option<LiteralValue>),
    Array,
    Tuple,
    Union,
    Intersection,
    Enum,
    GenericParameter,
    /// Objects, interfaces, aliases, and every construct the host has not
    /// flattened into one of the shapes above.
    Object,
}

bitflags! {
    /// Structural signals the host may expose in addition to [`TypeClass`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u32 {
        /// `keyof T` that the host has not evaluated.
        const KEYOF = 1 << 0;
        /// `typeof value` that the host has not evaluated.
        const TYPEOF = 1 << 1;
        /// `T[K]` that the host has not evaluated.
        const INDEXED_ACCESS = 1 << 2;
        /// Template literal type with its spans still separate.
        const TEMPLATE_LITERAL = 1 << 3;
        /// Conditional type the host has not resolved to a branch.
        const CONDITIONAL = 1 << 4;
        /// The host reports mapped-type information for this handle.
        const MAPPED = 1 << 5;
        /// Mapped type whose instantiation is still pending type arguments.
        const GENERIC_MAPPED = 1 << 6;
        /// The handle is a type alias.
        const ALIAS = 1 << 7;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySymbol {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeHandle,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub readonly: bool,
}

impl PropertySymbol {
    pub fn new(name: impl Into<String>, ty: TypeHandle) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            readonly: false,
        }
    }
}

/// A member node from a type's declaration, as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "member", rename_all = "camelCase")]
pub enum DeclarationMember {
    Property {
        name: String,
    },
    Method {
        name: String,
    },
    IndexSignature {
        key: IndexKeyKind,
        #[serde(default)]
        readonly: bool,
    },
    CallSignature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSignatureDecl {
    pub key: IndexKeyKind,
    pub value: TypeHandle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeHandle,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub rest: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureDecl {
    pub parameters: Vec<ParameterDecl>,
    pub return_type: TypeHandle,
}

/// Template literal spans: `texts.len() == types.len() + 1`, interleaved as
/// `texts[0] types[0] texts[1] ... types[n-1] texts[n]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TemplateParts {
    pub texts: Vec<String>,
    pub types: Vec<TypeHandle>,
}

/// `check extends extends ? true_type : false_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalParts {
    pub check: TypeHandle,
    pub extends: TypeHandle,
    pub true_type: TypeHandle,
    pub false_type: TypeHandle,
    #[serde(default)]
    pub distributive: bool,
}

/// Failure while querying the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntrospectionError {
    #[error("unknown type handle {0}")]
    UnknownHandle(TypeHandle),
    #[error("type {handle} has no {expected}")]
    MissingShape {
        handle: TypeHandle,
        expected: &'static str,
    },
    #[error("host error: {0}")]
    Host(String),
}

/// Read-only view of the host type checker.
pub trait TypeIntrospection: Send + Sync {
    fn classify(&self, ty: TypeHandle) -> Result<TypeClass, IntrospectionError>;

    /// Canonical textual rendering (e.g. `Box<string>`, `readonly string[]`).
    fn type_to_string(&self, ty: TypeHandle) -> String;

    fn flags(&self, _ty: TypeHandle) -> TypeFlags {
        TypeFlags::empty()
    }

    /// Concrete member properties in declaration order.
    fn get_properties(&self, ty: TypeHandle) -> Result<Vec<PropertySymbol>, IntrospectionError>;

    fn get_union_members(&self, ty: TypeHandle) -> Result<Vec<TypeHandle>, IntrospectionError>;

    fn get_intersection_members(
        &self,
        ty: TypeHandle,
    ) -> Result<Vec<TypeHandle>, IntrospectionError>;

    fn get_array_element_type(&self, ty: TypeHandle) -> Result<TypeHandle, IntrospectionError>;

    fn get_tuple_elements(&self, ty: TypeHandle) -> Result<Vec<TypeHandle>, IntrospectionError>;

    fn get_type_arguments(&self, ty: TypeHandle) -> Vec<TypeHandle>;

    /// Symbol (or alias symbol) name, if the type has one.
    fn get_symbol_name(&self, ty: TypeHandle) -> Option<String>;

    fn get_constraint(&self, ty: TypeHandle) -> Option<TypeHandle>;

    fn get_default(&self, ty: TypeHandle) -> Option<TypeHandle>;

    fn get_declaration_locations(&self, ty: TypeHandle) -> Vec<SourceLocation>;

    fn get_declaration_members(&self, _ty: TypeHandle) -> Vec<DeclarationMember> {
        Vec::new()
    }

    fn get_index_signatures(&self, _ty: TypeHandle) -> Vec<IndexSignatureDecl> {
        Vec::new()
    }

    /// Structural readonly signal for arrays and tuples; `None` when the host
    /// does not expose one.
    fn is_readonly(&self, _ty: TypeHandle) -> Option<bool> {
        None
    }

    /// Target of a type alias.
    fn get_aliased_type(&self, _ty: TypeHandle) -> Option<TypeHandle> {
        None
    }

    /// Type parameters declared by the type's generic declaration.
    fn get_type_parameters(&self, _ty: TypeHandle) -> Vec<TypeHandle> {
        Vec::new()
    }

    fn get_call_signatures(&self, _ty: TypeHandle) -> Vec<SignatureDecl> {
        Vec::new()
    }

    fn get_template_parts(&self, _ty: TypeHandle) -> Option<TemplateParts> {
        None
    }

    fn get_conditional_parts(&self, _ty: TypeHandle) -> Option<ConditionalParts> {
        None
    }

    /// Operand of `keyof` / `typeof`.
    fn get_operator_operand(&self, _ty: TypeHandle) -> Option<TypeHandle> {
        None
    }

    /// `(object, index)` of an indexed access.
    fn get_indexed_access_parts(&self, _ty: TypeHandle) -> Option<(TypeHandle, TypeHandle)> {
        None
    }

    /// Intrinsic name of a type (`"true"`, `"false"`, `"string"`, ...).
    fn get_intrinsic_name(&self, _ty: TypeHandle) -> Option<String> {
        None
    }

    /// Look up a named type visible to the host.
    fn lookup_type(&self, _name: &str) -> Option<TypeHandle> {
        None
    }
}
