//! Type Resolution Engine
//!
//! Turns opaque type handles owned by a host type checker into fully
//! structured [`TypeInfo`] trees for builder generation. It handles:
//!
//! - **Recursion**: a visited path breaks cycles with `Reference` nodes and a
//!   depth bound stops runaway expansion
//! - **Generics**: scoped bindings with substitution semantics, and cache keys
//!   that include the active bindings
//! - **Expansion**: utility types, mapped types, conditional types and
//!   template literals the host left unexpanded
//! - **Plugins**: async before/after hooks on every uncached frame
//!
//! The host is consumed through [`TypeIntrospection`]. [`TypeSnapshot`] is an
//! in-memory host that can be built programmatically or loaded from JSON.
pub mod cache;
pub mod error;
pub mod expand_rules;
pub mod generics;
pub mod hooks;
pub mod introspection;
pub mod options;
pub mod recursion;
pub mod resolve_rules;
mod resolver;
pub mod snapshot;
pub mod types;

pub use cache::{
    CacheEntry, CacheManager, CacheStats, CacheStore, MemoryCacheStore, SharedCacheStore,
};
pub use error::{InternalFailure, ResolveError, Result};
pub use generics::{GenericBinding, GenericContext};
pub use hooks::{HookContext, HookDispatcher, HookError, ResolveHook};
pub use introspection::{
    ConditionalParts, DeclarationMember, IndexSignatureDecl, IntrospectionError, ParameterDecl,
    PropertySymbol, SignatureDecl, TemplateParts, TypeClass, TypeFlags, TypeHandle,
    TypeIntrospection,
};
pub use options::ResolverOptions;
pub use resolver::{TypeResolver, TypeResolverBuilder};
pub use snapshot::{SnapshotType, TypeSnapshot};
pub use types::{
    FunctionInfo, GenericParam, IndexKeyKind, IndexSignature, LiteralValue, ObjectInfo,
    ParameterInfo, PrimitiveKind, PropertyInfo, SourceLocation, TypeInfo,
};
