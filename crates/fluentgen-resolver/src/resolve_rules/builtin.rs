//! Built-in platform types.
//!
//! A type is built-in when one of its declarations lives in a platform
//! declaration file, regardless of its name: a user-defined `Map` interface
//! is an ordinary object. Built-ins are never expanded structurally.

use crate::error::Result;
use crate::generics::GenericContext;
use crate::introspection::{TypeHandle, TypeIntrospection};
use crate::resolver::TypeResolver;
use crate::types::TypeInfo;

/// Platform generics whose type arguments are kept on the reference.
const GENERIC_PLATFORM_TYPES: &[&str] = &[
    "Promise",
    "PromiseLike",
    "Map",
    "Set",
    "WeakMap",
    "WeakSet",
    "ReadonlyMap",
    "ReadonlySet",
    "Iterable",
    "Iterator",
    "AsyncIterable",
    "AsyncIterator",
    "Generator",
    "AsyncGenerator",
];

/// Whether `file` is a platform declaration file.
pub fn is_platform_declaration_file(file: &str) -> bool {
    let normalized = file.replace('\\', "/");
    let file_name = normalized.rsplit('/').next().unwrap_or(&normalized);
    (file_name.starts_with("lib.") && file_name.ends_with(".d.ts"))
        || normalized.contains("/typescript/lib/")
        || normalized.contains("/node_modules/@types/node/")
}

pub fn is_builtin<C: TypeIntrospection + ?Sized>(checker: &C, ty: TypeHandle) -> bool {
    checker
        .get_declaration_locations(ty)
        .iter()
        .any(|location| is_platform_declaration_file(&location.file))
}

/// Strip type arguments from a rendering: `Map<string, number>` -> `Map`.
fn base_name(text: &str) -> &str {
    text.split('<').next().unwrap_or(text).trim()
}

impl<C: TypeIntrospection + ?Sized> TypeResolver<'_, C> {
    pub(crate) async fn resolve_builtin(
        &mut self,
        ty: TypeHandle,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<TypeInfo> {
        let text = self.checker.type_to_string(ty);
        let name = self
            .checker
            .get_symbol_name(ty)
            .unwrap_or_else(|| base_name(&text).to_string());
        let args = self.checker.get_type_arguments(ty);
        tracing::trace!(%name, args = args.len(), "built-in type");

        if matches!(name.as_str(), "Array" | "ReadonlyArray") && args.len() == 1 {
            let element_type = self.resolve_type(args[0], depth + 1, generics).await?;
            return Ok(TypeInfo::Array {
                element_type: Box::new(element_type),
                readonly: name == "ReadonlyArray",
            });
        }

        if GENERIC_PLATFORM_TYPES.contains(&name.as_str()) {
            let mut type_arguments = Vec::with_capacity(args.len());
            for arg in args {
                type_arguments.push(self.resolve_type(arg, depth + 1, generics).await?);
            }
            return Ok(TypeInfo::Reference {
                name,
                type_arguments,
            });
        }

        Ok(TypeInfo::reference(name))
    }
}
