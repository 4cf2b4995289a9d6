//! Plugin hook dispatch.
//!
//! Hooks intercept every uncached resolution frame: `before_resolve` runs
//! before any expander or category resolver, `after_resolve` may rewrite the
//! produced [`TypeInfo`] before it is cached. Hooks run in registration order
//! and the first failure aborts the chain; that error becomes the result of
//! `resolve_type`.
//!
//! Hook methods are async so a plugin may perform I/O (for example loading an
//! extension on first use) without blocking the caller's thread.

use crate::generics::GenericContext;
use crate::introspection::TypeHandle;
use crate::types::TypeInfo;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// What a hook sees about the frame being resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct HookContext {
    /// The handle that will be resolved. A before-hook may redirect the
    /// frame by replacing it.
    pub handle: TypeHandle,
    pub type_text: String,
    pub symbol_name: Option<String>,
    pub depth: u32,
    /// Concrete generic bindings visible to the frame.
    pub generic_bindings: Vec<(String, TypeInfo)>,
}

impl HookContext {
    pub fn new(
        handle: TypeHandle,
        type_text: impl Into<String>,
        symbol_name: Option<String>,
        depth: u32,
        generics: &GenericContext,
    ) -> Self {
        Self {
            handle,
            type_text: type_text.into(),
            symbol_name,
            depth,
            generic_bindings: generics.bound_entries(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("hook `{hook}` rejected resolution: {message}")]
pub struct HookError {
    pub hook: String,
    pub message: String,
}

impl HookError {
    pub fn new(hook: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            hook: hook.into(),
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait ResolveHook: Send + Sync {
    fn name(&self) -> &str;

    async fn before_resolve(&self, context: HookContext) -> Result<HookContext, HookError> {
        Ok(context)
    }

    async fn after_resolve(
        &self,
        _context: &HookContext,
        info: TypeInfo,
    ) -> Result<TypeInfo, HookError> {
        Ok(info)
    }
}

#[derive(Clone, Default)]
pub struct HookDispatcher {
    hooks: Vec<Arc<dyn ResolveHook>>,
}

impl fmt::Debug for HookDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|hook| hook.name()))
            .finish()
    }
}

impl HookDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, hook: Arc<dyn ResolveHook>) {
        self.hooks.push(hook);
    }

    pub fn with_hook(mut self, hook: Arc<dyn ResolveHook>) -> Self {
        self.register(hook);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub async fn run_before(&self, mut context: HookContext) -> Result<HookContext, HookError> {
        for hook in &self.hooks {
            context = hook.before_resolve(context).await.inspect_err(|err| {
                tracing::debug!(hook = hook.name(), error = %err, "before_resolve rejected");
            })?;
        }
        Ok(context)
    }

    pub async fn run_after(
        &self,
        context: &HookContext,
        mut info: TypeInfo,
    ) -> Result<TypeInfo, HookError> {
        for hook in &self.hooks {
            info = hook.after_resolve(context, info).await.inspect_err(|err| {
                tracing::debug!(hook = hook.name(), error = %err, "after_resolve rejected");
            })?;
        }
        Ok(info)
    }
}

#[cfg(test)]
#[path = "../tests/hooks_tests.rs"]
mod tests;
