//! Resolution orchestrator.
//!
//! [`TypeResolver::resolve_type`] is the single entry point. Each call opens
//! one frame and runs the pipeline:
//!
//! 1. depth guard (`MaxDepthExceeded` once `depth > max_depth`)
//! 2. cache lookup (a hit returns immediately, hooks are not re-run; the
//!    generic parameters the cached frame registered are replayed). An entry
//!    whose subtree opened a type that is on the visited path right now is
//!    not reused, since a fresh resolution would break that cycle.
//! 3. visited-path check (a type already in its own ancestry becomes a
//!    `Reference` node)
//! 4. before-hooks
//! 5. specialized expanders in fixed order, first `Some` wins
//! 6. category resolver dispatch
//! 7. after-hooks
//! 8. visited-path pop, then cache store unless a cycle break inside the
//!    frame pointed at a still-open ancestor
//!
//! Nested types are resolved by calling back into `resolve_type` and awaiting
//! each sub-resolution in turn. Nothing is resolved in parallel: the visited
//! path and the cache are per-instance mutable state, and interleaved frames
//! would corrupt cycle detection. Callers that need parallelism create one
//! resolver per task, optionally sharing a
//! [`SharedCacheStore`](crate::cache::SharedCacheStore).

use crate::cache::{CacheEntry, CacheManager, CacheStats, CacheStore, MemoryCacheStore};
use crate::error::{ResolveError, Result};
use crate::generics::GenericContext;
use crate::hooks::{HookContext, HookDispatcher, ResolveHook};
use crate::introspection::{TypeHandle, TypeIntrospection};
use crate::options::ResolverOptions;
use crate::recursion::{RecursionResult, ResolutionContext};
use crate::types::TypeInfo;
use futures::future::{BoxFuture, FutureExt};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::Instrument;

pub struct TypeResolver<'a, C: TypeIntrospection + ?Sized> {
    pub(crate) checker: &'a C,
    pub(crate) options: ResolverOptions,
    context: ResolutionContext,
    cache: CacheManager,
    hooks: HookDispatcher,
}

pub struct TypeResolverBuilder<'a, C: TypeIntrospection + ?Sized> {
    checker: &'a C,
    options: ResolverOptions,
    store: Option<Box<dyn CacheStore>>,
    hooks: HookDispatcher,
}

impl<'a, C: TypeIntrospection + ?Sized> TypeResolverBuilder<'a, C> {
    pub fn options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    pub fn cache_store<S: CacheStore + 'static>(mut self, store: S) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn hooks(mut self, hooks: HookDispatcher) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn hook(mut self, hook: Arc<dyn ResolveHook>) -> Self {
        self.hooks.register(hook);
        self
    }

    pub fn build(self) -> TypeResolver<'a, C> {
        let store = self
            .store
            .unwrap_or_else(|| Box::new(MemoryCacheStore::new()));
        TypeResolver {
            checker: self.checker,
            context: ResolutionContext::new(self.options.max_depth),
            options: self.options,
            cache: CacheManager::new(store),
            hooks: self.hooks,
        }
    }
}

impl<'a, C: TypeIntrospection + ?Sized> TypeResolver<'a, C> {
    pub fn new(checker: &'a C) -> Self {
        Self::builder(checker).build()
    }

    pub fn builder(checker: &'a C) -> TypeResolverBuilder<'a, C> {
        TypeResolverBuilder {
            checker,
            options: ResolverOptions::default(),
            store: None,
            hooks: HookDispatcher::new(),
        }
    }

    pub fn checker(&self) -> &'a C {
        self.checker
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Number of frames currently open. Zero between top-level calls.
    pub fn visited_count(&self) -> usize {
        self.context.visiting_count()
    }

    /// Resolve `ty` as a root type with a fresh generic context.
    pub async fn resolve(&mut self, ty: TypeHandle) -> Result<TypeInfo> {
        let mut generics = GenericContext::new();
        self.resolve_type(ty, 0, &mut generics).await
    }

    /// Resolve `ty` at `depth` under `generics`.
    ///
    /// Host panics are caught here and surfaced as
    /// [`ResolveError::InternalResolutionFailure`]; the visited path is
    /// restored to its state before the call on every failure.
    pub fn resolve_type<'f>(
        &'f mut self,
        ty: TypeHandle,
        depth: u32,
        generics: &'f mut GenericContext,
    ) -> BoxFuture<'f, Result<TypeInfo>> {
        Box::pin(async move {
            let visited_before = self.context.visiting_count();
            let outcome = AssertUnwindSafe(self.resolve_guarded(ty, depth, generics))
                .catch_unwind()
                .await;
            match outcome {
                Ok(result) => result,
                Err(payload) => {
                    self.context.truncate(visited_before);
                    let message = panic_message(payload.as_ref());
                    tracing::debug!(handle = %ty, %message, "host panicked during resolution");
                    Err(ResolveError::panic(ty.to_string(), message))
                }
            }
        })
    }

    async fn resolve_guarded(
        &mut self,
        ty: TypeHandle,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<TypeInfo> {
        let text = self.checker.type_to_string(ty);

        if self.context.exceeds_depth(depth) {
            tracing::debug!(ty = %text, depth, max_depth = self.options.max_depth, "max depth exceeded");
            return Err(ResolveError::MaxDepthExceeded {
                type_text: text,
                depth,
                max_depth: self.context.max_depth(),
            });
        }

        let key = self.cache.generate_key(&text, generics);
        let context = &self.context;
        let hit = self
            .cache
            .get_usable(&key, |entry| !context.touches_path(&entry.opened));
        if let Some(hit) = hit {
            tracing::trace!(ty = %text, "cache hit");
            self.context.record_opened(&hit.opened);
            for param in hit.registered {
                generics.register_generic_param(param);
            }
            return Ok(hit.info);
        }

        match self.context.enter(&text) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => {
                tracing::trace!(ty = %text, "cycle detected, emitting reference");
                return Ok(TypeInfo::reference(text));
            }
            RecursionResult::CapacityExceeded => {
                return Err(ResolveError::MaxDepthExceeded {
                    type_text: text,
                    depth,
                    max_depth: self.context.max_depth(),
                });
            }
        }

        let mark = self.context.mark();
        let registered_before = generics.registered_count();
        let span = tracing::debug_span!("resolve_type", ty = %text, depth);
        let result = self
            .resolve_frame(ty, &text, depth, generics)
            .instrument(span)
            .await;
        self.context.leave(&text);
        let closed = self.context.close(mark);
        let info = result.map_err(|err| err.with_type_text(&text))?;

        // A reference to an ancestor that is still open only makes sense
        // inside this ancestry.
        if closed.self_contained {
            let entry = CacheEntry::new(info.clone())
                .with_registered(generics.registrations_since(registered_before))
                .with_opened(closed.opened);
            self.cache.set(key, entry);
        } else {
            tracing::trace!(ty = %text, "frame closes over an open ancestor, not cached");
        }
        Ok(info)
    }

    async fn resolve_frame(
        &mut self,
        ty: TypeHandle,
        text: &str,
        depth: u32,
        generics: &mut GenericContext,
    ) -> Result<TypeInfo> {
        let symbol = self.checker.get_symbol_name(ty);
        let context = HookContext::new(ty, text, symbol, depth, generics);
        let context = self.hooks.run_before(context).await?;

        let target = context.handle;
        let info = match self.expand(target, depth, generics).await? {
            Some(info) => info,
            None => self.resolve_category(target, depth, generics).await?,
        };

        Ok(self.hooks.run_after(&context, info).await?)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod tests;
