use super::*;
use crate::types::PrimitiveKind;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Recorder {
    name: &'static str,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ResolveHook for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    async fn before_resolve(&self, mut context: HookContext) -> Result<HookContext, HookError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        context.type_text.push_str(self.name);
        Ok(context)
    }
}

struct Rejector;

#[async_trait]
impl ResolveHook for Rejector {
    fn name(&self) -> &str {
        "rejector"
    }

    async fn before_resolve(&self, _context: HookContext) -> Result<HookContext, HookError> {
        Err(HookError::new(self.name(), "not allowed"))
    }
}

struct NullableWrapper;

#[async_trait]
impl ResolveHook for NullableWrapper {
    fn name(&self) -> &str {
        "nullable"
    }

    async fn after_resolve(
        &self,
        _context: &HookContext,
        info: TypeInfo,
    ) -> Result<TypeInfo, HookError> {
        Ok(TypeInfo::union(vec![
            info,
            TypeInfo::primitive(PrimitiveKind::Null),
        ]))
    }
}

fn context() -> HookContext {
    HookContext::new(TypeHandle(0), "User", None, 0, &GenericContext::new())
}

#[tokio::test]
async fn test_hooks_run_in_registration_order() {
    let calls = Arc::new(AtomicUsize::new(0));
    let dispatcher = HookDispatcher::new()
        .with_hook(Arc::new(Recorder {
            name: "-a",
            calls: calls.clone(),
        }))
        .with_hook(Arc::new(Recorder {
            name: "-b",
            calls: calls.clone(),
        }));

    let out = dispatcher.run_before(context()).await.unwrap();
    assert_eq!(out.type_text, "User-a-b");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_first_failure_aborts_chain() {
    let calls = Arc::new(AtomicUsize::new(0));
    let dispatcher = HookDispatcher::new()
        .with_hook(Arc::new(Rejector))
        .with_hook(Arc::new(Recorder {
            name: "-late",
            calls: calls.clone(),
        }));

    let err = dispatcher.run_before(context()).await.unwrap_err();
    assert_eq!(err, HookError::new("rejector", "not allowed"));
    assert_eq!(
        err.to_string(),
        "hook `rejector` rejected resolution: not allowed"
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_after_hook_rewrites_info() {
    let dispatcher = HookDispatcher::new().with_hook(Arc::new(NullableWrapper));
    let info = dispatcher
        .run_after(&context(), TypeInfo::string())
        .await
        .unwrap();
    assert_eq!(info.to_string(), "string | null");
}

#[tokio::test]
async fn test_default_methods_pass_through() {
    let calls = Arc::new(AtomicUsize::new(0));
    let dispatcher = HookDispatcher::new().with_hook(Arc::new(Recorder {
        name: "-x",
        calls,
    }));
    let info = dispatcher
        .run_after(&context(), TypeInfo::number())
        .await
        .unwrap();
    assert_eq!(info, TypeInfo::number());
}

#[test]
fn test_context_captures_bound_generics() {
    let mut generics = GenericContext::new();
    generics.bind("T", TypeInfo::string());
    generics.register_generic_param(crate::types::GenericParam::named("U"));
    let ctx = HookContext::new(TypeHandle(3), "Box<T>", Some("Box".into()), 2, &generics);
    assert_eq!(ctx.generic_bindings, vec![("T".to_string(), TypeInfo::string())]);
    assert_eq!(ctx.depth, 2);
}

#[test]
fn test_dispatcher_debug_lists_names() {
    let dispatcher = HookDispatcher::new().with_hook(Arc::new(Rejector));
    assert_eq!(dispatcher.len(), 1);
    assert_eq!(format!("{dispatcher:?}"), r#"["rejector"]"#);
}
