use super::*;
use crate::cache::SharedCacheStore;
use crate::error::InternalFailure;
use crate::hooks::HookError;
use crate::introspection::{IntrospectionError, PropertySymbol, TypeClass};
use crate::snapshot::{SnapshotType, TypeSnapshot};
use crate::types::{PrimitiveKind, SourceLocation};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts before-hook invocations.
struct CountingHook {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ResolveHook for CountingHook {
    fn name(&self) -> &str {
        "counting"
    }

    async fn before_resolve(&self, context: HookContext) -> std::result::Result<HookContext, HookError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(context)
    }
}

struct RejectAll;

#[async_trait]
impl ResolveHook for RejectAll {
    fn name(&self) -> &str {
        "reject-all"
    }

    async fn before_resolve(&self, _context: HookContext) -> std::result::Result<HookContext, HookError> {
        Err(HookError::new("reject-all", "blocked"))
    }
}

/// Redirects every frame for `from` to `to`.
struct Redirect {
    from: TypeHandle,
    to: TypeHandle,
}

#[async_trait]
impl ResolveHook for Redirect {
    fn name(&self) -> &str {
        "redirect"
    }

    async fn before_resolve(&self, mut context: HookContext) -> std::result::Result<HookContext, HookError> {
        if context.handle == self.from {
            context.handle = self.to;
        }
        Ok(context)
    }
}

/// Rejects the after-phase of every frame rendering as `text`.
struct RejectAfter {
    text: &'static str,
}

#[async_trait]
impl ResolveHook for RejectAfter {
    fn name(&self) -> &str {
        "reject-after"
    }

    async fn after_resolve(
        &self,
        context: &HookContext,
        info: TypeInfo,
    ) -> std::result::Result<TypeInfo, HookError> {
        if context.type_text == self.text {
            return Err(HookError::new("reject-after", format!("{} is not allowed", self.text)));
        }
        Ok(info)
    }
}

/// Host wrapper that counts `classify` calls and can be told to panic or
/// fail on one handle.
struct InstrumentedHost {
    inner: TypeSnapshot,
    classify_calls: AtomicUsize,
    panic_on: Option<TypeHandle>,
    fail_on: Option<TypeHandle>,
}

impl InstrumentedHost {
    fn new(inner: TypeSnapshot) -> Self {
        Self {
            inner,
            classify_calls: AtomicUsize::new(0),
            panic_on: None,
            fail_on: None,
        }
    }
}

impl TypeIntrospection for InstrumentedHost {
    fn classify(&self, ty: TypeHandle) -> std::result::Result<TypeClass, IntrospectionError> {
        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_on == Some(ty) {
            panic!("checker crashed on {ty}");
        }
        if self.fail_on == Some(ty) {
            return Err(IntrospectionError::Host("checker unavailable".into()));
        }
        self.inner.classify(ty)
    }

    fn type_to_string(&self, ty: TypeHandle) -> String {
        self.inner.type_to_string(ty)
    }

    fn get_properties(&self, ty: TypeHandle) -> std::result::Result<Vec<PropertySymbol>, IntrospectionError> {
        self.inner.get_properties(ty)
    }

    fn get_union_members(&self, ty: TypeHandle) -> std::result::Result<Vec<TypeHandle>, IntrospectionError> {
        self.inner.get_union_members(ty)
    }

    fn get_intersection_members(
        &self,
        ty: TypeHandle,
    ) -> std::result::Result<Vec<TypeHandle>, IntrospectionError> {
        self.inner.get_intersection_members(ty)
    }

    fn get_array_element_type(&self, ty: TypeHandle) -> std::result::Result<TypeHandle, IntrospectionError> {
        self.inner.get_array_element_type(ty)
    }

    fn get_tuple_elements(&self, ty: TypeHandle) -> std::result::Result<Vec<TypeHandle>, IntrospectionError> {
        self.inner.get_tuple_elements(ty)
    }

    fn get_type_arguments(&self, ty: TypeHandle) -> Vec<TypeHandle> {
        self.inner.get_type_arguments(ty)
    }

    fn get_symbol_name(&self, ty: TypeHandle) -> Option<String> {
        self.inner.get_symbol_name(ty)
    }

    fn get_constraint(&self, ty: TypeHandle) -> Option<TypeHandle> {
        self.inner.get_constraint(ty)
    }

    fn get_default(&self, ty: TypeHandle) -> Option<TypeHandle> {
        self.inner.get_default(ty)
    }

    fn get_declaration_locations(&self, ty: TypeHandle) -> Vec<SourceLocation> {
        self.inner.get_declaration_locations(ty)
    }
}

/// `Node { value: string; next: Node }`
fn linked_list() -> (TypeSnapshot, TypeHandle) {
    let mut snap = TypeSnapshot::new();
    let s = snap.primitive(PrimitiveKind::String);
    let node = snap.object("Node", &[("value", s)]);
    snap.entry(node).property("next", node);
    (snap, node)
}

/// `Box<string>` and `Box<number>`, both instantiations of `Box<T> { value: T }`.
fn boxes() -> (TypeSnapshot, TypeHandle, TypeHandle) {
    let mut snap = TypeSnapshot::new();
    let s = snap.primitive(PrimitiveKind::String);
    let n = snap.primitive(PrimitiveKind::Number);
    let t = snap.type_param("T");

    let mut instantiate = |arg: TypeHandle, text: &str| {
        let mut entry = SnapshotType::new(text, TypeClass::Object);
        entry
            .symbol("Box")
            .property("value", t)
            .type_parameters(&[t])
            .type_arguments(&[arg]);
        snap.add(entry)
    };
    let box_string = instantiate(s, "Box<string>");
    let box_number = instantiate(n, "Box<number>");
    (snap, box_string, box_number)
}

/// `A { b: B }` and `B { a: A }`.
fn mutual_pair() -> (TypeSnapshot, TypeHandle, TypeHandle) {
    let mut snap = TypeSnapshot::new();
    let a = snap.object("A", &[]);
    let b = snap.object("B", &[("a", a)]);
    snap.entry(a).property("b", b);
    (snap, a, b)
}

fn property_type<'i>(info: &'i TypeInfo, name: &str) -> &'i TypeInfo {
    &info
        .as_object()
        .and_then(|obj| obj.property(name))
        .unwrap_or_else(|| panic!("missing property {name} in {info}"))
        .ty
}

#[tokio::test]
async fn test_resolves_plain_object() {
    let mut snap = TypeSnapshot::new();
    let s = snap.primitive(PrimitiveKind::String);
    let n = snap.primitive(PrimitiveKind::Number);
    let user = snap.object("User", &[("name", s)]);
    snap.entry(user)
        .optional_property("age", n)
        .location("src/user.ts", 1, 1);

    let mut resolver = TypeResolver::new(&snap);
    let info = resolver.resolve(user).await.unwrap();
    let obj = info.as_object().unwrap();
    assert_eq!(obj.name.as_deref(), Some("User"));
    assert_eq!(obj.property_names(), vec!["name", "age"]);
    assert!(obj.property("age").unwrap().optional);
    assert_eq!(obj.source_location.as_ref().unwrap().file, "src/user.ts");
    assert_eq!(resolver.visited_count(), 0);
}

#[tokio::test]
async fn test_second_resolution_is_served_from_cache() {
    let mut snap = TypeSnapshot::new();
    let s = snap.primitive(PrimitiveKind::String);
    let user = snap.object("User", &[("name", s)]);

    let calls = Arc::new(AtomicUsize::new(0));
    let mut resolver = TypeResolver::builder(&snap)
        .hook(Arc::new(CountingHook {
            calls: calls.clone(),
        }))
        .build();

    let first = resolver.resolve(user).await.unwrap();
    let calls_after_first = calls.load(Ordering::SeqCst);
    assert_eq!(calls_after_first, 2, "User and string each ran the hook once");

    let second = resolver.resolve(user).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), calls_after_first);
    assert_eq!(resolver.cache_stats().hits, 1);
}

#[tokio::test]
async fn test_self_reference_becomes_reference_node() {
    let (snap, node) = linked_list();
    let mut resolver = TypeResolver::new(&snap);

    let info = resolver.resolve(node).await.unwrap();
    assert_eq!(property_type(&info, "value"), &TypeInfo::string());
    assert_eq!(property_type(&info, "next"), &TypeInfo::reference("Node"));
    assert_eq!(resolver.visited_count(), 0);
}

#[tokio::test]
async fn test_mutual_recursion_does_not_depend_on_resolution_order() {
    let (snap, a, b) = mutual_pair();
    let fresh_a = TypeResolver::new(&snap).resolve(a).await.unwrap();
    let fresh_b = TypeResolver::new(&snap).resolve(b).await.unwrap();
    assert_eq!(
        property_type(property_type(&fresh_b, "a"), "b"),
        &TypeInfo::reference("B")
    );

    let mut resolver = TypeResolver::new(&snap);
    assert_eq!(resolver.resolve(a).await.unwrap(), fresh_a);
    assert_eq!(resolver.resolve(b).await.unwrap(), fresh_b);
    // Both roots are now cached and reusable at the top level.
    assert_eq!(resolver.resolve(a).await.unwrap(), fresh_a);
    assert_eq!(resolver.resolve(b).await.unwrap(), fresh_b);
}

#[tokio::test]
async fn test_frame_cut_by_ancestor_cycle_is_not_cached() {
    let (snap, a, _) = mutual_pair();
    let mut resolver = TypeResolver::new(&snap);
    resolver.resolve(a).await.unwrap();
    // Only the root `A` frame is cached; `B` held a reference to the open `A`.
    assert_eq!(resolver.cache_len(), 1);
}

#[tokio::test]
async fn test_same_type_on_independent_branches_is_not_a_cycle() {
    let mut snap = TypeSnapshot::new();
    let s = snap.primitive(PrimitiveKind::String);
    let point = snap.object("Point", &[("label", s)]);
    let line = snap.object("Line", &[("from", point), ("to", point)]);

    let mut resolver = TypeResolver::new(&snap);
    let info = resolver.resolve(line).await.unwrap();
    assert!(property_type(&info, "from").as_object().is_some());
    assert!(property_type(&info, "to").as_object().is_some());
}

#[tokio::test]
async fn test_generic_instantiations_are_isolated() {
    let (snap, box_string, box_number) = boxes();
    let mut resolver = TypeResolver::new(&snap);

    let strings = resolver.resolve(box_string).await.unwrap();
    let numbers = resolver.resolve(box_number).await.unwrap();

    assert_eq!(property_type(&strings, "value"), &TypeInfo::string());
    assert_eq!(property_type(&numbers, "value"), &TypeInfo::number());
    assert_eq!(
        strings.as_object().unwrap().type_arguments,
        vec![TypeInfo::string()]
    );
    assert!(strings.as_object().unwrap().generic_params.is_empty());

    // Resolving again hits the cache and still yields the right binding.
    let again = resolver.resolve(box_string).await.unwrap();
    assert_eq!(again, strings);
}

#[tokio::test]
async fn test_generic_frames_are_served_from_cache() {
    let mut snap = TypeSnapshot::new();
    let t = snap.type_param("T");
    let boxed = snap.object("Box<T>", &[("value", t)]);
    snap.entry(boxed).symbol("Box").type_parameters(&[t]);

    let calls = Arc::new(AtomicUsize::new(0));
    let mut resolver = TypeResolver::builder(&snap)
        .hook(Arc::new(CountingHook {
            calls: calls.clone(),
        }))
        .build();

    let first = resolver.resolve(boxed).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    let second = resolver.resolve(boxed).await.unwrap();
    assert_eq!(second, first);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(resolver.cache_stats().hits, 1);
    assert_eq!(first.as_object().unwrap().generic_params[0].name, "T");
}

#[tokio::test]
async fn test_cache_hit_replays_generic_registrations() {
    let mut snap = TypeSnapshot::new();
    let t = snap.type_param("T");
    let s = snap.primitive(PrimitiveKind::String);
    snap.entry(t).constraint = Some(s);
    let mut resolver = TypeResolver::new(&snap);

    let mut fresh = GenericContext::new();
    resolver.resolve_type(t, 0, &mut fresh).await.unwrap();
    let mut replayed = GenericContext::new();
    resolver.resolve_type(t, 0, &mut replayed).await.unwrap();

    assert_eq!(resolver.cache_stats().hits, 1);
    assert_eq!(replayed, fresh);
    assert_eq!(
        replayed.get_generic_param("T").unwrap().constraint,
        Some(TypeInfo::string())
    );
}

#[tokio::test]
async fn test_unbound_generic_is_listed_on_object() {
    let mut snap = TypeSnapshot::new();
    let t = snap.type_param("T");
    let s = snap.primitive(PrimitiveKind::String);
    snap.entry(t).constraint = Some(s);
    let holder = snap.object("Holder", &[("item", t)]);

    let mut resolver = TypeResolver::new(&snap);
    let info = resolver.resolve(holder).await.unwrap();
    let obj = info.as_object().unwrap();
    assert_eq!(property_type(&info, "item"), &TypeInfo::generic("T"));
    assert_eq!(obj.generic_params.len(), 1);
    assert_eq!(obj.generic_params[0].name, "T");
    assert_eq!(obj.generic_params[0].constraint, Some(TypeInfo::string()));
}

#[tokio::test]
async fn test_depth_bound() {
    let mut snap = TypeSnapshot::new();
    let s = snap.primitive(PrimitiveKind::String);
    let c = snap.object("C", &[("d", s)]);
    let b = snap.object("B", &[("c", c)]);
    let a = snap.object("A", &[("b", b)]);

    let mut resolver = TypeResolver::builder(&snap).max_depth(2).build();
    let err = resolver.resolve(a).await.unwrap_err();
    assert_eq!(
        err,
        ResolveError::MaxDepthExceeded {
            type_text: "string".into(),
            depth: 3,
            max_depth: 2,
        }
    );
    assert_eq!(resolver.visited_count(), 0);

    // The same chain fits with one more level.
    let mut roomier = TypeResolver::builder(&snap).max_depth(3).build();
    assert!(roomier.resolve(a).await.is_ok());
}

#[tokio::test]
async fn test_before_hook_error_stops_everything() {
    let (snap, node) = linked_list();
    let host = InstrumentedHost::new(snap);
    let mut resolver = TypeResolver::builder(&host)
        .hook(Arc::new(RejectAll))
        .build();

    let err = resolver.resolve(node).await.unwrap_err();
    assert_eq!(
        err,
        ResolveError::HookRejected(HookError::new("reject-all", "blocked"))
    );
    assert_eq!(host.classify_calls.load(Ordering::SeqCst), 0);
    assert_eq!(resolver.visited_count(), 0);
    assert_eq!(resolver.cache_len(), 0);
}

#[tokio::test]
async fn test_after_hook_error_on_nested_frame() {
    let mut snap = TypeSnapshot::new();
    let s = snap.primitive(PrimitiveKind::String);
    let address = snap.object("Address", &[("street", s)]);
    let user = snap.object("User", &[("address", address)]);

    let mut resolver = TypeResolver::builder(&snap)
        .hook(Arc::new(RejectAfter { text: "Address" }))
        .build();
    let err = resolver.resolve(user).await.unwrap_err();

    assert!(err.is_hook_rejection());
    assert_eq!(
        err,
        ResolveError::HookRejected(HookError::new("reject-after", "Address is not allowed"))
    );
    assert_eq!(resolver.visited_count(), 0);
    // Only the `string` leaf completed; neither `Address` nor `User` is cached.
    assert_eq!(resolver.cache_len(), 1);
}

#[tokio::test]
async fn test_hook_may_redirect_frame() {
    let mut snap = TypeSnapshot::new();
    let s = snap.primitive(PrimitiveKind::String);
    let n = snap.primitive(PrimitiveKind::Number);
    let mut resolver = TypeResolver::builder(&snap)
        .hook(Arc::new(Redirect { from: s, to: n }))
        .build();

    assert_eq!(resolver.resolve(s).await.unwrap(), TypeInfo::number());
}

#[tokio::test]
async fn test_host_panic_becomes_internal_failure() {
    let (snap, node) = linked_list();
    let s = snap.lookup_type("string").unwrap();
    let mut host = InstrumentedHost::new(snap);
    host.panic_on = Some(s);

    let mut resolver = TypeResolver::new(&host);
    let err = resolver.resolve(node).await.unwrap_err();
    match &err {
        ResolveError::InternalResolutionFailure { type_text, source } => {
            // The panicking frame can only name the handle.
            assert_eq!(type_text, &s.to_string());
            assert!(matches!(source, InternalFailure::Panic(msg) if msg.contains("crashed")));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(resolver.visited_count(), 0);
    assert_eq!(resolver.cache_len(), 0);
}

#[tokio::test]
async fn test_host_error_keeps_cause_and_frame_text() {
    let (snap, node) = linked_list();
    let s = snap.lookup_type("string").unwrap();
    let mut host = InstrumentedHost::new(snap);
    host.fail_on = Some(s);

    let mut resolver = TypeResolver::new(&host);
    let err = resolver.resolve(node).await.unwrap_err();
    assert!(err.is_internal());
    assert_eq!(
        err,
        ResolveError::InternalResolutionFailure {
            type_text: "string".into(),
            source: InternalFailure::Introspection(IntrospectionError::Host(
                "checker unavailable".into()
            )),
        }
    );
    assert_eq!(resolver.visited_count(), 0);
}

#[tokio::test]
async fn test_shared_store_serves_second_engine() {
    let mut snap = TypeSnapshot::new();
    let s = snap.primitive(PrimitiveKind::String);
    let user = snap.object("User", &[("name", s)]);
    let store = SharedCacheStore::new();

    let mut first = TypeResolver::builder(&snap).cache_store(store.clone()).build();
    let info = first.resolve(user).await.unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let mut second = TypeResolver::builder(&snap)
        .cache_store(store)
        .hook(Arc::new(CountingHook {
            calls: calls.clone(),
        }))
        .build();
    assert_eq!(second.resolve(user).await.unwrap(), info);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_clear_cache_forces_recomputation() {
    let mut snap = TypeSnapshot::new();
    let s = snap.primitive(PrimitiveKind::String);
    let calls = Arc::new(AtomicUsize::new(0));
    let mut resolver = TypeResolver::builder(&snap)
        .hook(Arc::new(CountingHook {
            calls: calls.clone(),
        }))
        .build();

    resolver.resolve(s).await.unwrap();
    resolver.clear_cache();
    resolver.resolve(s).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
