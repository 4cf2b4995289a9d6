//! Generic context: scoped map from generic-parameter name to its binding,
//! constraint and default.
//!
//! Contexts are passed explicitly through every resolution call. A nested
//! scope created with [`GenericContext::child`] sees every outer binding and
//! shadows outer entries of the same name; registrations made inside the
//! child never leak back out.

use crate::types::{GenericParam, TypeInfo};
use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericBinding {
    pub resolved: Option<TypeInfo>,
    pub constraint: Option<TypeInfo>,
    pub default: Option<TypeInfo>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericContext {
    params: IndexMap<String, GenericBinding>,
    parent: Option<Box<GenericContext>>,
}

impl GenericContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A nested scope that still exposes this scope's bindings.
    pub fn child(&self) -> Self {
        Self {
            params: IndexMap::new(),
            parent: Some(Box::new(self.clone())),
        }
    }

    fn lookup(&self, name: &str) -> Option<&GenericBinding> {
        self.params
            .get(name)
            .or_else(|| self.parent.as_deref().and_then(|parent| parent.lookup(name)))
    }

    /// Bind `name` to a concrete type in this scope.
    pub fn bind(&mut self, name: impl Into<String>, ty: TypeInfo) {
        self.params.entry(name.into()).or_default().resolved = Some(ty);
    }

    /// The concrete binding for `name`, if any scope provides one.
    pub fn get_resolved_type(&self, name: &str) -> Option<&TypeInfo> {
        self.lookup(name).and_then(|binding| binding.resolved.as_ref())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Record a parameter the first time it is encountered.
    ///
    /// Later registrations of the same name are ignored so that the first
    /// constraint/default seen is preserved.
    pub fn register_generic_param(&mut self, param: GenericParam) {
        if self.is_registered(&param.name) {
            return;
        }
        self.params.insert(
            param.name,
            GenericBinding {
                resolved: None,
                constraint: param.constraint,
                default: param.default,
            },
        );
    }

    pub fn get_generic_param(&self, name: &str) -> Option<GenericParam> {
        self.lookup(name).map(|binding| GenericParam {
            name: name.to_string(),
            constraint: binding.constraint.clone(),
            default: binding.default.clone(),
        })
    }

    /// Effective entries, outermost scope first; inner scopes shadow outer ones.
    fn flattened(&self) -> IndexMap<&str, &GenericBinding> {
        let mut entries = match &self.parent {
            Some(parent) => parent.flattened(),
            None => IndexMap::new(),
        };
        for (name, binding) in &self.params {
            entries.insert(name.as_str(), binding);
        }
        entries
    }

    /// Parameters known but not yet bound, in registration order.
    pub fn get_unresolved_generics(&self) -> Vec<GenericParam> {
        self.flattened()
            .into_iter()
            .filter(|(_, binding)| binding.resolved.is_none())
            .map(|(name, binding)| GenericParam {
                name: name.to_string(),
                constraint: binding.constraint.clone(),
                default: binding.default.clone(),
            })
            .collect()
    }

    /// Concrete bindings visible from this scope, in registration order.
    pub fn bound_entries(&self) -> Vec<(String, TypeInfo)> {
        self.flattened()
            .into_iter()
            .filter_map(|(name, binding)| {
                binding
                    .resolved
                    .as_ref()
                    .map(|ty| (name.to_string(), ty.clone()))
            })
            .collect()
    }

    /// Total entries across every scope.
    pub fn registered_count(&self) -> usize {
        self.params.len()
            + self
                .parent
                .as_deref()
                .map_or(0, GenericContext::registered_count)
    }

    /// Unbound parameters registered in this scope after it held
    /// `count_before` entries (as reported by [`registered_count`](Self::registered_count)).
    pub fn registrations_since(&self, count_before: usize) -> Vec<GenericParam> {
        let inherited = self.registered_count() - self.params.len();
        self.params
            .iter()
            .skip(count_before.saturating_sub(inherited))
            .filter(|(_, binding)| binding.resolved.is_none())
            .map(|(name, binding)| GenericParam {
                name: name.clone(),
                constraint: binding.constraint.clone(),
                default: binding.default.clone(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.registered_count() == 0
    }

    /// Deterministic serialization of the generic state, sorted by name:
    /// `T=string;U?` where `?` marks a known but unbound parameter.
    pub fn signature(&self) -> String {
        let mut entries: Vec<(&str, &GenericBinding)> = self.flattened().into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
            .into_iter()
            .map(|(name, binding)| match &binding.resolved {
                Some(ty) => format!("{name}={ty}"),
                None => format!("{name}?"),
            })
            .collect::<Vec<_>>()
            .join(";")
    }
}

#[cfg(test)]
#[path = "../tests/generics_tests.rs"]
mod tests;
