//! Resolution failures.
//!
//! Every failure is a value. Cycles are not failures: they degrade to a
//! `Reference` node.

use crate::hooks::HookError;
use crate::introspection::IntrospectionError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// Fatal for the current chain. Retry with a larger budget or a narrower subtree.
    #[error("maximum resolution depth {max_depth} exceeded at depth {depth} while resolving `{type_text}`")]
    MaxDepthExceeded {
        type_text: String,
        depth: u32,
        max_depth: u32,
    },

    /// A plugin hook rejected the resolution; surfaced verbatim.
    #[error(transparent)]
    HookRejected(#[from] HookError),

    /// Unexpected fault while querying the host.
    #[error("internal failure while resolving `{type_text}`: {source}")]
    InternalResolutionFailure {
        type_text: String,
        #[source]
        source: InternalFailure,
    },
}

/// Underlying cause of an [`ResolveError::InternalResolutionFailure`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InternalFailure {
    #[error(transparent)]
    Introspection(#[from] IntrospectionError),
    #[error("host panicked: {0}")]
    Panic(String),
}

impl ResolveError {
    pub fn is_max_depth(&self) -> bool {
        matches!(self, Self::MaxDepthExceeded { .. })
    }

    pub fn is_hook_rejection(&self) -> bool {
        matches!(self, Self::HookRejected(_))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Self::InternalResolutionFailure { .. })
    }

    pub(crate) fn panic(type_text: impl Into<String>, message: String) -> Self {
        Self::InternalResolutionFailure {
            type_text: type_text.into(),
            source: InternalFailure::Panic(message),
        }
    }

    /// Attach the failing frame's type text to an internal failure raised
    /// without one. The innermost frame wins.
    pub(crate) fn with_type_text(self, text: &str) -> Self {
        match self {
            Self::InternalResolutionFailure { type_text, source } if type_text.is_empty() => {
                Self::InternalResolutionFailure {
                    type_text: text.to_string(),
                    source,
                }
            }
            other => other,
        }
    }
}

impl From<IntrospectionError> for ResolveError {
    fn from(err: IntrospectionError) -> Self {
        Self::InternalResolutionFailure {
            type_text: String::new(),
            source: InternalFailure::Introspection(err),
        }
    }
}

pub type Result<T, E = ResolveError> = std::result::Result<T, E>;
