//! Resolution context: depth bound plus the active visited path.
//!
//! # Design
//!
//! The visited path holds the canonical text of every type whose resolution
//! frame is currently open. It follows strict stack discipline: a frame pushes
//! its text on entry and pops it on exit, so a type may recur on independent
//! branches but never inside its own ancestry.
//!
//! Entries are kept in insertion order so that a failed frame can restore the
//! path to a known length with [`ResolutionContext::truncate`], even when the
//! frames above it never got the chance to [`leave`](ResolutionContext::leave).
//!
//! The context also remembers the outermost path position a cycle break
//! pointed at since a frame opened. A frame whose subtree was cut by a
//! cycle to one of its ancestors holds a `Reference` that is only valid
//! inside that ancestry, so [`ResolutionContext::close`] reports it as not
//! self-contained and the result must not be cached. It also reports every
//! type opened inside the frame: a cached result may only be reused while
//! none of those types is on the path, or it would nest a type inside its
//! own ancestry where a fresh resolution would have emitted a `Reference`.
//!
//! # Usage
//!
//! ```ignore
//! if ctx.exceeds_depth(depth) {
//!     return Err(max_depth_error());
//! }
//! match ctx.enter(&text) {
//!     RecursionResult::Entered => {
//!         let mark = ctx.mark();
//!         let result = resolve_frame();
//!         ctx.leave(&text);
//!         let closed = ctx.close(mark);
//!         result
//!     }
//!     RecursionResult::Cycle => Ok(TypeInfo::reference(text)),
//!     RecursionResult::CapacityExceeded => Err(max_depth_error()),
//! }
//! ```

use fluentgen_common::limits::{MAX_RESOLUTION_DEPTH, MAX_VISITED_ENTRIES};
use indexmap::IndexSet;

/// Result of attempting to open a resolution frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    /// Proceed with the computation.
    Entered,
    /// This type is already on the active path.
    Cycle,
    /// The visited path is full.
    CapacityExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }

    #[inline]
    pub fn is_cycle(self) -> bool {
        matches!(self, Self::Cycle)
    }
}

/// State saved when a frame opens, handed back to [`ResolutionContext::close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct FrameMark {
    position: usize,
    outer_floor: Option<usize>,
    log_start: usize,
}

/// What happened inside a closed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedFrame {
    /// No cycle break inside the frame pointed above it.
    pub self_contained: bool,
    /// Types opened by the frame and its subtree, sorted and deduplicated.
    pub opened: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ResolutionContext {
    visiting: IndexSet<String>,
    max_depth: u32,
    max_visiting: u32,
    /// Outermost path position hit by a cycle break in the open subtree.
    cycle_floor: Option<usize>,
    /// Every type opened since the outermost frame opened.
    opened_log: Vec<String>,
}

impl Default for ResolutionContext {
    fn default() -> Self {
        Self::new(MAX_RESOLUTION_DEPTH)
    }
}

impl ResolutionContext {
    pub fn new(max_depth: u32) -> Self {
        Self {
            visiting: IndexSet::new(),
            max_depth,
            max_visiting: MAX_VISITED_ENTRIES,
            cycle_floor: None,
            opened_log: Vec::new(),
        }
    }

    /// Builder: set a custom max visited-path size.
    pub fn with_max_visiting(mut self, max_visiting: u32) -> Self {
        self.max_visiting = max_visiting;
        self
    }

    /// Whether a frame at `depth` is beyond the configured bound.
    #[inline]
    pub fn exceeds_depth(&self, depth: u32) -> bool {
        depth > self.max_depth
    }

    /// Try to open a frame for `key`.
    ///
    /// On [`RecursionResult::Entered`] the caller **must** call
    /// [`leave`](Self::leave) with the same key when the frame closes.
    pub fn enter(&mut self, key: &str) -> RecursionResult {
        if let Some(position) = self.visiting.get_index_of(key) {
            self.cycle_floor = Some(self.cycle_floor.map_or(position, |f| f.min(position)));
            return RecursionResult::Cycle;
        }
        if self.visiting.len() as u32 >= self.max_visiting {
            return RecursionResult::CapacityExceeded;
        }
        self.visiting.insert(key.to_string());
        self.opened_log.push(key.to_string());
        RecursionResult::Entered
    }

    /// Close the frame for `key`.
    ///
    /// # Debug panics
    ///
    /// In debug builds, panics if `key` is not on the path (double-leave or
    /// leave without a matching enter).
    pub fn leave(&mut self, key: &str) {
        let was_present = self.visiting.shift_remove(key);

        debug_assert!(
            was_present,
            "ResolutionContext::leave() called with `{key}`, which is not on the visited path"
        );
    }

    /// Start tracking cycle breaks for the frame just entered.
    pub fn mark(&mut self) -> FrameMark {
        FrameMark {
            position: self.visiting.len().saturating_sub(1),
            outer_floor: self.cycle_floor.take(),
            log_start: self.opened_log.len().saturating_sub(1),
        }
    }

    /// Finish tracking for a frame opened with [`mark`](Self::mark), after
    /// its [`leave`](Self::leave).
    ///
    /// Cycle breaks that pointed above the frame are carried over to the
    /// enclosing frame.
    pub fn close(&mut self, mark: FrameMark) -> ClosedFrame {
        let inner = self.cycle_floor.take();
        let self_contained = inner.is_none_or(|floor| floor >= mark.position);
        let escaping = inner.filter(|floor| *floor < mark.position);
        self.cycle_floor = match (mark.outer_floor, escaping) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        let mut opened = self
            .opened_log
            .get(mark.log_start..)
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        opened.sort_unstable();
        opened.dedup();
        if self.visiting.is_empty() {
            self.opened_log.clear();
        }
        ClosedFrame {
            self_contained,
            opened,
        }
    }

    /// Account for types a reused result opened when it was first computed.
    pub fn record_opened(&mut self, opened: &[String]) {
        if !self.visiting.is_empty() {
            self.opened_log.extend_from_slice(opened);
        }
    }

    /// Whether any of `types` is on the active path.
    pub fn touches_path(&self, types: &[String]) -> bool {
        types.iter().any(|ty| self.visiting.contains(ty.as_str()))
    }

    /// Drop every entry pushed after the path had `len` entries.
    pub fn truncate(&mut self, len: usize) {
        self.visiting.truncate(len);
        if self.cycle_floor.is_some_and(|floor| floor >= len) {
            self.cycle_floor = None;
        }
        if len == 0 {
            self.opened_log.clear();
        }
    }

    #[inline]
    pub fn is_visiting(&self, key: &str) -> bool {
        self.visiting.contains(key)
    }

    /// Number of open frames.
    #[inline]
    pub fn visiting_count(&self) -> usize {
        self.visiting.len()
    }

    /// The active path, outermost first.
    pub fn path(&self) -> impl Iterator<Item = &str> {
        self.visiting.iter().map(String::as_str)
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn reset(&mut self) {
        self.visiting.clear();
        self.cycle_floor = None;
        self.opened_log.clear();
    }
}

#[cfg(test)]
#[path = "../tests/recursion_tests.rs"]
mod tests;
