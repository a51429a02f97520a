use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one mounted view. Navigation requests are tagged with it so
/// that requests issued by a view that has since unmounted can be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewId(Uuid);

impl ViewId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

impl NavigateOptions {
    pub fn push() -> Self {
        Self { replace: false }
    }

    pub fn replace() -> Self {
        Self { replace: true }
    }
}

/// The location/history collaborator a view writes its query string to.
///
/// `navigate` may commit lazily; callers observe the committed location only
/// through `search()`, and `revision()` moves every time it changes.
pub trait Navigator {
    /// Committed query string, without the leading `?`.
    fn search(&self) -> String;

    /// Bumped on every committed location change.
    fn revision(&self) -> u64;

    fn navigate(&self, owner: ViewId, search: String, options: NavigateOptions);

    /// Whether `owner` has requests that are not committed yet.
    fn has_queued(&self, owner: ViewId) -> bool;

    /// Forget every not-yet-committed request issued by `owner`.
    fn release(&self, owner: ViewId);
}
