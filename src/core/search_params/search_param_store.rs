use tracing::debug;

use super::navigator::{NavigateOptions, Navigator, ViewId};
use super::query_parameter_set::QueryParameterSet;

/// Not-yet-committed target state, valid only while the navigator is still
/// at the revision it was computed against.
#[derive(Debug, Clone)]
struct PendingState {
    revision: u64,
    params: QueryParameterSet,
}

/// Query-string parameters of one mounted view.
///
/// Create it when the view mounts and drop it (or call [`unmount`]) when the
/// view goes away. Teardown discards the pending merge base and releases any
/// navigation this view queued that has not been committed yet.
///
/// [`unmount`]: SearchParamStore::unmount
pub struct SearchParamStore<N: Navigator> {
    id: ViewId,
    navigator: N,
    pending: Option<PendingState>,
}

impl<N: Navigator> SearchParamStore<N> {
    pub fn mount(navigator: N) -> Self {
        let id = ViewId::new();
        debug!(view = %id, "search params mounted");
        Self {
            id,
            navigator,
            pending: None,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Parameters of the committed location.
    pub fn read(&self) -> QueryParameterSet {
        QueryParameterSet::parse(&self.navigator.search())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.read().get(key).map(str::to_string)
    }

    /// Replace the whole query string with `params`.
    pub fn set(&mut self, params: QueryParameterSet, options: NavigateOptions) {
        let params = params.present();
        self.navigator
            .navigate(self.id, params.to_query_string(), options);
        self.pending = Some(PendingState {
            revision: self.navigator.revision(),
            params,
        });
    }

    /// Layer `partial` over the latest known state, including whatever this
    /// view has already asked for but the navigator has not committed.
    pub fn merge(&mut self, partial: &QueryParameterSet, options: NavigateOptions) {
        let base = self.merge_base();
        let next = base.overlay(partial);
        self.set(next, options);
    }

    /// Accessor bound to a single key.
    pub fn param<'a>(&'a mut self, key: &str) -> SearchParam<'a, N> {
        SearchParam {
            store: self,
            key: key.to_string(),
        }
    }

    /// Teardown. Equivalent to dropping the store.
    pub fn unmount(self) {}

    fn merge_base(&mut self) -> QueryParameterSet {
        let revision = self.navigator.revision();
        match self.pending.take() {
            Some(pending) if pending.revision == revision => pending.params,
            // another commit landed while ours is still queued
            Some(pending) if self.navigator.has_queued(self.id) => {
                self.read().overlay(&pending.params)
            }
            Some(_) | None => self.read(),
        }
    }
}

impl<N: Navigator> Drop for SearchParamStore<N> {
    fn drop(&mut self) {
        if self.pending.take().is_some() {
            debug!(view = %self.id, "discarding pending search params on unmount");
        }
        self.navigator.release(self.id);
    }
}

/// Single-key view over a [`SearchParamStore`]; writes are single-key merges.
pub struct SearchParam<'a, N: Navigator> {
    store: &'a mut SearchParamStore<N>,
    key: String,
}

impl<N: Navigator> SearchParam<'_, N> {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> Option<String> {
        self.store.get(&self.key)
    }

    /// `None` removes the key.
    pub fn set(&mut self, value: Option<&str>, options: NavigateOptions) {
        let mut partial = QueryParameterSet::new();
        partial.insert(self.key.as_str(), value);
        self.store.merge(&partial, options);
    }
}
