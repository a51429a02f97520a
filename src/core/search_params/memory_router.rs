use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, trace};

use super::navigator::{NavigateOptions, Navigator, ViewId};

#[derive(Debug, Clone)]
struct PendingNavigation {
    owner: ViewId,
    search: String,
    options: NavigateOptions,
}

#[derive(Debug)]
struct HistoryState {
    entries: Vec<String>,
    cursor: usize,
    revision: u64,
    queue: VecDeque<PendingNavigation>,
}

impl HistoryState {
    fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    fn commit(&mut self, search: String, options: NavigateOptions) {
        if options.replace {
            self.entries[self.cursor] = search;
        } else {
            self.entries.truncate(self.cursor + 1);
            self.entries.push(search);
            self.cursor += 1;
        }
        self.revision += 1;
    }
}

/// In-memory browser history.
///
/// Cloning yields another handle to the same history, so every view of one
/// page sees the same location. Requests passed to [`Navigator::navigate`]
/// are queued and only become the location on [`MemoryRouter::flush`], the
/// way a router commits after the current event handler returns.
#[derive(Debug, Clone)]
pub struct MemoryRouter {
    state: Arc<Mutex<HistoryState>>,
}

impl MemoryRouter {
    pub fn new(initial_search: &str) -> Self {
        let initial = initial_search
            .strip_prefix('?')
            .unwrap_or(initial_search)
            .to_string();

        Self {
            state: Arc::new(Mutex::new(HistoryState {
                entries: vec![initial],
                cursor: 0,
                revision: 0,
                queue: VecDeque::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HistoryState> {
        // A poisoned history is still structurally valid; keep serving it.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Commit queued navigations in the order they were issued.
    /// Returns how many were applied.
    pub fn flush(&self) -> usize {
        let mut state = self.lock();
        let mut applied = 0;
        while let Some(nav) = state.queue.pop_front() {
            trace!(owner = %nav.owner, search = %nav.search, replace = nav.options.replace, "commit navigation");
            state.commit(nav.search, nav.options);
            applied += 1;
        }
        applied
    }

    pub fn pending(&self) -> usize {
        self.lock().queue.len()
    }

    /// Location change not caused by any view (address bar, link).
    pub fn visit(&self, search: &str) {
        let search = search.strip_prefix('?').unwrap_or(search).to_string();
        self.lock().commit(search, NavigateOptions::push());
    }

    pub fn back(&self) -> bool {
        let mut state = self.lock();
        if state.cursor == 0 {
            return false;
        }
        state.cursor -= 1;
        state.revision += 1;
        true
    }

    pub fn forward(&self) -> bool {
        let mut state = self.lock();
        if state.cursor + 1 >= state.entries.len() {
            return false;
        }
        state.cursor += 1;
        state.revision += 1;
        true
    }

    pub fn history_len(&self) -> usize {
        self.lock().entries.len()
    }
}

impl Default for MemoryRouter {
    fn default() -> Self {
        Self::new("")
    }
}

impl Navigator for MemoryRouter {
    fn search(&self) -> String {
        self.lock().current().to_string()
    }

    fn revision(&self) -> u64 {
        self.lock().revision
    }

    fn navigate(&self, owner: ViewId, search: String, options: NavigateOptions) {
        self.lock().queue.push_back(PendingNavigation {
            owner,
            search,
            options,
        });
    }

    fn has_queued(&self, owner: ViewId) -> bool {
        self.lock().queue.iter().any(|nav| nav.owner == owner)
    }

    fn release(&self, owner: ViewId) {
        let mut state = self.lock();
        let before = state.queue.len();
        state.queue.retain(|nav| nav.owner != owner);
        let dropped = before - state.queue.len();
        if dropped > 0 {
            debug!(%owner, dropped, "discarded navigations of unmounted view");
        }
    }
}
