//! Lifetime of in-flight fetches owned by one panel.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::task::{AbortHandle, JoinHandle};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Owns the background fetches started on behalf of one panel.
///
/// Every scope gets a process-unique generation. Results are tagged with the
/// generation they were started under; once the scope is dropped, its tasks
/// are aborted and any result that still arrives fails [`is_current`].
///
/// [`is_current`]: FetchScope::is_current
#[derive(Debug)]
pub struct FetchScope {
    generation: u64,
    handles: Vec<AbortHandle>,
}

impl FetchScope {
    pub fn new() -> Self {
        Self {
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            handles: Vec::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Register a spawned task so it is aborted with the scope.
    pub fn track<T>(&mut self, handle: &JoinHandle<T>) {
        self.handles.retain(|h| !h.is_finished());
        self.handles.push(handle.abort_handle());
    }

    /// Number of tracked tasks still running.
    pub fn active(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    pub fn cancel_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl Default for FetchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FetchScope {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
