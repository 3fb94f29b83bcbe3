//! Ambient-context primitive: scope-stack storage, nearest publisher wins.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Identifies one publication so out-of-order teardown removes the right
/// entry rather than whatever happens to be on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(u64);

/// Publishes one value to every reader of the channel, with the most recent
/// live publication winning.
///
/// This is the non-UI rendition of a subtree context: providers push on
/// mount and remove their own entry on unmount, readers take the top of the
/// stack. An empty stack reads as `None`, the sentinel for "no enclosing
/// provider".
pub struct AmbientChannel<T> {
    stack: Mutex<Vec<(u64, T)>>,
    next_id: AtomicU64,
}

impl<T: Clone> AmbientChannel<T> {
    pub fn new() -> Self {
        Self {
            stack: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Push a value; it becomes the nearest publication until a newer one
    /// appears or it is unpublished.
    pub fn publish(&self, value: T) -> ScopeId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.stack.lock().push((id, value));
        ScopeId(id)
    }

    /// Remove one publication. Unknown ids are ignored, so double
    /// unpublishing is harmless.
    pub fn unpublish(&self, id: ScopeId) {
        self.stack.lock().retain(|(entry, _)| *entry != id.0);
    }

    /// The nearest live publication, or `None` outside every scope.
    pub fn current(&self) -> Option<T> {
        self.stack.lock().last().map(|(_, value)| value.clone())
    }
}

impl<T: Clone> Default for AmbientChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}
