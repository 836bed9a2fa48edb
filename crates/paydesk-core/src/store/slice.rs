// ── Reactive entity slice ──
//
// One ordered collection published through a `watch` channel. Writes
// replace the whole list, so readers always see a complete server
// response, never a half-applied one.

use std::sync::Arc;

use tokio::sync::watch;

use crate::stream::SliceStream;

/// Ordered, server-order collection for a single entity type.
pub(crate) struct Slice<T: Clone + Send + Sync + 'static> {
    /// Bumped on every write, including writes of identical data.
    version: watch::Sender<u64>,
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> Slice<T> {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self { version, snapshot }
    }

    /// Replace the whole slice with a fresh server response.
    pub(crate) fn replace(&self, items: Vec<T>) {
        let items: Vec<Arc<T>> = items.into_iter().map(Arc::new).collect();
        self.snapshot.send_replace(Arc::new(items));
        self.bump_version();
    }

    pub(crate) fn clear(&self) {
        if self.snapshot.borrow().is_empty() {
            return;
        }
        self.snapshot.send_replace(Arc::new(Vec::new()));
        self.bump_version();
    }

    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> SliceStream<T> {
        SliceStream::new(self.snapshot.subscribe())
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    #[allow(dead_code)]
    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v = v.wrapping_add(1));
    }
}
