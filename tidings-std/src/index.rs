//! The registration index.
//!
//! Maps each [`NotificationTag`] to the ordered handlers enlisted for it. This
//! is the only shared mutable state of a dispatcher.
//!
//! # Concurrency
//!
//! Each tag's handlers live in an immutable slice. Appending builds a new
//! slice and swaps it in under the write lock, so readers holding an older
//! [`Snapshot`] never observe a partial append. The read lock is only held
//! long enough to clone an `Arc`, and no user code runs under either lock.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use tidings_core::{HandlerBinding, NotificationTag};

/// An immutable view of the handlers registered for one tag, in
/// registration order.
pub type Snapshot = Arc<[Arc<HandlerBinding>]>;

/// Thread-safe, append-only mapping from tags to handler sequences.
///
/// A tag present in the index always maps to at least one binding.
#[derive(Default)]
pub struct RegistrationIndex {
    entries: RwLock<HashMap<NotificationTag, Snapshot>>,
}

impl RegistrationIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `binding` to the sequence for `tag`, creating it if absent.
    pub fn register(&self, tag: NotificationTag, binding: HandlerBinding) {
        let mut entries = self.write();
        append(&mut entries, tag, vec![Arc::new(binding)]);
    }

    /// Appends several bindings under a single write lock.
    ///
    /// Readers see either none or all of the bindings added for a tag.
    /// Returns the number of bindings added.
    pub fn register_all<I>(&self, bindings: I) -> usize
    where
        I: IntoIterator<Item = (NotificationTag, HandlerBinding)>,
    {
        // Group per tag first; order within a tag is preserved.
        let mut grouped: Vec<(NotificationTag, Vec<Arc<HandlerBinding>>)> = Vec::new();
        let mut count = 0;
        for (tag, binding) in bindings {
            count += 1;
            match grouped.iter_mut().find(|(t, _)| *t == tag) {
                Some((_, list)) => list.push(Arc::new(binding)),
                None => grouped.push((tag, vec![Arc::new(binding)])),
            }
        }

        if grouped.is_empty() {
            return 0;
        }

        let mut entries = self.write();
        for (tag, list) in grouped {
            append(&mut entries, tag, list);
        }
        count
    }

    /// Returns `true` iff at least one binding is registered for `tag`.
    pub fn contains(&self, tag: &str) -> bool {
        self.read().contains_key(tag)
    }

    /// Returns the handlers registered for `tag`, or an empty snapshot.
    pub fn lookup(&self, tag: &str) -> Snapshot {
        self.read()
            .get(tag)
            .cloned()
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    /// Number of bindings registered for `tag`.
    pub fn handler_count(&self, tag: &str) -> usize {
        self.read().get(tag).map_or(0, |list| list.len())
    }

    /// All registered tags, sorted.
    pub fn tags(&self) -> Vec<NotificationTag> {
        let mut tags: Vec<_> = self.read().keys().cloned().collect();
        tags.sort();
        tags
    }

    /// Total number of bindings across all tags.
    pub fn len(&self) -> usize {
        self.read().values().map(|list| list.len()).sum()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // The map is never left half-updated, so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<NotificationTag, Snapshot>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<NotificationTag, Snapshot>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn append(
    entries: &mut HashMap<NotificationTag, Snapshot>,
    tag: NotificationTag,
    added: Vec<Arc<HandlerBinding>>,
) {
    let next: Snapshot = match entries.get(&tag) {
        Some(existing) => existing.iter().cloned().chain(added).collect(),
        None => added.into(),
    };
    entries.insert(tag, next);
}

impl std::fmt::Debug for RegistrationIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.read();
        let mut map = f.debug_map();
        for (tag, list) in entries.iter() {
            map.entry(tag, &list.len());
        }
        map.finish()
    }
}
