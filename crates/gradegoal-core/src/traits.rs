//! Capabilities the course store is built on.
//!
//! Persistence and identifier generation are injected so the store runs
//! against a real file, an in-memory map, or deterministic test ids.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use uuid::Uuid;

use crate::store::StoreSnapshot;

// ---------------------------------------------------------------------------
// Repository trait
// ---------------------------------------------------------------------------

/// Durable home of the full store record.
pub trait CourseRepository: Send + Sync {
    /// Load the stored record.
    ///
    /// Returns `Ok(None)` when nothing is stored or the stored value does
    /// not decode into a non-empty course list. Errors are reserved for
    /// failures of the backend itself.
    fn load(&self) -> anyhow::Result<Option<StoreSnapshot>>;

    /// Replace the stored record.
    fn save(&self, snapshot: &StoreSnapshot) -> anyhow::Result<()>;
}

/// In-memory repository, for tests and for embedding without a disk.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    stored: Mutex<Option<StoreSnapshot>>,
    saves: AtomicU64,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing record.
    pub fn with_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            stored: Mutex::new(Some(snapshot)),
            saves: AtomicU64::new(0),
        }
    }

    /// The last saved record.
    pub fn stored(&self) -> Option<StoreSnapshot> {
        self.stored
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::Relaxed)
    }
}

impl CourseRepository for MemoryRepository {
    fn load(&self) -> anyhow::Result<Option<StoreSnapshot>> {
        Ok(self.stored().filter(|s| !s.courses.is_empty()))
    }

    fn save(&self, snapshot: &StoreSnapshot) -> anyhow::Result<()> {
        self.saves.fetch_add(1, Ordering::Relaxed);
        *self
            .stored
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(snapshot.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Identifier generation
// ---------------------------------------------------------------------------

/// Source of fresh course and item identifiers.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `prefix-1`, `prefix-2`, ... identifiers.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{n}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Course;

    #[test]
    fn sequential_ids_are_deterministic() {
        let ids = SequentialIds::new("t");
        assert_eq!(ids.next_id(), "t-1");
        assert_eq!(ids.next_id(), "t-2");
        assert_eq!(SequentialIds::default().next_id(), "id-1");
    }

    #[test]
    fn uuid_ids_are_unique() {
        let ids = UuidIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn memory_repository_treats_empty_as_absent() {
        let repo = MemoryRepository::with_snapshot(StoreSnapshot {
            courses: vec![],
            selected_id: None,
        });
        assert!(repo.load().unwrap().is_none());

        let snapshot = StoreSnapshot {
            courses: vec![Course {
                id: "c1".into(),
                name: "Bio".into(),
                target: Default::default(),
                items: vec![],
            }],
            selected_id: Some("c1".into()),
        };
        repo.save(&snapshot).unwrap();
        assert_eq!(repo.load().unwrap(), Some(snapshot));
        assert_eq!(repo.save_count(), 1);
    }
}
