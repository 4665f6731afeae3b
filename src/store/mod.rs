//! Daybook Record Store
//!
//! The diary core only talks to storage through [`DiaryRepository`], the
//! narrow query contract the lifecycle, query and statistics paths need:
//!
//! - **insert**: persist a validated entry, assigning id and timestamps
//! - **find_one**: owner-scoped lookup by id
//! - **find_many**: owner-scoped filtered scan in one of three orders
//! - **save**: upsert used for field updates and the soft-delete flag
//!
//! [`SqliteDiaryStore`] is the bundled backend.

mod error;
mod sqlite;

pub use error::{StorageError, StorageResult};
pub use sqlite::SqliteDiaryStore;

use crate::diary::{DiaryEntry, DiaryId, NewDiaryRecord, UserId};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Row filter for [`DiaryRepository::find_many`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiaryFilter {
    /// Every visible entry of the owner
    All,
    /// Exact emotion label match
    Emotion(String),
    /// Exact diary date match
    Date(NaiveDate),
    /// Case-sensitive substring of title or content
    Keyword(String),
}

/// Result ordering for [`DiaryRepository::find_many`]
///
/// Ties on the sort key are broken by id in the same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiaryOrder {
    DiaryDateDesc,
    CreatedAtDesc,
    DiaryDateAsc,
}

/// Storage contract consumed by the diary core
#[async_trait]
pub trait DiaryRepository: Send + Sync {
    /// Insert a new entry with `deleted = false`.
    ///
    /// The store assigns `id`, `created_at` and `updated_at`.
    async fn insert(&self, record: NewDiaryRecord) -> StorageResult<DiaryEntry>;

    /// Find an entry by id, restricted to `user_id`.
    ///
    /// With `exclude_deleted` soft-deleted rows are treated as absent.
    async fn find_one(
        &self,
        id: DiaryId,
        user_id: UserId,
        exclude_deleted: bool,
    ) -> StorageResult<Option<DiaryEntry>>;

    /// All non-deleted entries of `user_id` matching `filter`, in `order`.
    async fn find_many(
        &self,
        user_id: UserId,
        filter: DiaryFilter,
        order: DiaryOrder,
    ) -> StorageResult<Vec<DiaryEntry>>;

    /// Persist every mutable field of an existing entry and refresh `updated_at`.
    async fn save(&self, entry: &DiaryEntry) -> StorageResult<DiaryEntry>;

    /// Cheap round trip used by readiness probes
    async fn ping(&self) -> StorageResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diary_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn DiaryRepository) {}
    }
}
