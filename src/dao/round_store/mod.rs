/// MongoDB-backed implementation of the round store.
pub mod mongodb;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{models::RoundEntity, storage::StorageResult};

/// Abstraction over the persistence layer for round documents.
///
/// Owner-match is enforced by the service layer before any of these are
/// called; implementations only move documents. Every mutation goes through
/// [`RoundStore::save_round`], a full-document write, so the `ends` array and
/// the stored aggregates always land together.
pub trait RoundStore: Send + Sync {
    /// Upsert the full round document, aggregates included.
    fn save_round(&self, round: RoundEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch one round by id.
    fn find_round(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<RoundEntity>>>;
    /// All rounds owned by `user_id`, most recent practice date first.
    fn list_rounds(&self, user_id: String) -> BoxFuture<'static, StorageResult<Vec<RoundEntity>>>;
    /// Delete a round; reports whether a document was actually removed.
    fn delete_round(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    /// Cheap connectivity probe used by the health endpoint and supervisor.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Re-establish the backend connection after a failed health check.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
