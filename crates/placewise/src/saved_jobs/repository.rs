use crate::identity::domain::AccountId;
use crate::jobs::domain::JobId;
use crate::store::RepositoryError;

use super::domain::SavedJob;

/// Storage abstraction for bookmarks. `insert` must reject a second bookmark
/// for the same (account, job) pair with `Conflict`.
pub trait SavedJobRepository: Send + Sync {
    fn insert(&self, saved: SavedJob) -> Result<SavedJob, RepositoryError>;
    fn remove(&self, account: &AccountId, job: &JobId) -> Result<(), RepositoryError>;
    /// Newest first.
    fn list_for_account(&self, account: &AccountId) -> Result<Vec<SavedJob>, RepositoryError>;
    fn exists(&self, account: &AccountId, job: &JobId) -> Result<bool, RepositoryError>;
}
