use crate::store::{Page, Pagination, RepositoryError};

use super::domain::{Account, AccountId, Role};

/// Admin-facing listing filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountFilter {
    pub role: Option<Role>,
    pub active: Option<bool>,
}

impl AccountFilter {
    pub fn matches(&self, account: &Account) -> bool {
        if let Some(role) = self.role {
            if account.role() != role {
                return false;
            }
        }
        if let Some(active) = self.active {
            if account.is_active != active {
                return false;
            }
        }
        true
    }
}

/// Storage abstraction for accounts. `insert` must reject a duplicate email
/// (case-insensitively) with `Conflict`.
pub trait AccountRepository: Send + Sync {
    fn insert(&self, account: Account) -> Result<Account, RepositoryError>;
    fn update(&self, account: Account) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError>;
    fn fetch_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError>;
    fn delete(&self, id: &AccountId) -> Result<(), RepositoryError>;
    fn list(
        &self,
        filter: &AccountFilter,
        page: Pagination,
    ) -> Result<Page<Account>, RepositoryError>;
    fn count(&self, filter: &AccountFilter) -> Result<u64, RepositoryError>;
}
