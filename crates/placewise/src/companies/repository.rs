use crate::identity::domain::AccountId;
use crate::store::{Page, Pagination, RepositoryError};

use super::domain::{Company, CompanyId};

/// Admin-facing listing filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyFilter {
    pub approved: Option<bool>,
}

impl CompanyFilter {
    pub fn matches(&self, company: &Company) -> bool {
        self.approved
            .map_or(true, |approved| company.is_approved == approved)
    }
}

/// Storage abstraction for companies. `insert` must reject a taken name or a
/// recruiter who already owns a company with `Conflict`.
pub trait CompanyRepository: Send + Sync {
    fn insert(&self, company: Company) -> Result<Company, RepositoryError>;
    fn update(&self, company: Company) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError>;
    fn fetch_by_name(&self, name: &str) -> Result<Option<Company>, RepositoryError>;
    fn fetch_by_recruiter(&self, recruiter: &AccountId)
        -> Result<Option<Company>, RepositoryError>;
    fn delete(&self, id: &CompanyId) -> Result<(), RepositoryError>;
    fn list_approved(&self) -> Result<Vec<Company>, RepositoryError>;
    fn list(
        &self,
        filter: &CompanyFilter,
        page: Pagination,
    ) -> Result<Page<Company>, RepositoryError>;
    fn count(&self, filter: &CompanyFilter) -> Result<u64, RepositoryError>;
}
