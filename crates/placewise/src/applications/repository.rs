use crate::identity::domain::AccountId;
use crate::jobs::domain::JobId;
use crate::store::{Page, Pagination, RepositoryError};

use super::domain::{Application, ApplicationId, ApplicationStatus};

/// Storage abstraction for applications. `insert` must enforce the
/// one-application-per-(job, applicant) constraint with `Conflict` — the
/// service never pre-checks, so concurrent submissions cannot both land.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn update(&self, application: Application) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn delete(&self, id: &ApplicationId) -> Result<(), RepositoryError>;
    fn list_for_job(
        &self,
        job: &JobId,
        status: Option<ApplicationStatus>,
        page: Pagination,
    ) -> Result<Page<Application>, RepositoryError>;
    /// Newest first.
    fn list_for_applicant(
        &self,
        applicant: &AccountId,
    ) -> Result<Vec<Application>, RepositoryError>;
    fn count_for_job(&self, job: &JobId) -> Result<u64, RepositoryError>;
    fn count_for_jobs(
        &self,
        jobs: &[JobId],
        status: Option<ApplicationStatus>,
    ) -> Result<u64, RepositoryError>;
    fn list(
        &self,
        status: Option<ApplicationStatus>,
        page: Pagination,
    ) -> Result<Page<Application>, RepositoryError>;
    fn count(&self, status: Option<ApplicationStatus>) -> Result<u64, RepositoryError>;
    fn count_by_status(&self) -> Result<Vec<(ApplicationStatus, u64)>, RepositoryError>;
}
