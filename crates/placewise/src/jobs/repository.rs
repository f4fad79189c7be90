use crate::companies::domain::CompanyId;
use crate::identity::domain::AccountId;
use crate::store::{Page, Pagination, RepositoryError};

use super::domain::{Job, JobId, JobSearchQuery, JobStatus, JobType};

/// Admin-facing listing filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobFilter {
    pub approved: Option<bool>,
    pub status: Option<JobStatus>,
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(approved) = self.approved {
            if job.is_approved != approved {
                return false;
            }
        }
        if let Some(status) = self.status {
            if job.status != status {
                return false;
            }
        }
        true
    }
}

/// Storage abstraction for postings. The counters are adjusted inside the
/// store rather than read-modify-written by callers.
pub trait JobRepository: Send + Sync {
    fn insert(&self, job: Job) -> Result<Job, RepositoryError>;
    fn update(&self, job: Job) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &JobId) -> Result<Option<Job>, RepositoryError>;
    fn delete(&self, id: &JobId) -> Result<(), RepositoryError>;
    fn search(
        &self,
        query: &JobSearchQuery,
        page: Pagination,
    ) -> Result<Page<Job>, RepositoryError>;
    fn list_by_recruiter(&self, recruiter: &AccountId) -> Result<Vec<Job>, RepositoryError>;
    /// Publicly listed jobs intersecting any of the given skills, newest
    /// first, capped.
    fn list_matching_skills(
        &self,
        skills: &[String],
        cap: usize,
    ) -> Result<Vec<Job>, RepositoryError>;
    /// Atomically bump the view counter and return the updated posting.
    fn record_view(&self, id: &JobId) -> Result<Job, RepositoryError>;
    /// Atomically adjust the applications counter; decrements saturate at
    /// zero.
    fn adjust_applications_count(&self, id: &JobId, delta: i64) -> Result<(), RepositoryError>;
    fn count_for_company(&self, company: &CompanyId) -> Result<u64, RepositoryError>;
    fn list(&self, filter: &JobFilter, page: Pagination) -> Result<Page<Job>, RepositoryError>;
    fn count(&self, filter: &JobFilter) -> Result<u64, RepositoryError>;
    fn count_by_type(&self) -> Result<Vec<(JobType, u64)>, RepositoryError>;
}
