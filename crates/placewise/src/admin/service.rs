use std::sync::Arc;

use crate::applications::domain::{Application, ApplicationStatus};
use crate::applications::repository::ApplicationRepository;
use crate::companies::domain::Company;
use crate::companies::repository::{CompanyFilter, CompanyRepository};
use crate::identity::domain::{Account, Role};
use crate::identity::repository::{AccountFilter, AccountRepository};
use crate::jobs::domain::{Job, JobStatus};
use crate::jobs::repository::{JobFilter, JobRepository};
use crate::store::{Page, Pagination, RepositoryError};

use super::domain::{DashboardOverview, DashboardStats, StatusBreakdown, TypeBreakdown};

const RECENT_WINDOW: Pagination = Pagination { page: 1, limit: 5 };

/// Read-only aggregation over the other components' stores. Mutations are
/// not here: the admin router calls the owning services directly.
pub struct AdminService {
    accounts: Arc<dyn AccountRepository>,
    companies: Arc<dyn CompanyRepository>,
    jobs: Arc<dyn JobRepository>,
    applications: Arc<dyn ApplicationRepository>,
}

impl AdminService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        companies: Arc<dyn CompanyRepository>,
        jobs: Arc<dyn JobRepository>,
        applications: Arc<dyn ApplicationRepository>,
    ) -> Self {
        Self {
            accounts,
            companies,
            jobs,
            applications,
        }
    }

    pub fn dashboard_stats(&self) -> Result<DashboardStats, RepositoryError> {
        let overview = DashboardOverview {
            total_users: self.accounts.count(&AccountFilter::default())?,
            total_students: self.accounts.count(&AccountFilter {
                role: Some(Role::Student),
                ..AccountFilter::default()
            })?,
            total_recruiters: self.accounts.count(&AccountFilter {
                role: Some(Role::Recruiter),
                ..AccountFilter::default()
            })?,
            total_jobs: self.jobs.count(&JobFilter::default())?,
            active_jobs: self.jobs.count(&JobFilter {
                approved: Some(true),
                status: Some(JobStatus::Active),
            })?,
            pending_jobs: self.jobs.count(&JobFilter {
                approved: Some(false),
                status: None,
            })?,
            total_companies: self.companies.count(&CompanyFilter::default())?,
            approved_companies: self.companies.count(&CompanyFilter {
                approved: Some(true),
            })?,
            pending_companies: self.companies.count(&CompanyFilter {
                approved: Some(false),
            })?,
            total_applications: self.applications.count(None)?,
        };

        let applications_by_status = self
            .applications
            .count_by_status()?
            .into_iter()
            .map(|(status, count)| StatusBreakdown { status, count })
            .collect();
        let jobs_by_type = self
            .jobs
            .count_by_type()?
            .into_iter()
            .map(|(job_type, count)| TypeBreakdown { job_type, count })
            .collect();

        Ok(DashboardStats {
            overview,
            recent_users: self
                .accounts
                .list(&AccountFilter::default(), RECENT_WINDOW)?
                .items,
            recent_jobs: self.jobs.list(&JobFilter::default(), RECENT_WINDOW)?.items,
            recent_applications: self.applications.list(None, RECENT_WINDOW)?.items,
            applications_by_status,
            jobs_by_type,
        })
    }

    pub fn list_users(
        &self,
        filter: &AccountFilter,
        page: Pagination,
    ) -> Result<Page<Account>, RepositoryError> {
        self.accounts.list(filter, page)
    }

    pub fn list_companies(
        &self,
        filter: &CompanyFilter,
        page: Pagination,
    ) -> Result<Page<Company>, RepositoryError> {
        self.companies.list(filter, page)
    }

    pub fn list_jobs(
        &self,
        filter: &JobFilter,
        page: Pagination,
    ) -> Result<Page<Job>, RepositoryError> {
        self.jobs.list(filter, page)
    }

    pub fn list_applications(
        &self,
        status: Option<ApplicationStatus>,
        page: Pagination,
    ) -> Result<Page<Application>, RepositoryError> {
        self.applications.list(status, page)
    }
}
