use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::companies::domain::CompanyId;
use crate::companies::repository::CompanyRepository;
use crate::identity::domain::{AccountId, CurrentUser};
use crate::identity::repository::AccountRepository;
use crate::jobs::domain::{Job, JobId};
use crate::jobs::repository::JobRepository;
use crate::notifications::Notifier;
use crate::store::{Page, Pagination, RepositoryError};

use super::domain::{Application, ApplicationId, ApplicationStatus};
use super::repository::ApplicationRepository;

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ApplicationStatus,
    #[serde(default)]
    pub note: Option<String>,
}

/// Aggregate counts across all of a recruiter's postings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationStats {
    pub total: u64,
    pub pending: u64,
    pub shortlisted: u64,
    pub interview: u64,
    pub hired: u64,
    pub rejected: u64,
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("{0}")]
    Validation(String),
    #[error("Job not found")]
    JobNotFound,
    #[error("Application not found")]
    NotFound,
    #[error("This job is not accepting applications")]
    JobClosed,
    #[error("Application deadline has passed")]
    DeadlinePassed,
    #[error("Please upload your resume first")]
    ResumeRequired,
    #[error("You have already applied for this job")]
    AlreadyApplied,
    #[error("Not authorized to view these applications")]
    ListForbidden,
    #[error("Not authorized to view this application")]
    ViewForbidden,
    #[error("Not authorized to update this application")]
    UpdateForbidden,
    #[error("Not authorized to withdraw this application")]
    WithdrawForbidden,
    #[error("User not found")]
    AccountNotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ApplicationError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApplicationError::Validation(_)
            | ApplicationError::JobClosed
            | ApplicationError::DeadlinePassed
            | ApplicationError::ResumeRequired => StatusCode::BAD_REQUEST,
            ApplicationError::JobNotFound
            | ApplicationError::NotFound
            | ApplicationError::AccountNotFound => StatusCode::NOT_FOUND,
            ApplicationError::AlreadyApplied => StatusCode::CONFLICT,
            ApplicationError::ListForbidden
            | ApplicationError::ViewForbidden
            | ApplicationError::UpdateForbidden
            | ApplicationError::WithdrawForbidden => StatusCode::FORBIDDEN,
            ApplicationError::Repository(err) => err.status(),
        }
    }
}

/// The core of the marketplace: submission, the permissive status machine
/// with its append-only audit trail, and who may see or move an application.
pub struct ApplicationLifecycleService {
    applications: Arc<dyn ApplicationRepository>,
    jobs: Arc<dyn JobRepository>,
    accounts: Arc<dyn AccountRepository>,
    companies: Arc<dyn CompanyRepository>,
    notifier: Notifier,
}

impl ApplicationLifecycleService {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        jobs: Arc<dyn JobRepository>,
        accounts: Arc<dyn AccountRepository>,
        companies: Arc<dyn CompanyRepository>,
        notifier: Notifier,
    ) -> Self {
        Self {
            applications,
            jobs,
            accounts,
            companies,
            notifier,
        }
    }

    /// Submit an application. The duplicate check is the store's uniqueness
    /// constraint, not a read-then-write; the confirmation email is
    /// best-effort and cannot fail the submission.
    pub fn apply(
        &self,
        caller: &CurrentUser,
        job_id: &JobId,
        cover_letter: Option<String>,
    ) -> Result<Application, ApplicationError> {
        let job = self
            .jobs
            .fetch(job_id)?
            .ok_or(ApplicationError::JobNotFound)?;

        if !job.is_publicly_listed() {
            return Err(ApplicationError::JobClosed);
        }
        let now = Utc::now();
        if now > job.application_deadline {
            return Err(ApplicationError::DeadlinePassed);
        }

        let applicant = self
            .accounts
            .fetch(&caller.id)?
            .ok_or(ApplicationError::AccountNotFound)?;
        let resume = applicant
            .student_profile()
            .and_then(|profile| profile.resume.clone())
            .ok_or(ApplicationError::ResumeRequired)?;

        let application = Application::submitted(
            next_application_id(),
            job.id.clone(),
            caller.id.clone(),
            job.company.clone(),
            resume,
            cover_letter.unwrap_or_default(),
            now,
        );

        let stored = self
            .applications
            .insert(application)
            .map_err(|err| match err {
                RepositoryError::Conflict => ApplicationError::AlreadyApplied,
                other => other.into(),
            })?;

        self.jobs.adjust_applications_count(&job.id, 1)?;

        self.notifier.application_received(
            &applicant.email,
            &applicant.name,
            &job.title,
            &self.company_name(&job.company),
        );

        Ok(stored)
    }

    pub fn list_for_job(
        &self,
        caller: &CurrentUser,
        job_id: &JobId,
        status: Option<ApplicationStatus>,
        page: Pagination,
    ) -> Result<Page<Application>, ApplicationError> {
        let job = self
            .jobs
            .fetch(job_id)?
            .ok_or(ApplicationError::JobNotFound)?;
        if !caller.can_manage(&job.recruiter) {
            return Err(ApplicationError::ListForbidden);
        }
        Ok(self.applications.list_for_job(job_id, status, page)?)
    }

    pub fn list_mine(
        &self,
        applicant: &AccountId,
    ) -> Result<Vec<Application>, ApplicationError> {
        Ok(self.applications.list_for_applicant(applicant)?)
    }

    /// Visible to the applicant, the owning recruiter, and admins only.
    pub fn get(
        &self,
        caller: &CurrentUser,
        id: &ApplicationId,
    ) -> Result<Application, ApplicationError> {
        let application = self
            .applications
            .fetch(id)?
            .ok_or(ApplicationError::NotFound)?;

        if !caller.owns(&application.applicant)
            && !caller.is_admin()
            && !self.owns_job(caller, &application.job)?
        {
            return Err(ApplicationError::ViewForbidden);
        }
        Ok(application)
    }

    /// Move the application to `status`, appending the audit entry. Any
    /// status is accepted from any other; the history is never rewritten.
    pub fn update_status(
        &self,
        caller: &CurrentUser,
        id: &ApplicationId,
        request: StatusUpdateRequest,
    ) -> Result<Application, ApplicationError> {
        let mut application = self
            .applications
            .fetch(id)?
            .ok_or(ApplicationError::NotFound)?;

        if !caller.is_admin() && !self.owns_job(caller, &application.job)? {
            return Err(ApplicationError::UpdateForbidden);
        }

        application.record_status(request.status, request.note, Utc::now());
        self.applications.update(application.clone())?;

        if let Some(applicant) = self.accounts.fetch(&application.applicant)? {
            let job_title = self
                .jobs
                .fetch(&application.job)?
                .map(|job| job.title)
                .unwrap_or_else(|| "the position".to_string());
            self.notifier.application_status_changed(
                &applicant.email,
                &applicant.name,
                &job_title,
                &self.company_name(&application.company),
                application.status,
            );
        }

        Ok(application)
    }

    /// Withdraw: applicant only — admins do not bypass this one. Decrements
    /// the job's counter, saturating at zero.
    pub fn withdraw(
        &self,
        caller: &CurrentUser,
        id: &ApplicationId,
    ) -> Result<(), ApplicationError> {
        let application = self
            .applications
            .fetch(id)?
            .ok_or(ApplicationError::NotFound)?;
        if !caller.owns(&application.applicant) {
            return Err(ApplicationError::WithdrawForbidden);
        }

        self.applications.delete(id)?;
        if let Err(err) = self.jobs.adjust_applications_count(&application.job, -1) {
            // The posting may legitimately be gone; anything else is real.
            if !matches!(err, RepositoryError::NotFound) {
                return Err(err.into());
            }
        }
        Ok(())
    }

    pub fn stats(&self, recruiter: &AccountId) -> Result<ApplicationStats, ApplicationError> {
        let job_ids: Vec<JobId> = self
            .jobs
            .list_by_recruiter(recruiter)?
            .into_iter()
            .map(|job| job.id)
            .collect();

        Ok(ApplicationStats {
            total: self.applications.count_for_jobs(&job_ids, None)?,
            pending: self.count_status(&job_ids, ApplicationStatus::Pending)?,
            shortlisted: self.count_status(&job_ids, ApplicationStatus::Shortlisted)?,
            interview: self.count_status(&job_ids, ApplicationStatus::Interview)?,
            hired: self.count_status(&job_ids, ApplicationStatus::Hired)?,
            rejected: self.count_status(&job_ids, ApplicationStatus::Rejected)?,
        })
    }

    pub fn list(
        &self,
        status: Option<ApplicationStatus>,
        page: Pagination,
    ) -> Result<Page<Application>, ApplicationError> {
        Ok(self.applications.list(status, page)?)
    }

    fn count_status(
        &self,
        jobs: &[JobId],
        status: ApplicationStatus,
    ) -> Result<u64, ApplicationError> {
        Ok(self.applications.count_for_jobs(jobs, Some(status))?)
    }

    fn owns_job(&self, caller: &CurrentUser, job: &JobId) -> Result<bool, ApplicationError> {
        Ok(self
            .jobs
            .fetch(job)?
            .map(|job: Job| job.recruiter == caller.id)
            .unwrap_or(false))
    }

    fn company_name(&self, company: &CompanyId) -> String {
        self.companies
            .fetch(company)
            .ok()
            .flatten()
            .map(|company| company.name)
            .unwrap_or_else(|| "the hiring team".to_string())
    }
}
