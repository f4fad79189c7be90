use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::applications::repository::ApplicationRepository;
use crate::companies::repository::CompanyRepository;
use crate::identity::domain::{AccountId, CurrentUser};
use crate::identity::repository::AccountRepository;
use crate::store::{Page, Pagination, RepositoryError};

use super::domain::{
    ExperienceLevel, Job, JobId, JobSearchQuery, JobStatus, JobType, SalaryPeriod, SalaryRange,
};
use super::repository::{JobFilter, JobRepository};

const RECOMMENDED_CAP: usize = 10;

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("job-{id:06}"))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub salary: SalaryRange,
    #[serde(default)]
    pub salary_type: SalaryPeriod,
    pub location: String,
    pub job_type: JobType,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default = "default_positions")]
    pub positions: u32,
    pub application_deadline: DateTime<Utc>,
}

fn default_positions() -> u32 {
    1
}

/// Partial update; absent fields are left untouched. Approval is only
/// reachable through `set_approval`; recruiters may flip `status` between
/// `active` and `closed` on an approved posting.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub responsibilities: Option<Vec<String>>,
    pub salary: Option<SalaryRange>,
    pub salary_type: Option<SalaryPeriod>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
    pub skills: Option<Vec<String>>,
    pub positions: Option<u32>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub status: Option<JobStatus>,
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("{0}")]
    Validation(String),
    #[error("Please create a company profile first")]
    CompanyRequired,
    #[error("Your company is not approved yet")]
    CompanyNotApproved,
    #[error("Job not found")]
    NotFound,
    #[error("Not authorized to manage this job")]
    Forbidden,
    #[error("Applications still reference this job")]
    ApplicationsExist,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl JobError {
    pub fn status(&self) -> StatusCode {
        match self {
            JobError::Validation(_)
            | JobError::CompanyRequired
            | JobError::CompanyNotApproved => StatusCode::BAD_REQUEST,
            JobError::NotFound => StatusCode::NOT_FOUND,
            JobError::Forbidden => StatusCode::FORBIDDEN,
            JobError::ApplicationsExist => StatusCode::CONFLICT,
            JobError::Repository(err) => err.status(),
        }
    }
}

/// Postings: created by recruiters with an approved company, moderated by
/// admins, publicly searchable once approved and active.
pub struct JobCatalogService {
    jobs: Arc<dyn JobRepository>,
    companies: Arc<dyn CompanyRepository>,
    accounts: Arc<dyn AccountRepository>,
    applications: Arc<dyn ApplicationRepository>,
}

impl JobCatalogService {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        companies: Arc<dyn CompanyRepository>,
        accounts: Arc<dyn AccountRepository>,
        applications: Arc<dyn ApplicationRepository>,
    ) -> Self {
        Self {
            jobs,
            companies,
            accounts,
            applications,
        }
    }

    pub fn create(&self, caller: &CurrentUser, draft: JobDraft) -> Result<Job, JobError> {
        let company = self
            .companies
            .fetch_by_recruiter(&caller.id)?
            .ok_or(JobError::CompanyRequired)?;
        if !company.is_approved {
            return Err(JobError::CompanyNotApproved);
        }

        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(JobError::Validation("Please provide a job title".to_string()));
        }
        if draft.description.trim().is_empty() {
            return Err(JobError::Validation(
                "Please provide a job description".to_string(),
            ));
        }
        if draft.location.trim().is_empty() {
            return Err(JobError::Validation(
                "Please provide a job location".to_string(),
            ));
        }
        if draft.salary.max != 0 && draft.salary.min > draft.salary.max {
            return Err(JobError::Validation(
                "Salary minimum cannot exceed the maximum".to_string(),
            ));
        }

        let job = Job {
            id: next_job_id(),
            title,
            description: draft.description,
            requirements: draft.requirements,
            responsibilities: draft.responsibilities,
            salary: draft.salary,
            salary_type: draft.salary_type,
            location: draft.location,
            job_type: draft.job_type,
            experience_level: draft.experience_level,
            skills: draft.skills,
            positions: draft.positions.max(1),
            company: company.id,
            recruiter: caller.id.clone(),
            application_deadline: draft.application_deadline,
            is_approved: false,
            status: JobStatus::Pending,
            views: 0,
            applications_count: 0,
            created_at: Utc::now(),
        };

        Ok(self.jobs.insert(job)?)
    }

    /// Detail read; bumps the view counter at the store as a side effect.
    pub fn get(&self, id: &JobId) -> Result<Job, JobError> {
        self.jobs.record_view(id).map_err(|err| match err {
            RepositoryError::NotFound => JobError::NotFound,
            other => other.into(),
        })
    }

    pub fn search(
        &self,
        query: &JobSearchQuery,
        page: Pagination,
    ) -> Result<Page<Job>, JobError> {
        Ok(self.jobs.search(query, page)?)
    }

    pub fn list_mine(&self, recruiter: &AccountId) -> Result<Vec<Job>, JobError> {
        Ok(self.jobs.list_by_recruiter(recruiter)?)
    }

    /// Active, approved jobs whose tags intersect the student's skills. No
    /// skills on file means no recommendations, not an error.
    pub fn recommended(&self, account: &AccountId) -> Result<Vec<Job>, JobError> {
        let skills = self
            .accounts
            .fetch(account)?
            .as_ref()
            .and_then(|account| account.student_profile())
            .map(|profile| profile.skills.clone())
            .unwrap_or_default();

        if skills.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.jobs.list_matching_skills(&skills, RECOMMENDED_CAP)?)
    }

    pub fn update(
        &self,
        caller: &CurrentUser,
        id: &JobId,
        update: JobUpdate,
    ) -> Result<Job, JobError> {
        let mut job = self.owned_job(caller, id)?;
        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(JobError::Validation("Please provide a job title".to_string()));
            }
            job.title = title;
        }
        if let Some(description) = update.description {
            job.description = description;
        }
        if let Some(requirements) = update.requirements {
            job.requirements = requirements;
        }
        if let Some(responsibilities) = update.responsibilities {
            job.responsibilities = responsibilities;
        }
        if let Some(salary) = update.salary {
            job.salary = salary;
        }
        if let Some(salary_type) = update.salary_type {
            job.salary_type = salary_type;
        }
        if let Some(location) = update.location {
            job.location = location;
        }
        if let Some(job_type) = update.job_type {
            job.job_type = job_type;
        }
        if let Some(level) = update.experience_level {
            job.experience_level = level;
        }
        if let Some(skills) = update.skills {
            job.skills = skills;
        }
        if let Some(positions) = update.positions {
            job.positions = positions.max(1);
        }
        if let Some(deadline) = update.application_deadline {
            job.application_deadline = deadline;
        }
        if let Some(status) = update.status {
            job.status = status;
        }
        self.jobs.update(job.clone())?;
        Ok(job)
    }

    /// Deletion is refused while applications reference the posting;
    /// recruiters close jobs instead of deleting them mid-flight.
    pub fn delete(&self, caller: &CurrentUser, id: &JobId) -> Result<(), JobError> {
        let job = self.owned_job(caller, id)?;
        if self.applications.count_for_job(&job.id)? > 0 {
            return Err(JobError::ApplicationsExist);
        }
        Ok(self.jobs.delete(id)?)
    }

    /// Admin-only. Approval activates the posting in the same transition;
    /// rejection sends it back to pending.
    pub fn set_approval(&self, id: &JobId, approved: bool) -> Result<Job, JobError> {
        let mut job = self.jobs.fetch(id)?.ok_or(JobError::NotFound)?;
        job.is_approved = approved;
        job.status = if approved {
            JobStatus::Active
        } else {
            JobStatus::Pending
        };
        self.jobs.update(job.clone())?;
        Ok(job)
    }

    pub fn list(&self, filter: &JobFilter, page: Pagination) -> Result<Page<Job>, JobError> {
        Ok(self.jobs.list(filter, page)?)
    }

    fn owned_job(&self, caller: &CurrentUser, id: &JobId) -> Result<Job, JobError> {
        let job = self.jobs.fetch(id)?.ok_or(JobError::NotFound)?;
        if !caller.can_manage(&job.recruiter) {
            return Err(JobError::Forbidden);
        }
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::service::ProfileUpdate;
    use crate::store::Pagination;
    use crate::testutil::{job_draft, TestWorld};

    #[test]
    fn create_requires_an_approved_company() {
        let world = TestWorld::new();
        let recruiter = world.recruiter("Rika");
        let caller = world.caller(&recruiter);

        assert!(matches!(
            world.jobs.create(&caller, job_draft()),
            Err(JobError::CompanyRequired)
        ));

        world
            .companies
            .create(&caller, crate::testutil::company_draft("Rika"))
            .expect("company creates");
        assert!(matches!(
            world.jobs.create(&caller, job_draft()),
            Err(JobError::CompanyNotApproved)
        ));
    }

    #[test]
    fn approval_couples_the_status_both_ways() {
        let world = TestWorld::new();
        let recruiter = world.recruiter("Rika");
        world.approved_company(&recruiter);

        let job = world
            .jobs
            .create(&world.caller(&recruiter), job_draft())
            .expect("creates");
        assert_eq!(job.status, JobStatus::Pending);
        assert!(!job.is_approved);

        let approved = world.jobs.set_approval(&job.id, true).expect("approves");
        assert!(approved.is_approved);
        assert_eq!(approved.status, JobStatus::Active);

        let rejected = world.jobs.set_approval(&job.id, false).expect("rejects");
        assert!(!rejected.is_approved);
        assert_eq!(rejected.status, JobStatus::Pending);
    }

    #[test]
    fn detail_reads_bump_the_view_counter() {
        let world = TestWorld::new();
        let recruiter = world.recruiter("Rika");
        world.approved_company(&recruiter);
        let job = world.live_job(&recruiter);

        world.jobs.get(&job.id).expect("reads");
        let read = world.jobs.get(&job.id).expect("reads");
        assert_eq!(read.views, 2);

        assert!(matches!(
            world.jobs.get(&JobId("job-missing".to_string())),
            Err(JobError::NotFound)
        ));
    }

    #[test]
    fn search_paginates_newest_first() {
        let world = TestWorld::new();
        let recruiter = world.recruiter("Rika");
        world.approved_company(&recruiter);
        let mut newest_first = Vec::new();
        for _ in 0..5 {
            newest_first.insert(0, world.live_job(&recruiter).id);
        }

        let window = Pagination::new(Some(1), Some(2));
        let page = world
            .jobs
            .search(&JobSearchQuery::default(), window)
            .expect("searches");
        assert_eq!(page.total, 5);
        assert_eq!(window.total_pages(page.total), 3);
        let ids: Vec<JobId> = page.items.into_iter().map(|job| job.id).collect();
        assert_eq!(ids, newest_first[..2].to_vec());
    }

    #[test]
    fn recommendations_intersect_student_skills_and_cap_out() {
        let world = TestWorld::new();
        let recruiter = world.recruiter("Rika");
        world.approved_company(&recruiter);
        for _ in 0..12 {
            world.live_job(&recruiter);
        }

        let student = world.student("Amira");
        assert!(
            world
                .jobs
                .recommended(&student.id)
                .expect("no skills yields empty")
                .is_empty(),
        );

        world
            .identity
            .update_profile(
                &student.id,
                ProfileUpdate {
                    skills: Some(vec!["rust".to_string()]),
                    ..ProfileUpdate::default()
                },
            )
            .expect("skills set");
        let recommended = world.jobs.recommended(&student.id).expect("recommends");
        assert_eq!(recommended.len(), 10, "capped at ten");

        world
            .identity
            .update_profile(
                &student.id,
                ProfileUpdate {
                    skills: Some(vec!["COBOL".to_string()]),
                    ..ProfileUpdate::default()
                },
            )
            .expect("skills set");
        assert!(world
            .jobs
            .recommended(&student.id)
            .expect("recommends")
            .is_empty());
    }

    #[test]
    fn delete_refuses_while_applications_reference_the_job() {
        let world = TestWorld::new();
        let recruiter = world.recruiter("Rika");
        world.approved_company(&recruiter);
        let job = world.live_job(&recruiter);
        let caller = world.caller(&recruiter);

        let student = world.student_with_resume("Amira");
        let application = world
            .applications
            .apply(&world.caller(&student), &job.id, None)
            .expect("submits");

        assert!(matches!(
            world.jobs.delete(&caller, &job.id),
            Err(JobError::ApplicationsExist)
        ));

        world
            .applications
            .withdraw(&world.caller(&student), &application.id)
            .expect("withdraws");
        world.jobs.delete(&caller, &job.id).expect("deletes");
    }

    #[test]
    fn mutations_require_owner_or_admin() {
        let world = TestWorld::new();
        let recruiter = world.recruiter("Rika");
        world.approved_company(&recruiter);
        let job = world.live_job(&recruiter);

        let stranger = world.recruiter("Sol");
        assert!(matches!(
            world
                .jobs
                .update(&world.caller(&stranger), &job.id, JobUpdate::default()),
            Err(JobError::Forbidden)
        ));
        assert!(matches!(
            world.jobs.delete(&world.caller(&stranger), &job.id),
            Err(JobError::Forbidden)
        ));

        let admin = world.admin_account();
        world
            .jobs
            .update(
                &world.caller(&admin),
                &job.id,
                JobUpdate {
                    positions: Some(4),
                    ..JobUpdate::default()
                },
            )
            .expect("admin edits");
    }
}
