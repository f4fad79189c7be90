//! In-process document store. One [`MemoryStore`] plays the role of the
//! database for the API binary, the demo, and the test suite; every
//! uniqueness constraint and counter adjustment happens under its locks, so
//! services never need check-then-write sequences.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::applications::domain::{Application, ApplicationId, ApplicationStatus};
use crate::applications::repository::ApplicationRepository;
use crate::companies::domain::{Company, CompanyId};
use crate::companies::repository::{CompanyFilter, CompanyRepository};
use crate::identity::domain::{Account, AccountId};
use crate::identity::repository::{AccountFilter, AccountRepository};
use crate::jobs::domain::{Job, JobId, JobSearchQuery, JobType};
use crate::jobs::repository::{JobFilter, JobRepository};
use crate::saved_jobs::domain::{SavedJob, SavedJobId};
use crate::saved_jobs::repository::SavedJobRepository;

use super::{Page, Pagination, RepositoryError};

#[derive(Default)]
pub struct MemoryStore {
    accounts: Mutex<HashMap<AccountId, Account>>,
    companies: Mutex<HashMap<CompanyId, Company>>,
    jobs: Mutex<HashMap<JobId, Job>>,
    applications: Mutex<HashMap<ApplicationId, Application>>,
    saved_jobs: Mutex<HashMap<SavedJobId, SavedJob>>,
}

fn guard<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
}

fn paginate<T>(items: Vec<T>, page: Pagination) -> Page<T> {
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(page.offset())
        .take(page.cap())
        .collect();
    Page { items, total }
}

impl AccountRepository for MemoryStore {
    fn insert(&self, account: Account) -> Result<Account, RepositoryError> {
        let mut accounts = guard(&self.accounts)?;
        let taken = accounts
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&account.email));
        if taken || accounts.contains_key(&account.id) {
            return Err(RepositoryError::Conflict);
        }
        accounts.insert(account.id.clone(), account.clone());
        Ok(account)
    }

    fn update(&self, account: Account) -> Result<(), RepositoryError> {
        let mut accounts = guard(&self.accounts)?;
        if !accounts.contains_key(&account.id) {
            return Err(RepositoryError::NotFound);
        }
        accounts.insert(account.id.clone(), account);
        Ok(())
    }

    fn fetch(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError> {
        Ok(guard(&self.accounts)?.get(id).cloned())
    }

    fn fetch_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError> {
        Ok(guard(&self.accounts)?
            .values()
            .find(|account| account.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn delete(&self, id: &AccountId) -> Result<(), RepositoryError> {
        guard(&self.accounts)?
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn list(
        &self,
        filter: &AccountFilter,
        page: Pagination,
    ) -> Result<Page<Account>, RepositoryError> {
        let mut matching: Vec<Account> = guard(&self.accounts)?
            .values()
            .filter(|account| filter.matches(account))
            .cloned()
            .collect();
        matching.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
        Ok(paginate(matching, page))
    }

    fn count(&self, filter: &AccountFilter) -> Result<u64, RepositoryError> {
        Ok(guard(&self.accounts)?
            .values()
            .filter(|account| filter.matches(account))
            .count() as u64)
    }
}

impl CompanyRepository for MemoryStore {
    fn insert(&self, company: Company) -> Result<Company, RepositoryError> {
        let mut companies = guard(&self.companies)?;
        let collision = companies.values().any(|existing| {
            existing.name == company.name || existing.recruiter == company.recruiter
        });
        if collision || companies.contains_key(&company.id) {
            return Err(RepositoryError::Conflict);
        }
        companies.insert(company.id.clone(), company.clone());
        Ok(company)
    }

    fn update(&self, company: Company) -> Result<(), RepositoryError> {
        let mut companies = guard(&self.companies)?;
        if !companies.contains_key(&company.id) {
            return Err(RepositoryError::NotFound);
        }
        companies.insert(company.id.clone(), company);
        Ok(())
    }

    fn fetch(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError> {
        Ok(guard(&self.companies)?.get(id).cloned())
    }

    fn fetch_by_name(&self, name: &str) -> Result<Option<Company>, RepositoryError> {
        Ok(guard(&self.companies)?
            .values()
            .find(|company| company.name == name)
            .cloned())
    }

    fn fetch_by_recruiter(
        &self,
        recruiter: &AccountId,
    ) -> Result<Option<Company>, RepositoryError> {
        Ok(guard(&self.companies)?
            .values()
            .find(|company| company.recruiter == *recruiter)
            .cloned())
    }

    fn delete(&self, id: &CompanyId) -> Result<(), RepositoryError> {
        guard(&self.companies)?
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn list_approved(&self) -> Result<Vec<Company>, RepositoryError> {
        let mut approved: Vec<Company> = guard(&self.companies)?
            .values()
            .filter(|company| company.is_approved)
            .cloned()
            .collect();
        approved.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
        Ok(approved)
    }

    fn list(
        &self,
        filter: &CompanyFilter,
        page: Pagination,
    ) -> Result<Page<Company>, RepositoryError> {
        let mut matching: Vec<Company> = guard(&self.companies)?
            .values()
            .filter(|company| filter.matches(company))
            .cloned()
            .collect();
        matching.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
        Ok(paginate(matching, page))
    }

    fn count(&self, filter: &CompanyFilter) -> Result<u64, RepositoryError> {
        Ok(guard(&self.companies)?
            .values()
            .filter(|company| filter.matches(company))
            .count() as u64)
    }
}

impl JobRepository for MemoryStore {
    fn insert(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut jobs = guard(&self.jobs)?;
        if jobs.contains_key(&job.id) {
            return Err(RepositoryError::Conflict);
        }
        jobs.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn update(&self, job: Job) -> Result<(), RepositoryError> {
        let mut jobs = guard(&self.jobs)?;
        if !jobs.contains_key(&job.id) {
            return Err(RepositoryError::NotFound);
        }
        jobs.insert(job.id.clone(), job);
        Ok(())
    }

    fn fetch(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(guard(&self.jobs)?.get(id).cloned())
    }

    fn delete(&self, id: &JobId) -> Result<(), RepositoryError> {
        guard(&self.jobs)?
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn search(
        &self,
        query: &JobSearchQuery,
        page: Pagination,
    ) -> Result<Page<Job>, RepositoryError> {
        let mut matching: Vec<Job> = guard(&self.jobs)?
            .values()
            .filter(|job| query.matches(job))
            .cloned()
            .collect();
        matching.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
        Ok(paginate(matching, page))
    }

    fn list_by_recruiter(&self, recruiter: &AccountId) -> Result<Vec<Job>, RepositoryError> {
        let mut owned: Vec<Job> = guard(&self.jobs)?
            .values()
            .filter(|job| job.recruiter == *recruiter)
            .cloned()
            .collect();
        owned.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
        Ok(owned)
    }

    fn list_matching_skills(
        &self,
        skills: &[String],
        cap: usize,
    ) -> Result<Vec<Job>, RepositoryError> {
        let mut matching: Vec<Job> = guard(&self.jobs)?
            .values()
            .filter(|job| job.is_publicly_listed() && job.matches_any_skill(skills))
            .cloned()
            .collect();
        matching.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
        matching.truncate(cap);
        Ok(matching)
    }

    fn record_view(&self, id: &JobId) -> Result<Job, RepositoryError> {
        let mut jobs = guard(&self.jobs)?;
        let job = jobs.get_mut(id).ok_or(RepositoryError::NotFound)?;
        job.views += 1;
        Ok(job.clone())
    }

    fn adjust_applications_count(&self, id: &JobId, delta: i64) -> Result<(), RepositoryError> {
        let mut jobs = guard(&self.jobs)?;
        let job = jobs.get_mut(id).ok_or(RepositoryError::NotFound)?;
        job.applications_count = if delta >= 0 {
            job.applications_count.saturating_add(delta as u64)
        } else {
            job.applications_count.saturating_sub(delta.unsigned_abs())
        };
        Ok(())
    }

    fn count_for_company(&self, company: &CompanyId) -> Result<u64, RepositoryError> {
        Ok(guard(&self.jobs)?
            .values()
            .filter(|job| job.company == *company)
            .count() as u64)
    }

    fn list(&self, filter: &JobFilter, page: Pagination) -> Result<Page<Job>, RepositoryError> {
        let mut matching: Vec<Job> = guard(&self.jobs)?
            .values()
            .filter(|job| filter.matches(job))
            .cloned()
            .collect();
        matching.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
        Ok(paginate(matching, page))
    }

    fn count(&self, filter: &JobFilter) -> Result<u64, RepositoryError> {
        Ok(guard(&self.jobs)?
            .values()
            .filter(|job| filter.matches(job))
            .count() as u64)
    }

    fn count_by_type(&self) -> Result<Vec<(JobType, u64)>, RepositoryError> {
        let jobs = guard(&self.jobs)?;
        Ok(JobType::ALL
            .into_iter()
            .map(|kind| {
                let count = jobs.values().filter(|job| job.job_type == kind).count() as u64;
                (kind, count)
            })
            .collect())
    }
}

impl ApplicationRepository for MemoryStore {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut applications = guard(&self.applications)?;
        let duplicate = applications.values().any(|existing| {
            existing.job == application.job && existing.applicant == application.applicant
        });
        if duplicate || applications.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        applications.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: Application) -> Result<(), RepositoryError> {
        let mut applications = guard(&self.applications)?;
        if !applications.contains_key(&application.id) {
            return Err(RepositoryError::NotFound);
        }
        applications.insert(application.id.clone(), application);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(guard(&self.applications)?.get(id).cloned())
    }

    fn delete(&self, id: &ApplicationId) -> Result<(), RepositoryError> {
        guard(&self.applications)?
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn list_for_job(
        &self,
        job: &JobId,
        status: Option<ApplicationStatus>,
        page: Pagination,
    ) -> Result<Page<Application>, RepositoryError> {
        let mut matching: Vec<Application> = guard(&self.applications)?
            .values()
            .filter(|application| {
                application.job == *job
                    && status.map_or(true, |status| application.status == status)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| (b.applied_at, &b.id).cmp(&(a.applied_at, &a.id)));
        Ok(paginate(matching, page))
    }

    fn list_for_applicant(
        &self,
        applicant: &AccountId,
    ) -> Result<Vec<Application>, RepositoryError> {
        let mut mine: Vec<Application> = guard(&self.applications)?
            .values()
            .filter(|application| application.applicant == *applicant)
            .cloned()
            .collect();
        mine.sort_by(|a, b| (b.applied_at, &b.id).cmp(&(a.applied_at, &a.id)));
        Ok(mine)
    }

    fn count_for_job(&self, job: &JobId) -> Result<u64, RepositoryError> {
        Ok(guard(&self.applications)?
            .values()
            .filter(|application| application.job == *job)
            .count() as u64)
    }

    fn count_for_jobs(
        &self,
        jobs: &[JobId],
        status: Option<ApplicationStatus>,
    ) -> Result<u64, RepositoryError> {
        Ok(guard(&self.applications)?
            .values()
            .filter(|application| {
                jobs.contains(&application.job)
                    && status.map_or(true, |status| application.status == status)
            })
            .count() as u64)
    }

    fn list(
        &self,
        status: Option<ApplicationStatus>,
        page: Pagination,
    ) -> Result<Page<Application>, RepositoryError> {
        let mut matching: Vec<Application> = guard(&self.applications)?
            .values()
            .filter(|application| status.map_or(true, |status| application.status == status))
            .cloned()
            .collect();
        matching.sort_by(|a, b| (b.applied_at, &b.id).cmp(&(a.applied_at, &a.id)));
        Ok(paginate(matching, page))
    }

    fn count(&self, status: Option<ApplicationStatus>) -> Result<u64, RepositoryError> {
        Ok(guard(&self.applications)?
            .values()
            .filter(|application| status.map_or(true, |status| application.status == status))
            .count() as u64)
    }

    fn count_by_status(&self) -> Result<Vec<(ApplicationStatus, u64)>, RepositoryError> {
        let applications = guard(&self.applications)?;
        Ok(ApplicationStatus::ALL
            .into_iter()
            .map(|status| {
                let count = applications
                    .values()
                    .filter(|application| application.status == status)
                    .count() as u64;
                (status, count)
            })
            .collect())
    }
}

impl SavedJobRepository for MemoryStore {
    fn insert(&self, saved: SavedJob) -> Result<SavedJob, RepositoryError> {
        let mut saved_jobs = guard(&self.saved_jobs)?;
        let duplicate = saved_jobs
            .values()
            .any(|existing| existing.account == saved.account && existing.job == saved.job);
        if duplicate || saved_jobs.contains_key(&saved.id) {
            return Err(RepositoryError::Conflict);
        }
        saved_jobs.insert(saved.id.clone(), saved.clone());
        Ok(saved)
    }

    fn remove(&self, account: &AccountId, job: &JobId) -> Result<(), RepositoryError> {
        let mut saved_jobs = guard(&self.saved_jobs)?;
        let id = saved_jobs
            .values()
            .find(|saved| saved.account == *account && saved.job == *job)
            .map(|saved| saved.id.clone())
            .ok_or(RepositoryError::NotFound)?;
        saved_jobs.remove(&id);
        Ok(())
    }

    fn list_for_account(&self, account: &AccountId) -> Result<Vec<SavedJob>, RepositoryError> {
        let mut mine: Vec<SavedJob> = guard(&self.saved_jobs)?
            .values()
            .filter(|saved| saved.account == *account)
            .cloned()
            .collect();
        mine.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
        Ok(mine)
    }

    fn exists(&self, account: &AccountId, job: &JobId) -> Result<bool, RepositoryError> {
        Ok(guard(&self.saved_jobs)?
            .values()
            .any(|saved| saved.account == *account && saved.job == *job))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::identity::domain::{RoleProfile, StudentProfile};
    use crate::identity::domain::ResumeRef;
    use crate::jobs::domain::{ExperienceLevel, JobStatus, SalaryPeriod, SalaryRange};

    fn account(id: &str, email: &str) -> Account {
        Account {
            id: AccountId(id.to_string()),
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            phone: String::new(),
            is_active: true,
            is_verified: false,
            profile: RoleProfile::Student(StudentProfile::default()),
            created_at: Utc::now(),
        }
    }

    fn company(id: &str, name: &str, recruiter: &str) -> Company {
        Company {
            id: CompanyId(id.to_string()),
            name: name.to_string(),
            description: "desc".to_string(),
            website: String::new(),
            location: "Berlin".to_string(),
            logo: None,
            industry: String::new(),
            company_size: Default::default(),
            recruiter: AccountId(recruiter.to_string()),
            is_approved: false,
            created_at: Utc::now(),
        }
    }

    fn job(id: &str) -> Job {
        Job {
            id: JobId(id.to_string()),
            title: "Engineer".to_string(),
            description: "desc".to_string(),
            requirements: Vec::new(),
            responsibilities: Vec::new(),
            salary: SalaryRange::default(),
            salary_type: SalaryPeriod::Yearly,
            location: "Berlin".to_string(),
            job_type: JobType::FullTime,
            experience_level: ExperienceLevel::EntryLevel,
            skills: Vec::new(),
            positions: 1,
            company: CompanyId("comp-1".to_string()),
            recruiter: AccountId("acct-1".to_string()),
            application_deadline: Utc::now(),
            is_approved: false,
            status: JobStatus::Pending,
            views: 0,
            applications_count: 0,
            created_at: Utc::now(),
        }
    }

    fn application(id: &str, job: &str, applicant: &str) -> Application {
        Application::submitted(
            ApplicationId(id.to_string()),
            JobId(job.to_string()),
            AccountId(applicant.to_string()),
            CompanyId("comp-1".to_string()),
            ResumeRef {
                url: "/uploads/resumes/cv.pdf".to_string(),
                original_name: "cv.pdf".to_string(),
            },
            String::new(),
            Utc::now(),
        )
    }

    #[test]
    fn email_uniqueness_is_case_insensitive() {
        let store = MemoryStore::default();
        AccountRepository::insert(&store, account("a-1", "amira@example.com")).expect("inserts");
        assert!(matches!(
            AccountRepository::insert(&store, account("a-2", "AMIRA@example.com")),
            Err(RepositoryError::Conflict)
        ));
    }

    #[test]
    fn company_name_and_owner_are_unique() {
        let store = MemoryStore::default();
        CompanyRepository::insert(&store, company("c-1", "Initech", "a-1")).expect("inserts");
        assert!(matches!(
            CompanyRepository::insert(&store, company("c-2", "Initech", "a-2")),
            Err(RepositoryError::Conflict)
        ));
        assert!(matches!(
            CompanyRepository::insert(&store, company("c-3", "Globex", "a-1")),
            Err(RepositoryError::Conflict)
        ));
        CompanyRepository::insert(&store, company("c-4", "Globex", "a-2")).expect("inserts");
    }

    #[test]
    fn one_application_per_job_and_applicant() {
        let store = MemoryStore::default();
        ApplicationRepository::insert(&store, application("app-1", "job-1", "a-1"))
            .expect("inserts");
        assert!(matches!(
            ApplicationRepository::insert(&store, application("app-2", "job-1", "a-1")),
            Err(RepositoryError::Conflict)
        ));
        ApplicationRepository::insert(&store, application("app-3", "job-2", "a-1"))
            .expect("inserts");
        ApplicationRepository::insert(&store, application("app-4", "job-1", "a-2"))
            .expect("inserts");
    }

    #[test]
    fn one_bookmark_per_account_and_job() {
        let store = MemoryStore::default();
        let saved = SavedJob {
            id: SavedJobId("s-1".to_string()),
            account: AccountId("a-1".to_string()),
            job: JobId("job-1".to_string()),
            created_at: Utc::now(),
        };
        SavedJobRepository::insert(&store, saved.clone()).expect("inserts");
        let duplicate = SavedJob {
            id: SavedJobId("s-2".to_string()),
            ..saved
        };
        assert!(matches!(
            SavedJobRepository::insert(&store, duplicate),
            Err(RepositoryError::Conflict)
        ));
    }

    #[test]
    fn applications_counter_saturates_at_zero() {
        let store = MemoryStore::default();
        JobRepository::insert(&store, job("job-1")).expect("inserts");
        store
            .adjust_applications_count(&JobId("job-1".to_string()), -5)
            .expect("adjusts");
        store
            .adjust_applications_count(&JobId("job-1".to_string()), 2)
            .expect("adjusts");
        let stored = JobRepository::fetch(&store, &JobId("job-1".to_string()))
            .expect("fetches")
            .expect("present");
        assert_eq!(stored.applications_count, 2);

        assert!(matches!(
            store.adjust_applications_count(&JobId("job-missing".to_string()), 1),
            Err(RepositoryError::NotFound)
        ));
    }
}
