//! Fixtures shared by the unit-test modules: a fully wired service stack
//! over one in-memory store, plus recording/failing mail transports.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};

use crate::admin::service::AdminService;
use crate::applications::service::ApplicationLifecycleService;
use crate::companies::domain::Company;
use crate::companies::service::{CompanyDirectoryService, CompanyDraft};
use crate::config::AuthConfig;
use crate::identity::domain::{Account, CurrentUser, ResumeRef, Role};
use crate::identity::service::{IdentityService, RegisterRequest};
use crate::jobs::domain::{Job, JobType};
use crate::jobs::service::{JobCatalogService, JobDraft};
use crate::notifications::{EmailError, EmailMessage, EmailSender, Notifier};
use crate::saved_jobs::service::SavedJobService;
use crate::store::memory::MemoryStore;

static EMAIL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Unique address per call so email-uniqueness never couples tests.
pub(crate) fn unique_email(prefix: &str) -> String {
    let id = EMAIL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}@example.com")
}

#[derive(Default)]
pub(crate) struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingMailer {
    pub(crate) fn messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

impl EmailSender for RecordingMailer {
    fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push(message);
        Ok(())
    }
}

pub(crate) struct FailingMailer;

impl EmailSender for FailingMailer {
    fn send(&self, _message: EmailMessage) -> Result<(), EmailError> {
        Err(EmailError::Transport("smtp offline".to_string()))
    }
}

/// File store that never touches a disk.
pub(crate) struct MemoryFileStore;

impl crate::storage::FileStore for MemoryFileStore {
    fn put(
        &self,
        kind: crate::storage::UploadKind,
        filename: &str,
        contents: &[u8],
    ) -> Result<crate::storage::StoredFile, crate::storage::StorageError> {
        if contents.is_empty() {
            return Err(crate::storage::StorageError::EmptyUpload);
        }
        Ok(crate::storage::StoredFile {
            url: format!("/uploads/{}/{filename}", kind.folder()),
            original_name: filename.to_string(),
        })
    }
}

pub(crate) struct TestWorld {
    pub(crate) store: Arc<MemoryStore>,
    pub(crate) identity: Arc<IdentityService>,
    pub(crate) companies: Arc<CompanyDirectoryService>,
    pub(crate) jobs: Arc<JobCatalogService>,
    pub(crate) applications: Arc<ApplicationLifecycleService>,
    pub(crate) saved_jobs: Arc<SavedJobService>,
    pub(crate) admin: Arc<AdminService>,
    pub(crate) mailer: Arc<RecordingMailer>,
}

impl TestWorld {
    pub(crate) fn new() -> Self {
        let mailer = Arc::new(RecordingMailer::default());
        Self::with_sender(mailer.clone(), mailer)
    }

    /// Mail transport that always errors; the recorder stays empty.
    pub(crate) fn with_failing_mailer() -> Self {
        Self::with_sender(
            Arc::new(FailingMailer),
            Arc::new(RecordingMailer::default()),
        )
    }

    fn with_sender(sender: Arc<dyn EmailSender>, mailer: Arc<RecordingMailer>) -> Self {
        let store = Arc::new(MemoryStore::default());

        let identity = Arc::new(IdentityService::new(
            store.clone(),
            &AuthConfig {
                jwt_secret: "test-secret".to_string(),
                token_ttl_hours: 2,
            },
        ));
        let companies = Arc::new(CompanyDirectoryService::new(
            store.clone(),
            store.clone(),
            store.clone(),
        ));
        let jobs = Arc::new(JobCatalogService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
        ));
        let applications = Arc::new(ApplicationLifecycleService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            Notifier::new(sender),
        ));
        let saved_jobs = Arc::new(SavedJobService::new(store.clone(), store.clone()));
        let admin = Arc::new(AdminService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
        ));

        Self {
            store,
            identity,
            companies,
            jobs,
            applications,
            saved_jobs,
            admin,
            mailer,
        }
    }

    pub(crate) fn student(&self, name: &str) -> Account {
        self.identity
            .register(RegisterRequest {
                name: name.to_string(),
                email: unique_email("student"),
                password: "hunter22".to_string(),
                role: Role::Student,
                phone: None,
            })
            .expect("student registers")
    }

    pub(crate) fn student_with_resume(&self, name: &str) -> Account {
        let account = self.student(name);
        self.identity
            .set_resume(
                &account.id,
                ResumeRef {
                    url: format!("/uploads/resumes/{}.pdf", account.id.0),
                    original_name: "resume.pdf".to_string(),
                },
            )
            .expect("resume set")
    }

    pub(crate) fn recruiter(&self, name: &str) -> Account {
        self.identity
            .register(RegisterRequest {
                name: name.to_string(),
                email: unique_email("recruiter"),
                password: "hunter22".to_string(),
                role: Role::Recruiter,
                phone: None,
            })
            .expect("recruiter registers")
    }

    pub(crate) fn admin_account(&self) -> Account {
        self.identity
            .ensure_admin(&crate::config::AdminSeed {
                name: "Root".to_string(),
                email: unique_email("admin"),
                password: "changeme1".to_string(),
            })
            .expect("admin provisions")
    }

    pub(crate) fn caller(&self, account: &Account) -> CurrentUser {
        CurrentUser {
            id: account.id.clone(),
            role: account.role(),
        }
    }

    /// Recruiter's company, created and admin-approved.
    pub(crate) fn approved_company(&self, recruiter: &Account) -> Company {
        let company = self
            .companies
            .create(&self.caller(recruiter), company_draft(&recruiter.name))
            .expect("company creates");
        self.companies
            .set_approval(&company.id, true)
            .expect("company approves")
    }

    /// Read a posting straight from the store, bypassing the view-counting
    /// service path.
    pub(crate) fn stored_job(&self, id: &crate::jobs::domain::JobId) -> Job {
        crate::jobs::repository::JobRepository::fetch(self.store.as_ref(), id)
            .expect("store readable")
            .expect("job present")
    }

    /// Approved, active job owned by the recruiter.
    pub(crate) fn live_job(&self, recruiter: &Account) -> Job {
        let job = self
            .jobs
            .create(&self.caller(recruiter), job_draft())
            .expect("job creates");
        self.jobs.set_approval(&job.id, true).expect("job approves")
    }
}

pub(crate) fn company_draft(owner: &str) -> CompanyDraft {
    CompanyDraft {
        name: format!("{owner} GmbH"),
        description: "We build data plumbing".to_string(),
        website: "https://example.com".to_string(),
        location: "Berlin, Germany".to_string(),
        industry: "Software".to_string(),
        company_size: Default::default(),
    }
}

pub(crate) fn job_draft() -> JobDraft {
    JobDraft {
        title: "Backend Engineer".to_string(),
        description: "Own the ingestion pipeline".to_string(),
        requirements: vec!["Rust".to_string()],
        responsibilities: vec!["Ship features".to_string()],
        salary: crate::jobs::domain::SalaryRange {
            min: 60_000,
            max: 90_000,
        },
        salary_type: Default::default(),
        location: "Berlin, Germany".to_string(),
        job_type: JobType::FullTime,
        experience_level: Default::default(),
        skills: vec!["Rust".to_string(), "PostgreSQL".to_string()],
        positions: 2,
        application_deadline: Utc::now() + Duration::days(30),
    }
}
