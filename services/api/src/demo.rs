//! Scripted walkthrough of the marketplace against an in-memory store:
//! registration, moderation, posting, applying, and the recruiter decision
//! flow, narrated on stdout.

use std::sync::Arc;

use chrono::{Duration, Utc};
use clap::Args;
use placewise::applications::domain::ApplicationStatus;
use placewise::applications::service::StatusUpdateRequest;
use placewise::companies::domain::CompanySize;
use placewise::companies::service::CompanyDraft;
use placewise::config::{AdminSeed, AppConfig};
use placewise::error::AppError;
use placewise::identity::domain::{Account, CurrentUser, ResumeRef, Role};
use placewise::identity::service::{ProfileUpdate, RegisterRequest};
use placewise::jobs::domain::{JobSearchQuery, JobType, SalaryPeriod, SalaryRange};
use placewise::jobs::service::JobDraft;
use placewise::notifications::{EmailError, EmailMessage, EmailSender};
use placewise::store::memory::MemoryStore;
use placewise::store::Pagination;

use crate::infra::{LocalFileStore, ServiceContext};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the notification emails the walkthrough generates
    #[arg(long)]
    pub(crate) show_emails: bool,
}

struct ConsoleMailer {
    verbose: bool,
}

impl EmailSender for ConsoleMailer {
    fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.verbose {
            println!("  [email] to={} subject={}", message.to, message.subject);
        }
        Ok(())
    }
}

fn caller(account: &Account) -> CurrentUser {
    CurrentUser {
        id: account.id.clone(),
        role: account.role(),
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let ctx = ServiceContext::build(
        Arc::new(MemoryStore::default()),
        Arc::new(ConsoleMailer {
            verbose: args.show_emails,
        }),
        Arc::new(LocalFileStore::new(&config.uploads)),
        &config,
    );

    println!("Placewise marketplace demo\n");

    let admin = ctx.identity.ensure_admin(&AdminSeed {
        name: "Root".to_string(),
        email: "root@placewise.dev".to_string(),
        password: "changeme1".to_string(),
    })?;
    println!("admin {} provisioned", admin.email);

    let recruiter = ctx.identity.register(RegisterRequest {
        name: "Rika".to_string(),
        email: "rika@initech.example".to_string(),
        password: "hunter22".to_string(),
        role: Role::Recruiter,
        phone: None,
    })?;
    let student = ctx.identity.register(RegisterRequest {
        name: "Amira".to_string(),
        email: "amira@example.com".to_string(),
        password: "hunter22".to_string(),
        role: Role::Student,
        phone: None,
    })?;
    println!("registered recruiter {} and student {}", recruiter.name, student.name);

    ctx.identity.update_profile(
        &student.id,
        ProfileUpdate {
            bio: Some("Final-year CS student".to_string()),
            skills: Some(vec!["Rust".to_string(), "SQL".to_string()]),
            ..ProfileUpdate::default()
        },
    )?;
    ctx.identity.set_resume(
        &student.id,
        ResumeRef {
            url: "/uploads/resumes/amira-cv.pdf".to_string(),
            original_name: "amira-cv.pdf".to_string(),
        },
    )?;
    println!("student profile filled in, resume on file");

    let company = ctx.companies.create(
        &caller(&recruiter),
        CompanyDraft {
            name: "Initech".to_string(),
            description: "Printing solutions at scale".to_string(),
            website: "https://initech.example".to_string(),
            location: "Austin, TX".to_string(),
            industry: "Software".to_string(),
            company_size: CompanySize::UpTo200,
        },
    )?;
    println!("company '{}' registered (approved: {})", company.name, company.is_approved);

    let company = ctx.companies.set_approval(&company.id, true)?;
    println!("admin approved company '{}'", company.name);

    let job = ctx.jobs.create(
        &caller(&recruiter),
        JobDraft {
            title: "Backend Intern".to_string(),
            description: "Help us harden the ingestion pipeline".to_string(),
            requirements: vec!["Curiosity".to_string()],
            responsibilities: vec!["Ship small features".to_string()],
            salary: SalaryRange {
                min: 2_000,
                max: 2_500,
            },
            salary_type: SalaryPeriod::Monthly,
            location: "Austin, TX".to_string(),
            job_type: JobType::Internship,
            experience_level: Default::default(),
            skills: vec!["Rust".to_string()],
            positions: 1,
            application_deadline: Utc::now() + Duration::days(21),
        },
    )?;
    println!("job '{}' posted (status: {})", job.title, job.status.label());

    let job = ctx.jobs.set_approval(&job.id, true)?;
    println!("admin approved job '{}' (status: {})", job.title, job.status.label());

    let results = ctx.jobs.search(
        &JobSearchQuery {
            search: Some("intern".to_string()),
            ..JobSearchQuery::default()
        },
        Pagination::default(),
    )?;
    println!("public search for 'intern' finds {} posting(s)", results.total);

    let recommended = ctx.jobs.recommended(&student.id)?;
    println!("{} recommendation(s) match the student's skills", recommended.len());

    let application = ctx
        .applications
        .apply(&caller(&student), &job.id, Some("I love printers.".to_string()))?;
    println!(
        "application {} submitted (status: {})",
        application.id.0,
        application.status.label()
    );

    ctx.saved_jobs.save(&student.id, &job.id)?;
    println!("student bookmarked the job (saved: {})", ctx.saved_jobs.is_saved(&student.id, &job.id)?);

    let application = ctx.applications.update_status(
        &caller(&recruiter),
        &application.id,
        StatusUpdateRequest {
            status: ApplicationStatus::Shortlisted,
            note: Some("Strong Rust background".to_string()),
        },
    )?;
    let application = ctx.applications.update_status(
        &caller(&recruiter),
        &application.id,
        StatusUpdateRequest {
            status: ApplicationStatus::Hired,
            note: None,
        },
    )?;
    println!(
        "recruiter moved the application through {} step(s), now '{}'",
        application.status_history.len(),
        application.status.label()
    );

    let stats = ctx.applications.stats(&recruiter.id)?;
    println!(
        "recruiter stats: total={} pending={} hired={}",
        stats.total, stats.pending, stats.hired
    );

    let dashboard = ctx.admin.dashboard_stats()?;
    println!(
        "admin dashboard: {} user(s), {} job(s), {} application(s)",
        dashboard.overview.total_users,
        dashboard.overview.total_jobs,
        dashboard.overview.total_applications
    );

    println!("\ndemo complete");
    Ok(())
}
