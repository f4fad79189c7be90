use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;

use crate::identity::domain::{AccountId, CurrentUser};
use crate::identity::repository::AccountRepository;
use crate::jobs::repository::JobRepository;
use crate::store::{Page, Pagination, RepositoryError};

use super::domain::{Company, CompanyId, CompanySize};
use super::repository::{CompanyFilter, CompanyRepository};

static COMPANY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_company_id() -> CompanyId {
    let id = COMPANY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CompanyId(format!("comp-{id:06}"))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDraft {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub website: String,
    pub location: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub company_size: CompanySize,
}

/// Partial update; absent fields are left untouched. Ownership and approval
/// are not updatable through this path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyUpdate {
    pub description: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<CompanySize>,
}

#[derive(Debug, Error)]
pub enum CompanyError {
    #[error("{0}")]
    Validation(String),
    #[error("Company with this name already exists")]
    DuplicateName,
    #[error("You already have a company registered")]
    AlreadyRegistered,
    #[error("Company not found")]
    NotFound,
    #[error("Not authorized to manage this company")]
    Forbidden,
    #[error("Company still has job postings")]
    JobsExist,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl CompanyError {
    pub fn status(&self) -> StatusCode {
        match self {
            CompanyError::Validation(_) => StatusCode::BAD_REQUEST,
            CompanyError::DuplicateName
            | CompanyError::AlreadyRegistered
            | CompanyError::JobsExist => StatusCode::CONFLICT,
            CompanyError::NotFound => StatusCode::NOT_FOUND,
            CompanyError::Forbidden => StatusCode::FORBIDDEN,
            CompanyError::Repository(err) => err.status(),
        }
    }
}

/// Employer organizations: one per recruiter, publicly listed only once an
/// admin approves them.
pub struct CompanyDirectoryService {
    companies: Arc<dyn CompanyRepository>,
    accounts: Arc<dyn AccountRepository>,
    jobs: Arc<dyn JobRepository>,
}

impl CompanyDirectoryService {
    pub fn new(
        companies: Arc<dyn CompanyRepository>,
        accounts: Arc<dyn AccountRepository>,
        jobs: Arc<dyn JobRepository>,
    ) -> Self {
        Self {
            companies,
            accounts,
            jobs,
        }
    }

    pub fn create(
        &self,
        caller: &CurrentUser,
        draft: CompanyDraft,
    ) -> Result<Company, CompanyError> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(CompanyError::Validation(
                "Please provide a company name".to_string(),
            ));
        }
        if draft.description.trim().is_empty() {
            return Err(CompanyError::Validation(
                "Please provide a company description".to_string(),
            ));
        }
        if draft.location.trim().is_empty() {
            return Err(CompanyError::Validation(
                "Please provide a company location".to_string(),
            ));
        }

        if self.companies.fetch_by_name(&name)?.is_some() {
            return Err(CompanyError::DuplicateName);
        }
        if self.companies.fetch_by_recruiter(&caller.id)?.is_some() {
            return Err(CompanyError::AlreadyRegistered);
        }

        let company = Company {
            id: next_company_id(),
            name,
            description: draft.description,
            website: draft.website,
            location: draft.location,
            logo: None,
            industry: draft.industry,
            company_size: draft.company_size,
            recruiter: caller.id.clone(),
            is_approved: false,
            created_at: Utc::now(),
        };

        // The store still enforces both uniqueness constraints; the checks
        // above only pick the message.
        let stored = self.companies.insert(company).map_err(|err| match err {
            RepositoryError::Conflict => CompanyError::DuplicateName,
            other => other.into(),
        })?;

        self.link_recruiter(&caller.id, Some(stored.id.clone()))?;
        Ok(stored)
    }

    pub fn get(&self, id: &CompanyId) -> Result<Company, CompanyError> {
        self.companies.fetch(id)?.ok_or(CompanyError::NotFound)
    }

    pub fn list_approved(&self) -> Result<Vec<Company>, CompanyError> {
        Ok(self.companies.list_approved()?)
    }

    pub fn my_company(&self, recruiter: &AccountId) -> Result<Company, CompanyError> {
        self.companies
            .fetch_by_recruiter(recruiter)?
            .ok_or(CompanyError::NotFound)
    }

    pub fn update(
        &self,
        caller: &CurrentUser,
        id: &CompanyId,
        update: CompanyUpdate,
    ) -> Result<Company, CompanyError> {
        let mut company = self.owned_company(caller, id)?;
        if let Some(description) = update.description {
            company.description = description;
        }
        if let Some(website) = update.website {
            company.website = website;
        }
        if let Some(location) = update.location {
            company.location = location;
        }
        if let Some(industry) = update.industry {
            company.industry = industry;
        }
        if let Some(size) = update.company_size {
            company.company_size = size;
        }
        self.companies.update(company.clone())?;
        Ok(company)
    }

    /// Deletion is refused while jobs still reference the company; recruiters
    /// remove or hand off their postings first.
    pub fn delete(&self, caller: &CurrentUser, id: &CompanyId) -> Result<(), CompanyError> {
        let company = self.owned_company(caller, id)?;
        if self.jobs.count_for_company(id)? > 0 {
            return Err(CompanyError::JobsExist);
        }
        self.companies.delete(id)?;
        self.link_recruiter(&company.recruiter, None)?;
        Ok(())
    }

    /// Admin-only; approving a company never auto-approves its jobs.
    pub fn set_approval(&self, id: &CompanyId, approved: bool) -> Result<Company, CompanyError> {
        let mut company = self.get(id)?;
        company.is_approved = approved;
        self.companies.update(company.clone())?;
        Ok(company)
    }

    pub fn set_logo(
        &self,
        caller: &CurrentUser,
        id: &CompanyId,
        url: String,
    ) -> Result<Company, CompanyError> {
        let mut company = self.owned_company(caller, id)?;
        company.logo = Some(url);
        self.companies.update(company.clone())?;
        Ok(company)
    }

    pub fn list(
        &self,
        filter: &CompanyFilter,
        page: Pagination,
    ) -> Result<Page<Company>, CompanyError> {
        Ok(self.companies.list(filter, page)?)
    }

    fn owned_company(
        &self,
        caller: &CurrentUser,
        id: &CompanyId,
    ) -> Result<Company, CompanyError> {
        let company = self.get(id)?;
        if !caller.can_manage(&company.recruiter) {
            return Err(CompanyError::Forbidden);
        }
        Ok(company)
    }

    fn link_recruiter(
        &self,
        recruiter: &AccountId,
        company: Option<CompanyId>,
    ) -> Result<(), CompanyError> {
        if let Some(mut account) = self.accounts.fetch(recruiter)? {
            if let Some(profile) = account.recruiter_profile_mut() {
                profile.company = company;
                self.accounts.update(account)?;
            }
        }
        Ok(())
    }
}
