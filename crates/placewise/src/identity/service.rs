use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;

use crate::config::{AdminSeed, AuthConfig};
use crate::http::bearer_token;
use crate::store::{Page, Pagination, RepositoryError};

use super::domain::{
    Account, AccountId, CurrentUser, Education, Experience, RecruiterProfile, ResumeRef, Role,
    RoleProfile, StudentProfile,
};
use super::password;
use super::repository::{AccountFilter, AccountRepository};
use super::token::TokenKeys;

static ACCOUNT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_account_id() -> AccountId {
    let id = ACCOUNT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AccountId(format!("acct-{id:06}"))
}

/// Registration payload. Deliberately not `Debug`: it carries a plaintext
/// password.
#[derive(Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Partial update of the student profile; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub education: Option<Vec<Education>>,
    pub experience: Option<Vec<Experience>>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("{0}")]
    Validation(String),
    #[error("An account with this email already exists")]
    DuplicateEmail,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Not authenticated")]
    MissingToken,
    #[error("Session is invalid or has expired")]
    InvalidToken,
    #[error("This account has been deactivated")]
    AccountDisabled,
    #[error("unable to issue session token")]
    TokenIssue,
    #[error("unable to hash credentials")]
    HashFailure,
    #[error("User not found")]
    NotFound,
    #[error("You are not allowed to perform this action")]
    Forbidden,
    #[error("Only student accounts keep a talent profile")]
    NotAStudent,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl IdentityError {
    pub fn status(&self) -> StatusCode {
        match self {
            IdentityError::Validation(_) | IdentityError::NotAStudent => StatusCode::BAD_REQUEST,
            IdentityError::DuplicateEmail => StatusCode::CONFLICT,
            IdentityError::InvalidCredentials
            | IdentityError::MissingToken
            | IdentityError::InvalidToken
            | IdentityError::AccountDisabled => StatusCode::UNAUTHORIZED,
            IdentityError::TokenIssue | IdentityError::HashFailure => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            IdentityError::NotFound => StatusCode::NOT_FOUND,
            IdentityError::Forbidden => StatusCode::FORBIDDEN,
            IdentityError::Repository(err) => err.status(),
        }
    }
}

/// Accounts, credentials, and the request-authorization checks used by every
/// other component.
pub struct IdentityService {
    accounts: Arc<dyn AccountRepository>,
    tokens: TokenKeys,
}

impl IdentityService {
    pub fn new(accounts: Arc<dyn AccountRepository>, config: &AuthConfig) -> Self {
        Self {
            accounts,
            tokens: TokenKeys::new(config),
        }
    }

    /// Create an account with a salted Argon2 hash. Admin accounts are
    /// provisioned out of band, never self-registered.
    pub fn register(&self, request: RegisterRequest) -> Result<Account, IdentityError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(IdentityError::Validation("Please provide a name".to_string()));
        }

        let email = request.email.trim().to_ascii_lowercase();
        if !valid_email(&email) {
            return Err(IdentityError::Validation(
                "Please provide a valid email".to_string(),
            ));
        }

        if request.password.len() < 6 {
            return Err(IdentityError::Validation(
                "Password must be at least 6 characters".to_string(),
            ));
        }

        let profile = match request.role {
            Role::Student => RoleProfile::Student(StudentProfile::default()),
            Role::Recruiter => RoleProfile::Recruiter(RecruiterProfile::default()),
            Role::Admin => {
                return Err(IdentityError::Validation(
                    "Admin accounts cannot be registered".to_string(),
                ))
            }
        };

        let password_hash =
            password::hash(&request.password).map_err(|_| IdentityError::HashFailure)?;

        let account = Account {
            id: next_account_id(),
            name,
            email,
            password_hash,
            phone: request.phone.unwrap_or_default(),
            is_active: true,
            is_verified: false,
            profile,
            created_at: Utc::now(),
        };

        self.accounts.insert(account).map_err(|err| match err {
            RepositoryError::Conflict => IdentityError::DuplicateEmail,
            other => other.into(),
        })
    }

    /// Verify credentials and issue a session token.
    pub fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(Account, String), IdentityError> {
        let email = email.trim().to_ascii_lowercase();
        let account = self
            .accounts
            .fetch_by_email(&email)?
            .ok_or(IdentityError::InvalidCredentials)?;

        if !password::verify(password, &account.password_hash) || !account.is_active {
            return Err(IdentityError::InvalidCredentials);
        }

        let token = self.tokens.issue(&account.id, account.role())?;
        Ok((account, token))
    }

    /// Authenticate the request and, when `allowed` is non-empty, require one
    /// of the listed roles. The account is re-fetched so deactivation revokes
    /// outstanding tokens immediately.
    pub fn authorize(
        &self,
        headers: &HeaderMap,
        allowed: &[Role],
    ) -> Result<CurrentUser, IdentityError> {
        let token = bearer_token(headers).ok_or(IdentityError::MissingToken)?;
        let claims = self.tokens.verify(token)?;

        let account = self
            .accounts
            .fetch(&claims.account)?
            .ok_or(IdentityError::InvalidToken)?;
        if !account.is_active {
            return Err(IdentityError::AccountDisabled);
        }

        let role = account.role();
        if role != claims.role {
            return Err(IdentityError::InvalidToken);
        }
        if !allowed.is_empty() && !allowed.contains(&role) {
            return Err(IdentityError::Forbidden);
        }

        Ok(CurrentUser {
            id: account.id,
            role,
        })
    }

    pub fn account(&self, id: &AccountId) -> Result<Account, IdentityError> {
        self.accounts.fetch(id)?.ok_or(IdentityError::NotFound)
    }

    pub fn update_profile(
        &self,
        id: &AccountId,
        update: ProfileUpdate,
    ) -> Result<Account, IdentityError> {
        let mut account = self.account(id)?;
        {
            let profile = account
                .student_profile_mut()
                .ok_or(IdentityError::NotAStudent)?;
            if let Some(bio) = update.bio {
                profile.bio = bio;
            }
            if let Some(skills) = update.skills {
                profile.skills = skills;
            }
            if let Some(education) = update.education {
                profile.education = education;
            }
            if let Some(experience) = update.experience {
                profile.experience = experience;
            }
            if let Some(github) = update.github {
                profile.github = Some(github);
            }
            if let Some(linkedin) = update.linkedin {
                profile.linkedin = Some(linkedin);
            }
            if let Some(portfolio) = update.portfolio {
                profile.portfolio = Some(portfolio);
            }
        }
        self.accounts.update(account.clone())?;
        Ok(account)
    }

    pub fn set_resume(&self, id: &AccountId, resume: ResumeRef) -> Result<Account, IdentityError> {
        let mut account = self.account(id)?;
        account
            .student_profile_mut()
            .ok_or(IdentityError::NotAStudent)?
            .resume = Some(resume);
        self.accounts.update(account.clone())?;
        Ok(account)
    }

    pub fn set_profile_image(&self, id: &AccountId, url: String) -> Result<Account, IdentityError> {
        let mut account = self.account(id)?;
        account
            .student_profile_mut()
            .ok_or(IdentityError::NotAStudent)?
            .profile_image = Some(url);
        self.accounts.update(account.clone())?;
        Ok(account)
    }

    /// Admin moderation: flip the active flag (soft enable/disable).
    pub fn toggle_active(&self, id: &AccountId) -> Result<Account, IdentityError> {
        let mut account = self.account(id)?;
        account.is_active = !account.is_active;
        self.accounts.update(account.clone())?;
        Ok(account)
    }

    /// Admin moderation: hard-delete an account.
    pub fn delete_account(&self, id: &AccountId) -> Result<(), IdentityError> {
        self.accounts.delete(id).map_err(|err| match err {
            RepositoryError::NotFound => IdentityError::NotFound,
            other => other.into(),
        })
    }

    pub fn list_accounts(
        &self,
        filter: &AccountFilter,
        page: Pagination,
    ) -> Result<Page<Account>, IdentityError> {
        Ok(self.accounts.list(filter, page)?)
    }

    /// Provision the configured admin account if it does not exist yet.
    pub fn ensure_admin(&self, seed: &AdminSeed) -> Result<Account, IdentityError> {
        let email = seed.email.trim().to_ascii_lowercase();
        if let Some(existing) = self.accounts.fetch_by_email(&email)? {
            return Ok(existing);
        }

        let password_hash =
            password::hash(&seed.password).map_err(|_| IdentityError::HashFailure)?;
        let account = Account {
            id: next_account_id(),
            name: seed.name.clone(),
            email,
            password_hash,
            phone: String::new(),
            is_active: true,
            is_verified: true,
            profile: RoleProfile::Admin,
            created_at: Utc::now(),
        };
        self.accounts.insert(account).map_err(|err| match err {
            RepositoryError::Conflict => IdentityError::DuplicateEmail,
            other => other.into(),
        })
    }
}

fn valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_check() {
        assert!(valid_email("amira@example.com"));
        assert!(valid_email("a.b-c@sub.example.co"));
        assert!(!valid_email("amira"));
        assert!(!valid_email("@example.com"));
        assert!(!valid_email("amira@example"));
        assert!(!valid_email("amira@.com"));
        assert!(!valid_email("amira @example.com"));
    }
}
