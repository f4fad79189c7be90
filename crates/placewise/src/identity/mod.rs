//! Identity & access: accounts, roles, credentials, and the session-token
//! checks every other component leans on.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

mod password;
mod token;

#[cfg(test)]
mod tests;

pub use domain::{
    Account, AccountId, CurrentUser, Education, Experience, RecruiterProfile, ResumeRef, Role,
    RoleProfile, StudentProfile,
};
pub use repository::{AccountFilter, AccountRepository};
pub use router::{auth_router, profile_router, IdentityRouterState};
pub use service::{IdentityError, IdentityService, LoginRequest, ProfileUpdate, RegisterRequest};
