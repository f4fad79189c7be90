//! Application lifecycle: the state machine, audit trail, and authorization
//! model that governs a student's application from submission to decision.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{Application, ApplicationId, ApplicationStatus, StatusChange};
pub use repository::ApplicationRepository;
pub use router::{application_router, ApplicationRouterState};
pub use service::{
    ApplicationError, ApplicationLifecycleService, ApplicationStats, StatusUpdateRequest,
};
