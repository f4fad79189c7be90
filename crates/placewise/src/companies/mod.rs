//! Company directory: employer organizations owned by a single recruiter,
//! gated behind admin approval before their jobs can go public.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Company, CompanyId, CompanySize};
pub use repository::{CompanyFilter, CompanyRepository};
pub use router::{company_router, CompanyRouterState};
pub use service::{CompanyDirectoryService, CompanyDraft, CompanyError, CompanyUpdate};
