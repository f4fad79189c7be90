//! Admin moderation: aggregate dashboards and paginated listings, with
//! mutations delegated to the owning components' admin-privileged
//! operations.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{DashboardOverview, DashboardStats, StatusBreakdown, TypeBreakdown};
pub use router::{admin_router, AdminRouterState};
pub use service::AdminService;
