//! Core library for the Placewise job-placement marketplace.
//!
//! Students maintain a talent profile and apply to postings, recruiters
//! register a company and publish jobs, and admins moderate both before they
//! become publicly visible. Each component keeps its domain model, repository
//! trait, service, and HTTP router together; persistence, file storage, and
//! outbound email are collaborators reached through the traits in [`store`],
//! [`storage`], and [`notifications`].

pub mod admin;
pub mod applications;
pub mod companies;
pub mod config;
pub mod error;
pub mod http;
pub mod identity;
pub mod jobs;
pub mod notifications;
pub mod saved_jobs;
pub mod storage;
pub mod store;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod testutil;
