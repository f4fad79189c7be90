//! Outbound email collaborator. Delivery is strictly best-effort: the
//! [`Notifier`] logs failures and never surfaces them, so a broken mail
//! transport cannot fail an application submission or a status change.

pub mod templates;

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::applications::domain::ApplicationStatus;

/// Payload handed to the transport: recipient, subject, HTML body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email transport unavailable: {0}")]
    Transport(String),
}

/// Trait describing the outbound mail hook (SMTP relay, provider API, or a
/// queue the API binary drains in the background).
pub trait EmailSender: Send + Sync {
    fn send(&self, message: EmailMessage) -> Result<(), EmailError>;
}

/// Renders notification templates and dispatches them without propagating
/// transport errors.
#[derive(Clone)]
pub struct Notifier {
    sender: Arc<dyn EmailSender>,
}

impl Notifier {
    pub fn new(sender: Arc<dyn EmailSender>) -> Self {
        Self { sender }
    }

    pub fn application_received(
        &self,
        recipient: &str,
        applicant_name: &str,
        job_title: &str,
        company_name: &str,
    ) {
        let (subject, html) = templates::application_received(applicant_name, job_title, company_name);
        self.dispatch(EmailMessage {
            to: recipient.to_string(),
            subject,
            html,
        });
    }

    pub fn application_status_changed(
        &self,
        recipient: &str,
        applicant_name: &str,
        job_title: &str,
        company_name: &str,
        status: ApplicationStatus,
    ) {
        let (subject, html) =
            templates::application_status_update(applicant_name, job_title, company_name, status);
        self.dispatch(EmailMessage {
            to: recipient.to_string(),
            subject,
            html,
        });
    }

    fn dispatch(&self, message: EmailMessage) {
        if let Err(err) = self.sender.send(message) {
            warn!(error = %err, "email delivery failed");
        }
    }
}
