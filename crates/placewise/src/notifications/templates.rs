//! HTML bodies for the two applicant-facing notifications.

use crate::applications::domain::ApplicationStatus;

fn wrap(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\
         <html><body style=\"font-family: Arial, sans-serif; color: #333;\">\
         <div style=\"max-width: 600px; margin: 0 auto; padding: 20px;\">\
         <h1 style=\"background-color: #4F46E5; color: white; padding: 20px; text-align: center;\">{title}</h1>\
         <div style=\"padding: 20px; background-color: #f9f9f9;\">{body}</div>\
         <p style=\"text-align: center; color: #666; font-size: 12px;\">\u{a9} Placewise. All rights reserved.</p>\
         </div></body></html>"
    )
}

pub fn application_received(
    applicant_name: &str,
    job_title: &str,
    company_name: &str,
) -> (String, String) {
    let body = format!(
        "<p>Dear {applicant_name},</p>\
         <p>Thank you for applying for the position of <strong>{job_title}</strong> at \
         <strong>{company_name}</strong>.</p>\
         <p>Your application has been received and is currently under review. We will \
         contact you soon regarding the next steps.</p>\
         <p>Best regards,<br>{company_name} Recruitment Team</p>"
    );
    ("Application Received".to_string(), wrap("Application Received", &body))
}

pub fn application_status_update(
    applicant_name: &str,
    job_title: &str,
    company_name: &str,
    status: ApplicationStatus,
) -> (String, String) {
    let label = status.label();
    let body = format!(
        "<p>Dear {applicant_name},</p>\
         <p>We have an update regarding your application for <strong>{job_title}</strong> at \
         <strong>{company_name}</strong>.</p>\
         <p style=\"text-align: center; font-weight: bold;\">Status: {label}</p>\
         <p>Best regards,<br>{company_name} Recruitment Team</p>"
    );
    (
        "Application Status Update".to_string(),
        wrap("Application Status Update", &body),
    )
}
