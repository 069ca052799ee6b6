//! Contact-form notification component.
//!
//! One validation path (in `contract`), one template, one delivery seam.
//! Actual email transport is an external collaborator; the default delivery
//! here renders the message and hands it to the log.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Address contact submissions are delivered to.
pub const CONTACT_RECIPIENT: &str = "support@wellmind.example";

/// A contact-form submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

/// Outcome reported back to the submitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

/// Sends contact notifications. The single reusable sender for every
/// contact-form path.
#[derive(Debug, Clone, Default)]
pub struct ContactMailer;

impl ContactMailer {
    pub fn new() -> Self {
        Self
    }

    /// Deliver a validated contact message.
    pub async fn send(&self, request: &ContactRequest) -> Result<ContactResponse, AppError> {
        let body = render_body(request);

        tracing::info!(
            recipient = CONTACT_RECIPIENT,
            from = %request.email,
            subject = %request.subject,
            "Delivering contact notification"
        );
        tracing::debug!("Contact notification body:\n{}", body);

        Ok(ContactResponse {
            success: true,
            message: "Thank you for your message. We will get back to you shortly.".to_string(),
        })
    }
}

/// Render the plain-text notification body. The one template path.
fn render_body(request: &ContactRequest) -> String {
    let mut body = String::new();
    body.push_str("New contact form submission\n");
    body.push_str("===========================\n\n");
    body.push_str(&format!("Name: {}\n", request.name));
    body.push_str(&format!("Email: {}\n", request.email));
    if let Some(phone) = &request.phone {
        body.push_str(&format!("Phone: {}\n", phone));
    }
    body.push_str(&format!("Subject: {}\n\n", request.subject));
    body.push_str(&request.message);
    body.push('\n');
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ContactRequest {
        ContactRequest {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: Some("0700 000000".to_string()),
            subject: "Clinic hours".to_string(),
            message: "When are you open on weekends?".to_string(),
        }
    }

    #[test]
    fn test_render_body_includes_all_fields() {
        let body = render_body(&sample());
        assert!(body.contains("Jane Doe"));
        assert!(body.contains("jane@example.com"));
        assert!(body.contains("0700 000000"));
        assert!(body.contains("Clinic hours"));
        assert!(body.contains("weekends"));
    }

    #[test]
    fn test_render_body_omits_missing_phone() {
        let mut request = sample();
        request.phone = None;
        assert!(!render_body(&request).contains("Phone:"));
    }

    #[tokio::test]
    async fn test_send_reports_success() {
        let outcome = ContactMailer::new().send(&sample()).await.unwrap();
        assert!(outcome.success);
        assert!(!outcome.message.is_empty());
    }
}
