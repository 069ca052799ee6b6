//! API contract module.
//!
//! A single declarative table mapping each logical operation to its HTTP
//! method, URL template and success status, plus the input validators.
//! The server registers routes from this table and the client hooks build
//! requests from it, so both sides agree on shapes by construction; the
//! response bodies are the shared `models` types themselves.

use axum::http::{Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::errors::AppError;
use crate::models::{ChatRequest, CreateConcernRequest, RespondRequest};
use crate::notify::ContactRequest;

/// One logical API operation.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub method: Method,
    /// URL template with `:param` placeholders, e.g. `/api/concerns/:id`.
    pub path: &'static str,
    pub success: StatusCode,
}

pub const LIST_CONCERNS: Endpoint = Endpoint {
    method: Method::GET,
    path: "/api/concerns",
    success: StatusCode::OK,
};

pub const GET_CONCERN: Endpoint = Endpoint {
    method: Method::GET,
    path: "/api/concerns/:id",
    success: StatusCode::OK,
};

pub const CREATE_CONCERN: Endpoint = Endpoint {
    method: Method::POST,
    path: "/api/concerns",
    success: StatusCode::CREATED,
};

pub const RESPOND_CONCERN: Endpoint = Endpoint {
    method: Method::PATCH,
    path: "/api/concerns/:id/respond",
    success: StatusCode::OK,
};

pub const UPVOTE_CONCERN: Endpoint = Endpoint {
    method: Method::POST,
    path: "/api/concerns/:id/upvote",
    success: StatusCode::OK,
};

pub const SEND_CHAT: Endpoint = Endpoint {
    method: Method::POST,
    path: "/api/chat",
    success: StatusCode::OK,
};

pub const CHAT_HISTORY: Endpoint = Endpoint {
    method: Method::GET,
    path: "/api/chat/history",
    success: StatusCode::OK,
};

pub const LIST_CATEGORIES: Endpoint = Endpoint {
    method: Method::GET,
    path: "/api/categories",
    success: StatusCode::OK,
};

pub const SEND_CONTACT: Endpoint = Endpoint {
    method: Method::POST,
    path: "/api/contact",
    success: StatusCode::OK,
};

impl Endpoint {
    /// Substitute `:param` placeholders with literal values.
    ///
    /// `build_url(&[("id", "7")])` on `/api/concerns/:id` yields
    /// `/api/concerns/7`.
    pub fn build_url(&self, params: &[(&str, &str)]) -> String {
        let mut url = self.path.to_string();
        for (key, value) in params {
            url = url.replace(&format!(":{}", key), value);
        }
        url
    }

    /// The same template in axum's `{param}` route syntax.
    pub fn axum_path(&self) -> String {
        self.path
            .split('/')
            .map(|segment| match segment.strip_prefix(':') {
                Some(param) => format!("{{{}}}", param),
                None => segment.to_string(),
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// The template relative to the `/api` prefix the router nests under.
    pub fn nested_axum_path(&self) -> String {
        self.axum_path()
            .strip_prefix("/api")
            .expect("contract paths live under /api")
            .to_string()
    }
}

/// Deserialize a request body, mapping shape errors to a validation error.
pub fn parse_input<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, AppError> {
    serde_json::from_value(value)
        .map_err(|e| AppError::validation(format!("Invalid request body: {}", e)))
}

/// Validate a create-concern payload. Category membership in the fixed set
/// is enforced by the `Category` type at deserialization.
pub fn validate_create_concern(request: &CreateConcernRequest) -> Result<(), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::invalid_field("title", "Title is required"));
    }
    if request.content.trim().is_empty() {
        return Err(AppError::invalid_field("content", "Content is required"));
    }
    Ok(())
}

/// Validate a staff-response payload.
pub fn validate_respond(request: &RespondRequest) -> Result<(), AppError> {
    if request.response.trim().is_empty() {
        return Err(AppError::invalid_field("response", "Response is required"));
    }
    Ok(())
}

/// Validate a chat payload.
pub fn validate_chat(request: &ChatRequest) -> Result<(), AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::invalid_field(
            "message",
            "Message cannot be empty",
        ));
    }
    Ok(())
}

/// Validate a contact-form payload. Single validation path shared by the
/// API handler and the client hook.
pub fn validate_contact(request: &ContactRequest) -> Result<(), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::invalid_field("name", "Name is required"));
    }
    if request.email.trim().is_empty() {
        return Err(AppError::invalid_field("email", "Email is required"));
    }
    if !request.email.contains('@') || request.email.trim().len() < 3 {
        return Err(AppError::invalid_field("email", "Email is not valid"));
    }
    if request.subject.trim().is_empty() {
        return Err(AppError::invalid_field("subject", "Subject is required"));
    }
    if request.message.trim().is_empty() {
        return Err(AppError::invalid_field("message", "Message is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn test_build_url_substitutes_params() {
        assert_eq!(
            GET_CONCERN.build_url(&[("id", "7")]),
            "/api/concerns/7"
        );
        assert_eq!(
            UPVOTE_CONCERN.build_url(&[("id", "42")]),
            "/api/concerns/42/upvote"
        );
    }

    #[test]
    fn test_build_url_without_params() {
        assert_eq!(LIST_CONCERNS.build_url(&[]), "/api/concerns");
    }

    #[test]
    fn test_axum_path_conversion() {
        assert_eq!(GET_CONCERN.axum_path(), "/api/concerns/{id}");
        assert_eq!(RESPOND_CONCERN.nested_axum_path(), "/concerns/{id}/respond");
        assert_eq!(LIST_CONCERNS.nested_axum_path(), "/concerns");
    }

    #[test]
    fn test_validate_create_concern_rejects_empty_title() {
        let request = CreateConcernRequest {
            title: "  ".to_string(),
            content: "body".to_string(),
            category: Category::Nutrition,
            author_id: None,
        };
        let err = validate_create_concern(&request).unwrap_err();
        match err {
            AppError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("title")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_input_rejects_unknown_category() {
        let value = serde_json::json!({
            "title": "t", "content": "c", "category": "Astrology"
        });
        let result: Result<CreateConcernRequest, _> = parse_input(value);
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_validate_chat_rejects_empty_message() {
        let request = ChatRequest {
            message: "".to_string(),
            user_id: None,
        };
        assert!(validate_chat(&request).is_err());
    }

    #[test]
    fn test_validate_contact_email_shape() {
        let mut request = ContactRequest {
            name: "Jane".to_string(),
            email: "not-an-email".to_string(),
            phone: None,
            subject: "Hello".to_string(),
            message: "Hi there".to_string(),
        };
        assert!(validate_contact(&request).is_err());
        request.email = "jane@example.com".to_string();
        assert!(validate_contact(&request).is_ok());
    }
}
