//! Response envelope and small HTTP helpers shared by every router.

use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::store::{Page, Pagination};

/// The JSON envelope every endpoint answers with:
/// `{ success, data?, message?, count?, total?, totalPages?, currentPage? }`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(rename = "totalPages", skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    #[serde(rename = "currentPage", skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
}

impl ApiEnvelope {
    fn base() -> Self {
        Self {
            success: true,
            message: None,
            data: None,
            count: None,
            total: None,
            total_pages: None,
            current_page: None,
        }
    }

    pub fn data(value: impl Serialize) -> Self {
        Self {
            data: Some(to_json(value)),
            ..Self::base()
        }
    }

    pub fn message(text: impl Into<String>) -> Self {
        Self {
            message: Some(text.into()),
            ..Self::base()
        }
    }

    pub fn with_message(mut self, text: impl Into<String>) -> Self {
        self.message = Some(text.into());
        self
    }

    /// Unpaginated listing: `data` plus `count`.
    pub fn listing<T: Serialize>(items: Vec<T>) -> Self {
        Self {
            count: Some(items.len()),
            data: Some(to_json(items)),
            ..Self::base()
        }
    }

    /// Paginated listing: `data`, `count`, `total`, `totalPages`, `currentPage`.
    pub fn page<T: Serialize>(page: Page<T>, window: Pagination) -> Self {
        Self {
            count: Some(page.items.len()),
            total: Some(page.total),
            total_pages: Some(window.total_pages(page.total)),
            current_page: Some(window.page),
            data: Some(to_json(page.items)),
            ..Self::base()
        }
    }
}

impl IntoResponse for ApiEnvelope {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

fn to_json(value: impl Serialize) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn envelope_serializes_page_metadata() {
        let page = Page {
            items: vec!["a", "b"],
            total: 12,
        };
        let envelope = ApiEnvelope::page(page, Pagination::new(Some(2), Some(2)));
        let value = serde_json::to_value(envelope).expect("serializes");
        assert_eq!(value["success"], true);
        assert_eq!(value["count"], 2);
        assert_eq!(value["total"], 12);
        assert_eq!(value["totalPages"], 6);
        assert_eq!(value["currentPage"], 2);
        assert!(value.get("message").is_none());
    }

    #[test]
    fn bearer_token_requires_scheme() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("abc"));
        assert!(bearer_token(&headers).is_none());
    }
}
