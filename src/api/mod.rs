use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Wrapper for API responses that adds the uniform success envelope:
/// `{ success, data?, message?, meta?, links?, count? }`.
///
/// List responses carry a `count` of returned items; proxied provider
/// responses pass `meta` and `links` through unchanged.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    data: Option<T>,
    message: Option<String>,
    meta: Option<Value>,
    links: Option<Value>,
    count: Option<usize>,
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            message: None,
            meta: None,
            links: None,
            count: None,
            status: StatusCode::OK,
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::success(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_meta(mut self, meta: impl Serialize) -> Self {
        self.meta = serde_json::to_value(meta).ok().filter(|v| !v.is_null());
        self
    }

    pub fn with_links(mut self, links: impl Serialize) -> Self {
        self.links = serde_json::to_value(links).ok().filter(|v| !v.is_null());
        self
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        let mut envelope = Map::new();
        envelope.insert("success".to_string(), Value::Bool(true));
        if let Some(data) = &self.data {
            envelope.insert("data".to_string(), serde_json::to_value(data)?);
        }
        if let Some(message) = &self.message {
            envelope.insert("message".to_string(), Value::String(message.clone()));
        }
        if let Some(meta) = &self.meta {
            envelope.insert("meta".to_string(), meta.clone());
        }
        if let Some(links) = &self.links {
            envelope.insert("links".to_string(), links.clone());
        }
        if let Some(count) = self.count {
            envelope.insert("count".to_string(), Value::from(count));
        }
        Ok(Value::Object(envelope))
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// Create a list response; `count` reports the number of returned items.
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            count: Some(count),
            ..Self::success(items)
        }
    }
}

impl ApiResponse<()> {
    /// A success envelope carrying only a message (mutation confirmations).
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: Some(message.into()),
            meta: None,
            links: None,
            count: None,
            status: StatusCode::OK,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self.to_value() {
            Ok(envelope) => (self.status, Json(envelope)).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Failed to serialize response data"
                    })),
                )
                    .into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let value = ApiResponse::success(json!({"id": 1})).to_value().unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["data"]["id"], json!(1));
        assert!(value.get("count").is_none());
    }

    #[test]
    fn list_envelope_reports_count() {
        let value = ApiResponse::list(vec![1, 2, 3]).to_value().unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["count"], json!(3));
        assert_eq!(value["data"], json!([1, 2, 3]));
    }

    #[test]
    fn message_only_envelope_omits_data() {
        let value = ApiResponse::message("Address updated successfully")
            .to_value()
            .unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["message"], json!("Address updated successfully"));
        assert!(value.get("data").is_none());
    }

    #[test]
    fn meta_and_links_pass_through() {
        let value = ApiResponse::list(vec![json!({"id": 7})])
            .with_meta(json!({"total": 120}))
            .with_links(json!({"next": "/api/plants?page=2"}))
            .to_value()
            .unwrap();
        assert_eq!(value["meta"]["total"], json!(120));
        assert_eq!(value["links"]["next"], json!("/api/plants?page=2"));
    }
}
