// models.rs
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult, ErrorBody};

pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, X-User-Id, X-Auth-Token";

/// Serverless HTTP event as delivered by the function gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    #[serde(default, alias = "method")]
    pub http_method: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
}

impl ApiRequest {
    /// An absent method means GET. A blank or malformed one is `None` and
    /// never matches a route.
    pub fn method(&self) -> Option<Method> {
        match self.http_method.as_deref() {
            None => Some(Method::GET),
            Some(raw) => Method::from_bytes(raw.trim().to_ascii_uppercase().as_bytes()).ok(),
        }
    }

    /// The `path` query parameter wins over the event path.
    pub fn route_path(&self) -> &str {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get("path"))
            .map(String::as_str)
            .filter(|p| !p.is_empty())
            .or(self.path.as_deref())
            .unwrap_or("")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.as_ref().and_then(|headers| {
            headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: String) -> Self {
        Self {
            status_code: status.as_u16(),
            headers: default_headers(),
            body,
            is_base64_encoded: false,
        }
    }

    pub fn preflight() -> Self {
        Self::new(StatusCode::OK, String::new())
    }

    pub fn json<T: Serialize>(status: StatusCode, payload: &T) -> AppResult<Self> {
        Ok(Self::new(status, serde_json::to_string(payload)?))
    }
}

impl From<AppError> for ApiResponse {
    fn from(err: AppError) -> Self {
        let body = ErrorBody {
            error: err.to_string(),
        };
        // ErrorBody holds a single string field
        let body = serde_json::to_string(&body).unwrap_or_default();
        Self::new(err.status_code(), body)
    }
}

fn default_headers() -> HashMap<String, String> {
    HashMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        ("Access-Control-Allow-Methods".to_string(), ALLOW_METHODS.to_string()),
        ("Access-Control-Allow-Headers".to_string(), ALLOW_HEADERS.to_string()),
    ])
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct TemplateRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub welcome_title: String,
    pub welcome_subtitle: String,
    pub questions: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Template as returned to callers, with `questions` decoded.
#[derive(Debug, Clone, Serialize)]
pub struct QuizTemplate {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub welcome_title: String,
    pub welcome_subtitle: String,
    pub questions: Value,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<TemplateRow> for QuizTemplate {
    type Error = AppError;

    fn try_from(row: TemplateRow) -> AppResult<Self> {
        Ok(Self {
            id: row.id,
            questions: serde_json::from_str(&row.questions)?,
            title: row.title,
            description: row.description,
            welcome_title: row.welcome_title,
            welcome_subtitle: row.welcome_subtitle,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDraft {
    pub title: String,
    pub name: String,
    pub description: String,
    pub welcome_title: String,
    pub welcome_subtitle: String,
    /// Serialized JSON.
    pub questions: String,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ResponseRow {
    pub id: i32,
    pub template_id: Option<i32>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub answers: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDraft {
    pub template_id: Option<i32>,
    pub name: String,
    pub phone: String,
    pub email: String,
    /// Serialized JSON.
    pub answers: String,
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub success: bool,
    pub id: i32,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub success: bool,
    pub deleted_id: i32,
}
