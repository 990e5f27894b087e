// routes.rs
use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::handlers;
use crate::models::{ApiRequest, ApiResponse};
use crate::store::Connector;

/// Dispatch table, checked top to bottom by method and path substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    GetTemplate,
    CreateTemplate,
    UpdateTemplate,
    SubmitResponse,
    ListResponses,
    DeleteTemplate,
}

impl Route {
    pub fn resolve(method: &Method, path: &str) -> Option<Self> {
        let route = if *method == Method::GET && path.contains("/template") {
            Route::GetTemplate
        } else if *method == Method::POST && path.contains("/template") {
            Route::CreateTemplate
        } else if *method == Method::PUT && path.contains("/template") {
            Route::UpdateTemplate
        } else if *method == Method::POST && path.contains("/response") {
            Route::SubmitResponse
        } else if *method == Method::GET && path.contains("/admin/responses") {
            Route::ListResponses
        } else if *method == Method::DELETE && path.contains("/template") {
            Route::DeleteTemplate
        } else {
            return None;
        };
        Some(route)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub connector: Arc<dyn Connector>,
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/invoke", post(invoke).fallback(proxy))
        .fallback(proxy)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Raw serverless event in, raw response description out.
async fn invoke(
    State(state): State<AppState>,
    Json(event): Json<ApiRequest>,
) -> Json<ApiResponse> {
    Json(handlers::handle(state.connector.as_ref(), &state.config, event).await)
}

/// Any other HTTP request is adapted into an event.
async fn proxy(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> ApiResponse {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();

    let event = ApiRequest {
        http_method: Some(method.to_string()),
        path: Some(uri.path().to_string()),
        query_string_parameters: Some(params),
        headers: Some(headers),
        body: Some(body),
    };

    handlers::handle(state.connector.as_ref(), &state.config, event).await
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::try_from(name.as_str()),
                HeaderValue::from_str(value),
            ) {
                response.headers_mut().insert(name, value);
            }
        }
        response
    }
}
