// handlers.rs
use http::{Method, StatusCode};
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{ApiRequest, ApiResponse, Created, Deleted, QuizTemplate};
use crate::routes::Route;
use crate::services;
use crate::store::{Connector, QuizStore};

/// Handle one serverless invocation.
///
/// Preflight requests are answered before the configuration is consulted.
/// Matched routes open exactly one connection, which is closed again before
/// the response is returned, whatever the outcome.
pub async fn handle(
    connector: &dyn Connector,
    config: &Config,
    request: ApiRequest,
) -> ApiResponse {
    let method = request.method();
    let span = tracing::info_span!(
        "invocation",
        id = %Uuid::new_v4(),
        method = request.http_method.as_deref().unwrap_or("GET"),
        path = %request.route_path(),
        user_id = request.header("X-User-Id").unwrap_or_default(),
    );

    async move {
        if method == Some(Method::OPTIONS) {
            return ApiResponse::preflight();
        }

        let Some(database_url) = config.database_url.as_deref() else {
            tracing::error!("DATABASE_URL is not set");
            return AppError::Configuration.into();
        };

        let route = method
            .as_ref()
            .and_then(|method| Route::resolve(method, request.route_path()));
        let Some(route) = route else {
            tracing::debug!("no route matched");
            return AppError::RouteNotFound.into();
        };

        let mut store = match connector.connect(database_url).await {
            Ok(store) => store,
            Err(e) => {
                tracing::error!(error = %e, "failed to connect to database");
                return e.into();
            }
        };

        let outcome = dispatch(store.as_mut(), route, &request).await;

        if let Err(e) = store.close().await {
            tracing::warn!(error = %e, "failed to close database connection");
        }

        match outcome {
            Ok(response) => {
                tracing::info!(status = response.status_code, ?route, "request handled");
                response
            }
            Err(e) => {
                if e.status_code().is_server_error() {
                    tracing::error!(error = %e, ?route, "request failed");
                } else {
                    tracing::info!(error = %e, ?route, "request rejected");
                }
                e.into()
            }
        }
    }
    .instrument(span)
    .await
}

async fn dispatch(
    store: &mut dyn QuizStore,
    route: Route,
    request: &ApiRequest,
) -> AppResult<ApiResponse> {
    match route {
        Route::GetTemplate => get_template(store).await,
        Route::CreateTemplate => create_template(store, request).await,
        Route::UpdateTemplate => update_template(store, request).await,
        Route::SubmitResponse => submit_response(store, request).await,
        Route::ListResponses => list_responses(store).await,
        Route::DeleteTemplate => delete_template(store).await,
    }
}

/// Fetch the current template
async fn get_template(store: &mut dyn QuizStore) -> AppResult<ApiResponse> {
    let row = store
        .latest_template()
        .await?
        .ok_or_else(AppError::template_not_found)?;

    ApiResponse::json(StatusCode::OK, &QuizTemplate::try_from(row)?)
}

async fn create_template(
    store: &mut dyn QuizStore,
    request: &ApiRequest,
) -> AppResult<ApiResponse> {
    let body = services::parse_body(request.body.as_deref())?;
    let draft = services::template_draft(&body, services::NEW_TEMPLATE_NAME);

    let row = store.insert_template(&draft).await?;
    tracing::info!(template_id = row.id, "template created");

    ApiResponse::json(StatusCode::CREATED, &QuizTemplate::try_from(row)?)
}

/// Update by explicit id, or the current template when none is given
async fn update_template(
    store: &mut dyn QuizStore,
    request: &ApiRequest,
) -> AppResult<ApiResponse> {
    let body = services::parse_body(request.body.as_deref())?;

    let id = match services::requested_template_id(&body)? {
        Some(id) => id,
        None => store
            .latest_template_id()
            .await?
            .ok_or_else(AppError::template_not_found)?,
    };

    let draft = services::template_draft(&body, services::UPDATED_TEMPLATE_NAME);
    let row = store
        .update_template(id, &draft)
        .await?
        .ok_or_else(AppError::template_not_found)?;

    ApiResponse::json(StatusCode::OK, &QuizTemplate::try_from(row)?)
}

/// Record a submission against whichever template is current right now
async fn submit_response(
    store: &mut dyn QuizStore,
    request: &ApiRequest,
) -> AppResult<ApiResponse> {
    let body = services::parse_body(request.body.as_deref())?;
    let template_id = store.latest_template_id().await?;

    let draft = services::response_draft(body, template_id);
    let id = store.insert_response(&draft).await?;
    tracing::info!(response_id = id, template_id = ?template_id, "response recorded");

    ApiResponse::json(StatusCode::CREATED, &Created { success: true, id })
}

async fn list_responses(store: &mut dyn QuizStore) -> AppResult<ApiResponse> {
    let entries: Vec<Value> = store
        .list_responses()
        .await?
        .into_iter()
        .map(|row| Value::Object(services::admin_entry(row)))
        .collect();

    ApiResponse::json(StatusCode::OK, &entries)
}

async fn delete_template(store: &mut dyn QuizStore) -> AppResult<ApiResponse> {
    let deleted_id = store
        .delete_latest_template()
        .await?
        .ok_or_else(AppError::template_not_found)?;
    tracing::info!(template_id = deleted_id, "template deleted");

    ApiResponse::json(
        StatusCode::OK,
        &Deleted {
            success: true,
            deleted_id,
        },
    )
}
