//! Notice board routes.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::AppState;
use bulletin_core::notice::{
    CreateNoticeInput, NoticeError, NoticeService, SearchType, UpdateNoticeInput,
};
use bulletin_core::storage::{ObjectStore, UploadFile};
use bulletin_db::{PgNoticeFileRepository, PgNoticeRepository};
use bulletin_shared::PageRequest;

/// Creates the notice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notices", get(search_notices).post(create_notice))
        .route(
            "/notices/{id}",
            get(get_notice).put(update_notice).delete(delete_notice),
        )
}

type Service = NoticeService<PgNoticeRepository, PgNoticeFileRepository, ObjectStore>;

fn service(state: &AppState) -> Service {
    let notices = Arc::new(PgNoticeRepository::new((*state.db).clone()));
    let file_rows = Arc::new(PgNoticeFileRepository::new((*state.db).clone()));
    NoticeService::new(notices, file_rows, state.store.clone())
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for the search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Which columns to match: `title`, `content`, `title_content`, `writer`.
    pub search_type: Option<String>,
    /// Keyword to match. Missing means "match everything".
    pub keyword: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

impl SearchParams {
    fn search_type(&self) -> SearchType {
        self.search_type
            .as_deref()
            .map_or_else(SearchType::default, SearchType::parse)
    }

    fn keyword(&self) -> &str {
        self.keyword.as_deref().unwrap_or("")
    }

    fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Query parameters for the delete endpoint.
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    /// Caller identity, checked against the notice author.
    pub user_id: String,
}

/// Fields and uploads extracted from a notice multipart form.
struct NoticeForm {
    title: String,
    content: String,
    user_id: String,
    uploads: Vec<UploadFile>,
}

// ============================================================================
// Helpers
// ============================================================================

/// Translate a domain error into a `{message, code}` response.
fn error_response(e: &NoticeError) -> Response {
    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "message": e.to_string(),
            "code": e.error_code(),
        })),
    )
        .into_response()
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "message": message.into(),
            "code": "INVALID_ARGUMENT",
        })),
    )
        .into_response()
}

/// Read the notice form fields and file parts from a multipart body.
///
/// Expected parts: `title`, `content`, `user_id`, and any number of `files`
/// parts carrying the uploads. Unknown parts are ignored.
async fn read_notice_form(mut multipart: Multipart) -> Result<NoticeForm, Response> {
    let mut title = None;
    let mut content = None;
    let mut user_id = None;
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("title") => {
                title = Some(field.text().await.map_err(|e| bad_request(e.to_string()))?);
            }
            Some("content") => {
                content = Some(field.text().await.map_err(|e| bad_request(e.to_string()))?);
            }
            Some("user_id") => {
                user_id = Some(field.text().await.map_err(|e| bad_request(e.to_string()))?);
            }
            Some("files") => {
                let file_name = field.file_name().unwrap_or("unnamed").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(e.to_string()))?;
                uploads.push(UploadFile {
                    file_name,
                    content_type,
                    data,
                });
            }
            _ => {}
        }
    }

    let title = title.ok_or_else(|| bad_request("missing field: title"))?;
    let content = content.ok_or_else(|| bad_request("missing field: content"))?;
    let user_id = user_id.ok_or_else(|| bad_request("missing field: user_id"))?;

    Ok(NoticeForm {
        title,
        content,
        user_id,
        uploads,
    })
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/notices`: create a notice with optional file uploads.
async fn create_notice(State(state): State<AppState>, multipart: Multipart) -> Response {
    let form = match read_notice_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let input = CreateNoticeInput {
        title: form.title,
        content: form.content,
        user_id: form.user_id,
    };

    match service(&state).create(input, form.uploads).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/notices/{id}`: detail view; increments the view counter.
async fn get_notice(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match service(&state).detail(id).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// PUT `/notices/{id}`: update fields and replace the attachment set.
async fn update_notice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Response {
    let form = match read_notice_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let input = UpdateNoticeInput {
        notice_id: id,
        title: form.title,
        content: form.content,
        user_id: form.user_id,
    };

    match service(&state).update(input, form.uploads).await {
        Ok(updated) => (StatusCode::OK, Json(updated)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// DELETE `/notices/{id}?user_id=`: delete a notice and its files.
async fn delete_notice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<DeleteParams>,
) -> Response {
    match service(&state).delete(id, &params.user_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/notices`: paginated keyword search.
async fn search_notices(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let result = service(&state)
        .search(params.search_type(), params.keyword(), params.page_request())
        .await;

    match result {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => error_response(&e),
    }
}
