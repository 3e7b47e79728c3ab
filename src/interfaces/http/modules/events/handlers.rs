//! Event HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Json};
use base64::Engine;
use chrono::{Duration, TimeZone, Utc};

use crate::application::services::{
    BookingService, DownloadOutcome, EventSearch, NewUpload, SearchFilters,
};
use crate::domain::event::EventDraft;
use crate::interfaces::http::common::{
    domain_error_response, ApiResponse, PaginatedResponse, PaginationParams, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

use super::dto::*;

/// Application state for event handlers
#[derive(Clone)]
pub struct EventAppState {
    pub bookings: Arc<BookingService>,
    pub search: Arc<EventSearch>,
}

/// List events (paginated, ascending by start)
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of events", body = ApiResponse<PaginatedResponse<EventDto>>)
    )
)]
pub async fn list_events(
    State(state): State<EventAppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<
    Json<ApiResponse<PaginatedResponse<EventDto>>>,
    (StatusCode, Json<ApiResponse<PaginatedResponse<EventDto>>>),
> {
    let (events, total) = state
        .bookings
        .list(pagination.page, pagination.limit)
        .await
        .map_err(domain_error_response)?;

    let dtos: Vec<EventDto> = events.into_iter().map(EventDto::from).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        dtos,
        total,
        pagination.page,
        pagination.limit,
    ))))
}

/// Get one event
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = ApiResponse<EventDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_event(
    State(state): State<EventAppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EventDto>>, (StatusCode, Json<ApiResponse<EventDto>>)> {
    let event = state
        .bookings
        .get(&id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(event.into())))
}

/// Create a new booking
///
/// Validation failures come back as field-level messages and nothing is
/// persisted. The linked company must already exist.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    security(("bearer_auth" = [])),
    request_body = SaveEventRequest,
    responses(
        (status = 201, description = "Booking created", body = ApiResponse<EventDto>),
        (status = 400, description = "Validation failure")
    )
)]
pub async fn create_event(
    State(state): State<EventAppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<SaveEventRequest>,
) -> Result<
    (StatusCode, Json<ApiResponse<EventDto>>),
    (StatusCode, Json<ApiResponse<EventDto>>),
> {
    let status = parse_status_field(request.status.as_deref())?;

    let mut draft = EventDraft::new_booking();
    request.apply_to_draft(&mut draft, status);

    let event = state
        .bookings
        .create(&draft, &user.username)
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(event.into())),
    ))
}

/// Edit a booking (full replace of mutable fields)
///
/// Payments and attachments are untouched here; they change through
/// their own sub-operations.
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Event ID")),
    request_body = SaveEventRequest,
    responses(
        (status = 200, description = "Updated event", body = ApiResponse<EventDto>),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_event(
    State(state): State<EventAppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<SaveEventRequest>,
) -> Result<Json<ApiResponse<EventDto>>, (StatusCode, Json<ApiResponse<EventDto>>)> {
    let status = parse_status_field(request.status.as_deref())?;

    let existing = state
        .bookings
        .get(&id)
        .await
        .map_err(domain_error_response)?;

    // keep ledger and attachments; the form only replaces its own fields
    let mut draft = EventDraft::from_existing(&existing);
    request.apply_to_draft(&mut draft, status);

    let event = state
        .bookings
        .update(&id, &draft, &user.username)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(event.into())))
}

/// Delete a booking
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_event(
    State(state): State<EventAppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    state
        .bookings
        .delete(&id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(())))
}

/// Search events by company, single date, or date range
///
/// Rows carry denormalized company display fields and come back sorted
/// ascending by start.
#[utoipa::path(
    post,
    path = "/api/v1/events/search",
    tag = "Events",
    security(("bearer_auth" = [])),
    request_body = SearchEventsRequest,
    responses(
        (status = 200, description = "Matching events", body = ApiResponse<Vec<EventRowDto>>),
        (status = 400, description = "Missing filter field for the selected mode")
    )
)]
pub async fn search_events(
    State(state): State<EventAppState>,
    ValidatedJson(request): ValidatedJson<SearchEventsRequest>,
) -> Result<Json<ApiResponse<Vec<EventRowDto>>>, (StatusCode, Json<ApiResponse<Vec<EventRowDto>>>)>
{
    let mode = request.mode.into();
    let mut filters = SearchFilters {
        company_name: request.company_name,
        company_id_number: request.company_id_number,
        date: request.date,
        from: request.from,
        to: request.to,
    };
    // stray fields from a previous mode selection are dropped
    filters.reset_for_mode(mode);

    let rows = state
        .search
        .execute(mode, &filters)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(
        rows.into_iter().map(EventRowDto::from).collect(),
    )))
}

/// Calendar feed for the given date window
#[utoipa::path(
    get,
    path = "/api/v1/events/calendar",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(CalendarQuery),
    responses(
        (status = 200, description = "Calendar rows", body = ApiResponse<Vec<CalendarEventDto>>)
    )
)]
pub async fn calendar_events(
    State(state): State<EventAppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<
    Json<ApiResponse<Vec<CalendarEventDto>>>,
    (StatusCode, Json<ApiResponse<Vec<CalendarEventDto>>>),
> {
    let from = Utc.from_utc_datetime(&query.from.and_hms_opt(0, 0, 0).unwrap_or_default());
    let to = Utc.from_utc_datetime(&query.to.and_hms_opt(0, 0, 0).unwrap_or_default())
        + Duration::days(1);

    let entries = state
        .bookings
        .calendar_feed(from, to)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(
        entries.into_iter().map(CalendarEventDto::from).collect(),
    )))
}

/// Add a payment to the event's ledger
///
/// The deposit is recomputed from the ledger; once payments exist the
/// ledger total is authoritative over any manually typed deposit.
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/payments",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Event ID")),
    request_body = AddPaymentRequest,
    responses(
        (status = 200, description = "Updated event", body = ApiResponse<EventDto>),
        (status = 400, description = "Missing amount or date"),
        (status = 404, description = "Not found")
    )
)]
pub async fn add_payment(
    State(state): State<EventAppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<AddPaymentRequest>,
) -> Result<Json<ApiResponse<EventDto>>, (StatusCode, Json<ApiResponse<EventDto>>)> {
    let event = state
        .bookings
        .add_payment(&id, request.into(), &user.username)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(event.into())))
}

/// Remove a payment by its position in the ledger
///
/// An out-of-range index leaves the ledger unchanged.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}/payments/{index}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Event ID"),
        ("index" = usize, Path, description = "Ledger position, 0-based")
    ),
    responses(
        (status = 200, description = "Updated event", body = ApiResponse<EventDto>),
        (status = 404, description = "Event not found")
    )
)]
pub async fn remove_payment(
    State(state): State<EventAppState>,
    Path((id, index)): Path<(String, usize)>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<EventDto>>, (StatusCode, Json<ApiResponse<EventDto>>)> {
    let event = state
        .bookings
        .remove_payment(&id, index, &user.username)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(event.into())))
}

/// Upload attachments for an event
///
/// Files are uploaded one at a time; the batch stops at the first
/// storage error. Files already uploaded stay attached and are listed in
/// the response alongside the error.
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/attachments",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Event ID")),
    request_body = UploadAttachmentsRequest,
    responses(
        (status = 200, description = "Batch outcome", body = ApiResponse<UploadBatchResponse>),
        (status = 400, description = "Undecodable file content"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn upload_attachments(
    State(state): State<EventAppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<UploadAttachmentsRequest>,
) -> Result<
    Json<ApiResponse<UploadBatchResponse>>,
    (StatusCode, Json<ApiResponse<UploadBatchResponse>>),
> {
    let mut files = Vec::with_capacity(request.files.len());
    for file in request.files {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(file.content_base64.as_bytes())
            .map_err(|_| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error(format!(
                        "file '{}' is not valid base64",
                        file.name
                    ))),
                )
            })?;
        files.push(NewUpload {
            file_name: file.name,
            mime_type: file
                .mime_type
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            bytes,
        });
    }

    let outcome = state
        .bookings
        .upload_attachments(Some(&id), files, &user.username)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(UploadBatchResponse {
        attached: outcome.attached.iter().map(AttachmentDto::from).collect(),
        error: outcome.failure.map(|f| f.message),
    })))
}

/// Remove an attachment by its position
///
/// The remote object is deleted best-effort; the local record always
/// goes, so removal cannot be blocked by a storage hiccup. Out-of-range
/// indexes are a no-op.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}/attachments/{index}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Event ID"),
        ("index" = usize, Path, description = "Attachment position, 0-based")
    ),
    responses(
        (status = 200, description = "Updated event", body = ApiResponse<EventDto>),
        (status = 404, description = "Event not found")
    )
)]
pub async fn remove_attachment(
    State(state): State<EventAppState>,
    Path((id, index)): Path<(String, usize)>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<EventDto>>, (StatusCode, Json<ApiResponse<EventDto>>)> {
    let event = state
        .bookings
        .remove_attachment(&id, index, &user.username)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(event.into())))
}

/// Download an attachment
///
/// Streams the stored bytes when storage cooperates; otherwise redirects
/// to the attachment's public URL.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}/attachments/{index}/download",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Event ID"),
        ("index" = usize, Path, description = "Attachment position, 0-based")
    ),
    responses(
        (status = 200, description = "Attachment bytes"),
        (status = 307, description = "Redirect to the public URL"),
        (status = 404, description = "Event or attachment not found")
    )
)]
pub async fn download_attachment(
    State(state): State<EventAppState>,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Response, (StatusCode, Json<ApiResponse<()>>)> {
    let (attachment, outcome) = state
        .bookings
        .download_attachment(&id, index)
        .await
        .map_err(domain_error_response)?;

    let response = match outcome {
        DownloadOutcome::Bytes { bytes, mime_type } => (
            [
                (header::CONTENT_TYPE, mime_type),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", attachment.name),
                ),
            ],
            bytes,
        )
            .into_response(),
        DownloadOutcome::RedirectUrl(url) => Redirect::temporary(&url).into_response(),
    };
    Ok(response)
}

fn parse_status_field<T>(
    status: Option<&str>,
) -> Result<Option<crate::domain::event::EventStatus>, (StatusCode, Json<ApiResponse<T>>)> {
    match status {
        None => Ok(None),
        Some(raw) => match parse_status(raw) {
            Some(status) => Ok(Some(status)),
            None => Err((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(format!("unknown status '{raw}'"))),
            )),
        },
    }
}
