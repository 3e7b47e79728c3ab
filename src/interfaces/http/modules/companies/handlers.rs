//! Company HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::services::CompanyDirectory;
use crate::domain::company::CompanyRepository;
use crate::domain::RepositoryProvider;
use crate::interfaces::http::common::{
    domain_error_response, ApiResponse, PaginatedResponse, PaginationParams, ValidatedJson,
};

use super::dto::*;

/// Application state for company handlers
#[derive(Clone)]
pub struct CompanyAppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub directory: Arc<CompanyDirectory>,
}

/// List companies (paginated, ordered by name)
#[utoipa::path(
    get,
    path = "/api/v1/companies",
    tag = "Companies",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of companies", body = ApiResponse<PaginatedResponse<CompanyDto>>)
    )
)]
pub async fn list_companies(
    State(state): State<CompanyAppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<
    Json<ApiResponse<PaginatedResponse<CompanyDto>>>,
    (StatusCode, Json<ApiResponse<PaginatedResponse<CompanyDto>>>),
> {
    let (companies, total) = state
        .repos
        .companies()
        .list(pagination.page, pagination.limit)
        .await
        .map_err(domain_error_response)?;

    let dtos: Vec<CompanyDto> = companies.into_iter().map(CompanyDto::from).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        dtos,
        total,
        pagination.page,
        pagination.limit,
    ))))
}

/// Search the directory by name
///
/// Returns matching companies plus the resolution of the exact query:
/// either the case-insensitive exact match, or a flag telling the UI to
/// offer the create-company form.
#[utoipa::path(
    get,
    path = "/api/v1/companies/search",
    tag = "Companies",
    security(("bearer_auth" = [])),
    params(CompanySearchQuery),
    responses(
        (status = 200, description = "Matches and resolution", body = ApiResponse<CompanySearchResponse>)
    )
)]
pub async fn search_companies(
    State(state): State<CompanyAppState>,
    Query(query): Query<CompanySearchQuery>,
) -> Result<
    Json<ApiResponse<CompanySearchResponse>>,
    (StatusCode, Json<ApiResponse<CompanySearchResponse>>),
> {
    let companies = state
        .directory
        .search(&query.q)
        .await
        .map_err(domain_error_response)?;

    let resolution = CompanyDirectory::resolve_or_flag_new(&query.q, &companies);

    Ok(Json(ApiResponse::success(CompanySearchResponse {
        companies: companies.into_iter().map(CompanyDto::from).collect(),
        matched: resolution.matched.map(CompanyDto::from),
        offer_create: resolution.offer_create,
    })))
}

/// Get one company
#[utoipa::path(
    get,
    path = "/api/v1/companies/{id}",
    tag = "Companies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Company ID")),
    responses(
        (status = 200, description = "Company details", body = ApiResponse<CompanyDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_company(
    State(state): State<CompanyAppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CompanyDto>>, (StatusCode, Json<ApiResponse<CompanyDto>>)> {
    let company = state
        .repos
        .companies()
        .find_by_id(&id)
        .await
        .map_err(domain_error_response)?;

    let Some(company) = company else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Company {} not found", id))),
        ));
    };

    Ok(Json(ApiResponse::success(company.into())))
}

/// Create a company (search-or-create flow)
///
/// All fields are required here; the identification number must be new
/// for its identification type.
#[utoipa::path(
    post,
    path = "/api/v1/companies",
    tag = "Companies",
    security(("bearer_auth" = [])),
    request_body = SaveCompanyRequest,
    responses(
        (status = 201, description = "Company created", body = ApiResponse<CompanyDto>),
        (status = 400, description = "Missing required field"),
        (status = 409, description = "Identification already registered")
    )
)]
pub async fn create_company(
    State(state): State<CompanyAppState>,
    ValidatedJson(request): ValidatedJson<SaveCompanyRequest>,
) -> Result<
    (StatusCode, Json<ApiResponse<CompanyDto>>),
    (StatusCode, Json<ApiResponse<CompanyDto>>),
> {
    let input = request
        .into_input()
        .map_err(|msg| (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))))?;

    let company = state
        .directory
        .create(input)
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(company.into())),
    ))
}

/// Edit a company
///
/// Address and city are optional on the edit form. Returns the canonical
/// stored record; clients refresh any event draft linked to it.
#[utoipa::path(
    put,
    path = "/api/v1/companies/{id}",
    tag = "Companies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Company ID")),
    request_body = SaveCompanyRequest,
    responses(
        (status = 200, description = "Updated company", body = ApiResponse<CompanyDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_company(
    State(state): State<CompanyAppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<SaveCompanyRequest>,
) -> Result<Json<ApiResponse<CompanyDto>>, (StatusCode, Json<ApiResponse<CompanyDto>>)> {
    let input = request
        .into_input()
        .map_err(|msg| (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg))))?;

    let company = state
        .directory
        .update(&id, input)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(company.into())))
}
