//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::services::{BookingService, CompanyDirectory, EventSearch};
use crate::application::session::SharedSessionRegistry;
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::metrics::{
    http_metrics_middleware, prometheus_metrics, MetricsState,
};
use crate::interfaces::http::modules::{auth, companies, events, health};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::logout,
        auth::get_current_user,
        auth::change_password,
        // Companies
        companies::list_companies,
        companies::search_companies,
        companies::get_company,
        companies::create_company,
        companies::update_company,
        // Events
        events::list_events,
        events::get_event,
        events::create_event,
        events::update_event,
        events::delete_event,
        events::search_events,
        events::calendar_events,
        events::add_payment,
        events::remove_payment,
        events::upload_attachments,
        events::remove_attachment,
        events::download_attachment,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<events::EventDto>,
            PaginatedResponse<companies::CompanyDto>,
            PaginationParams,
            // Health
            health::HealthResponse,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::UserInfo,
            auth::ChangePasswordRequest,
            // Companies
            companies::CompanyDto,
            companies::SaveCompanyRequest,
            companies::CompanySearchResponse,
            // Events
            events::EventDto,
            events::PaymentDto,
            events::AttachmentDto,
            events::SaveEventRequest,
            events::AddPaymentRequest,
            events::UploadFileRequest,
            events::UploadAttachmentsRequest,
            events::UploadBatchResponse,
            events::FilterModeDto,
            events::SearchEventsRequest,
            events::EventRowDto,
            events::CalendarEventDto,
            events::CalendarExtendedProps,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "Staff login (JWT), registration, sessions"),
        (name = "Companies", description = "Company/group directory: search-or-create, edit"),
        (name = "Events", description = "Venue bookings: CRUD, search, calendar feed, payments, attachments"),
    ),
    info(
        title = "Venue Booking Service API",
        version = "1.0.0",
        description = "REST API for venue event bookings, company directory, payments and attachments",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
#[allow(clippy::too_many_arguments)]
pub fn create_api_router(
    repos: Arc<dyn RepositoryProvider>,
    sessions: SharedSessionRegistry,
    jwt_config: JwtConfig,
    bookings: Arc<BookingService>,
    directory: Arc<CompanyDirectory>,
    search: Arc<EventSearch>,
    app_cfg: &AppConfig,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let middleware_state = AuthState {
        jwt_config: jwt_config.clone(),
        sessions: sessions.clone(),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Login rate limit per client IP
    let per_minute = app_cfg.rate_limit.login_per_minute.max(1);
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second((60 / per_minute).max(1) as u64)
            .burst_size(per_minute)
            .finish()
            .expect("valid rate limit configuration"),
    );

    let auth_state = auth::AuthAppState {
        repos: repos.clone(),
        jwt_config,
        sessions,
    };

    // Auth routes (public; login throttled)
    let login_routes = Router::new()
        .route("/login", post(auth::login))
        .layer(GovernorLayer::new(governor_conf))
        .with_state(auth_state.clone());

    let register_routes = Router::new()
        .route("/register", post(auth::register))
        .with_state(auth_state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::get_current_user))
        .route("/change-password", put(auth::change_password))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_state);

    // Company routes (protected)
    let company_state = companies::CompanyAppState {
        repos: repos.clone(),
        directory,
    };
    let company_routes = Router::new()
        .route(
            "/",
            get(companies::list_companies).post(companies::create_company),
        )
        .route("/search", get(companies::search_companies))
        .route(
            "/{id}",
            get(companies::get_company).put(companies::update_company),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(company_state);

    // Event routes (protected)
    let event_state = events::EventAppState { bookings, search };
    let event_routes = Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route("/search", post(events::search_events))
        .route("/calendar", get(events::calendar_events))
        .route(
            "/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/{id}/payments", post(events::add_payment))
        .route("/{id}/payments/{index}", axum::routing::delete(events::remove_payment))
        .route("/{id}/attachments", post(events::upload_attachments))
        .route(
            "/{id}/attachments/{index}",
            axum::routing::delete(events::remove_attachment),
        )
        .route(
            "/{id}/attachments/{index}/download",
            get(events::download_attachment),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(event_state);

    // Prometheus scrape endpoint (no auth)
    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState {
            handle: prometheus_handle,
        });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::health_check))
        // Metrics
        .merge(metrics_routes)
        // Auth
        .nest("/api/v1/auth", login_routes)
        .nest("/api/v1/auth", register_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        // Companies
        .nest("/api/v1/companies", company_routes)
        // Events
        .nest("/api/v1/events", event_routes)
        // Middleware
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
