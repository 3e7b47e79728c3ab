//! Venue booking service entrypoint
//!
//! Reads configuration from a TOML file (~/.config/venue-booking/config.toml),
//! runs migrations, and serves the REST API.

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use venue_booking::application::services::{
    AttachmentManager, BookingService, CompanyDirectory, EventSearch,
};
use venue_booking::application::session::{SessionRegistry, SessionWatcher};
use venue_booking::infrastructure::crypto::jwt::JwtConfig;
use venue_booking::infrastructure::database::migrator::Migrator;
use venue_booking::infrastructure::storage::{FsObjectStorage, ObjectStorage};
use venue_booking::shared::ShutdownCoordinator;
use venue_booking::{
    create_api_router, default_config_path, init_database, AppConfig, DatabaseConfig,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("VENUE_BOOKING_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Venue Booking Service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    info!("Prometheus metrics recorder installed");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Repositories & services ────────────────────────────────
    let repos: Arc<dyn venue_booking::domain::RepositoryProvider> =
        Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    create_default_admin(repos.as_ref(), &app_cfg).await;

    let storage: Arc<dyn ObjectStorage> = Arc::new(FsObjectStorage::new(
        app_cfg.storage.root_dir.clone(),
        &app_cfg.storage.bucket,
        &app_cfg.storage.public_base_url,
    ));
    info!(
        "Attachment storage: {}/{}",
        app_cfg.storage.root_dir, app_cfg.storage.bucket
    );

    let attachments = Arc::new(AttachmentManager::new(storage));
    let bookings = Arc::new(BookingService::new(repos.clone(), attachments));
    let directory = Arc::new(CompanyDirectory::new(repos.clone()));
    let search = Arc::new(EventSearch::new(repos.clone()));

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "venue-booking".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Sessions ───────────────────────────────────────────────
    let sessions = SessionRegistry::shared();

    // Initialize shutdown coordinator
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();
    shutdown.start_signal_listener();

    // Start the session expiry watcher
    let session_watcher = SessionWatcher::new(
        sessions.clone(),
        app_cfg.security.session_sweep_interval_secs,
    );
    session_watcher.start(shutdown_signal.clone());

    // ── REST API server ────────────────────────────────────────
    let api_router = create_api_router(
        repos,
        sessions,
        jwt_config,
        bookings,
        directory,
        search,
        &app_cfg,
        prometheus_handle,
    );

    let api_addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let api_shutdown = shutdown_signal.clone();
    axum::serve(
        listener,
        api_router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        api_shutdown.wait().await;
        info!("REST API server received shutdown signal");
    })
    .await?;

    // Perform final cleanup
    info!("Performing final cleanup...");

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Venue Booking Service shutdown complete");
    Ok(())
}

/// Create default admin user if no users exist
async fn create_default_admin(
    repos: &dyn venue_booking::domain::RepositoryProvider,
    app_cfg: &AppConfig,
) {
    use venue_booking::domain::user::{User, UserRepository, UserRole};
    use venue_booking::infrastructure::crypto::password::hash_password;

    let users_count = repos.users().count().await.unwrap_or(0);
    if users_count > 0 {
        return;
    }

    info!("Creating default admin user...");

    let password_hash = match hash_password(&app_cfg.admin.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to hash admin password: {}", e);
            return;
        }
    };

    let now = chrono::Utc::now();
    let admin = User {
        id: uuid::Uuid::new_v4().to_string(),
        username: app_cfg.admin.username.clone(),
        email: app_cfg.admin.email.clone(),
        password_hash,
        role: UserRole::Admin,
        is_active: true,
        created_at: now,
        updated_at: now,
        last_login_at: None,
    };

    match repos.users().insert(admin).await {
        Ok(()) => {
            info!("Default admin created: {}", app_cfg.admin.email);
            warn!("Please change the admin password immediately!");
        }
        Err(e) => {
            error!("Failed to create admin user: {}", e);
        }
    }
}
