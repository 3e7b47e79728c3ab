//! # Venue Booking Service
//!
//! Backend for a venue event-planning application: companies and groups book
//! venue events; staff track status, payments and attachments.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, draft/ledger logic and repository traits
//! - **application**: Use cases (bookings, attachments, directory, search) and sessions
//! - **infrastructure**: External concerns (database, object storage, crypto)
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: Graceful shutdown coordination

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::{init_database, DatabaseConfig};
pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;

// Re-export API router
pub use interfaces::http::create_api_router;
