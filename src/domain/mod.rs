pub mod company;
pub mod error;
pub mod event;
pub mod repositories;
pub mod user;

// Re-export commonly used types
pub use company::{Company, CompanyForm, CompanyInput, CompanyRepository, IdentificationType};
pub use error::{DomainError, DomainResult, ValidationReport};
pub use event::{
    Attachment, Event, EventDraft, EventField, EventRepository, EventStatus, Payment,
    PaymentEntryInput, PaymentLedger,
};
pub use repositories::RepositoryProvider;
pub use user::{User, UserRepository, UserRole};
