pub mod services;
pub mod session;

pub use services::{
    AttachmentManager, BatchUploadOutcome, BookingService, CalendarEntry, CompanyDirectory,
    CompanyResolution, DownloadOutcome, EventRow, EventSearch, FilterMode, NewUpload,
    SearchFilters, UploadFailure,
};
pub use session::{SessionRegistry, SessionWatcher, SharedSessionRegistry, StaffSession};
