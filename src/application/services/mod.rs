pub mod attachments;
pub mod booking;
pub mod directory;
pub mod search;

pub use attachments::{
    AttachmentManager, BatchUploadOutcome, DownloadOutcome, NewUpload, UploadFailure,
};
pub use booking::{BookingService, CalendarEntry};
pub use directory::{CompanyDirectory, CompanyResolution, MIN_SEARCH_QUERY_LEN};
pub use search::{EventRow, EventSearch, FilterMode, SearchFilters};
