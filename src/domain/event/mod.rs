pub mod draft;
pub mod ledger;
pub mod model;
pub mod repository;

pub use draft::{EventDraft, EventField};
pub use ledger::{LedgerError, PaymentEntryInput, PaymentLedger};
pub use model::{Attachment, Event, EventStatus, Payment};
pub use repository::EventRepository;
