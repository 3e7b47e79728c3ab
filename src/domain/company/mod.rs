pub mod model;
pub mod repository;

pub use model::{Company, CompanyForm, CompanyInput, IdentificationType};
pub use repository::CompanyRepository;
