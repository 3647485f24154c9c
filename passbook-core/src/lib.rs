//! passbook-core: data model, bank profiles and errors for layout-based
//! statement reconstruction.

pub mod category;
pub mod columns;
pub mod error;
pub mod profile;
pub mod record;
pub mod registry;
pub mod token;

pub use category::Category;
pub use columns::{ColumnBoundary, ColumnLayout, HeaderSpan};
pub use error::{LayoutError, ProfileError};
pub use profile::{BankProfile, ProfileConfig};
pub use record::Record;
pub use registry::{BUILTIN_BANKS, profile_for};
pub use token::{Document, Line, Page, Token};
