//! passbook-ingest: layout-based reconstruction of transaction records from
//! positioned statement text.

pub mod assembler;
pub mod columns;
pub mod fuzzy;
pub mod header;
pub mod lines;
pub mod noise;
pub mod normalize;
pub mod pipeline;
pub mod types;

pub use assembler::{AssemblerState, ClassifiedLine, LineOutcome, RecordAssembler};
pub use header::{HeaderNotFound, detect_header};
pub use normalize::FieldNormalizer;
pub use pipeline::{Extraction, ExtractionFailure, ExtractionStats, extract};
pub use types::{StatementTransaction, TypedViewError, to_transactions};
