pub mod batch;
pub mod builders;
pub mod clean;
pub mod document;
pub mod etl;
pub mod merge;
pub mod profiles;
pub mod schema;
pub mod serialize;
pub mod template;

pub use crate::domain::model::{BatchSummary, RenderOutcome, Resume};
pub use crate::domain::ports::{ConvertConfig, DocumentStore, PdfRenderer};
pub use crate::utils::error::Result;
