//! Entity data model shared by the table controller and the renderers
//!
//! - `record`: the Terse record and the write/delete request vocabulary
//! - `preview`: social media preview metadata and its merge policy
//! - `summary`: read-model projections (summaries, search matches)
//! - `export`: export/import payloads

mod export;
mod preview;
mod record;
mod summary;
mod validation;

pub use export::{ExportEntry, ExportPayload, ExportSelection, Visit};
pub use preview::{MediaPreview, PreviewMergePolicy};
pub use record::{DeleteFlags, RedirectType, TerseRecord, WriteOperation};
pub use summary::{SearchMatch, SummarySet, TerseSummary};
pub use validation::{RecordValidationError, validate_original_url, validate_short_key};
