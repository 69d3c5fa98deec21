//! Question bank: record schema and dataset loading.
//!
//! The bank is pure data: one JSON array per content type, each element
//! matching [`QuestionRecord`]. Oversized per-type pools may be
//! downsampled to a configured cap before the model builder ever sees
//! them; whether sampling persists back to the source file is a
//! configuration flag.

mod loader;
mod record;

pub use loader::{load_bank, load_questions_by_type};
pub use record::QuestionRecord;
