//! interviewsim-report — session exports.
//!
//! A finished session is exported two ways: a JSON document that can be read
//! back, and a paginated PDF summary.

pub mod document;
pub mod json;

pub use document::{to_document, write_document_export, DEFAULT_DOCUMENT_FILE};
pub use json::{
    from_json, read_json_export, to_json, write_json_export, SessionExport, SessionMeta,
    DEFAULT_JSON_FILE,
};
