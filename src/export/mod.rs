//! Export module for Pennywise
//!
//! Full-store JSON snapshots for backup and restore.

pub mod json;

pub use json::{
    export_document, export_json, export_to_file, import_from_file, import_json, parse_document,
    ImportReport, SnapshotDocument, EXPORT_VERSION,
};
