//! Upload Adapters
//!
//! Implementations of the FileStore port.

mod local_file_store;

pub use local_file_store::{LocalFileStore, DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_UPLOAD_BYTES};
