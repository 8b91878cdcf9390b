pub mod extractor;
pub mod file_magic;
pub mod filename;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod sql;
pub mod upload_form;
pub mod upload_store;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub use extractor::{SafeIDI64, SafeStudentFileKind};
pub use file_magic::validate_magic_bytes;
pub use filename::secure_filename;
pub use sql::{contains_literal, escape_like_pattern};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use upload_form::{UploadError, UploadForm, read_upload_form};
pub use upload_store::{UploadKind, UploadStore};
