pub mod credential;
pub mod credential_format;
pub mod descriptor_path;
pub mod did;
pub mod error;
pub mod input_descriptor;
pub mod jwt;
pub mod keys;
pub mod presentation_definition;
pub mod presentation_submission;
pub mod util;
