pub mod url_validator;

pub use url_validator::{UrlValidationError, redirect_location, validate_url, validation_error_message};
