//! Utility functions for common operations.
//!
//! - **URL validation**: backend base URL and article links opened in a browser
//! - **Text processing**: width-aware truncation and terminal-safe text

mod text;
mod url_validator;

pub use text::{one_line, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_base_url, validate_url_for_open, UrlValidationError};
