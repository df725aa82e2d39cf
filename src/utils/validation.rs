//! Builder input validation.
//!
//! Checks applied to client configuration before any request is built.

use crate::error::TimecampError;

/// Validate that a base URL is properly formatted
pub fn validate_base_url(url: &str) -> crate::Result<()> {
    if url.is_empty() {
        return Err(TimecampError::InvalidArgument(
            "base URL cannot be empty".to_string(),
        ));
    }

    // Basic URL validation - must start with http:// or https://
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(TimecampError::InvalidArgument(format!(
            "Invalid URL '{}': URL must start with http:// or https://",
            url
        )));
    }

    Ok(())
}

/// Validate the API token
pub fn validate_api_token(token: &str) -> crate::Result<()> {
    if token.trim().is_empty() {
        return Err(TimecampError::InvalidArgument(
            "API token cannot be empty".to_string(),
        ));
    }

    Ok(())
}
