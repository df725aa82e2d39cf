use thiserror::Error;

/// The one error type every fallible operation in this crate returns.
#[derive(Error, Debug)]
pub enum TimecampError {
    /// Non-success HTTP response, carrying the status code and body text.
    #[error("[{status}] {body}")]
    Http { status: u16, body: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0} is not a valid API item.")]
    InvalidItemType(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("{0} is not a day of the week.")]
    InvalidDay(String),
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("{0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = TimecampError::Http {
            status: 404,
            body: "Not found".to_string(),
        };
        assert_eq!(format!("{}", err), "[404] Not found");

        let err = TimecampError::Http {
            status: 500,
            body: "Internal error".to_string(),
        };
        assert!(matches!(err, TimecampError::Http { status: 500, .. }));
    }

    #[test]
    fn test_invalid_item_type_display() {
        let err = TimecampError::InvalidItemType("projects".to_string());
        assert_eq!(format!("{}", err), "projects is not a valid API item.");
    }

    #[test]
    fn test_invalid_day_display() {
        let err = TimecampError::InvalidDay("caturday".to_string());
        assert_eq!(format!("{}", err), "caturday is not a day of the week.");
    }

    #[test]
    fn test_not_found_display() {
        let err = TimecampError::NotFound("No user found with id 42.".to_string());
        assert_eq!(format!("{}", err), "No user found with id 42.");
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = TimecampError::InvalidArgument("API token cannot be empty".to_string());
        assert_eq!(
            format!("{}", err),
            "invalid argument: API token cannot be empty"
        );
    }
}
