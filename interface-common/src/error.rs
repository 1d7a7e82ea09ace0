use error_types::ApiError;

/// Shared error type for interface-level operations (header parsing,
/// metadata extraction). Each transport layer converts this into its own
/// error representation.
#[derive(Debug, thiserror::Error)]
pub enum InterfaceError {
    #[error("Missing required header: {key}")]
    MissingRequiredHeader { key: String },
    #[error("Invalid header value for '{key}': {reason}")]
    InvalidHeaderValue { key: String, reason: String },
}

impl From<InterfaceError> for ApiError {
    fn from(err: InterfaceError) -> Self {
        ApiError::invalid_argument().with_message(err.to_string())
    }
}

impl From<InterfaceError> for tonic::Status {
    fn from(err: InterfaceError) -> Self {
        ApiError::from(err).to_status()
    }
}
