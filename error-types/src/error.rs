use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata key under which [`ApiError::with_request_id`] stores the request ID.
pub const REQUEST_ID_KEY: &str = "X-Request-ID";

/// Machine-readable reason tokens used by the predefined error catalog.
///
/// Callers are free to introduce new tokens for new error classes; these are
/// the ones every service is expected to understand.
pub mod reason {
    /// Unclassified server-side failure.
    pub const INTERNAL_ERROR: &str = "InternalError";
    /// Resource absent.
    pub const NOT_FOUND: &str = "NotFound";
    /// Inbound payload could not be parsed into the expected shape.
    pub const BIND_ERROR: &str = "BindError";
    /// Semantic validation failed.
    pub const INVALID_ARGUMENT: &str = "InvalidArgument";
    /// Caller identity not established.
    pub const UNAUTHENTICATED: &str = "Unauthenticated";
    /// Caller lacks authorization.
    pub const PERMISSION_DENIED: &str = "PermissionDenied";
    /// Operation conflicts with current state.
    pub const OPERATION_FAILED: &str = "OperationFailed";
}

/// Detailed error information exchanged between services and surfaced to
/// clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("error: code = {code} reason = {reason} message = {message} metadata = {metadata:?}")]
pub struct ApiError {
    /// HTTP status code of the error, used to identify the error type when
    /// interacting with clients.
    pub code: u16,
    /// Business error code for precise problem location. Used for matching;
    /// empty is valid but carries no routing information.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    /// Brief error message, safe to expose to users directly.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// Additional context or debugging information. Ordered so the textual
    /// rendering is deterministic; omitted from serialized output when empty.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl ApiError {
    /// Creates a new error. No validation is performed on `code` or
    /// `reason`; callers are expected to use catalog-consistent values.
    pub fn new(code: u16, reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
            message: message.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// A successful request.
    pub fn ok() -> Self {
        Self::new(200, "", "")
    }

    /// All unknown server-side errors.
    pub fn internal() -> Self {
        Self::new(500, reason::INTERNAL_ERROR, "Internal server error.")
    }

    /// Resource not found.
    pub fn not_found() -> Self {
        Self::new(404, reason::NOT_FOUND, "Resource not found.")
    }

    /// Request body binding error.
    pub fn bind() -> Self {
        Self::new(
            400,
            reason::BIND_ERROR,
            "Error occurred while binding the request body to the struct.",
        )
    }

    /// Parameter validation failure.
    pub fn invalid_argument() -> Self {
        Self::new(400, reason::INVALID_ARGUMENT, "Argument verification failed.")
    }

    /// Authentication failure.
    pub fn unauthenticated() -> Self {
        Self::new(401, reason::UNAUTHENTICATED, "Unauthenticated.")
    }

    /// Request without permission.
    pub fn permission_denied() -> Self {
        Self::new(
            403,
            reason::PERMISSION_DENIED,
            "Permission denied. Access to the requested resource is forbidden.",
        )
    }

    /// Operation failure.
    pub fn operation_failed() -> Self {
        Self::new(
            409,
            reason::OPERATION_FAILED,
            "The requested operation has failed. Please try again later.",
        )
    }

    /// Overwrites the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Replaces the metadata wholesale.
    #[must_use]
    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Merges key/value pairs into the metadata. Pairs are read two at a
    /// time; an unpaired trailing key is silently dropped.
    #[must_use]
    pub fn kv(mut self, pairs: &[&str]) -> Self {
        for pair in pairs.chunks_exact(2) {
            self.metadata.insert(pair[0].to_owned(), pair[1].to_owned());
        }
        self
    }

    /// Attaches the request ID under [`REQUEST_ID_KEY`].
    #[must_use]
    pub fn with_request_id(self, request_id: &str) -> Self {
        self.kv(&[REQUEST_ID_KEY, request_id])
    }

    /// Whether `target` matches this error: some link of `target`'s source
    /// chain is an `ApiError` with equal `code` and `reason`. Message and
    /// metadata are not part of identity.
    pub fn matches(&self, target: &(dyn std::error::Error + 'static)) -> bool {
        find_in_chain::<Self>(target)
            .is_some_and(|found| found.code == self.code && found.reason == self.reason)
    }
}

/// Walks `err` and its source chain looking for a link of type `T`.
pub(crate) fn find_in_chain<'a, T: std::error::Error + 'static>(
    err: &'a (dyn std::error::Error + 'static),
) -> Option<&'a T> {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(link) = current {
        if let Some(found) = link.downcast_ref::<T>() {
            return Some(found);
        }
        current = link.source();
    }
    None
}
