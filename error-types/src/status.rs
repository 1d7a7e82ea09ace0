use std::collections::{BTreeMap, HashMap};

use tonic::{Code, Status};
use tonic_types::{ErrorDetails, StatusExt};

use crate::error::{find_in_chain, reason, ApiError};

/// Maps an HTTP status code onto the gRPC code space.
///
/// Together with [`from_grpc_code`] this forms the fixed translation table
/// between the two status domains; every catalog code round-trips.
pub fn to_grpc_code(code: u16) -> Code {
    match code {
        200 => Code::Ok,
        400 => Code::InvalidArgument,
        401 => Code::Unauthenticated,
        403 => Code::PermissionDenied,
        404 => Code::NotFound,
        408 => Code::Cancelled,
        409 => Code::Aborted,
        412 => Code::FailedPrecondition,
        416 => Code::OutOfRange,
        429 => Code::ResourceExhausted,
        500 => Code::Internal,
        501 => Code::Unimplemented,
        503 => Code::Unavailable,
        504 => Code::DeadlineExceeded,
        _ => Code::Unknown,
    }
}

/// Maps a gRPC code back onto the HTTP status code space.
pub fn from_grpc_code(code: Code) -> u16 {
    match code {
        Code::Ok => 200,
        Code::Cancelled => 408,
        Code::Unknown => 500,
        Code::InvalidArgument => 400,
        Code::DeadlineExceeded => 504,
        Code::NotFound => 404,
        Code::AlreadyExists => 409,
        Code::PermissionDenied => 403,
        Code::ResourceExhausted => 429,
        Code::FailedPrecondition => 412,
        Code::Aborted => 409,
        Code::OutOfRange => 416,
        Code::Unimplemented => 501,
        Code::Internal => 500,
        Code::Unavailable => 503,
        Code::DataLoss => 500,
        Code::Unauthenticated => 401,
    }
}

impl ApiError {
    /// Renders the error as a gRPC status. The reason and metadata travel in
    /// a `google.rpc.ErrorInfo` detail so they survive the hop; the message
    /// becomes the status message. Total: any error can be rendered.
    pub fn to_status(&self) -> Status {
        let metadata: HashMap<String, String> = self
            .metadata
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let details = ErrorDetails::with_error_info(self.reason.clone(), "", metadata);
        Status::with_error_details(to_grpc_code(self.code), self.message.clone(), details)
    }

    /// Rebuilds the canonical error from a gRPC status. The reason defaults
    /// to the internal-error token unless the status carries an `ErrorInfo`
    /// detail; with several attached, the first one wins and the rest are
    /// ignored.
    pub fn from_status(status: &Status) -> Self {
        let err = Self::new(
            from_grpc_code(status.code()),
            reason::INTERNAL_ERROR,
            status.message(),
        );
        match status.get_details_error_info() {
            Some(info) => {
                let metadata: BTreeMap<String, String> = info.metadata.into_iter().collect();
                Self {
                    reason: info.reason,
                    ..err
                }
                .with_metadata(metadata)
            }
            None => err,
        }
    }

    /// Classifies an arbitrary error into the canonical representation, in
    /// priority order: an `ApiError` anywhere in the source chain is
    /// returned as-is; a `tonic::Status` in the chain is translated via
    /// [`ApiError::from_status`]; anything else degrades to the internal
    /// error with the original error text as the message. Never fails.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        if let Some(api_error) = find_in_chain::<Self>(err) {
            return api_error.clone();
        }
        match find_in_chain::<Status>(err) {
            Some(status) => Self::from_status(status),
            None => Self::internal().with_message(err.to_string()),
        }
    }
}

impl From<ApiError> for Status {
    fn from(err: ApiError) -> Self {
        err.to_status()
    }
}

/// HTTP status code of an error; `None` reads as success.
pub fn code_of(err: Option<&(dyn std::error::Error + 'static)>) -> u16 {
    match err {
        None => ApiError::ok().code,
        Some(err) => ApiError::from_error(err).code,
    }
}

/// Reason token of an error; `None` reads as the internal-error token.
pub fn reason_of(err: Option<&(dyn std::error::Error + 'static)>) -> String {
    match err {
        None => ApiError::internal().reason,
        Some(err) => ApiError::from_error(err).reason,
    }
}

/// Converts a report into the gRPC status it should surface as.
pub trait IntoGrpcStatus {
    fn into_grpc_status(self) -> Status;
}

impl IntoGrpcStatus for error_stack::Report<ApiError> {
    fn into_grpc_status(self) -> Status {
        tracing::error!(error = ?self);
        self.current_context().to_status()
    }
}

pub trait ResultExtGrpc<T> {
    fn into_grpc_status(self) -> Result<T, Status>;
}

impl<T, E> ResultExtGrpc<T> for error_stack::Result<T, E>
where
    error_stack::Report<E>: IntoGrpcStatus,
{
    fn into_grpc_status(self) -> Result<T, Status> {
        match self {
            Ok(value) => Ok(value),
            Err(report) => Err(report.into_grpc_status()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use tonic_types::{ErrorDetail, ErrorInfo};

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("order handler failed")]
    struct HandlerError {
        #[source]
        source: ApiError,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("upstream call failed")]
    struct UpstreamError {
        #[source]
        source: Status,
    }

    #[test]
    fn status_round_trip_preserves_code_reason_metadata() {
        let original = ApiError::operation_failed()
            .with_message("stock 3 insufficient")
            .with_request_id("req-42")
            .kv(&["merchant_id", "m-7"]);

        let rebuilt = ApiError::from_error(&original.to_status());

        assert_eq!(rebuilt.code, original.code);
        assert_eq!(rebuilt.reason, original.reason);
        assert_eq!(rebuilt.message, original.message);
        assert_eq!(rebuilt.metadata, original.metadata);
    }

    #[test]
    fn opaque_error_degrades_to_internal() {
        let err = std::io::Error::other("disk offline");

        let classified = ApiError::from_error(&err);

        assert_eq!(classified.code, 500);
        assert_eq!(classified.reason, reason::INTERNAL_ERROR);
        assert_eq!(classified.message, "disk offline");
        assert!(classified.metadata.is_empty());
    }

    #[test]
    fn wrapped_api_error_is_returned_unchanged() {
        let wrapped = HandlerError {
            source: ApiError::not_found()
                .with_message("user 42 missing")
                .kv(&["user_id", "42"]),
        };

        let classified = ApiError::from_error(&wrapped);

        assert_eq!(classified.code, 404);
        assert_eq!(classified.reason, reason::NOT_FOUND);
        assert_eq!(classified.message, "user 42 missing");
        assert_eq!(classified.metadata.get("user_id").map(String::as_str), Some("42"));
    }

    #[test]
    fn wrapped_status_is_translated() {
        let wrapped = UpstreamError {
            source: Status::not_found("no such payment"),
        };

        let classified = ApiError::from_error(&wrapped);

        assert_eq!(classified.code, 404);
        assert_eq!(classified.reason, reason::INTERNAL_ERROR);
        assert_eq!(classified.message, "no such payment");
    }

    #[test]
    fn status_without_details_keeps_internal_reason() {
        let status = Status::new(Code::Aborted, "version conflict");

        let classified = ApiError::from_status(&status);

        assert_eq!(classified.code, 409);
        assert_eq!(classified.reason, reason::INTERNAL_ERROR);
        assert_eq!(classified.message, "version conflict");
        assert!(classified.metadata.is_empty());
    }

    #[test]
    fn first_error_info_detail_wins() {
        let first = ErrorInfo::new(
            "QuotaExhausted",
            "",
            HashMap::from([("tenant".to_string(), "t-1".to_string())]),
        );
        let second = ErrorInfo::new(
            "RateLimited",
            "",
            HashMap::from([("tenant".to_string(), "t-2".to_string())]),
        );
        let details: Vec<ErrorDetail> = vec![first.into(), second.into()];
        let status = Status::with_error_details_vec(Code::Aborted, "too many requests", details);

        let classified = ApiError::from_status(&status);

        assert_eq!(classified.reason, "QuotaExhausted");
        assert_eq!(classified.metadata.get("tenant").map(String::as_str), Some("t-1"));
    }

    #[test]
    fn code_and_reason_of_none_are_asymmetric() {
        assert_eq!(code_of(None), 200);
        assert_eq!(reason_of(None), reason::INTERNAL_ERROR);
    }

    #[test]
    fn code_and_reason_of_classified_errors() {
        let err = ApiError::unauthenticated();

        assert_eq!(code_of(Some(&err)), 401);
        assert_eq!(reason_of(Some(&err)), reason::UNAUTHENTICATED);
    }

    #[test]
    fn grpc_code_mapping_round_trips_for_catalog_codes() {
        for code in [200, 400, 401, 403, 404, 409, 500] {
            assert_eq!(from_grpc_code(to_grpc_code(code)), code);
        }
        // Non-bijective corners collapse onto the canonical HTTP side.
        assert_eq!(from_grpc_code(Code::AlreadyExists), 409);
        assert_eq!(from_grpc_code(Code::DataLoss), 500);
        assert_eq!(to_grpc_code(418), Code::Unknown);
    }

    #[test]
    fn report_renders_as_grpc_status() {
        let report = error_stack::Report::new(ApiError::invalid_argument());

        let status = report.into_grpc_status();

        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "Argument verification failed.");
    }

    #[test]
    fn result_ext_lifts_reports_into_status() {
        let result: error_stack::Result<(), ApiError> =
            Err(error_stack::Report::new(ApiError::permission_denied()));

        let status = result.into_grpc_status().unwrap_err();

        assert_eq!(status.code(), Code::PermissionDenied);
    }
}
