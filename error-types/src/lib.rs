//! Canonical structured error model shared by the HTTP and gRPC surfaces.
//!
//! An [`error::ApiError`] carries an HTTP status code, a machine-readable
//! reason token, a user-facing message, and free-form metadata. The
//! [`status`] module translates it to and from `tonic::Status`, preserving
//! reason and metadata through a structured detail attachment.

pub mod error;
pub mod status;

pub use error::{reason, ApiError};
pub use status::{code_of, reason_of, IntoGrpcStatus, ResultExtGrpc};

/// Result type carrying an [`error_stack::Report`] of the given error context.
pub type CustomResult<T, E> = Result<T, error_stack::Report<E>>;
