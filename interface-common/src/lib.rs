//! Transport boundary glue shared by the HTTP (axum) and gRPC (tonic)
//! surfaces: header handling, request context, error-response rendering, and
//! the cross-cutting middleware.

pub mod auth;
pub mod config;
pub mod consts;
pub mod context;
pub mod error;
pub mod headers;
pub mod interceptor;
pub mod middleware;
pub mod response;
