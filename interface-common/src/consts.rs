//! Shared header and role constants.
//!
//! gRPC runs over HTTP/2, which forces header keys to lowercase, and several
//! HTTP proxies normalize casing anyway, so the wire header names are
//! lowercase across both transports. Keys starting with `x-` are custom
//! headers.

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Header carrying the caller's user ID. Unique throughout the user's
/// lifecycle.
pub const X_USER_ID: &str = "x-user-id";

/// Header carrying the caller's username.
pub const X_USERNAME: &str = "x-username";

/// Context headers propagated from the HTTP surface onto outbound gRPC
/// requests.
pub const CONTEXT_HEADERS: &[&str] = &[X_REQUEST_ID, X_USER_ID, X_USERNAME];

/// Role token for regular users.
pub const ROLE_USER: &str = "role::user";

/// Role token for administrators.
pub const ROLE_ADMIN: &str = "role::admin";

/// Username of the built-in administrator account.
pub const ADMIN_USERNAME: &str = "root";
