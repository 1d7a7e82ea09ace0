use axum::extract::FromRequestParts;
use http::request::Parts;

use crate::consts;
use crate::headers::HeaderSource;

/// Request-scoped identity and correlation values, extracted once at the
/// serving boundary and carried through the call stack.
///
/// Absent headers read as `None`; handlers that require a value decide for
/// themselves how to fail.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: Option<String>,
    pub user_id: Option<String>,
    pub username: Option<String>,
}

impl RequestContext {
    /// Builds a context from any header container.
    pub fn from_headers<H: HeaderSource>(headers: &H) -> Self {
        Self {
            request_id: headers.get_header(consts::X_REQUEST_ID).map(str::to_owned),
            user_id: headers.get_header(consts::X_USER_ID).map(str::to_owned),
            username: headers.get_header(consts::X_USERNAME).map(str::to_owned),
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // The request-id middleware stores a fully populated context as an
        // extension; fall back to raw headers when it did not run.
        if let Some(context) = parts.extensions.get::<Self>() {
            return Ok(context.clone());
        }
        Ok(Self::from_headers(&parts.headers))
    }
}
