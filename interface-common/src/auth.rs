use error_types::{ApiError, CustomResult};

/// Yes/no authorization decision: may `sub` perform `act` on `obj`?
///
/// The engine behind the decision (policy storage, role expansion) lives
/// outside this crate; request handlers consume the decision only.
pub trait Authorize {
    fn authorize(&self, sub: &str, obj: &str, act: &str) -> CustomResult<bool, ApiError>;
}

/// Runs an authorization check and converts the outcome into the canonical
/// error space: a deny becomes the permission-denied error carrying the
/// decision inputs as metadata, an engine failure becomes the internal
/// error.
pub fn enforce(
    authorizer: &dyn Authorize,
    sub: &str,
    obj: &str,
    act: &str,
) -> Result<(), ApiError> {
    match authorizer.authorize(sub, obj, act) {
        Ok(true) => Ok(()),
        Ok(false) => {
            Err(ApiError::permission_denied().kv(&["sub", sub, "obj", obj, "act", act]))
        }
        Err(report) => {
            tracing::error!(error = ?report, "authorization check failed");
            Err(ApiError::internal().with_message(report.to_string()))
        }
    }
}
