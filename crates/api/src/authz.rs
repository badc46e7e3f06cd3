//! API-side capability guard.
//!
//! Editor vs viewer is enforced here, before the data layer is called; the
//! stores themselves are role-agnostic.

use stockroom_auth::{AuthzError, Permission, authorize};

use crate::context::SessionContext;

/// Check that the current session holds `required`.
pub fn require(session: &SessionContext, required: &Permission) -> Result<(), AuthzError> {
    authorize(session.role(), required).inspect_err(|e| {
        tracing::warn!(role = %session.role(), error = %e, "request denied");
    })
}
