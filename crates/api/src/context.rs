use stockroom_auth::{Role, SessionToken};

/// Session context for a request.
///
/// Inserted by the auth middleware; present on every protected route.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionContext {
    token: SessionToken,
    role: Role,
}

impl SessionContext {
    pub fn new(token: SessionToken, role: Role) -> Self {
        Self { token, role }
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
