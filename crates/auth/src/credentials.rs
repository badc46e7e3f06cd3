//! Configured operator accounts.

use subtle::ConstantTimeEq;

use crate::Role;

/// A username/password pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Compare against a login attempt.
    ///
    /// Both fields are always compared, each in constant time.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let user_ok = self.username.as_bytes().ct_eq(username.as_bytes());
        let pass_ok = self.password.as_bytes().ct_eq(password.as_bytes());
        bool::from(user_ok & pass_ok)
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Credentials bound to the role a successful login receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub credentials: Credentials,
    pub role: Role,
}

impl Account {
    pub fn new(credentials: Credentials, role: Role) -> Self {
        Self { credentials, role }
    }
}
