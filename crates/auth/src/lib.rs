//! `stockroom-auth`: minimal authentication/authorization boundary.
//!
//! Decoupled from HTTP and storage: the API layer verifies credentials,
//! opens a session, and checks capabilities here before calling the data
//! layer. The data layer itself knows nothing about roles.

pub mod authorize;
pub mod credentials;
pub mod permissions;
pub mod roles;
pub mod session;

pub use authorize::{AuthzError, authorize, permissions_for};
pub use credentials::{Account, Credentials};
pub use permissions::Permission;
pub use roles::Role;
pub use session::{Session, SessionStore, SessionToken};
