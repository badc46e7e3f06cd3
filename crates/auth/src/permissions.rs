use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Modeled as opaque strings (e.g. "parts.read"). The wildcard `"*"` grants
/// everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    /// Read the catalog: list, lookup, search, autofill.
    pub const PARTS_READ: Permission = Permission(Cow::Borrowed("parts.read"));
    /// Add/restock and issue parts.
    pub const PARTS_WRITE: Permission = Permission(Cow::Borrowed("parts.write"));
    /// Low-stock and top-issued reports.
    pub const REPORTS_READ: Permission = Permission(Cow::Borrowed("reports.read"));
    pub const WILDCARD: Permission = Permission(Cow::Borrowed("*"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
