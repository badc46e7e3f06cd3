//! HTTP API: JSON presentation layer over the catalog and transaction log.

pub mod app;
pub mod authz;
pub mod context;
pub mod middleware;
