//! Public dashboard access pipeline.
//!
//! Resolves an anonymous viewer's access token to an enabled share, fixes
//! the time window, extracts the requested panel's queries and synthesizes an
//! identity scoped to exactly the datasources those queries use.

pub mod access_token;
pub mod dashboard;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod memory_store;
pub mod metric_request;
pub mod panel_queries;
pub mod public_dashboard;
pub mod query_execution;
pub mod resolver;
pub mod service;
pub mod store;
pub mod time_window;
pub mod types;

#[cfg(test)]
mod testing;
