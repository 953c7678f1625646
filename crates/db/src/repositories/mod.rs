//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod dashboard_repo;
pub mod public_dashboard_repo;

pub use dashboard_repo::DashboardRepo;
pub use public_dashboard_repo::PublicDashboardRepo;
