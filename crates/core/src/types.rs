/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Organization identifier. Every dashboard and share belongs to exactly one.
pub type OrgId = i64;

/// Panel identifier, unique within one dashboard document.
pub type PanelId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
