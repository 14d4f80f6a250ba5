/// Auxiliary tables (automation runs, webhook attempts) use BIGSERIAL keys.
pub type DbId = i64;

/// Products are keyed by UUID, matching the hosted backend's row ids.
pub type ProductId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
