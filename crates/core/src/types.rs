/// All row identifiers are UUIDs assigned by the client or the auth service.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
