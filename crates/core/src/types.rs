/// Primary keys and auth identities are UUIDs assigned by the backend.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (budget periods) carry no time zone.
pub type Date = chrono::NaiveDate;
