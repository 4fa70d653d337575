/// Player IDs are the document keys of the player store.
pub type PlayerId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
