/// Batch job identifiers are random 128-bit UUIDs (v4), rendered as the
/// canonical hyphenated token on the wire.
pub type TaskId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
