/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Monetary amounts are whole currency units stored as BIGINT.
///
/// Derived financial fields are compared with exact equality, so amounts
/// never pass through floating point.
pub type Money = i64;
