use chrono::Utc;

/// Current time in unix milliseconds, the unit every document timestamp
/// uses.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
