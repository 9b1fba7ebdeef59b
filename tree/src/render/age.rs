use chrono::{DateTime, Duration, Utc};

/// Concise relative age of `then` as seen from `now` ("now", "5m", "2h", "3d", "1mo", "2y").
///
/// Months are 30 days and years 365 days. Timestamps in the future read "now".
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);

    if elapsed < Duration::minutes(1) {
        "now".to_string()
    } else if elapsed < Duration::hours(1) {
        format!("{}m", elapsed.num_minutes())
    } else if elapsed < Duration::days(1) {
        format!("{}h", elapsed.num_hours())
    } else if elapsed < Duration::days(30) {
        format!("{}d", elapsed.num_days())
    } else if elapsed < Duration::days(365) {
        format!("{}mo", elapsed.num_days() / 30)
    } else {
        format!("{}y", elapsed.num_days() / 365)
    }
}
