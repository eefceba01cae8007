use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Process-wide sequence, started at a random point so concurrent
/// processes over the same database do not walk the same values.
static SEQUENCE: LazyLock<AtomicU64> = LazyLock::new(|| {
    use rand::Rng;
    AtomicU64::new(rand::thread_rng().gen_range(0..0x1000))
});

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: sequence counter (up to 4096 ids per ms without collision)
pub fn snowflake_id() -> i64 {
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let seq = (SEQUENCE.fetch_add(1, Ordering::Relaxed) & 0xFFF) as i64;
    (ts << 12) | seq
}

/// Validate a business date in `YYYY-MM-DD` form.
pub fn parse_date(date: &str) -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_ids_are_positive_and_distinct() {
        let a = snowflake_id();
        let b = snowflake_id();
        assert!(a > 0);
        assert!(b > 0);
        assert_ne!(a, b);
    }

    #[test]
    fn snowflake_bulk_generation_is_collision_free() {
        // A full sequence period in a tight loop; every id must be unique
        // no matter how many land in the same millisecond.
        let ids: std::collections::HashSet<i64> = (0..4096).map(|_| snowflake_id()).collect();
        assert_eq!(ids.len(), 4096);
    }

    #[test]
    fn parse_date_accepts_iso_and_rejects_garbage() {
        assert!(parse_date("2025-03-14").is_some());
        assert!(parse_date("14/03/2025").is_none());
        assert!(parse_date("").is_none());
    }
}
