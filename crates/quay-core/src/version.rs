//! Version identifier generation.
//!
//! Default versions are timestamps formatted as `YYYYMMDD-HHMMSS` in UTC.
//! The format is fixed-width and zero-padded so that lexicographic string
//! order equals chronological order, which is what the store's descending
//! listing relies on.

use chrono::{DateTime, Utc};

use crate::types::VersionId;

/// Format an instant as a sortable version identifier.
#[must_use]
pub fn version_at(instant: DateTime<Utc>) -> VersionId {
    VersionId::new(instant.format("%Y%m%d-%H%M%S").to_string())
}

/// Generate a version identifier for the current instant.
///
/// Two calls within the same second produce the same identifier; callers
/// wanting collision safety must upload without force and handle the
/// resulting conflict refusal.
#[must_use]
pub fn timestamp_version() -> VersionId {
    version_at(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_width_zero_padded() {
        let early = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let id = version_at(early);
        assert_eq!(id.as_str(), "20240102-030405");
        assert_eq!(id.as_str().len(), 15);
    }

    #[test]
    fn lexicographic_order_matches_chronological() {
        let older = version_at(Utc.with_ymd_and_hms(2024, 9, 30, 23, 59, 59).unwrap());
        let newer = version_at(Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap());
        assert!(newer.as_str() > older.as_str());
    }
}
