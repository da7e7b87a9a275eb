// SPDX-License-Identifier: MIT

//! Shared helpers for date/time formatting.

use chrono::SecondsFormat;
use mongodb::bson;

/// Format a stored BSON timestamp as RFC3339 with a `Z` suffix.
pub fn format_bson_rfc3339(date: bson::DateTime) -> String {
    date.to_chrono().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bson_rfc3339() {
        let date = bson::DateTime::from_millis(1_704_103_200_000);
        assert_eq!(format_bson_rfc3339(date), "2024-01-01T10:00:00Z");
    }
}
