use crate::error::CoreError;
use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

/// Resolve an IANA timezone name
pub fn parse_timezone(timezone: &str) -> Result<Tz, CoreError> {
    Tz::from_str(timezone).map_err(|_| CoreError::InvalidTimezone(timezone.to_string()))
}

/// Validate IANA timezone name
pub fn validate_timezone(timezone: &str) -> Result<(), CoreError> {
    parse_timezone(timezone).map(|_| ())
}

/// Wall-clock time in `tz` at the given instant
pub fn to_local(utc: DateTime<Utc>, tz: &Tz) -> NaiveDateTime {
    utc.with_timezone(tz).naive_local()
}

/// Resolve a wall-clock time in `tz` to an instant.
///
/// Ambiguous times (the repeated hour when clocks fall back) resolve to the
/// earliest instant. Times inside a spring-forward gap are read with the UTC
/// offset in force before the gap, which moves them forward by the gap length.
pub fn localize(local: NaiveDateTime, tz: &Tz) -> Result<DateTime<Utc>, CoreError> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            // Gaps last hours at most; a day earlier is safely before it.
            let before_gap = tz
                .offset_from_local_datetime(&(local - Duration::days(1)))
                .earliest()
                .ok_or_else(|| CoreError::NonexistentLocalTime(format!("{} ({})", local, tz)))?;
            let utc = local - Duration::seconds(i64::from(before_gap.fix().local_minus_utc()));
            Ok(Utc.from_utc_datetime(&utc))
        }
    }
}

/// Get timezone offset string for display (e.g., "-05:00")
pub fn get_timezone_offset(timezone: &str, at_time: DateTime<Utc>) -> Result<String, CoreError> {
    let tz = parse_timezone(timezone)?;
    let local_dt = at_time.with_timezone(&tz);
    Ok(format!("{}", local_dt.format("%:z")))
}

/// Get timezone abbreviation (e.g., "EST", "EDT")
pub fn get_timezone_abbreviation(timezone: &str, at_time: DateTime<Utc>) -> Result<String, CoreError> {
    let tz = parse_timezone(timezone)?;
    let local_dt = at_time.with_timezone(&tz);
    Ok(format!("{}", local_dt.format("%Z")))
}

/// Format datetime with timezone-aware display
pub fn format_with_timezone(
    datetime: DateTime<Utc>,
    timezone: &str,
    format: &str,
) -> Result<String, CoreError> {
    let tz = parse_timezone(timezone)?;
    let local_dt = datetime.with_timezone(&tz);
    Ok(local_dt.format(format).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn naive(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_validate_timezone() {
        assert!(validate_timezone("UTC").is_ok());
        assert!(validate_timezone("America/New_York").is_ok());
        assert!(validate_timezone("US/Eastern").is_ok());
        assert!(matches!(
            validate_timezone("Invalid/Timezone"),
            Err(CoreError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_to_local() {
        let tz = parse_timezone("US/Central").unwrap();
        let utc = Utc.with_ymd_and_hms(2013, 8, 23, 0, 34, 55).unwrap();
        assert_eq!(to_local(utc, &tz), naive(2013, 8, 22, 19, 34, 55));
    }

    #[test]
    fn test_localize_regular_time() {
        let tz = parse_timezone("US/Eastern").unwrap();
        let utc = localize(naive(2013, 1, 16, 12, 0, 0), &tz).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2013, 1, 16, 17, 0, 0).unwrap());
    }

    #[test]
    fn test_localize_spring_forward_gap_moves_forward() {
        // 2013-03-10 02:00 EST jumped straight to 03:00 EDT
        let tz = parse_timezone("US/Eastern").unwrap();
        let utc = localize(naive(2013, 3, 10, 2, 30, 0), &tz).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2013, 3, 10, 7, 30, 0).unwrap());
        assert_eq!(to_local(utc, &tz), naive(2013, 3, 10, 3, 30, 0));
    }

    #[test]
    fn test_localize_fall_back_takes_earliest() {
        // 01:30 happened twice on 2013-11-03; the first is EDT
        let tz = parse_timezone("US/Eastern").unwrap();
        let utc = localize(naive(2013, 11, 3, 1, 30, 0), &tz).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2013, 11, 3, 5, 30, 0).unwrap());
    }

    #[test]
    fn test_timezone_offset() {
        let winter = Utc.with_ymd_and_hms(2013, 1, 15, 12, 0, 0).unwrap();
        let summer = Utc.with_ymd_and_hms(2013, 7, 15, 12, 0, 0).unwrap();
        assert_eq!(get_timezone_offset("US/Eastern", winter).unwrap(), "-05:00");
        assert_eq!(get_timezone_offset("US/Eastern", summer).unwrap(), "-04:00");
        assert!(get_timezone_offset("Nowhere", summer).is_err());
    }

    #[test]
    fn test_timezone_abbreviation() {
        let utc_time = Utc::now();
        let utc_abbr = get_timezone_abbreviation("UTC", utc_time).unwrap();
        assert_eq!(utc_abbr, "UTC");
        let summer = Utc.with_ymd_and_hms(2013, 7, 15, 12, 0, 0).unwrap();
        assert_eq!(get_timezone_abbreviation("US/Eastern", summer).unwrap(), "EDT");
    }

    #[test]
    fn test_format_with_timezone() {
        let instant = Utc.with_ymd_and_hms(2013, 9, 23, 0, 15, 10).unwrap();
        let formatted = format_with_timezone(instant, "US/Central", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(formatted, "2013-09-22 19:15:10");
    }
}
