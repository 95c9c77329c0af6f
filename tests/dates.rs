#[cfg(test)]
mod tests {
    use taskboard::libs::date::{CalendarDate, CalendarPolicy, Clock, DateError, FixedClock, SystemClock};

    fn date(raw: &str) -> CalendarDate {
        CalendarDate::parse(raw).unwrap()
    }

    #[test]
    fn test_parse_plain_date() {
        let d = date("2025-03-01");
        assert_eq!(d.to_string(), "2025-03-01");
        assert_eq!(d, CalendarDate::from_ymd(2025, 3, 1).unwrap());
    }

    #[test]
    fn test_iso_datetime_normalizes_to_same_day() {
        assert_eq!(date("2025-03-01T00:00:00Z"), date("2025-03-01"));
        assert_eq!(date("2025-03-01T23:59:59.999Z"), date("2025-03-01"));
        assert_eq!(date("2025-03-01T10:00:00+03:00").to_string(), "2025-03-01");
    }

    #[test]
    fn test_spreadsheet_cell_form_keeps_date_part() {
        assert_eq!(date("2025-03-01 14:30:00"), date("2025-03-01"));
        assert_eq!(date("  2025-03-01  "), date("2025-03-01"));
    }

    #[test]
    fn test_unparseable_and_empty_dates() {
        assert_eq!(CalendarDate::parse(""), Err(DateError::Empty));
        assert_eq!(CalendarDate::parse("   "), Err(DateError::Empty));
        assert!(matches!(CalendarDate::parse("01/03/2025"), Err(DateError::Unparseable(_))));
        assert!(matches!(CalendarDate::parse("2025-02-30"), Err(DateError::Unparseable(_))));
        assert!(CalendarDate::from_ymd(2025, 2, 29).is_none());
    }

    #[test]
    fn test_ordering_matches_text_ordering() {
        let dates = ["2024-12-31", "2025-01-01", "2025-01-10", "2025-02-01"];
        for pair in dates.windows(2) {
            assert!(date(pair[0]) < date(pair[1]));
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_weekday_index_and_day() {
        // 2025-01-05 is a Sunday.
        assert_eq!(date("2025-01-05").weekday_index(), 0);
        assert_eq!(date("2025-01-06").weekday_index(), 1);
        assert_eq!(date("2025-01-11").weekday_index(), 6);
        assert_eq!(date("2025-01-31").day(), 31);
    }

    #[test]
    fn test_succ_and_add_days_cross_month_and_year() {
        assert_eq!(date("2025-01-31").succ(), date("2025-02-01"));
        assert_eq!(date("2024-12-31").succ(), date("2025-01-01"));
        assert_eq!(date("2024-02-28").add_days(1), date("2024-02-29"));
        assert_eq!(date("2025-03-10").add_days(-10), date("2025-02-28"));
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let d = date("2025-03-01");
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"2025-03-01\"");
        let back: CalendarDate = serde_json::from_str("\"2025-03-01T12:00:00Z\"").unwrap();
        assert_eq!(back, d);
        assert!(serde_json::from_str::<CalendarDate>("\"tomorrow\"").is_err());
    }

    #[test]
    fn test_fixed_clock_returns_its_day() {
        let clock = FixedClock(date("2025-06-15"));
        assert_eq!(clock.today(), date("2025-06-15"));
    }

    #[test]
    fn test_calendar_policy_from_offset() {
        assert_eq!(CalendarPolicy::from_offset(None), CalendarPolicy::HostLocal);
        assert_eq!(CalendarPolicy::from_offset(Some(3)), CalendarPolicy::FixedOffset(3));
    }

    #[test]
    fn test_system_clock_at_fixed_offset_is_near_utc_day() {
        let utc_today = CalendarDate::new(chrono::Utc::now().date_naive());
        let today = SystemClock::new(CalendarPolicy::FixedOffset(0)).today();
        // A pass sampled around midnight may cross the boundary.
        assert!(today == utc_today || today == utc_today.succ() || today.succ() == utc_today);
        assert_eq!(SystemClock::new(CalendarPolicy::FixedOffset(5)).policy(), CalendarPolicy::FixedOffset(5));
    }
}
