//! Clock text formatting

/// `MM:SS`
pub fn format_time(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Big clock: bare two-digit seconds under 100, `MM:SS` otherwise
pub fn format_big_time(total_seconds: u32) -> String {
    if total_seconds < 100 {
        format!("{:02}", total_seconds)
    } else {
        format_time(total_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(75), "01:15");
        assert_eq!(format_time(600), "10:00");
    }

    #[test]
    fn big_clock_switches_at_one_hundred() {
        assert_eq!(format_big_time(0), "00");
        assert_eq!(format_big_time(7), "07");
        assert_eq!(format_big_time(99), "99");
        assert_eq!(format_big_time(100), "01:40");
    }
}
