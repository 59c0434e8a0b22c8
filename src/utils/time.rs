//! Time parsing and formatting utilities

/// Parser for user-entered times ("11", "0:11", "1:02:03")
pub struct TimeParser;

impl TimeParser {
    /// Parse a time string into whole seconds.
    ///
    /// Accepts a bare non-negative integer, `MM:SS` or `HH:MM:SS`. Returns
    /// `None` for anything else, including out-of-range minutes or seconds.
    pub fn parse(time_str: &str) -> Option<u64> {
        let time_str = time_str.trim();
        if time_str.is_empty() || time_str.starts_with('-') {
            return None;
        }

        let parts: Vec<&str> = time_str.split(':').collect();
        if !parts.iter().all(|p| is_digits(p)) {
            return None;
        }

        let values: Vec<u64> = parts
            .iter()
            .map(|p| p.parse::<u64>())
            .collect::<Result<_, _>>()
            .ok()?;

        match values.as_slice() {
            [seconds] => Some(*seconds),
            [minutes, seconds] => {
                if *seconds >= 60 {
                    return None;
                }
                minutes.checked_mul(60)?.checked_add(*seconds)
            }
            [hours, minutes, seconds] => {
                if *minutes >= 60 || *seconds >= 60 {
                    return None;
                }
                hours
                    .checked_mul(3600)?
                    .checked_add(minutes * 60)?
                    .checked_add(*seconds)
            }
            _ => None,
        }
    }

    /// Format seconds as `HH:MM:SS`; negative input renders as `00:00:00`
    pub fn format_hhmmss(seconds: i64) -> String {
        let seconds = seconds.max(0);
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        let secs = seconds % 60;
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    }

    /// Format fractional seconds, truncating toward zero first
    pub fn format_seconds(seconds: f64) -> String {
        Self::format_hhmmss(seconds as i64)
    }
}

fn is_digits(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_seconds() {
        assert_eq!(TimeParser::parse("11"), Some(11));
        assert_eq!(TimeParser::parse("  90 "), Some(90));
        assert_eq!(TimeParser::parse("0"), Some(0));
    }

    #[test]
    fn test_parse_colon_forms() {
        assert_eq!(TimeParser::parse("0:11"), Some(11));
        assert_eq!(TimeParser::parse("00:00:11"), Some(11));
        assert_eq!(TimeParser::parse("1:02:03"), Some(3723));
        assert_eq!(TimeParser::parse("90:00"), Some(5400));
        assert_eq!(TimeParser::parse("100:59:59"), Some(363599));
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert_eq!(TimeParser::parse(""), None);
        assert_eq!(TimeParser::parse("   "), None);
        assert_eq!(TimeParser::parse("-5"), None);
        assert_eq!(TimeParser::parse("1:60"), None);
        assert_eq!(TimeParser::parse("1:60:00"), None);
        assert_eq!(TimeParser::parse("1:00:60"), None);
        assert_eq!(TimeParser::parse("1:2:3:4"), None);
        assert_eq!(TimeParser::parse("1.5"), None);
        assert_eq!(TimeParser::parse("a:10"), None);
        assert_eq!(TimeParser::parse("1::10"), None);
        assert_eq!(TimeParser::parse("+5"), None);
    }

    #[test]
    fn test_format_hhmmss() {
        assert_eq!(TimeParser::format_hhmmss(3723), "01:02:03");
        assert_eq!(TimeParser::format_hhmmss(0), "00:00:00");
        assert_eq!(TimeParser::format_hhmmss(59), "00:00:59");
        assert_eq!(TimeParser::format_hhmmss(90061), "25:01:01");
        assert_eq!(TimeParser::format_hhmmss(-42), "00:00:00");
    }

    #[test]
    fn test_round_trip() {
        let seconds = TimeParser::parse("1:02:03").unwrap();
        assert_eq!(TimeParser::format_hhmmss(seconds as i64), "01:02:03");
    }

    #[test]
    fn test_format_seconds_truncates() {
        assert_eq!(TimeParser::format_seconds(61.9), "00:01:01");
    }
}
