//! moment.js-style display patterns.
//!
//! Tracker settings describe timestamps with moment tokens (`YY-MM-DD HH:mm`).
//! They are translated once into chrono strftime strings.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, ParseResult, TimeZone};
use regex::Regex;

/// Tokens in longest-first order so that `YYYY` wins over `YY`.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\[[^\]]*\]|YYYY|YY|MMMM|MMM|MM|M|DD|D|dddd|ddd|HH|H|hh|h|mm|m|ss|s|SSS|A|a|ZZ|Z|X|x",
    )
    .unwrap()
});

/// A moment.js pattern compiled to a chrono format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MomentPattern {
    strftime: String,
}

impl MomentPattern {
    pub fn new(pattern: &str) -> Self {
        let mut strftime = String::with_capacity(pattern.len() * 2);
        let mut last = 0;
        for token in TOKEN_RE.find_iter(pattern) {
            push_literal(&mut strftime, &pattern[last..token.start()]);
            let text = token.as_str();
            if let Some(literal) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
                push_literal(&mut strftime, literal);
            } else {
                strftime.push_str(translate(text));
            }
            last = token.end();
        }
        push_literal(&mut strftime, &pattern[last..]);

        Self { strftime }
    }

    /// The equivalent chrono strftime string.
    pub fn strftime(&self) -> &str {
        &self.strftime
    }

    /// Renders `ts` with this pattern.
    pub fn format<Tz>(&self, ts: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        ts.format(&self.strftime).to_string()
    }

    /// Parses wall-clock text written in this pattern.
    ///
    /// Patterns without a time component parse to midnight.
    pub fn parse_naive(&self, text: &str) -> ParseResult<NaiveDateTime> {
        let text = text.trim();
        NaiveDateTime::parse_from_str(text, &self.strftime).or_else(|err| {
            NaiveDate::parse_from_str(text, &self.strftime)
                .map(|date| date.and_time(NaiveTime::MIN))
                .map_err(|_| err)
        })
    }
}

fn push_literal(out: &mut String, literal: &str) {
    for c in literal.chars() {
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
    }
}

fn translate(token: &str) -> &'static str {
    match token {
        "YYYY" => "%Y",
        "YY" => "%y",
        "MMMM" => "%B",
        "MMM" => "%b",
        "MM" => "%m",
        "M" => "%-m",
        "DD" => "%d",
        "D" => "%-d",
        "dddd" => "%A",
        "ddd" => "%a",
        "HH" => "%H",
        "H" => "%-H",
        "hh" => "%I",
        "h" => "%-I",
        "mm" => "%M",
        "m" => "%-M",
        "ss" => "%S",
        "s" => "%-S",
        "SSS" => "%3f",
        "A" => "%p",
        "a" => "%P",
        "ZZ" => "%z",
        "Z" => "%:z",
        "X" => "%s",
        "x" => "%s%3f",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, Utc};

    fn sample() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
    }

    #[test]
    fn default_display_pattern() {
        let pattern = MomentPattern::new("YY-MM-DD HH:mm:ss");
        assert_eq!(pattern.strftime(), "%y-%m-%d %H:%M:%S");
        assert_eq!(pattern.format(&sample()), "24-03-05 14:07:09");
    }

    #[test]
    fn unpadded_and_twelve_hour_tokens() {
        let pattern = MomentPattern::new("D.M.YYYY h:mm A");
        assert_eq!(pattern.format(&sample()), "5.3.2024 2:07 PM");
    }

    #[test]
    fn bracketed_text_and_percent_are_literal() {
        let pattern = MomentPattern::new("[Day] DD [at] HH:mm 100%");
        assert_eq!(pattern.format(&sample()), "Day 05 at 14:07 100%");
    }

    #[test]
    fn month_and_weekday_names() {
        let pattern = MomentPattern::new("dddd, MMMM D");
        assert_eq!(pattern.format(&sample()), "Tuesday, March 5");
    }

    #[test]
    fn unix_seconds_token() {
        let pattern = MomentPattern::new("X");
        assert_eq!(pattern.format(&sample()), sample().timestamp().to_string());
    }

    #[test]
    fn parses_editable_pattern() {
        let pattern = MomentPattern::new("YYYY-MM-DD HH:mm:ss");
        let parsed = pattern.parse_naive(" 2024-03-05 14:07:09 ").unwrap();
        assert_eq!(parsed, sample().naive_utc());
    }

    #[test]
    fn date_only_pattern_parses_to_midnight() {
        let pattern = MomentPattern::new("YYYY-MM-DD");
        let parsed = pattern.parse_naive("2024-03-05").unwrap();
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2024, 3, 5)
                .unwrap()
                .and_time(NaiveTime::MIN)
        );
    }

    #[test]
    fn parse_rejects_mismatched_text() {
        let pattern = MomentPattern::new("YYYY-MM-DD HH:mm:ss");
        assert!(pattern.parse_naive("yesterday").is_err());
    }
}
