//! Formatting helpers shared by all segments.
//!
//! Output is meant for a plain ASCII terminal, so anything fetched from the
//! web should pass through [`clean_chars`] before it is displayed.

use chrono::{NaiveDate, Timelike};

/// Formats a time of day without zero-padding the hour.
///
/// # Example
/// ```
/// use chrono::NaiveTime;
/// use retrofeed::display::format_time;
///
/// let t = NaiveTime::from_hms_opt(14, 5, 0).unwrap();
/// assert_eq!(format_time(&t, true), "14:05");
/// assert_eq!(format_time(&t, false), "2:05PM");
/// ```
pub fn format_time<T: Timelike>(time: &T, use_24: bool) -> String {
    if use_24 {
        format!("{}:{:02}", time.hour(), time.minute())
    } else {
        let (is_pm, hour) = time.hour12();
        let suffix = if is_pm { "PM" } else { "AM" };
        format!("{}:{:02}{}", hour, time.minute(), suffix)
    }
}

/// Formats a date as `Weekday, Month Dth`.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use retrofeed::display::format_date;
///
/// let d = NaiveDate::from_ymd_opt(2026, 10, 22).unwrap();
/// assert_eq!(format_date(&d), "Thursday, October 22nd");
/// ```
pub fn format_date(date: &NaiveDate) -> String {
    use chrono::Datelike;

    let day = date.day();
    let suffix = match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    };
    format!("{} {}{}", date.format("%A, %B"), day, suffix)
}

/// Substitutes typographic characters with ASCII look-alikes and drops the rest.
///
/// Tabs become four spaces, line breaks and other control characters are
/// removed, and the result is trimmed.
pub fn clean_chars(s: &str) -> String {
    let mut cleaned = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\t' => cleaned.push_str("    "),
            ' '..='~' => cleaned.push(c),
            '\u{2013}'..='\u{2017}' => cleaned.push('-'),
            '\u{201C}' | '\u{201D}' => cleaned.push('"'),
            '\u{2018}' | '\u{2019}' => cleaned.push('\''),
            '\u{2022}' => cleaned.push('*'),
            '\u{2026}' => cleaned.push_str("..."),
            '\u{00A9}' => cleaned.push_str("(c)"),
            '\u{00AE}' => cleaned.push_str("(R)"),
            '\u{00D1}' => cleaned.push('N'),
            '\u{00F1}' => cleaned.push('n'),
            '\u{00A0}' => cleaned.push(' '),
            _ => {}
        }
    }
    cleaned.trim().to_string()
}

/// Removes anchor tags and turns `<br>` into line breaks.
///
/// Also undoes the JSON-style escaping (`<`, `\"`) found in markup that
/// was embedded in script blocks.
pub fn strip_tags(s: &str) -> String {
    let mut s = s.replace("\\u003c", "<").replace("\\\"", "\"").replace("</a>", "");
    while let Some(start) = s.find("<a") {
        let Some(end) = s[start..].find('>') else {
            break;
        };
        s.replace_range(start..start + end + 1, "");
    }
    s.replace("<br>", "\n").replace("<BR>", "\n")
}
