//! Clock-time resolution for reminders.

use std::sync::OnceLock;

use chrono::{Duration, NaiveDateTime};
use regex::{Captures, Regex};

use super::{add_days, DayPart};
use crate::rules::Rule;
use crate::types::{ResolvedTime, TimeSource};

const MINUTES_PER_DAY: u32 = 24 * 60;

struct ClockPatterns {
    // "dalam 30 menit", "dalam 2 jam"
    relative_offset: Regex,
    // Clock-time families, tried in order. Each exposes the groups
    // `h` (hour), `m` (optional minute) and `p` (optional day part).
    clock: Vec<Rule>,
    // Day tokens that pin the date, with the number of days they add.
    day_tokens: Vec<(Rule, u64)>,
}

fn patterns() -> &'static ClockPatterns {
    static PATTERNS: OnceLock<ClockPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| ClockPatterns {
        relative_offset: Regex::new(r"\bdalam\s+(?P<n>\d+)\s*(?P<unit>menit|jam)\b").unwrap(),
        clock: vec![
            // jam 9, pukul 07.30, jam 4 sore
            Rule::new(
                "jam-pukul",
                r"\b(?:jam|pukul)\s*(?P<h>\d{1,2})(?:[:.](?P<m>\d{1,2}))?(?:\s*(?P<p>pagi|siang|sore|malam))?\b",
            ),
            // 9pm, 3:30 am
            Rule::new(
                "meridiem",
                r"\b(?P<h>\d{1,2})(?::(?P<m>\d{1,2}))?\s*(?P<p>am|pm)\b",
            ),
            // 8 pagi, 9 malam
            Rule::new(
                "day-part",
                r"\b(?P<h>\d{1,2})\s*(?P<p>pagi|siang|sore|malam)\b",
            ),
        ],
        day_tokens: vec![
            (Rule::new("besok", r"\bbesok\b"), 1),
            (Rule::new("lusa", r"\blusa\b"), 2),
            (Rule::new("minggu-depan", r"\bminggu\s+depan\b"), 7),
        ],
    })
}

/// Resolve the time a reminder should fire.
///
/// `dalam N menit|jam` takes priority and is added straight onto `now`.
/// Otherwise the first clock-time family that matches gives the hour and
/// minute. Values past the end of the day carry into the next day
/// (`jam 13 sore` is 01:00 tomorrow). A day token moves the date forward,
/// and without one a time that has already passed today rolls over to
/// tomorrow.
///
/// Returns `None` when the message has no usable time expression; callers
/// pick their own default.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use quibly_core::temporal::parse_time_of_day;
///
/// let now = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap().and_hms_opt(10, 0, 0).unwrap();
/// let resolved = parse_time_of_day("jam 9 malam", now).unwrap();
/// assert_eq!(resolved.at.to_string(), "2026-10-18 21:00:00");
/// ```
#[must_use]
pub fn parse_time_of_day(message: &str, now: NaiveDateTime) -> Option<ResolvedTime> {
    let lower = message.to_lowercase();
    let patterns = patterns();

    if let Some(at) = parse_relative_offset(&patterns.relative_offset, &lower, now) {
        return Some(ResolvedTime {
            at,
            source: TimeSource::RelativeOffset,
        });
    }

    for rule in &patterns.clock {
        let Some(caps) = rule.pattern.captures(&lower) else {
            continue;
        };
        let Some(minutes) = clock_from_captures(&caps) else {
            continue;
        };
        let carry_days = u64::from(minutes / MINUTES_PER_DAY);
        let hour = (minutes % MINUTES_PER_DAY) / 60;
        let minute = minutes % 60;

        let day_token = patterns
            .day_tokens
            .iter()
            .find(|(token, _)| token.is_match(&lower));
        let day_offset = day_token.map_or(0, |(_, days)| *days);

        let date = add_days(now.date(), day_offset + carry_days)?;
        let mut at = date.and_hms_opt(hour, minute, 0)?;
        let mut rolled_over = false;
        if day_token.is_none() && at <= now {
            at += Duration::days(1);
            rolled_over = true;
        }

        tracing::trace!(rule = rule.id, day_offset, carry_days, rolled_over, %at, "resolved clock time");
        return Some(ResolvedTime {
            at,
            source: TimeSource::ClockTime {
                rule: rule.id,
                day_offset: day_offset as i64,
                rolled_over,
            },
        });
    }

    None
}

/// `dalam N menit|jam` → `now + N`. Numbers too large to represent fall
/// through to the clock-time rules.
fn parse_relative_offset(pattern: &Regex, lower: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let caps = pattern.captures(lower)?;
    let n: i64 = caps["n"].parse().ok()?;
    let offset = match &caps["unit"] {
        "menit" => Duration::try_minutes(n)?,
        _ => Duration::try_hours(n)?,
    };
    now.checked_add_signed(offset)
}

/// Minutes after midnight in 24-hour form. May run past one day.
fn clock_from_captures(caps: &Captures<'_>) -> Option<u32> {
    let hour: u32 = caps.name("h")?.as_str().parse().ok()?;
    let minute: u32 = match caps.name("m") {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    let hour = match caps.name("p").and_then(|p| DayPart::from_word(p.as_str())) {
        Some(part) => part.to_24h(hour),
        None => hour,
    };
    Some(hour * 60 + minute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_jam_malam_same_day() {
        let now = at(2026, 10, 18, 10, 0);
        let r = parse_time_of_day("jam 9 malam", now).unwrap();
        assert_eq!(r.at, at(2026, 10, 18, 21, 0));
        assert_eq!(
            r.source,
            TimeSource::ClockTime {
                rule: "jam-pukul",
                day_offset: 0,
                rolled_over: false
            }
        );
    }

    #[test]
    fn test_jam_malam_rolls_over_when_passed() {
        let now = at(2026, 10, 18, 22, 0);
        let r = parse_time_of_day("jam 9 malam", now).unwrap();
        assert_eq!(r.at, at(2026, 10, 19, 21, 0));
        assert!(matches!(r.source, TimeSource::ClockTime { rolled_over: true, .. }));
    }

    #[test]
    fn test_exactly_now_rolls_over() {
        let now = at(2026, 10, 18, 21, 0);
        let r = parse_time_of_day("pukul 21:00", now).unwrap();
        assert_eq!(r.at, at(2026, 10, 19, 21, 0));
    }

    #[test]
    fn test_relative_offset_bypasses_day_tokens() {
        let now = at(2026, 10, 18, 10, 15);
        let r = parse_time_of_day("besok dalam 30 menit jam 9 malam", now).unwrap();
        assert_eq!(r.at, at(2026, 10, 18, 10, 45));
        assert_eq!(r.source, TimeSource::RelativeOffset);

        let r = parse_time_of_day("dalam 2 jam", now).unwrap();
        assert_eq!(r.at, at(2026, 10, 18, 12, 15));
    }

    #[test]
    fn test_day_token_pins_date_even_if_earlier() {
        let now = at(2026, 10, 18, 20, 0);
        let r = parse_time_of_day("besok jam 7 pagi", now).unwrap();
        assert_eq!(r.at, at(2026, 10, 19, 7, 0));

        let r = parse_time_of_day("lusa pukul 10", now).unwrap();
        assert_eq!(r.at, at(2026, 10, 20, 10, 0));

        let r = parse_time_of_day("minggu depan jam 8 malam", now).unwrap();
        assert_eq!(r.at, at(2026, 10, 25, 20, 0));
    }

    #[test]
    fn test_twelve_pagi_is_midnight() {
        let now = at(2026, 10, 18, 10, 0);
        let r = parse_time_of_day("jam 12 pagi", now).unwrap();
        assert_eq!(r.at.hour(), 0);
        // midnight today has passed, so it lands on tomorrow
        assert_eq!(r.at, at(2026, 10, 19, 0, 0));
    }

    #[test]
    fn test_sore_threshold() {
        let now = at(2026, 10, 18, 8, 0);
        assert_eq!(parse_time_of_day("jam 4 sore", now).unwrap().at.hour(), 16);
        assert_eq!(parse_time_of_day("jam 17 sore", now).unwrap().at.hour(), 17);
        // 13 and 16 are still below 17, so they shift past midnight
        assert_eq!(parse_time_of_day("jam 13 sore", now).unwrap().at, at(2026, 10, 19, 1, 0));
        assert_eq!(parse_time_of_day("jam 16 sore", now).unwrap().at, at(2026, 10, 19, 4, 0));
    }

    #[test]
    fn test_meridiem_and_day_part_families() {
        let now = at(2026, 10, 18, 8, 0);
        assert_eq!(parse_time_of_day("telpon ibu 3:30pm", now).unwrap().at, at(2026, 10, 18, 15, 30));
        assert_eq!(parse_time_of_day("meeting 12am", now).unwrap().at, at(2026, 10, 19, 0, 0));
        assert_eq!(parse_time_of_day("olahraga 9 malam", now).unwrap().at, at(2026, 10, 18, 21, 0));
        assert_eq!(parse_time_of_day("makan 1 siang", now).unwrap().at, at(2026, 10, 19, 1, 0));
    }

    #[test]
    fn test_dot_minute_separator() {
        let now = at(2026, 10, 18, 8, 0);
        let r = parse_time_of_day("pukul 19.45", now).unwrap();
        assert_eq!(r.at, at(2026, 10, 18, 19, 45));
    }

    #[test]
    fn test_overflow_carries_into_next_day() {
        let now = at(2026, 10, 18, 8, 0);
        let r = parse_time_of_day("jam 25 atau 9 malam", now).unwrap();
        assert_eq!(r.at, at(2026, 10, 19, 1, 0));
        assert!(matches!(
            r.source,
            TimeSource::ClockTime { rule: "jam-pukul", rolled_over: false, .. }
        ));

        assert_eq!(parse_time_of_day("pukul 9.75", now).unwrap().at, at(2026, 10, 18, 10, 15));
        // carry stacks on top of the day token
        assert_eq!(parse_time_of_day("besok jam 13 sore", now).unwrap().at, at(2026, 10, 20, 1, 0));
    }

    #[test]
    fn test_single_digit_minutes() {
        let now = at(2026, 10, 18, 8, 0);
        assert_eq!(parse_time_of_day("ngopi jam 9:5", now).unwrap().at, at(2026, 10, 18, 9, 5));
        assert_eq!(parse_time_of_day("call 3:7pm", now).unwrap().at, at(2026, 10, 18, 15, 7));
    }

    #[test]
    fn test_no_time_expression() {
        let now = at(2026, 10, 18, 8, 0);
        assert!(parse_time_of_day("ingatkan aku minum air", now).is_none());
    }
}
