//! Due-date resolution for todos.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use super::{add_days, days_in_month, end_of_day, next_month};
use crate::rules::Rule;
use crate::types::ResolvedDate;

/// What a day token means for a deadline.
#[derive(Debug, Clone, Copy)]
enum DayToken {
    /// Fixed number of days from today.
    Offset(u64),
    /// The Sunday closing the current week.
    EndOfWeek,
}

struct DuePatterns {
    // Day-of-month families, tried in order. Group `d` is the day.
    day_of_month: Vec<Rule>,
    day_tokens: Vec<(Rule, DayToken)>,
}

fn patterns() -> &'static DuePatterns {
    static PATTERNS: OnceLock<DuePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| DuePatterns {
        day_of_month: vec![
            Rule::new(
                "deadline",
                r"\b(?:deadline|batas(?:\s+waktu)?|sampai|hingga)[\s:]+(?:tanggal\s+|tgl\.?\s*)?(?P<d>\d{1,2})\b",
            ),
            Rule::new(
                "finish",
                r"\b(?:selesai|finish)[\s:]+(?:tanggal\s+|tgl\.?\s*)?(?P<d>\d{1,2})\b",
            ),
        ],
        day_tokens: vec![
            (Rule::new("besok", r"\bbesok\b"), DayToken::Offset(1)),
            (Rule::new("lusa", r"\blusa\b"), DayToken::Offset(2)),
            (Rule::new("hari-ini", r"\bhari\s+ini\b"), DayToken::Offset(0)),
            (Rule::new("minggu-ini", r"\bminggu\s+ini\b"), DayToken::EndOfWeek),
            (Rule::new("minggu-depan", r"\bminggu\s+depan\b"), DayToken::Offset(7)),
        ],
    })
}

/// Resolve a todo deadline.
///
/// A day-of-month expression (`deadline tanggal 5`, `selesai 20`) means that
/// day in the current month, or in the next month once it has passed. Day
/// numbers past the end of a month are clamped to its last day. Without one,
/// day tokens such as `besok` or `minggu ini` are used. Deadlines are always
/// 23:59:59.999 on the due day.
///
/// Returns `None` when the message names no deadline.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use quibly_core::temporal::parse_due_date;
///
/// let now = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let due = parse_due_date("deadline tanggal 5", now).unwrap();
/// assert_eq!(due.at.to_string(), "2025-07-05 23:59:59.999");
/// ```
#[must_use]
pub fn parse_due_date(message: &str, now: NaiveDateTime) -> Option<ResolvedDate> {
    let lower = message.to_lowercase();
    let patterns = patterns();

    for rule in &patterns.day_of_month {
        let Some(caps) = rule.pattern.captures(&lower) else {
            continue;
        };
        let Some(day) = caps["d"].parse::<u32>().ok().filter(|d| (1..=31).contains(d)) else {
            tracing::debug!(rule = rule.id, matched = &caps[0], "day of month out of range");
            continue;
        };
        let at = resolve_day_of_month(day, now)?;
        tracing::trace!(rule = rule.id, day, %at, "resolved due date");
        return Some(ResolvedDate { at, rule: rule.id });
    }

    let (rule, token) = patterns
        .day_tokens
        .iter()
        .find(|(rule, _)| rule.is_match(&lower))?;
    let today = now.date();
    let date = match *token {
        DayToken::Offset(days) => add_days(today, days)?,
        DayToken::EndOfWeek => {
            let days_left = 6 - u64::from(today.weekday().num_days_from_monday());
            add_days(today, days_left)?
        }
    };
    let at = end_of_day(date)?;
    tracing::trace!(rule = rule.id, %at, "resolved due date");
    Some(ResolvedDate { at, rule: rule.id })
}

/// End of day `day` this month, or next month if that moment is not after `now`.
fn resolve_day_of_month(day: u32, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let this_month = end_of_day(clamped_date(now.year(), now.month(), day)?)?;
    if this_month > now {
        return Some(this_month);
    }
    let (year, month) = next_month(now.year(), now.month());
    end_of_day(clamped_date(year, month, day)?)
}

fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day.min(days_in_month(year, month)))
}
