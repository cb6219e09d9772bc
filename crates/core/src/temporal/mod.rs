//! Temporal expression parsing.
//!
//! Resolves the time expressions people actually type into a chat:
//! - Relative offsets: `dalam 30 menit`, `dalam 2 jam`
//! - Clock times: `jam 9 malam`, `pukul 07.30`, `4pm`, `8 pagi`
//! - Day tokens: `besok`, `lusa`, `minggu depan`, `minggu ini`
//! - Day-of-month deadlines: `deadline tanggal 5`, `selesai 20`
//!
//! Nothing in here reads the system clock. Every resolver takes `now`
//! explicitly so one message is resolved against a single instant.

mod clock_time;
mod due_date;

pub use clock_time::parse_time_of_day;
pub use due_date::parse_due_date;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Day-part words and English meridiem markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPart {
    /// Morning.
    Pagi,
    /// Midday.
    Siang,
    /// Late afternoon.
    Sore,
    /// Evening / night.
    Malam,
    Am,
    Pm,
}

impl DayPart {
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "pagi" => Some(Self::Pagi),
            "siang" => Some(Self::Siang),
            "sore" => Some(Self::Sore),
            "malam" => Some(Self::Malam),
            "am" => Some(Self::Am),
            "pm" => Some(Self::Pm),
            _ => None,
        }
    }

    /// Convert an hour written next to this day part into a 24-hour value.
    ///
    /// Each day part has its own rule and only one rule ever applies:
    /// `sore` shifts anything below 17, `malam`/`pm` shift anything below 12,
    /// `pagi`/`am` map 12 to midnight and `siang` passes through.
    /// The result is not range-checked here.
    #[must_use]
    pub fn to_24h(self, hour: u32) -> u32 {
        match self {
            Self::Malam | Self::Pm if hour < 12 => hour + 12,
            Self::Sore if hour < 17 => hour + 12,
            Self::Pagi | Self::Am if hour == 12 => 0,
            _ => hour,
        }
    }
}

/// 23:59:59.999 on `date`.
#[must_use]
pub fn end_of_day(date: NaiveDate) -> Option<NaiveDateTime> {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).map(|t| date.and_time(t))
}

/// `date` moved forward by `days`.
pub(crate) fn add_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(days))
}

/// Year and month following the given month.
pub(crate) fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Number of days in a month.
pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = next_month(year, month);
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|first| first.pred_opt())
        .map_or(28, |last| last.day())
}
