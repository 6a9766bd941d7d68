use crate::utils::error::{HotelError, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Anything booked over a half-open `[check_in, check_out)` stay.
pub trait DateRanged {
    fn check_in(&self) -> NaiveDate;
    fn check_out(&self) -> NaiveDate;
}

/// Half-open `[start, end)` interval of nights. `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start >= end {
            return Err(HotelError::InvalidRange {
                check_in: start,
                check_out: end,
            });
        }
        Ok(Self { start, end })
    }

    /// 從兩個日期字串建立區間
    pub fn parse(check_in: &str, check_out: &str) -> Result<Self> {
        Self::new(validate_date(check_in)?, validate_date(check_out)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// `[a,b)` and `[c,d)` overlap iff `a < d && c < b`.
    pub fn overlaps(&self, other_check_in: NaiveDate, other_check_out: NaiveDate) -> bool {
        self.start < other_check_out && other_check_in < self.end
    }

    /// Night-of check: the check-in day counts, the check-out day does not.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn overlap_blocks_reservations<'a, T: DateRanged>(
        &self,
        collection: &'a [T],
    ) -> Vec<&'a T> {
        collection
            .iter()
            .filter(|item| self.overlaps(item.check_in(), item.check_out()))
            .collect()
    }
}

impl DateRanged for DateRange {
    fn check_in(&self) -> NaiveDate {
        self.start
    }

    fn check_out(&self) -> NaiveDate {
        self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

pub fn validate_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|e| HotelError::InvalidDate {
        value: date.to_string(),
        reason: e.to_string(),
    })
}
