use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{month_end, month_start};
use crate::error::{PickerError, Result};

/// Optional inclusive limits on which days may be picked.
///
/// `min > max` is not rejected; it simply leaves every day disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<NaiveDate>,
}

impl Bounds {
    pub fn new(min: Option<NaiveDate>, max: Option<NaiveDate>) -> Self {
        Self { min, max }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_disabled(&self, day: NaiveDate) -> bool {
        is_disabled(day, self)
    }

    /// Rejects a disabled day with [`PickerError::OutOfBounds`].
    pub fn check(&self, day: NaiveDate) -> Result<NaiveDate> {
        if self.is_disabled(day) {
            return Err(PickerError::OutOfBounds(day));
        }
        Ok(day)
    }

    /// True when no day in `[first, last]` is selectable.
    pub fn span_disabled(&self, first: NaiveDate, last: NaiveDate) -> bool {
        let low = match self.min {
            Some(min) if min > first => min,
            _ => first,
        };
        let high = match self.max {
            Some(max) if max < last => max,
            _ => last,
        };
        low > high
    }

    pub fn month_disabled(&self, month: NaiveDate) -> bool {
        let first = month_start(month);
        self.span_disabled(first, month_end(first))
    }

    pub fn year_disabled(&self, year: i32) -> bool {
        match (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) {
            (Some(first), Some(last)) => self.span_disabled(first, last),
            _ => true,
        }
    }
}

pub fn is_disabled(day: NaiveDate, bounds: &Bounds) -> bool {
    let before_min = bounds.min.map(|min| day < min).unwrap_or(false);
    let after_max = bounds.max.map(|max| day > max).unwrap_or(false);
    before_min || after_max
}
