use chrono::NaiveDate;

use crate::bounds::Bounds;
use crate::error::Result;
use crate::models::{CalendarSide, Mode, RangePolicy, Selection};

/// A day chosen on one of the calendars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Click {
    pub day: NaiveDate,
    pub side: CalendarSide,
}

impl Click {
    pub fn new(day: NaiveDate, side: CalendarSide) -> Self {
        Self { day, side }
    }
}

/// True while a free-click range has its start and waits for the end.
pub fn awaiting_end(pending: &Selection) -> bool {
    matches!(
        pending,
        Selection::Range {
            start: Some(_),
            end: None
        }
    )
}

/// Next pending selection after `click`, or an error when the day is disabled.
pub fn reduce_click(
    pending: &Selection,
    click: Click,
    mode: Mode,
    range_policy: RangePolicy,
    bounds: &Bounds,
) -> Result<Selection> {
    let day = bounds.check(click.day)?;
    let pending = pending.coerce(mode);

    let next = match (mode, range_policy) {
        (Mode::Single, _) => Selection::single(day),
        (Mode::Range, RangePolicy::FreeClick) => free_click(&pending, day),
        (Mode::Range, RangePolicy::PerCalendar) => per_calendar(&pending, day, click.side),
    };
    Ok(next)
}

fn free_click(pending: &Selection, day: NaiveDate) -> Selection {
    match *pending {
        Selection::Range {
            start: Some(start),
            end: None,
        } => Selection::range(start, day),
        _ => Selection::Range {
            start: Some(day),
            end: None,
        },
    }
}

fn per_calendar(pending: &Selection, day: NaiveDate, side: CalendarSide) -> Selection {
    let (start, end) = (pending.start(), pending.end());
    match side {
        CalendarSide::Left => match end {
            Some(end) if day > end => Selection::Range {
                start: Some(end),
                end: Some(day),
            },
            _ => Selection::Range {
                start: Some(day),
                end,
            },
        },
        CalendarSide::Right => match start {
            Some(start) if day < start => Selection::Range {
                start: Some(day),
                end: Some(start),
            },
            _ => Selection::Range {
                start,
                end: Some(day),
            },
        },
    }
}

/// Whether a transition that produced `next` goes straight to the caller.
pub fn should_commit(next: &Selection, auto_commit: bool) -> bool {
    auto_commit && next.is_complete()
}
