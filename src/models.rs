use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Single,
    #[default]
    Range,
}

/// How clicks map onto endpoints while in range mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// First click starts the range, second click ends it.
    #[default]
    FreeClick,
    /// The left calendar sets the start, the right calendar sets the end.
    PerCalendar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPolicy {
    Linked,
    Independent,
    SingleCalendar,
}

impl NavigationPolicy {
    pub fn for_mode(mode: Mode, range_policy: RangePolicy) -> Self {
        match (mode, range_policy) {
            (Mode::Single, _) => NavigationPolicy::SingleCalendar,
            (Mode::Range, RangePolicy::FreeClick) => NavigationPolicy::Linked,
            (Mode::Range, RangePolicy::PerCalendar) => NavigationPolicy::Independent,
        }
    }

    pub fn calendar_count(self) -> usize {
        match self {
            NavigationPolicy::SingleCalendar => 1,
            NavigationPolicy::Linked | NavigationPolicy::Independent => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarSide {
    Left,
    Right,
}

impl CalendarSide {
    pub fn index(self) -> usize {
        match self {
            CalendarSide::Left => 0,
            CalendarSide::Right => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(CalendarSide::Left),
            1 => Some(CalendarSide::Right),
            _ => None,
        }
    }

    pub fn other(self) -> Self {
        match self {
            CalendarSide::Left => CalendarSide::Right,
            CalendarSide::Right => CalendarSide::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Backward,
    Forward,
}

impl PageDirection {
    pub fn delta(self) -> i32 {
        match self {
            PageDirection::Backward => -1,
            PageDirection::Forward => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayRole {
    None,
    Start,
    End,
    InRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Single {
        day: Option<NaiveDate>,
    },
    Range {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl Selection {
    pub fn empty(mode: Mode) -> Self {
        match mode {
            Mode::Single => Selection::Single { day: None },
            Mode::Range => Selection::Range {
                start: None,
                end: None,
            },
        }
    }

    pub fn single(day: NaiveDate) -> Self {
        Selection::Single { day: Some(day) }
    }

    /// A complete range with its endpoints put in order.
    pub fn range(first: NaiveDate, second: NaiveDate) -> Self {
        let (start, end) = if first <= second {
            (first, second)
        } else {
            (second, first)
        };
        Selection::Range {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Selection::Single { .. } => Mode::Single,
            Selection::Range { .. } => Mode::Range,
        }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        match *self {
            Selection::Single { day } => day,
            Selection::Range { start, .. } => start,
        }
    }

    pub fn end(&self) -> Option<NaiveDate> {
        match *self {
            Selection::Single { day } => day,
            Selection::Range { end, .. } => end,
        }
    }

    pub fn is_complete(&self) -> bool {
        match *self {
            Selection::Single { day } => day.is_some(),
            Selection::Range { start, end } => start.is_some() && end.is_some(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match *self {
            Selection::Single { day } => day.is_none(),
            Selection::Range { start, end } => start.is_none() && end.is_none(),
        }
    }

    /// Reshapes the selection for another mode, keeping the start day.
    pub fn coerce(self, mode: Mode) -> Self {
        match (self, mode) {
            (Selection::Single { .. }, Mode::Single) | (Selection::Range { .. }, Mode::Range) => {
                self
            }
            (Selection::Range { start, .. }, Mode::Single) => Selection::Single { day: start },
            (Selection::Single { day }, Mode::Range) => Selection::Range {
                start: day,
                end: day,
            },
        }
    }
}
