//! Month cursors for the visible calendars and the rules that move them.
//!
//! Paging and month/year jumps go through the same check: a move is judged
//! only by the month it lands on, never by how far it travels.

use chrono::NaiveDate;

use crate::bounds::Bounds;
use crate::dates::{add_months, month_start, same_month};
use crate::error::{PickerError, Result};
use crate::models::{CalendarSide, NavigationPolicy, PageDirection, Selection};

/// First-of-month dates shown by the left and right calendars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewCursors {
    pub left: NaiveDate,
    pub right: NaiveDate,
}

impl ViewCursors {
    pub fn adjacent(left: NaiveDate) -> Self {
        let left = month_start(left);
        Self {
            left,
            right: add_months(left, 1),
        }
    }

    pub fn get(&self, side: CalendarSide) -> NaiveDate {
        match side {
            CalendarSide::Left => self.left,
            CalendarSide::Right => self.right,
        }
    }
}

pub trait NavigationRule {
    /// Whether `side` may display the month starting at `target`.
    fn allows(
        &self,
        cursors: &ViewCursors,
        side: CalendarSide,
        target: NaiveDate,
        pending: &Selection,
    ) -> bool;

    /// Cursor positions once `side` has moved to an allowed `target`.
    fn settle(&self, cursors: ViewCursors, side: CalendarSide, target: NaiveDate) -> ViewCursors;
}

/// The right calendar always trails the left one.
pub struct LinkedRule;

impl NavigationRule for LinkedRule {
    fn allows(
        &self,
        cursors: &ViewCursors,
        side: CalendarSide,
        target: NaiveDate,
        _pending: &Selection,
    ) -> bool {
        match side {
            CalendarSide::Left => target < cursors.right,
            CalendarSide::Right => target > cursors.left,
        }
    }

    fn settle(&self, _cursors: ViewCursors, side: CalendarSide, target: NaiveDate) -> ViewCursors {
        match side {
            CalendarSide::Left => ViewCursors::adjacent(target),
            CalendarSide::Right => ViewCursors {
                left: add_months(target, -1),
                right: target,
            },
        }
    }
}

/// "From" and "to" calendars, each fenced only by the opposite endpoint.
pub struct IndependentRule;

impl NavigationRule for IndependentRule {
    fn allows(
        &self,
        _cursors: &ViewCursors,
        side: CalendarSide,
        target: NaiveDate,
        pending: &Selection,
    ) -> bool {
        match side {
            CalendarSide::Left => pending
                .end()
                .map(|end| target < month_start(end))
                .unwrap_or(true),
            CalendarSide::Right => pending
                .start()
                .map(|start| target > month_start(start))
                .unwrap_or(true),
        }
    }

    fn settle(&self, cursors: ViewCursors, side: CalendarSide, target: NaiveDate) -> ViewCursors {
        match side {
            CalendarSide::Left => ViewCursors {
                left: target,
                ..cursors
            },
            CalendarSide::Right => ViewCursors {
                right: target,
                ..cursors
            },
        }
    }
}

pub struct SingleCalendarRule;

impl NavigationRule for SingleCalendarRule {
    fn allows(
        &self,
        _cursors: &ViewCursors,
        side: CalendarSide,
        _target: NaiveDate,
        _pending: &Selection,
    ) -> bool {
        side == CalendarSide::Left
    }

    fn settle(&self, _cursors: ViewCursors, _side: CalendarSide, target: NaiveDate) -> ViewCursors {
        ViewCursors::adjacent(target)
    }
}

pub fn rule_for(policy: NavigationPolicy) -> &'static dyn NavigationRule {
    match policy {
        NavigationPolicy::Linked => &LinkedRule,
        NavigationPolicy::Independent => &IndependentRule,
        NavigationPolicy::SingleCalendar => &SingleCalendarRule,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    policy: NavigationPolicy,
    cursors: ViewCursors,
}

impl Navigator {
    pub fn new(policy: NavigationPolicy, anchor: NaiveDate) -> Self {
        Self {
            policy,
            cursors: ViewCursors::adjacent(anchor),
        }
    }

    pub fn policy(&self) -> NavigationPolicy {
        self.policy
    }

    pub fn cursors(&self) -> ViewCursors {
        self.cursors
    }

    pub fn calendar_count(&self) -> usize {
        self.policy.calendar_count()
    }

    /// The month shown by `side`, or `None` for a calendar that is not shown.
    pub fn cursor(&self, side: CalendarSide) -> Option<NaiveDate> {
        if side.index() >= self.calendar_count() {
            return None;
        }
        Some(self.cursors.get(side))
    }

    pub fn can_move(
        &self,
        side: CalendarSide,
        target: NaiveDate,
        pending: &Selection,
        bounds: &Bounds,
    ) -> bool {
        let target = month_start(target);
        rule_for(self.policy).allows(&self.cursors, side, target, pending)
            && !bounds.month_disabled(target)
    }

    pub fn can_page(
        &self,
        side: CalendarSide,
        direction: PageDirection,
        pending: &Selection,
        bounds: &Bounds,
    ) -> bool {
        match self.cursor(side) {
            Some(current) => {
                self.can_move(side, add_months(current, direction.delta()), pending, bounds)
            }
            None => false,
        }
    }

    pub fn page(
        &mut self,
        side: CalendarSide,
        direction: PageDirection,
        pending: &Selection,
        bounds: &Bounds,
    ) -> Result<NaiveDate> {
        let current = self.cursor(side).ok_or_else(|| refused(side, None))?;
        self.jump(side, add_months(current, direction.delta()), pending, bounds)
    }

    /// Moves `side` to the month containing `target`.
    pub fn jump(
        &mut self,
        side: CalendarSide,
        target: NaiveDate,
        pending: &Selection,
        bounds: &Bounds,
    ) -> Result<NaiveDate> {
        let target = month_start(target);
        if !self.can_move(side, target, pending, bounds) {
            log::debug!("refused {:?} calendar move to {}", side, target);
            return Err(refused(side, Some(target)));
        }
        self.cursors = rule_for(self.policy).settle(self.cursors, side, target);
        Ok(target)
    }

    /// Re-centres both calendars on `selection`. Returns `false` when the
    /// selection has no start day and the cursors were left alone.
    pub fn recenter(&mut self, selection: &Selection) -> bool {
        let Some(start) = selection.start() else {
            return false;
        };
        let left = month_start(start);
        let right = match selection.end() {
            Some(end) if !same_month(start, end) && month_start(end) > left => month_start(end),
            _ => add_months(left, 1),
        };
        self.cursors = ViewCursors { left, right };
        true
    }
}

fn refused(side: CalendarSide, target: Option<NaiveDate>) -> PickerError {
    let side = match side {
        CalendarSide::Left => "left",
        CalendarSide::Right => "right",
    };
    match target {
        Some(target) => {
            PickerError::NavigationRefused(format!("{side} calendar to {}", target.format("%Y-%m")))
        }
        None => PickerError::NavigationRefused(format!("{side} calendar is not shown")),
    }
}
