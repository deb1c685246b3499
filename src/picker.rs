use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::codec::{TextCodec, DEFAULT_PATTERN};
use crate::dates::{month_of, WeekStart};
use crate::error::{PickerError, Result};
use crate::locale::Locale;
use crate::models::{
    CalendarSide, DayRole, Mode, NavigationPolicy, PageDirection, RangePolicy, Selection,
};
use crate::navigator::{Navigator, ViewCursors};
use crate::presets::{build_presets, match_preset, Preset, PresetKind};
use crate::reducer::{awaiting_end, reduce_click, should_commit, Click};

/// Caller-supplied configuration. Every field has a default so a partial
/// JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerOptions {
    pub pattern: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_date: Option<NaiveDate>,
    pub mode: Mode,
    pub range_policy: RangePolicy,
    pub auto_commit: bool,
    pub presets: Vec<PresetKind>,
    pub locale: Locale,
    pub week_start: WeekStart,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            min_date: None,
            max_date: None,
            mode: Mode::Range,
            range_policy: RangePolicy::FreeClick,
            auto_commit: false,
            presets: PresetKind::defaults(),
            locale: Locale::default(),
            week_start: WeekStart::default(),
        }
    }
}

impl PickerOptions {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.min_date, self.max_date)
    }

    pub fn navigation_policy(&self) -> NavigationPolicy {
        NavigationPolicy::for_mode(self.mode, self.range_policy)
    }
}

/// Changes the host should react to, drained with
/// [`DatePicker::take_notifications`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    PendingChanged(Selection),
    Committed(Selection),
    Cancelled,
}

/// Selection controller behind a date or date-range picker.
///
/// Every method that handles an input event either applies it completely or
/// returns an error and leaves the picker exactly as it was.
pub struct DatePicker {
    options: PickerOptions,
    bounds: Bounds,
    codec: TextCodec,
    presets: Vec<Preset>,
    navigator: Navigator,
    committed: Selection,
    pending: Selection,
    hover: Option<NaiveDate>,
    open: bool,
    notifications: Vec<Notification>,
}

impl DatePicker {
    pub fn new(options: PickerOptions, committed: Selection) -> Self {
        Self::anchored(options, committed, Local::now().date_naive())
    }

    /// Like [`DatePicker::new`], with `today` deciding which month is shown
    /// when the committed selection is empty.
    pub fn anchored(options: PickerOptions, committed: Selection, today: NaiveDate) -> Self {
        let bounds = options.bounds();
        let committed = normalize(committed.coerce(options.mode));
        let anchor = committed.start().unwrap_or_else(|| clamp(today, &bounds));
        let mut navigator = Navigator::new(options.navigation_policy(), anchor);
        navigator.recenter(&committed);

        Self {
            codec: TextCodec::new(options.pattern.clone(), options.locale.clone()),
            presets: build_presets(&options.presets, options.mode),
            bounds,
            navigator,
            committed,
            pending: committed,
            hover: None,
            open: false,
            notifications: Vec::new(),
            options,
        }
    }

    /// Replaces the configured presets with caller-built ones.
    pub fn with_presets(mut self, presets: Vec<Preset>) -> Self {
        self.presets = presets;
        self
    }

    pub fn with_codec(mut self, codec: TextCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn options(&self) -> &PickerOptions {
        &self.options
    }

    pub fn mode(&self) -> Mode {
        self.options.mode
    }

    pub fn navigation_policy(&self) -> NavigationPolicy {
        self.navigator.policy()
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn codec(&self) -> &TextCodec {
        &self.codec
    }

    pub fn locale(&self) -> &Locale {
        &self.options.locale
    }

    pub fn week_start(&self) -> WeekStart {
        self.options.week_start
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn pending(&self) -> Selection {
        self.pending
    }

    pub fn committed(&self) -> Selection {
        self.committed
    }

    pub fn hover_preview(&self) -> Option<NaiveDate> {
        self.hover
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn calendar_count(&self) -> usize {
        self.navigator.calendar_count()
    }

    pub fn cursors(&self) -> ViewCursors {
        self.navigator.cursors()
    }

    pub fn cursor(&self, side: CalendarSide) -> Option<NaiveDate> {
        self.navigator.cursor(side)
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // ── lifecycle ───────────────────────────────────────────────────────

    /// Opens the picker with the pending selection seeded from the committed one.
    pub fn open(&mut self) {
        self.open = true;
        self.hover = None;
        self.pending = self.committed;
        self.notify_pending();
    }

    /// The caller replaced its committed value. Both calendars re-centre on it.
    pub fn set_committed(&mut self, selection: Selection) {
        let selection = normalize(selection.coerce(self.options.mode));
        self.committed = selection;
        self.pending = selection;
        self.hover = None;
        self.navigator.recenter(&selection);
        self.notify_pending();
    }

    /// Promotes the pending selection and closes the picker.
    pub fn apply(&mut self) {
        self.hover = None;
        self.commit();
        self.open = false;
    }

    /// Discards the pending selection and closes the picker.
    pub fn cancel(&mut self) {
        self.pending = self.committed;
        self.hover = None;
        self.open = false;
        log::info!("selection cancelled");
        self.notifications.push(Notification::Cancelled);
    }

    // ── input events ────────────────────────────────────────────────────

    pub fn click(&mut self, day: NaiveDate, side: CalendarSide) -> Result<()> {
        let next = reduce_click(
            &self.pending,
            Click::new(day, side),
            self.options.mode,
            self.options.range_policy,
            &self.bounds,
        )
        .inspect_err(|err| log::debug!("click rejected: {err}"))?;

        self.pending = next;
        self.hover = None;
        self.settle_transition();
        Ok(())
    }

    /// Pointer over a day cell. Only a free-click range waiting for its end
    /// shows a preview; everywhere else this is ignored.
    pub fn hover(&mut self, day: NaiveDate) -> bool {
        if self.navigation_policy() != NavigationPolicy::Linked || !awaiting_end(&self.pending) {
            return false;
        }
        if self.bounds.is_disabled(day) {
            return self.hover.take().is_some();
        }
        let changed = self.hover != Some(day);
        self.hover = Some(day);
        changed
    }

    pub fn leave_grid(&mut self) {
        self.hover = None;
    }

    /// Typed text from the input field. Invalid or out-of-range text leaves
    /// everything untouched.
    pub fn enter_text(&mut self, text: &str) -> Result<()> {
        let next = self
            .codec
            .parse(text, self.options.mode, &self.bounds)
            .inspect_err(|err| log::debug!("text rejected: {err}"))?;

        self.pending = next;
        self.hover = None;
        self.navigator.recenter(&next);
        self.settle_transition();
        Ok(())
    }

    /// Sets the pending selection straight to a preset's current value.
    ///
    /// Unknown indexes are ignored; presets reaching outside the bounds are
    /// rejected like any other disabled day.
    pub fn apply_preset(&mut self, index: usize) -> Result<()> {
        let Some(preset) = self.presets.get(index) else {
            return Ok(());
        };
        let next = normalize(preset.produce().coerce(self.options.mode));
        for day in [next.start(), next.end()].into_iter().flatten() {
            self.bounds.check(day)?;
        }

        self.pending = next;
        self.hover = None;
        self.navigator.recenter(&next);
        self.settle_transition();
        Ok(())
    }

    pub fn page(&mut self, side: CalendarSide, direction: PageDirection) -> Result<NaiveDate> {
        self.navigator
            .page(side, direction, &self.pending, &self.bounds)
    }

    /// Month/year quick jump; `month` is 1-based.
    pub fn jump(&mut self, side: CalendarSide, year: i32, month: u32) -> Result<NaiveDate> {
        let target = month_of(year, month).ok_or_else(|| {
            PickerError::NavigationRefused(format!("{year}-{month:02} is not a month"))
        })?;
        self.navigator.jump(side, target, &self.pending, &self.bounds)
    }

    /// Jumps `side` to `year`, keeping the month it currently shows.
    pub fn jump_year(&mut self, side: CalendarSide, year: i32) -> Result<NaiveDate> {
        let month = self
            .cursor(side)
            .map(|cursor| cursor.month())
            .unwrap_or(1);
        self.jump(side, year, month)
    }

    // ── derived views ───────────────────────────────────────────────────

    pub fn is_day_disabled(&self, day: NaiveDate) -> bool {
        self.bounds.is_disabled(day)
    }

    pub fn day_role(&self, day: NaiveDate) -> DayRole {
        let (start, end) = match (self.pending, self.hover) {
            (
                Selection::Range {
                    start: Some(start),
                    end: None,
                },
                Some(hover),
            ) => (Some(start.min(hover)), Some(start.max(hover))),
            (pending, _) => (pending.start(), pending.end()),
        };

        if start == Some(day) {
            return DayRole::Start;
        }
        if end == Some(day) {
            return DayRole::End;
        }
        match (start, end) {
            (Some(start), Some(end)) if start < day && day < end => DayRole::InRange,
            _ => DayRole::None,
        }
    }

    pub fn can_page(&self, side: CalendarSide, direction: PageDirection) -> bool {
        self.navigator
            .can_page(side, direction, &self.pending, &self.bounds)
    }

    pub fn matched_preset_index(&self) -> Option<usize> {
        match_preset(&self.pending, &self.presets)
    }

    pub fn is_preset_disabled(&self, index: usize) -> bool {
        match self.presets.get(index) {
            Some(preset) => {
                let produced = preset.produce();
                [produced.start(), produced.end()]
                    .into_iter()
                    .flatten()
                    .any(|day| self.bounds.is_disabled(day))
            }
            None => true,
        }
    }

    pub fn is_month_disabled(&self, side: CalendarSide, year: i32, month: u32) -> bool {
        match month_of(year, month) {
            Some(target) => !self
                .navigator
                .can_move(side, target, &self.pending, &self.bounds),
            None => true,
        }
    }

    pub fn is_year_disabled(&self, side: CalendarSide, year: i32) -> bool {
        self.bounds.year_disabled(year)
            || (1..=12).all(|month| self.is_month_disabled(side, year, month))
    }

    /// Text for the trigger/label: the committed value.
    pub fn display_text(&self) -> String {
        self.codec.format(&self.committed)
    }

    pub fn pending_text(&self) -> String {
        self.codec.format(&self.pending)
    }

    // ── internals ───────────────────────────────────────────────────────

    fn settle_transition(&mut self) {
        self.notify_pending();
        if should_commit(&self.pending, self.options.auto_commit) {
            self.commit();
        }
    }

    fn commit(&mut self) {
        self.committed = self.pending;
        log::info!("selection committed: {}", self.codec.format(&self.committed));
        self.notifications
            .push(Notification::Committed(self.committed));
    }

    fn notify_pending(&mut self) {
        self.notifications
            .push(Notification::PendingChanged(self.pending));
    }
}

fn normalize(selection: Selection) -> Selection {
    match selection {
        Selection::Range {
            start: Some(start),
            end: Some(end),
        } => Selection::range(start, end),
        other => other,
    }
}

fn clamp(day: NaiveDate, bounds: &Bounds) -> NaiveDate {
    match (bounds.min, bounds.max) {
        (Some(min), _) if day < min => min,
        (_, Some(max)) if day > max => max,
        _ => day,
    }
}
