use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::dates::{add_months, month_end, month_start};
use crate::models::{Mode, Selection};

/// A labelled shortcut. `produce` runs on every query so relative presets
/// such as "Today" follow the clock.
pub struct Preset {
    label: String,
    produce: Box<dyn Fn() -> Selection>,
}

impl Preset {
    pub fn new(label: impl Into<String>, produce: impl Fn() -> Selection + 'static) -> Self {
        Self {
            label: label.into(),
            produce: Box::new(produce),
        }
    }

    /// A preset that always yields the same selection.
    pub fn fixed(label: impl Into<String>, selection: Selection) -> Self {
        Self::new(label, move || selection)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn produce(&self) -> Selection {
        (self.produce)()
    }
}

impl std::fmt::Debug for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preset").field("label", &self.label).finish()
    }
}

/// Built-in relative presets that can be named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetKind {
    Today,
    Yesterday,
    Last7Days,
    Last30Days,
    ThisMonth,
    LastMonth,
}

impl PresetKind {
    pub fn label(self) -> &'static str {
        match self {
            PresetKind::Today => "Today",
            PresetKind::Yesterday => "Yesterday",
            PresetKind::Last7Days => "Last 7 days",
            PresetKind::Last30Days => "Last 30 days",
            PresetKind::ThisMonth => "This month",
            PresetKind::LastMonth => "Last month",
        }
    }

    /// The selection this preset stands for when the current day is `today`.
    /// Span presets have no single-day meaning and yield `None` in single mode.
    pub fn selection(self, today: NaiveDate, mode: Mode) -> Option<Selection> {
        let (start, end) = match self {
            PresetKind::Today => (today, today),
            PresetKind::Yesterday => {
                let day = today - Duration::days(1);
                (day, day)
            }
            PresetKind::Last7Days => (today - Duration::days(6), today),
            PresetKind::Last30Days => (today - Duration::days(29), today),
            PresetKind::ThisMonth => (month_start(today), month_end(today)),
            PresetKind::LastMonth => {
                let first = add_months(month_start(today), -1);
                (first, month_end(first))
            }
        };
        match mode {
            Mode::Range => Some(Selection::range(start, end)),
            Mode::Single if start == end => Some(Selection::single(start)),
            Mode::Single => None,
        }
    }

    pub fn preset(self, mode: Mode) -> Option<Preset> {
        let today = Local::now().date_naive();
        if self.selection(today, mode).is_none() {
            return None;
        }
        Some(Preset::new(self.label(), move || {
            let today = Local::now().date_naive();
            self.selection(today, mode)
                .unwrap_or_else(|| Selection::empty(mode))
        }))
    }

    pub fn defaults() -> Vec<PresetKind> {
        vec![
            PresetKind::Today,
            PresetKind::Yesterday,
            PresetKind::Last7Days,
            PresetKind::Last30Days,
            PresetKind::ThisMonth,
            PresetKind::LastMonth,
        ]
    }
}

pub fn build_presets(kinds: &[PresetKind], mode: Mode) -> Vec<Preset> {
    kinds.iter().filter_map(|kind| kind.preset(mode)).collect()
}

/// Index of the first preset whose current value equals `pending`.
///
/// Incomplete selections never match.
pub fn match_preset(pending: &Selection, presets: &[Preset]) -> Option<usize> {
    if !pending.is_complete() {
        return None;
    }
    presets
        .iter()
        .position(|preset| preset_matches(pending, &preset.produce()))
}

fn preset_matches(pending: &Selection, produced: &Selection) -> bool {
    match (*pending, *produced) {
        (Selection::Single { day: Some(day) }, Selection::Single { day: Some(other) }) => {
            day == other
        }
        (
            Selection::Range {
                start: Some(start),
                end: Some(end),
            },
            Selection::Range {
                start: Some(other_start),
                end: Some(other_end),
            },
        ) => start == other_start && end == other_end,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn relative_kinds_anchor_on_today() {
        let today = day(2024, 3, 15);
        assert_eq!(
            PresetKind::Last7Days.selection(today, Mode::Range),
            Some(Selection::range(day(2024, 3, 9), today))
        );
        assert_eq!(
            PresetKind::ThisMonth.selection(today, Mode::Range),
            Some(Selection::range(day(2024, 3, 1), day(2024, 3, 31)))
        );
        assert_eq!(
            PresetKind::LastMonth.selection(day(2024, 1, 10), Mode::Range),
            Some(Selection::range(day(2023, 12, 1), day(2023, 12, 31)))
        );
        assert_eq!(
            PresetKind::Yesterday.selection(today, Mode::Single),
            Some(Selection::single(day(2024, 3, 14)))
        );
        assert_eq!(PresetKind::ThisMonth.selection(today, Mode::Single), None);
    }

    #[test]
    fn single_mode_drops_span_presets() {
        let presets = build_presets(&PresetKind::defaults(), Mode::Single);
        let labels: Vec<&str> = presets.iter().map(|preset| preset.label()).collect();
        assert_eq!(labels, vec!["Today", "Yesterday"]);
    }

    #[test]
    fn first_matching_preset_wins() {
        let target = Selection::range(day(2024, 1, 1), day(2024, 1, 7));
        let presets = vec![
            Preset::fixed("Other", Selection::range(day(2024, 2, 1), day(2024, 2, 7))),
            Preset::fixed("Week", target),
            Preset::fixed("Week again", target),
        ];
        assert_eq!(match_preset(&target, &presets), Some(1));
    }

    #[test]
    fn incomplete_pending_never_matches() {
        let presets = vec![Preset::fixed("Day", Selection::single(day(2024, 1, 1)))];
        assert_eq!(match_preset(&Selection::Single { day: None }, &presets), None);
        let half = Selection::Range {
            start: Some(day(2024, 1, 1)),
            end: None,
        };
        let range_presets = vec![Preset::fixed(
            "Half",
            Selection::Range {
                start: Some(day(2024, 1, 1)),
                end: None,
            },
        )];
        assert_eq!(match_preset(&half, &range_presets), None);
    }

    #[test]
    fn modes_do_not_cross_match() {
        let presets = vec![Preset::fixed("Range", Selection::range(day(2024, 1, 1), day(2024, 1, 1)))];
        assert_eq!(match_preset(&Selection::single(day(2024, 1, 1)), &presets), None);
    }

    #[test]
    fn today_preset_tracks_the_clock() {
        let presets = build_presets(&[PresetKind::Today], Mode::Single);
        let today = Local::now().date_naive();
        assert_eq!(match_preset(&Selection::single(today), &presets), Some(0));
    }
}
