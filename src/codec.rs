use std::fmt::Write;

use chrono::format::{parse_and_remainder, Parsed, StrftimeItems};
use chrono::{Datelike, NaiveDate};

use crate::bounds::Bounds;
use crate::error::{PickerError, Result};
use crate::locale::Locale;
use crate::models::{Mode, Selection};

pub const DEFAULT_PATTERN: &str = "yyyy-MM-dd";
pub const RANGE_DELIMITER: &str = " ~ ";

pub trait DayFormatter {
    fn format_day(&self, day: NaiveDate, pattern: &str, locale: &Locale) -> String;
    fn parse_day(&self, text: &str, pattern: &str, locale: &Locale) -> Result<NaiveDate>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// strftime fragment handed to chrono.
    Chrono(String),
    MonthName,
    MonthShort,
}

#[derive(Debug, Default)]
struct CompiledPattern {
    segments: Vec<Segment>,
    two_digit_year: bool,
    four_digit_year: bool,
}

impl CompiledPattern {
    fn push_chrono(&mut self, spec: &str) {
        if let Some(Segment::Chrono(existing)) = self.segments.last_mut() {
            existing.push_str(spec);
            return;
        }
        self.segments.push(Segment::Chrono(spec.to_string()));
    }

    fn push_literal(&mut self, text: &str) {
        self.push_chrono(&text.replace('%', "%%"));
    }
}

fn compile(pattern: &str) -> CompiledPattern {
    let chars: Vec<char> = pattern.chars().collect();
    let mut compiled = CompiledPattern::default();
    let mut index = 0;

    while index < chars.len() {
        let ch = chars[index];

        if ch == '\'' {
            let mut literal = String::new();
            index += 1;
            while index < chars.len() {
                if chars[index] == '\'' {
                    if chars.get(index + 1) == Some(&'\'') {
                        literal.push('\'');
                        index += 2;
                        continue;
                    }
                    break;
                }
                literal.push(chars[index]);
                index += 1;
            }
            index += 1;
            if literal.is_empty() {
                // '' outside a quoted run is an escaped quote.
                literal.push('\'');
            }
            compiled.push_literal(&literal);
            continue;
        }

        let run = chars[index..].iter().take_while(|c| **c == ch).count();
        match (ch, run) {
            ('y', 2) => {
                compiled.two_digit_year = true;
                compiled.push_chrono("%y");
            }
            ('y', _) => {
                compiled.four_digit_year = true;
                compiled.push_chrono("%Y");
            }
            ('M', 1) => compiled.push_chrono("%-m"),
            ('M', 2) => compiled.push_chrono("%m"),
            ('M', 3) => compiled.segments.push(Segment::MonthShort),
            ('M', _) => compiled.segments.push(Segment::MonthName),
            ('d', 1) => compiled.push_chrono("%-d"),
            ('d', _) => compiled.push_chrono("%d"),
            _ => {
                let literal: String = chars[index..index + run].iter().collect();
                compiled.push_literal(&literal);
            }
        }
        index += run;
    }

    compiled
}

fn invalid(text: &str) -> PickerError {
    PickerError::InvalidInputText(text.to_string())
}

/// Longest name `rest` starts with, ignoring case. Two names of the same
/// length matching is ambiguous and reads as no match.
fn read_name(rest: &str, names: &[String]) -> Option<(u32, usize)> {
    let mut best: Option<(u32, usize)> = None;
    let mut tied = false;
    for (index, name) in names.iter().enumerate() {
        if name.is_empty() {
            continue;
        }
        let count = name.chars().count();
        let candidate: String = rest.chars().take(count).collect();
        if candidate.to_lowercase() != name.to_lowercase() {
            continue;
        }
        let consumed = candidate.len();
        match best {
            Some((_, len)) if consumed < len => {}
            Some((_, len)) if consumed == len => tied = true,
            _ => {
                best = Some((index as u32 + 1, consumed));
                tied = false;
            }
        }
    }
    if tied { None } else { best }
}

/// `yyyy yy MMMM MMM MM M dd d`; anything else, or text in single quotes,
/// is literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternFormatter;

impl DayFormatter for PatternFormatter {
    fn format_day(&self, day: NaiveDate, pattern: &str, locale: &Locale) -> String {
        let mut out = String::new();
        for segment in compile(pattern).segments {
            match segment {
                Segment::Chrono(spec) => {
                    let _ = write!(out, "{}", day.format(&spec));
                }
                Segment::MonthName => out.push_str(locale.month_name(day.month())),
                Segment::MonthShort => out.push_str(&locale.short_month_name(day.month())),
            }
        }
        out
    }

    fn parse_day(&self, text: &str, pattern: &str, locale: &Locale) -> Result<NaiveDate> {
        let source = text.trim();
        let compiled = compile(pattern);
        let mut parsed = Parsed::new();
        let mut rest = source;

        for segment in &compiled.segments {
            let names: Vec<String> = match segment {
                Segment::Chrono(spec) => {
                    rest = parse_and_remainder(&mut parsed, rest, StrftimeItems::new(spec))
                        .map_err(|_| invalid(source))?;
                    continue;
                }
                Segment::MonthName => locale.month_names().iter().map(|name| name.to_string()).collect(),
                Segment::MonthShort => (1..=12).map(|month| locale.short_month_name(month)).collect(),
            };
            let (month, consumed) = read_name(rest, &names).ok_or_else(|| invalid(source))?;
            parsed
                .set_month(i64::from(month))
                .map_err(|_| invalid(source))?;
            rest = &rest[consumed..];
        }

        if !rest.is_empty() {
            return Err(invalid(source));
        }
        if compiled.two_digit_year && !compiled.four_digit_year {
            parsed.set_year_div_100(20).map_err(|_| invalid(source))?;
        }
        parsed.to_naive_date().map_err(|_| invalid(source))
    }
}

pub struct TextCodec {
    pattern: String,
    locale: Locale,
    delimiter: String,
    formatter: Box<dyn DayFormatter>,
}

impl TextCodec {
    pub fn new(pattern: impl Into<String>, locale: Locale) -> Self {
        Self::with_formatter(pattern, locale, Box::new(PatternFormatter))
    }

    pub fn with_formatter(
        pattern: impl Into<String>,
        locale: Locale,
        formatter: Box<dyn DayFormatter>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            locale,
            delimiter: RANGE_DELIMITER.to_string(),
            formatter,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn format_day(&self, day: NaiveDate) -> String {
        self.formatter.format_day(day, &self.pattern, &self.locale)
    }

    pub fn format(&self, selection: &Selection) -> String {
        match *selection {
            Selection::Single { day } => day.map(|day| self.format_day(day)).unwrap_or_default(),
            Selection::Range { start, end } => match (start, end) {
                (None, None) => String::new(),
                (start, end) => format!(
                    "{}{}{}",
                    start.map(|day| self.format_day(day)).unwrap_or_default(),
                    self.delimiter,
                    end.map(|day| self.format_day(day)).unwrap_or_default()
                ),
            },
        }
    }

    /// Parses text typed for `mode`. Blank text yields the empty selection.
    ///
    /// The result is all-or-nothing: if any day fails to parse or falls
    /// outside `bounds`, an error is returned and nothing is produced.
    pub fn parse(&self, text: &str, mode: Mode, bounds: &Bounds) -> Result<Selection> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Selection::empty(mode));
        }

        match mode {
            Mode::Single => {
                let day = self.parse_endpoint(text, bounds)?;
                Ok(Selection::Single { day })
            }
            Mode::Range => {
                let (left, right) = self.split_range(text).ok_or_else(|| invalid(text))?;
                let start = self.parse_endpoint(left, bounds)?;
                let end = self.parse_endpoint(right, bounds)?;
                Ok(match (start, end) {
                    (Some(start), Some(end)) => Selection::range(start, end),
                    (start, end) => Selection::Range { start, end },
                })
            }
        }
    }

    /// Splits on the full delimiter first so patterns containing `~` still
    /// parse; hand-typed text may drop the spaces around it.
    fn split_range<'t>(&self, text: &'t str) -> Option<(&'t str, &'t str)> {
        if let Some(parts) = text.split_once(self.delimiter.as_str()) {
            return Some(parts);
        }
        let separator = self.delimiter.trim();
        if separator.is_empty() {
            return None;
        }
        if let Some(start) = text.strip_suffix(separator) {
            return Some((start, ""));
        }
        if let Some(end) = text.strip_prefix(separator) {
            return Some(("", end));
        }
        text.split_once(separator)
    }

    fn parse_endpoint(&self, text: &str, bounds: &Bounds) -> Result<Option<NaiveDate>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let day = self.formatter.parse_day(text, &self.pattern, &self.locale)?;
        bounds.check(day).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn codec(pattern: &str) -> TextCodec {
        TextCodec::new(pattern, Locale::default())
    }

    #[test]
    fn formats_numeric_patterns() {
        let codec = codec("dd/MM/yyyy");
        assert_eq!(codec.format_day(day(2024, 3, 7)), "07/03/2024");
        let codec = TextCodec::new("d.M.yy", Locale::default());
        assert_eq!(codec.format_day(day(2024, 3, 7)), "7.3.24");
    }

    #[test]
    fn formats_names_and_quoted_literals() {
        let codec = codec("MMMM d', 'yyyy");
        assert_eq!(codec.format_day(day(2024, 3, 7)), "March 7, 2024");
        let codec = TextCodec::new("dd MMM yyyy 'day'", Locale::default());
        assert_eq!(codec.format_day(day(2024, 9, 1)), "01 Sep 2024 day");
    }

    #[test]
    fn parses_single_day() {
        let codec = codec(DEFAULT_PATTERN);
        let parsed = codec.parse(" 2024-02-20 ", Mode::Single, &Bounds::unbounded());
        assert_eq!(parsed, Ok(Selection::single(day(2024, 2, 20))));
    }

    #[test]
    fn parses_and_orders_range() {
        let codec = codec(DEFAULT_PATTERN);
        let parsed = codec.parse("2024-02-20 ~ 2024-02-10", Mode::Range, &Bounds::unbounded());
        assert_eq!(parsed, Ok(Selection::range(day(2024, 2, 10), day(2024, 2, 20))));
    }

    #[test]
    fn parses_month_names_case_insensitively() {
        let codec = codec("d MMMM yyyy");
        let parsed = codec.parse("5 september 2023", Mode::Single, &Bounds::unbounded());
        assert_eq!(parsed, Ok(Selection::single(day(2023, 9, 5))));
    }

    #[test]
    fn rejects_garbage_and_impossible_days() {
        let codec = codec(DEFAULT_PATTERN);
        let bounds = Bounds::unbounded();
        assert!(matches!(
            codec.parse("02-03-2026", Mode::Single, &bounds),
            Err(PickerError::InvalidInputText(_))
        ));
        assert!(matches!(
            codec.parse("2023-02-29", Mode::Single, &bounds),
            Err(PickerError::InvalidInputText(_))
        ));
        assert!(matches!(
            codec.parse("2024-02-20 trailing", Mode::Single, &bounds),
            Err(PickerError::InvalidInputText(_))
        ));
        assert!(matches!(
            codec.parse("2024-02-20", Mode::Range, &bounds),
            Err(PickerError::InvalidInputText(_))
        ));
    }

    #[test]
    fn out_of_bounds_endpoint_rejects_whole_range() {
        let codec = codec(DEFAULT_PATTERN);
        let bounds = Bounds::new(None, Some(day(2024, 2, 15)));
        let parsed = codec.parse("2024-02-10 ~ 2024-02-20", Mode::Range, &bounds);
        assert_eq!(parsed, Err(PickerError::OutOfBounds(day(2024, 2, 20))));
    }

    #[test]
    fn blank_text_clears() {
        let codec = codec(DEFAULT_PATTERN);
        let bounds = Bounds::unbounded();
        assert_eq!(codec.parse("  ", Mode::Range, &bounds), Ok(Selection::empty(Mode::Range)));
        assert_eq!(codec.format(&Selection::empty(Mode::Single)), "");
    }

    #[test]
    fn half_range_keeps_present_endpoint() {
        let codec = codec(DEFAULT_PATTERN);
        let half = Selection::Range {
            start: Some(day(2024, 5, 1)),
            end: None,
        };
        let text = codec.format(&half);
        assert_eq!(text, "2024-05-01 ~ ");
        assert_eq!(codec.parse(&text, Mode::Range, &Bounds::unbounded()), Ok(half));
    }

    fn french() -> Locale {
        let months = [
            "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
            "octobre", "novembre", "décembre",
        ];
        Locale::new(months.iter().map(|name| name.to_string()).collect(), Vec::new())
    }

    #[test]
    fn short_names_keep_june_and_july_apart() {
        let codec = TextCodec::new("d MMM yyyy", french());
        let july = Selection::single(day(2024, 7, 14));
        let text = codec.format(&july);
        assert_eq!(text, "14 juil 2024");
        assert_eq!(codec.parse(&text, Mode::Single, &Bounds::unbounded()), Ok(july));
        assert_eq!(
            codec.parse("14 juin 2024", Mode::Single, &Bounds::unbounded()),
            Ok(Selection::single(day(2024, 6, 14)))
        );
    }

    #[test]
    fn ambiguous_month_name_is_rejected() {
        let mut months: Vec<String> = Locale::default()
            .month_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        months[1] = months[0].clone();
        let codec = TextCodec::new("MMMM d yyyy", Locale::new(months, Vec::new()));
        assert!(matches!(
            codec.parse("January 5 2024", Mode::Single, &Bounds::unbounded()),
            Err(PickerError::InvalidInputText(_))
        ));
    }

    #[test]
    fn pattern_with_tilde_still_splits_ranges() {
        let codec = codec("yyyy~MM~dd");
        let bounds = Bounds::unbounded();
        let range = Selection::range(day(2024, 2, 10), day(2024, 2, 20));
        let text = codec.format(&range);
        assert_eq!(text, "2024~02~10 ~ 2024~02~20");
        assert_eq!(codec.parse(&text, Mode::Range, &bounds), Ok(range));

        let half = Selection::Range {
            start: Some(day(2024, 2, 10)),
            end: None,
        };
        assert_eq!(codec.parse(&codec.format(&half), Mode::Range, &bounds), Ok(half));
    }

    #[test]
    fn range_delimiter_spaces_are_optional() {
        let codec = codec(DEFAULT_PATTERN);
        assert_eq!(
            codec.parse("2024-02-10~2024-02-20", Mode::Range, &Bounds::unbounded()),
            Ok(Selection::range(day(2024, 2, 10), day(2024, 2, 20)))
        );
    }

    #[test]
    fn percent_in_pattern_is_literal() {
        let codec = codec("yyyy%MM%dd");
        assert_eq!(codec.format_day(day(2024, 3, 7)), "2024%03%07");
        assert_eq!(
            codec.parse("2024%03%07", Mode::Single, &Bounds::unbounded()),
            Ok(Selection::single(day(2024, 3, 7)))
        );
    }

    #[test]
    fn two_digit_years_land_in_this_century() {
        let codec = codec("dd.MM.yy");
        assert_eq!(
            codec.parse("07.03.85", Mode::Single, &Bounds::unbounded()),
            Ok(Selection::single(day(2085, 3, 7)))
        );
    }

    fn any_day() -> impl Strategy<Value = NaiveDate> {
        (0i64..40_000).prop_map(|offset| day(2000, 1, 1) + Duration::days(offset))
    }

    fn any_pattern() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("yyyy-MM-dd"),
            Just("dd/MM/yyyy"),
            Just("M/d/yyyy"),
            Just("d MMMM yyyy"),
            Just("MMM d, yyyy"),
            Just("d MMM yyyy"),
            Just("yyyy~MM~dd"),
        ]
    }

    fn any_locale() -> impl Strategy<Value = Locale> {
        prop_oneof![Just(Locale::default()), Just(french())]
    }

    proptest! {
        #[test]
        fn single_round_trips(value in any_day(), pattern in any_pattern(), locale in any_locale()) {
            let codec = TextCodec::new(pattern, locale);
            let selection = Selection::single(value);
            let text = codec.format(&selection);
            prop_assert_eq!(codec.parse(&text, Mode::Single, &Bounds::unbounded()), Ok(selection));
        }

        #[test]
        fn range_round_trips(
            a in any_day(),
            b in any_day(),
            pattern in any_pattern(),
            locale in any_locale(),
        ) {
            let codec = TextCodec::new(pattern, locale);
            let selection = Selection::range(a, b);
            let text = codec.format(&selection);
            prop_assert_eq!(codec.parse(&text, Mode::Range, &Bounds::unbounded()), Ok(selection));
        }

        #[test]
        fn parsed_ranges_are_never_inverted(a in any_day(), b in any_day()) {
            let codec = codec(DEFAULT_PATTERN);
            let text = format!("{} ~ {}", codec.format_day(a), codec.format_day(b));
            let parsed = codec.parse(&text, Mode::Range, &Bounds::unbounded()).unwrap();
            prop_assert!(parsed.start() <= parsed.end());
        }
    }
}
