use serde::{Deserialize, Serialize};

use crate::dates::WeekStart;

const FALLBACK_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const FALLBACK_WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// Month and weekday names used for headers and for `MMM`/`MMMM` tokens.
///
/// Either list may be omitted in configuration; missing or malformed lists
/// fall back to English.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Locale {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub month_names: Vec<String>,
    /// Sunday first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weekday_names: Vec<String>,
}

impl Locale {
    pub fn new(month_names: Vec<String>, weekday_names: Vec<String>) -> Self {
        Self {
            month_names,
            weekday_names,
        }
    }

    pub fn month_names(&self) -> [&str; 12] {
        let mut names = FALLBACK_MONTHS;
        if self.month_names.len() == 12 {
            for (slot, name) in names.iter_mut().zip(&self.month_names) {
                *slot = name.as_str();
            }
        }
        names
    }

    pub fn weekday_names(&self) -> [&str; 7] {
        let mut names = FALLBACK_WEEKDAYS;
        if self.weekday_names.len() == 7 {
            for (slot, name) in names.iter_mut().zip(&self.weekday_names) {
                *slot = name.as_str();
            }
        }
        names
    }

    /// `month` is 1-based.
    pub fn month_name(&self, month: u32) -> &str {
        let index = (month.clamp(1, 12) - 1) as usize;
        self.month_names()[index]
    }

    /// Shortest prefix, three letters or more, that no other month name
    /// starts with.
    pub fn short_month_name(&self, month: u32) -> String {
        let names = self.month_names();
        let index = (month.clamp(1, 12) - 1) as usize;
        let name: Vec<char> = names[index].chars().collect();
        let others: Vec<String> = names
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != index)
            .map(|(_, other)| other.to_lowercase())
            .collect();

        let mut len = name.len().min(3);
        while len < name.len() {
            let prefix = name[..len].iter().collect::<String>().to_lowercase();
            if !others.iter().any(|other| other.starts_with(&prefix)) {
                break;
            }
            len += 1;
        }
        name[..len].iter().collect()
    }

    /// Weekday header row in display order for `week_start`.
    pub fn weekday_header(&self, week_start: WeekStart) -> [&str; 7] {
        let mut names = self.weekday_names();
        if week_start == WeekStart::Monday {
            names.rotate_left(1);
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_names_are_english() {
        let locale = Locale::default();
        assert_eq!(locale.month_name(1), "January");
        assert_eq!(locale.month_name(12), "December");
        assert_eq!(locale.short_month_name(9), "Sep");
        assert_eq!(locale.short_month_name(6), "Jun");
        assert_eq!(locale.short_month_name(7), "Jul");
        assert_eq!(locale.weekday_names()[0], "Su");
    }

    #[test]
    fn custom_names_replace_fallback() {
        let months = [
            "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
            "octobre", "novembre", "décembre",
        ]
        .iter()
        .map(|name| name.to_string())
        .collect();
        let locale = Locale::new(months, Vec::new());
        assert_eq!(locale.month_name(2), "février");
        assert_eq!(locale.short_month_name(2), "fév");
        assert_eq!(locale.short_month_name(3), "mar");
        assert_eq!(locale.short_month_name(6), "juin");
        assert_eq!(locale.short_month_name(7), "juil");
        assert_eq!(locale.weekday_names()[6], "Sa");
    }

    #[test]
    fn partial_lists_are_ignored() {
        let locale = Locale::new(vec!["Jan".to_string()], vec!["S".to_string()]);
        assert_eq!(locale.month_name(1), "January");
        assert_eq!(locale.weekday_names()[0], "Su");
    }

    #[test]
    fn monday_header_rotates() {
        let locale = Locale::default();
        let header = locale.weekday_header(WeekStart::Monday);
        assert_eq!(header[0], "Mo");
        assert_eq!(header[6], "Su");
    }
}
