use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

use rangepick::PickerOptions;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Terminal,
    Light,
    Dark,
}

impl ThemePreference {
    pub fn next(self) -> Self {
        match self {
            ThemePreference::Terminal => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::Terminal,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemePreference>,
    #[serde(default)]
    pub picker: PickerOptions,
}

fn config_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".rangepick.json");
    Some(path)
}

pub fn read_config() -> Config {
    config_path()
        .and_then(|path| fs::read_to_string(path).ok())
        .and_then(|contents| parse_config(&contents))
        .unwrap_or_default()
}

pub fn write_theme(theme: ThemePreference) -> Result<(), io::Error> {
    let mut config = read_config();
    config.theme = Some(theme);
    write_config(&config)
}

fn parse_config(contents: &str) -> Option<Config> {
    serde_json::from_str(contents).ok()
}

fn write_config(config: &Config) -> Result<(), io::Error> {
    let path = config_path()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Home directory not found"))?;
    let json = serde_json::to_string_pretty(config).map_err(io::Error::other)?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rangepick::{Mode, RangePolicy};

    #[test]
    fn parse_config_fills_missing_fields() {
        let config = parse_config(r#"{"theme":"dark","picker":{"mode":"single"}}"#).unwrap();
        assert_eq!(config.theme, Some(ThemePreference::Dark));
        assert_eq!(config.picker.mode, Mode::Single);
        assert_eq!(config.picker.range_policy, RangePolicy::FreeClick);
    }

    #[test]
    fn parse_config_rejects_malformed_json() {
        assert!(parse_config("{not json").is_none());
    }

    #[test]
    fn config_round_trips_through_json() {
        let mut config = Config::default();
        config.picker.max_date = NaiveDate::from_ymd_opt(2024, 12, 31);
        config.theme = Some(ThemePreference::Light);
        let json = serde_json::to_string(&config).unwrap();
        let parsed = parse_config(&json).unwrap();
        assert_eq!(parsed.picker, config.picker);
        assert_eq!(parsed.theme, config.theme);
    }

    #[test]
    fn theme_cycles_through_all_values() {
        let start = ThemePreference::Terminal;
        assert_eq!(start.next().next().next(), start);
    }
}
