//! Selection and navigation logic for date and date-range pickers.

pub mod bounds;
pub mod codec;
pub mod dates;
pub mod error;
pub mod locale;
pub mod models;
pub mod navigator;
pub mod picker;
pub mod presets;
pub mod reducer;

pub use bounds::{is_disabled, Bounds};
pub use codec::{DayFormatter, PatternFormatter, TextCodec, DEFAULT_PATTERN, RANGE_DELIMITER};
pub use dates::{month_grid, WeekStart};
pub use error::PickerError;
pub use locale::Locale;
pub use models::{CalendarSide, DayRole, Mode, NavigationPolicy, PageDirection, RangePolicy, Selection};
pub use navigator::{Navigator, ViewCursors};
pub use picker::{DatePicker, Notification, PickerOptions};
pub use presets::{match_preset, Preset, PresetKind};
pub use reducer::{reduce_click, Click};
