pub mod calendar;
pub mod clock;
pub mod config;
pub mod format;
pub mod locale;
pub mod range;
pub mod selector;

pub use clock::{
  Clock,
  FixedClock,
  SystemClock
};
pub use config::WeekSelectorConfig;
pub use format::{
  DisplayMode,
  TimeFormatter
};
pub use locale::LocaleSettings;
pub use range::{
  RangePayload,
  SelectedRange
};
pub use selector::{
  DragState,
  WeekGrid,
  WeekSelector
};
