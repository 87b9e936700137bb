use anyhow::Context;
use chrono::Weekday;
use serde::Deserialize;
use tracing::{
  info,
  warn
};

use crate::calendar::SLOT_MINUTES;
use crate::locale::parse_week_start;

fn config_default_version() -> u32 {
  1
}

fn config_default_hour_start() -> u32 {
  8
}

fn config_default_hour_end() -> u32 {
  18
}

fn config_default_minute_increment()
-> u32 {
  15
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct WeekSelectorConfig {
  #[serde(
    default = "config_default_version"
  )]
  pub version:  u32,
  pub timezone: Option<String>,
  pub locale:   Option<String>,
  pub hour12:   Option<bool>,
  #[serde(default)]
  pub grid:     GridConfig,
  #[serde(default)]
  pub picker:   PickerConfig
}

/// Shape of the week grid: which day opens the week and which hours
/// get slot rows. Both hour bounds are inclusive.
#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct GridConfig {
  /// `None` follows the host locale's first weekday.
  #[serde(default)]
  pub week_start: Option<String>,
  #[serde(
    default = "config_default_hour_start"
  )]
  pub hour_start: u32,
  #[serde(
    default = "config_default_hour_end"
  )]
  pub hour_end:   u32
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct PickerConfig {
  #[serde(
    default = "config_default_minute_increment"
  )]
  pub minute_increment: u32
}

impl Default for WeekSelectorConfig {
  fn default() -> Self {
    Self {
      version:  config_default_version(),
      timezone: None,
      locale:   None,
      hour12:   None,
      grid:     GridConfig::default(),
      picker:   PickerConfig::default()
    }
  }
}

impl Default for GridConfig {
  fn default() -> Self {
    Self {
      week_start: None,
      hour_start: config_default_hour_start(
      ),
      hour_end:   config_default_hour_end()
    }
  }
}

impl Default for PickerConfig {
  fn default() -> Self {
    Self {
      minute_increment:
        config_default_minute_increment(
        )
    }
  }
}

impl WeekSelectorConfig {
  #[tracing::instrument(skip(raw))]
  pub fn from_toml_str(
    raw: &str
  ) -> anyhow::Result<Self> {
    let mut config =
      toml::from_str::<Self>(raw)
        .context(
          "failed to parse week \
           selector config"
        )?;
    config.sanitize();
    info!(
      version = config.version,
      timezone = ?config.timezone,
      locale = ?config.locale,
      week_start = ?config.grid.week_start,
      hour_start = config.grid.hour_start,
      hour_end = config.grid.hour_end,
      "loaded week selector config"
    );
    Ok(config)
  }

  /// Parses an embedded config, falling back to defaults on any error.
  pub fn load_or_default(
    raw: &str
  ) -> Self {
    match Self::from_toml_str(raw) {
      | Ok(config) => config,
      | Err(error) => {
        tracing::error!(error = %format!("{error:#}"), "failed parsing week selector config; using defaults");
        Self::default()
      }
    }
  }

  pub fn sanitize(&mut self) {
    let grid = &mut self.grid;

    if let Some(raw) = grid
      .week_start
      .as_deref()
      .filter(|raw| {
        parse_week_start(raw).is_none()
      })
    {
      warn!(
        week_start = %raw,
        "unknown week start; following \
         the host locale"
      );
      grid.week_start = None;
    }

    if grid.hour_start > 23 {
      grid.hour_start = 23;
    }
    if grid.hour_end > 23 {
      grid.hour_end = 23;
    }
    if grid.hour_end < grid.hour_start
    {
      grid.hour_end = grid.hour_start;
    }

    let increment =
      self.picker.minute_increment;
    if increment == 0
      || increment > 60
      || 60 % increment != 0
    {
      warn!(
        increment,
        "picker increment must divide \
         an hour; using 15"
      );
      self.picker.minute_increment =
        config_default_minute_increment(
        );
    }
  }
}

impl GridConfig {
  pub fn week_start_day(
    &self
  ) -> Option<Weekday> {
    self
      .week_start
      .as_deref()
      .and_then(parse_week_start)
  }

  /// Slot rows between the bounds, counting the closing boundary slot.
  pub fn row_count(&self) -> usize {
    let span_minutes = self
      .hour_end
      .saturating_sub(self.hour_start)
      * 60;
    (span_minutes / SLOT_MINUTES) as usize
      + 1
  }
}
