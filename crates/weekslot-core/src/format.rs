//! UTC <-> local conversions for display text and datetime inputs.
//!
//! Stored values are always UTC. Everything shown to the user, and
//! everything the user types into a picker, is local time in the
//! configured timezone.

use std::fmt::{
  self,
  Write
};

use chrono::{
  DateTime,
  Duration,
  NaiveDate,
  NaiveDateTime,
  SecondsFormat,
  TimeZone,
  Timelike,
  Utc
};
use chrono_tz::Tz;

use crate::calendar::resolve_local;
use crate::locale::LocaleSettings;

pub const DEFAULT_FORMAT_PATTERN: &str =
  "%Y-%m-%d %H:%M:%S";
pub const PICKER_VALUE_FORMAT: &str =
  "%Y-%m-%dT%H:%M";
pub const DEFAULT_MINUTE_INCREMENT: u32 =
  15;

const NAIVE_INPUT_FORMATS: [&str; 4] = [
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%d %H:%M"
];

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default,
)]
pub enum DisplayMode {
  Full,
  Date,
  Time,
  #[default]
  DateTime
}

impl DisplayMode {
  pub fn from_key(key: &str) -> Self {
    match key
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "full" => Self::Full,
      | "date" => Self::Date,
      | "time" => Self::Time,
      | _ => Self::DateTime
    }
  }

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Full => "full",
      | Self::Date => "date",
      | Self::Time => "time",
      | Self::DateTime => "datetime"
    }
  }

  fn pattern(self, hour12: bool) -> String {
    let time = if hour12 {
      "%I:%M %p"
    } else {
      "%H:%M"
    };
    match self {
      | Self::Full => {
        format!("%A, %B %-d, %Y {time}")
      }
      | Self::Date => {
        "%b %-d, %Y".to_string()
      }
      | Self::Time => time.to_string(),
      | Self::DateTime => {
        format!("%b %-d, %Y, {time}")
      }
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeFormatter {
  settings:         LocaleSettings,
  minute_increment: u32
}

impl TimeFormatter {
  pub fn new(
    settings: LocaleSettings
  ) -> Self {
    Self {
      settings,
      minute_increment:
        DEFAULT_MINUTE_INCREMENT
    }
  }

  pub fn with_minute_increment(
    mut self,
    minutes: u32
  ) -> Self {
    if minutes > 0 && 60 % minutes == 0 {
      self.minute_increment = minutes;
    }
    self
  }

  pub fn timezone(&self) -> Tz {
    self.settings.timezone
  }

  pub fn minute_increment(&self) -> u32 {
    self.minute_increment
  }

  /// Accepts RFC 3339 text, plus naive timestamps and bare dates which
  /// are taken to be UTC.
  pub fn parse_utc(
    text: &str
  ) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
      return None;
    }

    if let Ok(parsed) =
      DateTime::parse_from_rfc3339(trimmed)
    {
      return Some(parsed.with_timezone(&Utc));
    }

    NAIVE_INPUT_FORMATS
      .iter()
      .find_map(|format| {
        NaiveDateTime::parse_from_str(
          trimmed, format
        )
        .ok()
      })
      .or_else(|| {
        NaiveDate::parse_from_str(
          trimmed, "%Y-%m-%d"
        )
        .ok()
        .map(|date| {
          date.and_time(
            chrono::NaiveTime::MIN
          )
        })
      })
      .map(|naive| naive.and_utc())
  }

  /// Formats stored UTC text for display. Text that does not parse comes
  /// back untouched.
  pub fn to_local_display(
    &self,
    utc_text: &str,
    mode: Option<&str>
  ) -> String {
    if utc_text.is_empty() {
      return String::new();
    }

    let mode = mode
      .map(DisplayMode::from_key)
      .unwrap_or_default();
    match Self::parse_utc(utc_text) {
      | Some(instant) => {
        self.format_instant(instant, mode)
      }
      | None => {
        tracing::debug!(
          input = utc_text,
          "unparseable utc text left as is"
        );
        utc_text.to_string()
      }
    }
  }

  pub fn format_instant(
    &self,
    instant: DateTime<Utc>,
    mode: DisplayMode
  ) -> String {
    let pattern =
      mode.pattern(self.settings.hour12);
    let local = instant
      .with_timezone(&self.settings.timezone);
    // Locales without AM/PM strings leave `%p` empty.
    render(local.format_localized(
      &pattern,
      self.settings.locale
    ))
    .map(|text| text.trim_end().to_string())
    .unwrap_or_default()
  }

  /// Canonical UTC text for a local instant, `""` when there is none.
  pub fn to_utc_instant<Z: TimeZone>(
    local: Option<&DateTime<Z>>
  ) -> String {
    local
      .map(|instant| {
        instant
          .with_timezone(&Utc)
          .to_rfc3339_opts(
            SecondsFormat::Millis,
            true
          )
      })
      .unwrap_or_default()
  }

  /// A naive value here is UTC.
  pub fn from_utc(
    &self,
    naive_utc: NaiveDateTime
  ) -> DateTime<Tz> {
    self
      .settings
      .timezone
      .from_utc_datetime(&naive_utc)
  }

  /// A naive value here is local wall-clock time.
  pub fn to_utc(
    &self,
    naive_local: NaiveDateTime
  ) -> DateTime<Utc> {
    resolve_local(
      self.settings.timezone,
      naive_local
    )
    .with_timezone(&Utc)
  }

  pub fn format_datetime(
    &self,
    utc: Option<DateTime<Utc>>,
    pattern: Option<&str>
  ) -> String {
    let Some(utc) = utc else {
      return String::new();
    };
    let local =
      utc.with_timezone(&self.settings.timezone);
    let pattern =
      pattern.unwrap_or(DEFAULT_FORMAT_PATTERN);

    render(local.format(pattern))
      .or_else(|| {
        tracing::warn!(
          pattern,
          "invalid datetime pattern; using default"
        );
        render(
          local.format(DEFAULT_FORMAT_PATTERN)
        )
      })
      .unwrap_or_default()
  }

  /// Seeds a `datetime-local` input from stored UTC text.
  pub fn picker_value_from_utc(
    &self,
    utc_text: &str
  ) -> Option<String> {
    let instant = Self::parse_utc(utc_text)?;
    Some(
      instant
        .with_timezone(&self.settings.timezone)
        .format(PICKER_VALUE_FORMAT)
        .to_string()
    )
  }

  /// Converts what the user picked back to UTC text, snapped to the
  /// picker's minute increment.
  pub fn utc_from_picker_value(
    &self,
    local_text: &str
  ) -> Option<String> {
    let trimmed = local_text.trim();
    let naive = NAIVE_INPUT_FORMATS
      .iter()
      .find_map(|format| {
        NaiveDateTime::parse_from_str(
          trimmed, format
        )
        .ok()
      })?;
    let local = resolve_local(
      self.settings.timezone,
      self.snap(naive)
    );
    Some(Self::to_utc_instant(Some(&local)))
  }

  /// Rounds to the nearest increment, halves rounding up.
  pub fn snap(
    &self,
    naive: NaiveDateTime
  ) -> NaiveDateTime {
    let increment =
      i64::from(self.minute_increment);
    let floor = naive
      .with_second(0)
      .and_then(|t| t.with_nanosecond(0))
      .unwrap_or(naive);
    let minute = i64::from(floor.minute());
    let offset = minute % increment;
    let seconds_past = i64::from(
      naive.second()
    );
    let past =
      offset * 60 + seconds_past;

    let base =
      floor - Duration::minutes(offset);
    if past * 2 >= increment * 60 {
      base + Duration::minutes(increment)
    } else {
      base
    }
  }
}

/// Writes a chrono format out, `None` when the pattern holds an unknown
/// specifier.
fn render(
  formatted: impl fmt::Display
) -> Option<String> {
  let mut text = String::new();
  write!(text, "{formatted}").ok()?;
  Some(text)
}

#[cfg(test)]
mod tests {
  use chrono::{
    Locale,
    Weekday
  };

  use super::*;

  fn formatter(
    timezone: Tz,
    hour12: bool
  ) -> TimeFormatter {
    TimeFormatter::new(LocaleSettings::new(
      timezone,
      Locale::en_US,
      hour12,
      Weekday::Sun
    ))
  }

  fn auckland() -> TimeFormatter {
    formatter(
      chrono_tz::Pacific::Auckland,
      false
    )
  }

  fn naive(text: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(
      text,
      "%Y-%m-%d %H:%M:%S"
    )
    .expect("valid naive datetime")
  }

  #[test]
  fn display_modes() {
    let f = auckland();
    let utc = "2025-04-25T01:30:00Z";
    assert_eq!(
      f.to_local_display(utc, Some("full")),
      "Friday, April 25, 2025 13:30"
    );
    assert_eq!(
      f.to_local_display(utc, Some("date")),
      "Apr 25, 2025"
    );
    assert_eq!(
      f.to_local_display(utc, Some("time")),
      "13:30"
    );
    assert_eq!(
      f.to_local_display(utc, Some("datetime")),
      "Apr 25, 2025, 13:30"
    );
    assert_eq!(
      f.to_local_display(utc, None),
      "Apr 25, 2025, 13:30"
    );
    assert_eq!(
      f.to_local_display(utc, Some("weird")),
      "Apr 25, 2025, 13:30"
    );
  }

  #[test]
  fn twelve_hour_clock() {
    let f = formatter(
      chrono_tz::America::New_York,
      true
    );
    assert_eq!(
      f.to_local_display(
        "2024-06-04T13:00:00.000Z",
        Some("time")
      ),
      "09:00 AM"
    );
  }

  #[test]
  fn localized_names() {
    let f = TimeFormatter::new(
      LocaleSettings::new(
        chrono_tz::Europe::Berlin,
        Locale::de_DE,
        false,
        Weekday::Mon
      )
    );
    let shown = f.to_local_display(
      "2024-12-02T09:00:00Z",
      Some("full")
    );
    assert!(shown.starts_with("Montag"));
    assert!(shown.contains("Dezember"));
    assert!(shown.ends_with("10:00"));
  }

  #[test]
  fn unparseable_text_is_returned_unchanged() {
    let f = auckland();
    assert_eq!(
      f.to_local_display("not-a-date", Some("datetime")),
      "not-a-date"
    );
    assert_eq!(f.to_local_display("", None), "");
    assert_eq!(
      f.to_local_display("   ", Some("datetime")),
      "   "
    );
  }

  #[test]
  fn twelve_hour_clock_without_am_pm_strings() {
    let f = TimeFormatter::new(
      LocaleSettings::new(
        chrono_tz::Europe::Berlin,
        Locale::de_DE,
        true,
        Weekday::Mon
      )
    );
    let shown = f.to_local_display(
      "2024-12-02T09:00:00Z",
      Some("time")
    );
    assert_eq!(shown, shown.trim_end());
    assert!(shown.starts_with("10:00"));
  }

  #[test]
  fn invalid_pattern_falls_back_to_default() {
    let f = auckland();
    let utc = naive("2025-04-25 01:30:00").and_utc();
    assert_eq!(
      f.format_datetime(Some(utc), Some("%Q")),
      "2025-04-25 13:30:00"
    );
    assert_eq!(
      f.format_datetime(Some(utc), Some("%d/%m %H:%M")),
      "25/04 13:30"
    );
    assert_eq!(f.format_datetime(None, Some("%Q")), "");
  }

  #[test]
  fn naive_and_date_only_inputs_are_utc() {
    let f = auckland();
    assert_eq!(
      f.to_local_display(
        "2025-04-25 01:30:00",
        Some("time")
      ),
      "13:30"
    );
    assert_eq!(
      f.to_local_display("2025-04-25", Some("time")),
      "12:00"
    );
  }

  #[test]
  fn missing_local_instant_is_empty() {
    assert_eq!(
      TimeFormatter::to_utc_instant::<Tz>(None),
      ""
    );
  }

  #[test]
  fn utc_round_trip_keeps_wall_clock() {
    let f = formatter(
      chrono_tz::America::Sao_Paulo,
      false
    );
    let local = resolve_local(
      f.timezone(),
      naive("2024-06-04 09:45:00")
    );

    let utc =
      TimeFormatter::to_utc_instant(Some(&local));
    assert_eq!(utc, "2024-06-04T12:45:00.000Z");
    assert_eq!(
      f.to_local_display(&utc, Some("datetime")),
      local
        .format_localized(
          "%b %-d, %Y, %H:%M",
          Locale::en_US
        )
        .to_string()
    );
  }

  #[test]
  fn auckland_conversions() {
    let f = auckland();
    let local =
      f.from_utc(naive("2025-04-25 01:30:00"));
    assert_eq!(
      local.format("%Y-%m-%d %H:%M").to_string(),
      "2025-04-25 13:30"
    );

    let utc = f.to_utc(naive("2025-04-25 13:30:00"));
    assert_eq!(
      utc.format("%Y-%m-%d %H:%M").to_string(),
      "2025-04-25 01:30"
    );

    assert_eq!(
      f.format_datetime(Some(utc), None),
      "2025-04-25 13:30:00"
    );
    assert_eq!(
      f.format_datetime(Some(utc), Some("%Y-%m-%d")),
      "2025-04-25"
    );
    assert_eq!(f.format_datetime(None, None), "");
  }

  #[test]
  fn picker_values() {
    let f = auckland();
    assert_eq!(
      f.picker_value_from_utc(
        "2025-04-25T01:30:00.000Z"
      )
      .as_deref(),
      Some("2025-04-25T13:30")
    );
    assert_eq!(
      f.picker_value_from_utc("garbage"),
      None
    );

    assert_eq!(
      f.utc_from_picker_value("2025-04-25T13:37")
        .as_deref(),
      Some("2025-04-25T01:30:00.000Z")
    );
    assert_eq!(
      f.utc_from_picker_value("2025-04-25 13:38")
        .as_deref(),
      Some("2025-04-25T01:45:00.000Z")
    );
    assert_eq!(f.utc_from_picker_value(""), None);
  }

  #[test]
  fn snaps_to_increment() {
    let f = auckland();
    assert_eq!(
      f.snap(naive("2024-06-04 09:07:29")),
      naive("2024-06-04 09:00:00")
    );
    assert_eq!(
      f.snap(naive("2024-06-04 09:07:30")),
      naive("2024-06-04 09:15:00")
    );
    assert_eq!(
      f.snap(naive("2024-06-04 23:53:00")),
      naive("2024-06-05 00:00:00")
    );

    let half_hour = f.with_minute_increment(30);
    assert_eq!(half_hour.minute_increment(), 30);
    assert_eq!(
      half_hour.snap(naive("2024-06-04 09:14:00")),
      naive("2024-06-04 09:00:00")
    );
    assert_eq!(
      f.with_minute_increment(7).minute_increment(),
      15
    );
  }

  #[test]
  fn display_mode_keys() {
    for mode in [
      DisplayMode::Full,
      DisplayMode::Date,
      DisplayMode::Time,
      DisplayMode::DateTime
    ] {
      assert_eq!(DisplayMode::from_key(mode.as_key()), mode);
    }
    assert_eq!(
      DisplayMode::from_key(" FULL "),
      DisplayMode::Full
    );
  }
}
