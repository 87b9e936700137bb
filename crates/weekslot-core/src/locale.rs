use chrono::{
  Locale,
  Weekday
};
use chrono_tz::Tz;

use crate::config::WeekSelectorConfig;

pub const DEFAULT_TIMEZONE: &str =
  "Pacific/Auckland";

/// Locale facts as reported by the host environment (the browser's
/// `Intl` and `navigator`). Every field is optional because any of them
/// may be missing at runtime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostLocale {
  pub timezone:   Option<String>,
  pub language:   Option<String>,
  pub hour12:     Option<bool>,
  pub week_start: Option<Weekday>
}

/// Everything date arithmetic and formatting needs to know about the
/// user's locale. Tests build this directly to stay deterministic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocaleSettings {
  pub timezone:   Tz,
  pub locale:     Locale,
  pub hour12:     bool,
  pub week_start: Weekday
}

impl LocaleSettings {
  pub fn new(
    timezone: Tz,
    locale: Locale,
    hour12: bool,
    week_start: Weekday
  ) -> Self {
    Self {
      timezone,
      locale,
      hour12,
      week_start
    }
  }

  /// Config values win over host values; the rest falls back to
  /// `DEFAULT_TIMEZONE`, `en_US`, a 24-hour clock and Sunday weeks.
  #[tracing::instrument(skip_all)]
  pub fn resolve(
    config: &WeekSelectorConfig,
    host: &HostLocale
  ) -> Self {
    let timezone = resolve_timezone(&[
      ("config", config.timezone.as_deref()),
      ("host", host.timezone.as_deref()),
      ("default", Some(DEFAULT_TIMEZONE))
    ]);

    let locale = config
      .locale
      .as_deref()
      .or(host.language.as_deref())
      .and_then(parse_locale)
      .unwrap_or(Locale::en_US);

    let hour12 = config
      .hour12
      .or(host.hour12)
      .unwrap_or(false);

    let settings = Self {
      timezone,
      locale,
      hour12,
      week_start: config
        .grid
        .week_start_day()
        .or(host.week_start)
        .unwrap_or(Weekday::Sun)
    };
    tracing::info!(
      timezone = %settings.timezone,
      locale = ?settings.locale,
      hour12 = settings.hour12,
      week_start = ?settings.week_start,
      "resolved locale settings"
    );
    settings
  }
}

/// Takes the first candidate that names a valid timezone.
pub fn resolve_timezone(
  candidates: &[(&str, Option<&str>)]
) -> Tz {
  candidates
    .iter()
    .filter_map(|(source, raw)| {
      raw.and_then(|raw| {
        parse_timezone(raw, source)
      })
    })
    .next()
    .unwrap_or_else(|| {
      tracing::error!(
        "no usable timezone; using UTC"
      );
      chrono_tz::UTC
    })
}

pub fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => Some(tz),
    | Err(error) => {
      tracing::error!(
        source,
        timezone = %trimmed,
        error = %error,
        "invalid timezone id"
      );
      None
    }
  }
}

/// Maps a BCP 47 tag such as `en-US` or `de` onto a chrono locale.
pub fn parse_locale(
  raw: &str
) -> Option<Locale> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  let mut parts = trimmed
    .split(['-', '_'])
    .filter(|part| !part.is_empty());
  let language =
    parts.next()?.to_ascii_lowercase();
  let region = parts
    .find(|part| {
      part.len() == 2
        && part
          .chars()
          .all(|c| c.is_ascii_alphabetic())
    })
    .map(str::to_ascii_uppercase);

  let mut candidates = Vec::new();
  if let Some(region) = region {
    candidates
      .push(format!("{language}_{region}"));
  }
  candidates.push(format!(
    "{language}_{}",
    language.to_ascii_uppercase()
  ));
  if language == "en" {
    candidates.push("en_US".to_string());
  }

  let locale =
    candidates.iter().find_map(|tag| {
      Locale::try_from(tag.as_str()).ok()
    });
  if locale.is_none() {
    tracing::warn!(
      locale = %trimmed,
      "unsupported locale tag"
    );
  }
  locale
}

/// Maps an ISO weekday number (`1` Monday through `7` Sunday), as found
/// in `Intl.Locale` week info, onto a `Weekday`.
pub fn weekday_from_iso(
  day: u32
) -> Option<Weekday> {
  match day {
    | 1 => Some(Weekday::Mon),
    | 2 => Some(Weekday::Tue),
    | 3 => Some(Weekday::Wed),
    | 4 => Some(Weekday::Thu),
    | 5 => Some(Weekday::Fri),
    | 6 => Some(Weekday::Sat),
    | 7 => Some(Weekday::Sun),
    | _ => None
  }
}

pub fn parse_week_start(
  raw: &str
) -> Option<Weekday> {
  match raw
    .trim()
    .to_ascii_lowercase()
    .as_str()
  {
    | "sunday" | "sun" => {
      Some(Weekday::Sun)
    }
    | "monday" | "mon" => {
      Some(Weekday::Mon)
    }
    | "saturday" | "sat" => {
      Some(Weekday::Sat)
    }
    | _ => None
  }
}
