use chrono::{
  DateTime,
  Datelike,
  Duration,
  LocalResult,
  NaiveDate,
  NaiveDateTime,
  NaiveTime,
  TimeZone,
  Weekday
};
use chrono_tz::Tz;

use crate::config::GridConfig;

pub const SLOT_MINUTES: u32 = 30;
pub const DAYS_PER_WEEK: i64 = 7;

pub fn add_days(
  date: NaiveDate,
  days: i64
) -> NaiveDate {
  date
    .checked_add_signed(Duration::days(
      days
    ))
    .unwrap_or(date)
}

pub fn start_of_week(
  day: NaiveDate,
  week_start: Weekday
) -> NaiveDate {
  let day_idx = day
    .weekday()
    .num_days_from_monday()
    as i64;
  let start_idx = week_start
    .num_days_from_monday()
    as i64;
  let diff =
    (7 + day_idx - start_idx) % 7;
  add_days(day, -diff)
}

/// Wall-clock times of every slot row, from `hour_start:00` through
/// `hour_end:00` inclusive.
pub fn slot_times(
  grid: &GridConfig
) -> Vec<NaiveTime> {
  let first = grid.hour_start * 60;
  let last = grid.hour_end * 60;

  (first..=last)
    .step_by(SLOT_MINUTES as usize)
    .filter_map(|minute| {
      NaiveTime::from_hms_opt(
        minute / 60,
        minute % 60,
        0
      )
    })
    .collect()
}

/// Pins a wall-clock time to an instant in `timezone`.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside
/// a DST gap move forward to the first wall-clock time that exists, so a
/// grid cell is never dropped.
pub fn resolve_local(
  timezone: Tz,
  local: NaiveDateTime
) -> DateTime<Tz> {
  match timezone
    .from_local_datetime(&local)
  {
    | LocalResult::Single(instant) => {
      instant
    }
    | LocalResult::Ambiguous(
      first,
      second
    ) => {
      tracing::warn!(
        %local,
        first = %first,
        second = %second,
        "ambiguous local datetime; using earliest"
      );
      first.min(second)
    }
    | LocalResult::None => {
      let mut probe = local;
      for _ in 0..(24 * 60 / 15) {
        probe += Duration::minutes(15);
        if let Some(instant) = timezone
          .from_local_datetime(&probe)
          .earliest()
        {
          tracing::warn!(
            %local,
            resolved = %instant,
            "local datetime falls in a gap; moved forward"
          );
          return instant;
        }
      }
      timezone.from_utc_datetime(&local)
    }
  }
}

pub fn local_midnight(
  timezone: Tz,
  date: NaiveDate
) -> DateTime<Tz> {
  resolve_local(
    timezone,
    date.and_time(NaiveTime::MIN)
  )
}

#[cfg(test)]
mod tests {
  use chrono::Timelike;

  use super::*;

  fn date(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  #[test]
  fn week_starts_on_configured_day() {
    let wednesday = date(2024, 6, 5);
    assert_eq!(
      start_of_week(wednesday, Weekday::Sun),
      date(2024, 6, 2)
    );
    assert_eq!(
      start_of_week(wednesday, Weekday::Mon),
      date(2024, 6, 3)
    );
    assert_eq!(
      start_of_week(date(2024, 6, 2), Weekday::Sun),
      date(2024, 6, 2)
    );
  }

  #[test]
  fn default_slots_are_half_hourly() {
    let slots =
      slot_times(&GridConfig::default());
    assert_eq!(slots.len(), 21);
    assert_eq!(
      slots.first().map(|t| (t.hour(), t.minute())),
      Some((8, 0))
    );
    assert_eq!(
      slots.get(1).map(|t| (t.hour(), t.minute())),
      Some((8, 30))
    );
    assert_eq!(
      slots.last().map(|t| (t.hour(), t.minute())),
      Some((18, 0))
    );
  }

  #[test]
  fn gap_times_move_forward() {
    // Clocks in New York jump from 02:00 to 03:00 on 2024-03-10.
    let tz = chrono_tz::America::New_York;
    let local = date(2024, 3, 10)
      .and_hms_opt(2, 30, 0)
      .expect("valid time");
    let resolved = resolve_local(tz, local);
    assert_eq!(resolved.hour(), 3);
    assert_eq!(resolved.minute(), 0);
  }

  #[test]
  fn ambiguous_times_take_earliest() {
    // 01:30 happens twice in New York on 2024-11-03.
    let tz = chrono_tz::America::New_York;
    let local = date(2024, 11, 3)
      .and_hms_opt(1, 30, 0)
      .expect("valid time");
    let resolved = resolve_local(tz, local);
    assert_eq!(
      resolved
        .naive_utc()
        .format("%H:%M")
        .to_string(),
      "05:30"
    );
  }
}
