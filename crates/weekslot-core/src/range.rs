use chrono::{
  DateTime,
  SecondsFormat,
  Utc
};
use chrono_tz::Tz;
use serde::{
  Deserialize,
  Serialize
};

use crate::calendar::SLOT_MINUTES;

/// A completed selection, always ordered so that `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedRange {
  start: DateTime<Tz>,
  end:   DateTime<Tz>
}

/// Wire form of a selection as the booking backend expects it.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct RangePayload {
  pub start_utc: String,
  pub end_utc:   String
}

impl SelectedRange {
  pub fn normalized(
    a: DateTime<Tz>,
    b: DateTime<Tz>
  ) -> Self {
    if a <= b {
      Self { start: a, end: b }
    } else {
      Self { start: b, end: a }
    }
  }

  pub fn start(&self) -> DateTime<Tz> {
    self.start
  }

  pub fn end(&self) -> DateTime<Tz> {
    self.end
  }

  pub fn contains(
    &self,
    instant: &DateTime<Tz>
  ) -> bool {
    *instant >= self.start
      && *instant <= self.end
  }

  pub fn is_single_slot(&self) -> bool {
    self.start == self.end
  }

  /// Number of grid slots the range covers, both ends included.
  pub fn slot_count(&self) -> i64 {
    (self.end - self.start).num_minutes()
      / i64::from(SLOT_MINUTES)
      + 1
  }

  pub fn to_payload(&self) -> RangePayload {
    RangePayload {
      start_utc: utc_text(self.start),
      end_utc:   utc_text(self.end)
    }
  }
}

fn utc_text(instant: DateTime<Tz>) -> String {
  instant
    .with_timezone(&Utc)
    .to_rfc3339_opts(
      SecondsFormat::Millis,
      true
    )
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn at(
    hour: u32,
    minute: u32
  ) -> DateTime<Tz> {
    chrono_tz::Pacific::Auckland
      .with_ymd_and_hms(
        2024, 6, 4, hour, minute, 0
      )
      .single()
      .expect("valid local time")
  }

  #[test]
  fn normalizes_backward_ranges() {
    let range =
      SelectedRange::normalized(at(10, 30), at(9, 0));
    assert_eq!(range.start(), at(9, 0));
    assert_eq!(range.end(), at(10, 30));
    assert_eq!(range.slot_count(), 4);
    assert!(range.contains(&at(10, 0)));
    assert!(!range.contains(&at(11, 0)));
  }

  #[test]
  fn single_slot_range() {
    let range =
      SelectedRange::normalized(at(9, 0), at(9, 0));
    assert!(range.is_single_slot());
    assert_eq!(range.slot_count(), 1);
  }

  #[test]
  fn payload_is_utc_with_millis() {
    // Auckland is UTC+12 in June.
    let payload =
      SelectedRange::normalized(at(9, 0), at(10, 30))
        .to_payload();
    assert_eq!(
      payload,
      RangePayload {
        start_utc: "2024-06-03T21:00:00.000Z"
          .to_string(),
        end_utc:   "2024-06-03T22:30:00.000Z"
          .to_string()
      }
    );

    let json = serde_json::to_string(&payload)
      .expect("serialize payload");
    assert_eq!(
      json,
      r#"{"start_utc":"2024-06-03T21:00:00.000Z","end_utc":"2024-06-03T22:30:00.000Z"}"#
    );
  }
}
