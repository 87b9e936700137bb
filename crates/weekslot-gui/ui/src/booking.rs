use anyhow::Context;
use wasm_bindgen::JsCast;
use web_sys::{
  Document,
  HtmlInputElement
};
use weekslot_core::{
  DisplayMode,
  SelectedRange,
  TimeFormatter
};

use crate::browser;
use crate::marked::UTC_VALUE_ATTR;

const START_INPUT_ID: &str = "start_time";
const END_INPUT_ID: &str = "end_time";
const SUMMARY_ID: &str = "selected-range";
const PAYLOAD_INPUT_ID: &str =
  "range-payload";

/// Copies a selected range into the booking form on the page. Each
/// target element is optional.
pub fn fill_booking_form(
  range: &SelectedRange,
  formatter: &TimeFormatter
) {
  if let Err(error) =
    try_fill_booking_form(range, formatter)
  {
    tracing::error!(
      error = %format!("{error:#}"),
      "failed to fill booking form"
    );
  }
}

fn try_fill_booking_form(
  range: &SelectedRange,
  formatter: &TimeFormatter
) -> anyhow::Result<()> {
  let document = browser::document()?;
  let payload = range.to_payload();

  for (id, utc) in [
    (START_INPUT_ID, &payload.start_utc),
    (END_INPUT_ID, &payload.end_utc)
  ] {
    let Some(input) =
      input_by_id(&document, id)
    else {
      continue;
    };
    if let Some(local) =
      formatter.picker_value_from_utc(utc)
    {
      input.set_value(&local);
    }
    input
      .set_attribute(UTC_VALUE_ATTR, utc)
      .map_err(|_| {
        anyhow::anyhow!(
          "cannot set {UTC_VALUE_ATTR} on #{id}"
        )
      })?;
  }

  if let Some(summary) =
    document.get_element_by_id(SUMMARY_ID)
  {
    summary.set_text_content(Some(
      &range_summary(range, formatter)
    ));
  }

  if let Some(input) =
    input_by_id(&document, PAYLOAD_INPUT_ID)
  {
    let json = serde_json::to_string(
      &payload
    )
    .context("serialize range payload")?;
    input.set_value(&json);
  }

  tracing::debug!(
    start = %payload.start_utc,
    end = %payload.end_utc,
    "booking form updated"
  );
  Ok(())
}

fn range_summary(
  range: &SelectedRange,
  formatter: &TimeFormatter
) -> String {
  let start = formatter.format_instant(
    range.start().to_utc(),
    DisplayMode::Full
  );
  if range.is_single_slot() {
    return start;
  }
  // Only same-day ranges map onto contiguous grid cells.
  if range.start().date_naive()
    != range.end().date_naive()
  {
    let end = formatter.format_instant(
      range.end().to_utc(),
      DisplayMode::DateTime
    );
    return format!("{start} - {end}");
  }

  let end = formatter.format_instant(
    range.end().to_utc(),
    DisplayMode::Time
  );
  format!(
    "{start} - {end} ({} slots)",
    range.slot_count()
  )
}

fn input_by_id(
  document: &Document,
  id: &str
) -> Option<HtmlInputElement> {
  document
    .get_element_by_id(id)?
    .dyn_into::<HtmlInputElement>()
    .ok()
}

#[cfg(test)]
mod tests {
  use chrono::{
    Locale,
    TimeZone,
    Weekday
  };
  use chrono_tz::America::New_York;
  use wasm_bindgen_test::wasm_bindgen_test;
  use weekslot_core::LocaleSettings;

  use super::*;

  fn new_york_formatter() -> TimeFormatter {
    TimeFormatter::new(LocaleSettings::new(
      New_York,
      Locale::en_US,
      false,
      Weekday::Sun
    ))
  }

  fn local(
    day: u32,
    hour: u32,
    minute: u32
  ) -> chrono::DateTime<chrono_tz::Tz> {
    New_York
      .with_ymd_and_hms(2024, 6, day, hour, minute, 0)
      .single()
      .expect("valid local time")
  }

  #[wasm_bindgen_test]
  fn same_day_summary_counts_slots() {
    let range = SelectedRange::normalized(
      local(4, 10, 30),
      local(4, 9, 0)
    );
    assert_eq!(
      range_summary(&range, &new_york_formatter()),
      "Tuesday, June 4, 2024 09:00 - 10:30 (4 slots)"
    );
  }

  #[wasm_bindgen_test]
  fn multi_day_summary_has_no_slot_count() {
    let range = SelectedRange::normalized(
      local(4, 17, 30),
      local(5, 9, 0)
    );
    let summary =
      range_summary(&range, &new_york_formatter());
    assert_eq!(
      summary,
      "Tuesday, June 4, 2024 17:30 - Jun 5, 2024, 09:00"
    );
    assert!(!summary.contains("slots"));
  }

  #[wasm_bindgen_test]
  fn single_slot_summary_is_the_start() {
    let cell = local(4, 9, 0);
    let range =
      SelectedRange::normalized(cell, cell);
    assert_eq!(
      range_summary(&range, &new_york_formatter()),
      "Tuesday, June 4, 2024 09:00"
    );
  }
}
