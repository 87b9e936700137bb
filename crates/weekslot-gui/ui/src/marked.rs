//! Page-wide pass over elements that carry UTC values in data attributes.
//!
//! `.utc-datetime[data-utc]` gets its text replaced with local display
//! text; elements with an empty `data-utc` keep theirs. `.datetime-picker`
//! inputs become `datetime-local` pickers whose `data-utc-value` tracks the
//! user's choice in UTC.

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{
  Document,
  Element,
  HtmlInputElement
};
use weekslot_core::TimeFormatter;

use crate::browser;

pub const DISPLAY_SELECTOR: &str =
  ".utc-datetime";
pub const PICKER_SELECTOR: &str =
  ".datetime-picker";
pub const UTC_ATTR: &str = "data-utc";
pub const FORMAT_ATTR: &str = "data-format";
pub const UTC_VALUE_ATTR: &str =
  "data-utc-value";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkedSummary {
  pub displays: usize,
  pub pickers:  usize,
  pub skipped:  usize
}

/// Runs the pass now, or once the DOM has finished parsing.
pub fn apply_when_ready(
  formatter: TimeFormatter
) {
  let document = match browser::document() {
    | Ok(document) => document,
    | Err(error) => {
      tracing::warn!(
        error = %error,
        "skipping marked elements"
      );
      return;
    }
  };

  if document.ready_state() == "loading" {
    let target = document.clone();
    EventListener::once(
      &target,
      "DOMContentLoaded",
      move |_| {
        apply_to_marked_elements(
          &document, formatter
        );
      }
    )
    .forget();
  } else {
    apply_to_marked_elements(
      &document, formatter
    );
  }
}

pub fn apply_to_marked_elements(
  document: &Document,
  formatter: TimeFormatter
) -> MarkedSummary {
  let mut summary =
    MarkedSummary::default();

  for element in
    select_all(document, DISPLAY_SELECTOR)
  {
    let Some(utc) = element
      .get_attribute(UTC_ATTR)
      .filter(|utc| !utc.trim().is_empty())
    else {
      continue;
    };
    let format =
      element.get_attribute(FORMAT_ATTR);
    element.set_text_content(Some(
      &formatter.to_local_display(
        &utc,
        format.as_deref()
      )
    ));
    summary.displays += 1;
  }

  for element in
    select_all(document, PICKER_SELECTOR)
  {
    match element
      .dyn_into::<HtmlInputElement>()
    {
      | Ok(input) => {
        attach_picker(input, formatter);
        summary.pickers += 1;
      }
      | Err(element) => {
        tracing::warn!(
          tag = %element.tag_name(),
          "datetime picker marker on a non-input element"
        );
        summary.skipped += 1;
      }
    }
  }

  tracing::info!(
    displays = summary.displays,
    pickers = summary.pickers,
    skipped = summary.skipped,
    "applied local time to marked elements"
  );
  summary
}

fn attach_picker(
  input: HtmlInputElement,
  formatter: TimeFormatter
) {
  input.set_type("datetime-local");
  input.set_step(
    &(formatter.minute_increment() * 60)
      .to_string()
  );

  if let Some(seed) = input
    .get_attribute(UTC_VALUE_ATTR)
    .and_then(|utc| {
      formatter.picker_value_from_utc(&utc)
    })
  {
    input.set_value(&seed);
  }

  let target = input.clone();
  EventListener::new(
    &target,
    "change",
    move |_| {
      let utc = formatter
        .utc_from_picker_value(
          &input.value()
        )
        .unwrap_or_default();
      if let Some(local) = formatter
        .picker_value_from_utc(&utc)
      {
        input.set_value(&local);
      }
      if input
        .set_attribute(UTC_VALUE_ATTR, &utc)
        .is_err()
      {
        tracing::warn!(
          utc = %utc,
          "cannot store picker utc value"
        );
      }
    }
  )
  .forget();
}

fn select_all(
  document: &Document,
  selector: &str
) -> Vec<Element> {
  let Ok(nodes) =
    document.query_selector_all(selector)
  else {
    tracing::warn!(
      selector,
      "invalid selector"
    );
    return Vec::new();
  };

  (0..nodes.length())
    .filter_map(|index| nodes.get(index))
    .filter_map(|node| {
      node.dyn_into::<Element>().ok()
    })
    .collect()
}
