use anyhow::Context;
use js_sys::Reflect;
use wasm_bindgen::{
  JsCast,
  JsValue
};
use web_sys::Document;
use weekslot_core::locale::{
  HostLocale,
  weekday_from_iso
};

pub fn document() -> anyhow::Result<Document> {
  web_sys::window()
    .context("no window in this runtime")?
    .document()
    .context("window has no document")
}

/// Reads timezone and hour cycle from `Intl` and the preferred language
/// from `navigator`. Anything the runtime does not report stays `None`.
pub fn host_locale() -> HostLocale {
  let options = js_sys::Object::new();
  if Reflect::set(
    &options,
    &JsValue::from_str("hour"),
    &JsValue::from_str("numeric")
  )
  .is_err()
  {
    tracing::warn!(
      "cannot set Intl hour option; hour cycle may be missing"
    );
  }
  let resolved =
    js_sys::Intl::DateTimeFormat::new(
      &js_sys::Array::new(),
      &options
    )
    .resolved_options();

  let read = |key: &str| {
    Reflect::get(
      &resolved,
      &JsValue::from_str(key)
    )
    .ok()
  };

  let language = web_sys::window()
    .and_then(|window| {
      window.navigator().language()
    })
    .or_else(|| {
      read("locale")
        .and_then(|value| value.as_string())
    });

  let host = HostLocale {
    timezone:   read("timeZone")
      .and_then(|value| value.as_string()),
    week_start: language
      .as_deref()
      .and_then(first_day_of_week)
      .and_then(weekday_from_iso),
    hour12:     read("hour12")
      .and_then(|value| value.as_bool()),
    language
  };

  tracing::debug!(
    timezone = ?host.timezone,
    language = ?host.language,
    hour12 = ?host.hour12,
    week_start = ?host.week_start,
    "read host locale"
  );
  host
}

/// ISO first day of the week for a language tag, from `Intl.Locale`.
/// Engines expose it as `getWeekInfo()` or as a `weekInfo` getter; some
/// expose neither.
fn first_day_of_week(
  tag: &str
) -> Option<u32> {
  let intl = Reflect::get(
    &js_sys::global(),
    &JsValue::from_str("Intl")
  )
  .ok()?;
  let constructor = Reflect::get(
    &intl,
    &JsValue::from_str("Locale")
  )
  .ok()?
  .dyn_into::<js_sys::Function>()
  .ok()?;
  let locale = Reflect::construct(
    &constructor,
    &js_sys::Array::of1(&JsValue::from_str(
      tag
    ))
  )
  .ok()?;

  let info = Reflect::get(
    &locale,
    &JsValue::from_str("getWeekInfo")
  )
  .ok()
  .and_then(|method| {
    method
      .dyn_into::<js_sys::Function>()
      .ok()
  })
  .and_then(|method| {
    method.call0(&locale).ok()
  })
  .or_else(|| {
    Reflect::get(
      &locale,
      &JsValue::from_str("weekInfo")
    )
    .ok()
  })
  .filter(|info| info.is_object())?;

  let first_day = Reflect::get(
    &info,
    &JsValue::from_str("firstDay")
  )
  .ok()?
  .as_f64()?;
  (1.0..=7.0)
    .contains(&first_day)
    .then_some(first_day as u32)
}
