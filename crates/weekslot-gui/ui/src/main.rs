mod booking;
mod browser;
mod components;
mod marked;
mod mount;

use weekslot_core::{
  LocaleSettings,
  SelectedRange,
  TimeFormatter,
  WeekSelectorConfig
};
use yew::Callback;

use crate::components::WeekSlotPickerProps;

const WEEK_SELECTOR_CONFIG_TOML: &str =
  include_str!(
    "../assets/week_selector.toml"
  );
const CALENDAR_CONTAINER_ID: &str =
  "week-calendar";

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  tracing::info!(
    "starting weekslot frontend"
  );

  let config =
    WeekSelectorConfig::load_or_default(
      WEEK_SELECTOR_CONFIG_TOML
    );
  let settings = LocaleSettings::resolve(
    &config,
    &browser::host_locale()
  );
  let formatter =
    TimeFormatter::new(settings)
      .with_minute_increment(
        config.picker.minute_increment
      );

  marked::apply_when_ready(formatter);

  let on_range_selected =
    Callback::from(
      move |range: SelectedRange| {
        booking::fill_booking_form(
          &range, &formatter
        );
      }
    );

  if let Err(error) =
    mount::mount_week_selector(
      CALENDAR_CONTAINER_ID,
      WeekSlotPickerProps {
        settings,
        grid: config.grid,
        on_range_selected
      }
    )
  {
    tracing::error!(
      error = %format!("{error:#}"),
      "failed to mount week selector"
    );
  }
}
