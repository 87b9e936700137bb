use anyhow::Context;
use yew::AppHandle;

use crate::browser;
use crate::components::{
  WeekSlotPicker,
  WeekSlotPickerProps
};

/// Renders the week selector into the element with `container_id`.
#[tracing::instrument(skip(props))]
pub fn mount_week_selector(
  container_id: &str,
  props: WeekSlotPickerProps
) -> anyhow::Result<AppHandle<WeekSlotPicker>>
{
  let root = browser::document()?
    .get_element_by_id(container_id)
    .with_context(|| {
      format!(
        "missing #{container_id} mount \
         element"
      )
    })?;

  tracing::info!(
    timezone = %props.settings.timezone,
    "mounting week selector"
  );

  Ok(
    yew::Renderer::<WeekSlotPicker>::with_root_and_props(
      root, props
    )
    .render()
  )
}
