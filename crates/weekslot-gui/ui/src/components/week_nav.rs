use web_sys::MouseEvent;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct WeekNavProps {
  pub title:   String,
  pub on_prev: Callback<MouseEvent>,
  pub on_next: Callback<MouseEvent>
}

#[function_component(WeekNav)]
pub fn week_nav(
  props: &WeekNavProps
) -> Html {
  html! {
      <div class="calendar-header">
          <button type="button" class="btn nav-prev" onclick={props.on_prev.clone()}>{ "<" }</button>
          <span class="calendar-title">{ &props.title }</span>
          <button type="button" class="btn nav-next" onclick={props.on_next.clone()}>{ ">" }</button>
      </div>
  }
}
