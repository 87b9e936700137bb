mod week_nav;

use gloo::events::EventListener;
use weekslot_core::config::GridConfig;
use weekslot_core::{LocaleSettings, SelectedRange, SystemClock, WeekSelector};
use web_sys::MouseEvent;
use yew::{
    Callback, Html, Properties, classes, function_component, html, use_effect_with,
    use_force_update, use_mut_ref,
};

use self::week_nav::WeekNav;
use crate::browser;

#[derive(Properties, PartialEq)]
pub struct WeekSlotPickerProps {
    pub settings: LocaleSettings,
    pub grid: GridConfig,
    pub on_range_selected: Callback<SelectedRange>,
}

/// One week of half-hour slots. Press, drag and release over cells to pick
/// a contiguous range; the range is emitted once per completed gesture.
#[function_component(WeekSlotPicker)]
pub fn week_slot_picker(props: &WeekSlotPickerProps) -> Html {
    let selector = {
        let settings = props.settings;
        let grid = props.grid.clone();
        use_mut_ref(move || WeekSelector::new(settings, grid, &SystemClock))
    };
    let redraw = use_force_update();

    {
        let selector = selector.clone();
        let redraw = redraw.clone();
        use_effect_with((), move |_| {
            let listener = browser::document().ok().map(|document| {
                EventListener::new(&document, "mouseup", move |_| {
                    if selector.borrow_mut().release_anywhere() {
                        redraw.force_update();
                    }
                })
            });
            if listener.is_none() {
                tracing::warn!("document unavailable; drags end only on grid cells");
            }
            move || drop(listener)
        });
    }

    let on_prev = {
        let selector = selector.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            selector.borrow_mut().previous_week();
            redraw.force_update();
        })
    };
    let on_next = {
        let selector = selector.clone();
        let redraw = redraw.clone();
        Callback::from(move |_: MouseEvent| {
            selector.borrow_mut().next_week();
            redraw.force_update();
        })
    };

    let grid = selector.borrow().grid();

    html! {
        <div class="week-selector">
            <WeekNav title={grid.title.clone()} {on_prev} {on_next} />
            <table class="week-grid">
                <thead>
                    <tr>
                        <th class="time-header"></th>
                        {
                            for grid.days.iter().map(|day| html! {
                                <th class="day-header" data-date={day.date.to_string()}>
                                    { &day.label }
                                </th>
                            })
                        }
                    </tr>
                </thead>
                <tbody>
                    {
                        for grid.rows.iter().map(|row| html! {
                            <tr>
                                <td class="time-label">{ &row.label }</td>
                                {
                                    for row.cells.iter().map(|cell| {
                                        let instant = cell.instant;

                                        let onmousedown = {
                                            let selector = selector.clone();
                                            let redraw = redraw.clone();
                                            Callback::from(move |event: MouseEvent| {
                                                event.prevent_default();
                                                selector.borrow_mut().press(instant);
                                                redraw.force_update();
                                            })
                                        };
                                        let onmouseenter = {
                                            let selector = selector.clone();
                                            let redraw = redraw.clone();
                                            Callback::from(move |_: MouseEvent| {
                                                if selector.borrow_mut().enter(instant) {
                                                    redraw.force_update();
                                                }
                                            })
                                        };
                                        let onmouseup = {
                                            let selector = selector.clone();
                                            let redraw = redraw.clone();
                                            let on_range_selected = props.on_range_selected.clone();
                                            Callback::from(move |_: MouseEvent| {
                                                let range = selector.borrow_mut().release_on_cell(instant);
                                                redraw.force_update();
                                                if let Some(range) = range {
                                                    on_range_selected.emit(range);
                                                }
                                            })
                                        };

                                        html! {
                                            <td
                                                class={classes!("calendar-cell", cell.highlighted.then_some("selected"))}
                                                data-datetime={cell.utc.clone()}
                                                {onmousedown}
                                                {onmouseenter}
                                                {onmouseup}
                                            >
                                                { &row.label }
                                            </td>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </tbody>
            </table>
        </div>
    }
}
