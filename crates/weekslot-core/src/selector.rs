//! Week-view slot selection.
//!
//! [`WeekSelector`] owns the displayed week and the drag gesture state. It
//! knows nothing about the DOM: the UI feeds it pointer events and redraws
//! from [`WeekSelector::grid`] after every change.

use chrono::{
  DateTime,
  NaiveDate,
  SecondsFormat,
  Utc
};
use chrono_tz::Tz;

use crate::calendar::{
  DAYS_PER_WEEK,
  add_days,
  local_midnight,
  resolve_local,
  slot_times,
  start_of_week
};
use crate::clock::Clock;
use crate::config::GridConfig;
use crate::locale::LocaleSettings;
use crate::range::SelectedRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
  Idle,
  Dragging
}

/// Both endpoints are set together on press, so a half-open selection
/// cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Selection {
  start: DateTime<Tz>,
  end:   DateTime<Tz>
}

impl Selection {
  fn range(&self) -> SelectedRange {
    SelectedRange::normalized(
      self.start, self.end
    )
  }
}

#[derive(Debug, Clone)]
pub struct WeekSelector {
  settings:  LocaleSettings,
  grid:      GridConfig,
  anchor:    NaiveDate,
  selection: Option<Selection>,
  drag:      DragState
}

/// Render model for one pass. Rebuilt from scratch on every call to
/// [`WeekSelector::grid`].
#[derive(Debug, Clone, PartialEq)]
pub struct WeekGrid {
  pub title: String,
  pub days:  Vec<DayHeader>,
  pub rows:  Vec<SlotRow>
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayHeader {
  pub date:  NaiveDate,
  pub label: String
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotRow {
  pub label: String,
  pub cells: Vec<SlotCell>
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotCell {
  pub instant:     DateTime<Tz>,
  pub utc:         String,
  pub highlighted: bool
}

impl WeekSelector {
  #[tracing::instrument(skip_all)]
  pub fn new(
    settings: LocaleSettings,
    grid: GridConfig,
    clock: &impl Clock
  ) -> Self {
    let today = clock
      .now()
      .with_timezone(&settings.timezone)
      .date_naive();
    let anchor = start_of_week(
      today,
      settings.week_start
    );
    tracing::debug!(
      %today,
      %anchor,
      timezone = %settings.timezone,
      "anchored week selector"
    );

    Self {
      settings,
      grid,
      anchor,
      selection: None,
      drag: DragState::Idle
    }
  }

  pub fn settings(&self) -> &LocaleSettings {
    &self.settings
  }

  pub fn anchor_date(&self) -> NaiveDate {
    self.anchor
  }

  pub fn anchor_week_start(
    &self
  ) -> DateTime<Tz> {
    local_midnight(
      self.settings.timezone,
      self.anchor
    )
  }

  pub fn drag_state(&self) -> DragState {
    self.drag
  }

  pub fn is_dragging(&self) -> bool {
    self.drag == DragState::Dragging
  }

  pub fn selection(
    &self
  ) -> Option<SelectedRange> {
    self.selection.map(|s| s.range())
  }

  pub fn previous_week(&mut self) {
    self.shift_weeks(-1);
  }

  pub fn next_week(&mut self) {
    self.shift_weeks(1);
  }

  /// Moves the anchor by whole weeks. The selection is left alone even
  /// when it scrolls out of view.
  pub fn shift_weeks(&mut self, weeks: i64) {
    self.anchor = add_days(
      self.anchor,
      weeks * DAYS_PER_WEEK
    );
    tracing::debug!(anchor = %self.anchor, weeks, "shifted displayed week");
  }

  pub fn press(
    &mut self,
    cell: DateTime<Tz>
  ) {
    self.drag = DragState::Dragging;
    self.selection = Some(Selection {
      start: cell,
      end:   cell
    });
  }

  /// Returns `true` when the highlighted span changed.
  pub fn enter(
    &mut self,
    cell: DateTime<Tz>
  ) -> bool {
    if !self.is_dragging() {
      return false;
    }
    match self.selection.as_mut() {
      | Some(selection)
        if selection.end != cell =>
      {
        selection.end = cell;
        true
      }
      | _ => false
    }
  }

  /// Ends the gesture on a grid cell. Yields the normalized range exactly
  /// once per gesture; later releases return `None`.
  pub fn release_on_cell(
    &mut self,
    cell: DateTime<Tz>
  ) -> Option<SelectedRange> {
    if !self.is_dragging() {
      return None;
    }
    self.drag = DragState::Idle;

    let selection =
      self.selection.as_mut()?;
    selection.end = cell;
    let range = selection.range();
    tracing::info!(
      start = %range.start(),
      end = %range.end(),
      slots = range.slot_count(),
      "range selected"
    );
    Some(range)
  }

  /// Ends the gesture wherever the pointer was released. Never yields a
  /// range; returns `true` if a drag was actually cancelled.
  pub fn release_anywhere(
    &mut self
  ) -> bool {
    if !self.is_dragging() {
      return false;
    }
    self.drag = DragState::Idle;
    tracing::debug!(
      "drag released outside the grid"
    );
    true
  }

  pub fn is_highlighted(
    &self,
    instant: &DateTime<Tz>
  ) -> bool {
    self
      .selection
      .is_some_and(|s| s.range().contains(instant))
  }

  pub fn grid(&self) -> WeekGrid {
    let timezone = self.settings.timezone;
    let locale = self.settings.locale;
    let days = (0..DAYS_PER_WEEK)
      .map(|offset| {
        add_days(self.anchor, offset)
      })
      .collect::<Vec<_>>();

    let headers = days
      .iter()
      .map(|&date| {
        DayHeader {
          date,
          label: local_midnight(
            timezone, date
          )
          .format_localized("%a %-d", locale)
          .to_string()
        }
      })
      .collect();

    let rows = slot_times(&self.grid)
      .into_iter()
      .map(|time| {
        let cells = days
          .iter()
          .map(|date| {
            let instant = resolve_local(
              timezone,
              date.and_time(time)
            );
            SlotCell {
              instant,
              utc: instant
                .with_timezone(&Utc)
                .to_rfc3339_opts(
                  SecondsFormat::Millis,
                  true
                ),
              highlighted: self
                .is_highlighted(&instant)
            }
          })
          .collect();
        SlotRow {
          label: time
            .format("%H:%M")
            .to_string(),
          cells
        }
      })
      .collect();

    WeekGrid {
      title: self.week_title(&days),
      days: headers,
      rows
    }
  }

  fn week_title(
    &self,
    days: &[NaiveDate]
  ) -> String {
    let timezone = self.settings.timezone;
    let locale = self.settings.locale;
    let label = |date: NaiveDate| {
      local_midnight(timezone, date)
        .format_localized(
          "%a, %b %-d",
          locale
        )
        .to_string()
    };

    match (days.first(), days.last()) {
      | (Some(&first), Some(&last)) => {
        format!(
          "{} - {}",
          label(first),
          label(last)
        )
      }
      | _ => String::new()
    }
  }
}
