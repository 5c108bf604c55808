//! Click → measure resolution and the select / toggle-highlight state
//! machine.
//!
//! Two states: nothing selected (initial, and after a new sheet loads) and
//! a measure selected. A click on a different measure moves the highlight
//! there; a click on the same measure again only toggles its visibility.

use crate::coords;
use crate::host::{Cursor, ScoreHost};
use crate::model::*;

/// Identifiers of the current and previously clicked measure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub current: Option<MeasureId>,
    pub last_clicked: Option<MeasureId>,
}

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Below the visible container (scrollbar)
    OutsideSheet,
    /// No entry near the click, or no note under the cursor there
    EmptySpace,
    Selected(MeasureId),
    /// Repeat click on the selected measure; `visible` is the new state
    Toggled { measure: MeasureId, visible: bool },
}

#[derive(Debug, Clone)]
pub struct SelectionResolver {
    state: SelectionState,
    highlight: CursorOptions,
}

impl SelectionResolver {
    pub fn new(highlight_alpha: f64) -> Self {
        Self {
            state: SelectionState::default(),
            highlight: CursorOptions {
                cursor_type: CursorType::CurrentArea,
                alpha: highlight_alpha,
            },
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn current(&self) -> Option<MeasureId> {
        self.state.current
    }

    /// Back to "nothing selected".
    pub fn reset(&mut self) {
        self.state = SelectionState::default();
    }

    /// Resolve a click at pixel coordinates relative to the display
    /// container.
    pub fn resolve_click<H: ScoreHost>(&mut self, host: &mut H, pixel_x: f64, pixel_y: f64) -> ClickOutcome {
        let display = host.display_state();
        if pixel_y > display.container_client_height {
            return ClickOutcome::OutsideSheet;
        }

        let (rel_x, rel_y) = coords::relative_position(pixel_x, pixel_y, &display);
        let position = coords::position_in_units(rel_x, rel_y, &display);

        let Some(entry) = host.nearest_entry(position) else {
            log::trace!("no staff entry near ({:.1}, {:.1})", position.x, position.y);
            return ClickOutcome::EmptySpace;
        };

        let cursor = host.cursor();
        cursor.move_to(entry.timestamp);
        let Some(measure) = cursor.measure_under_cursor() else {
            log::debug!("no note under cursor at timestamp {}", entry.timestamp);
            return ClickOutcome::EmptySpace;
        };

        if self.state.last_clicked == Some(measure) {
            let visible = toggle_highlight(cursor);
            self.state.last_clicked = Some(measure);
            return ClickOutcome::Toggled { measure, visible };
        }

        cursor.set_options(self.highlight);
        cursor.show();
        cursor.update();
        self.state.current = Some(measure);
        self.state.last_clicked = Some(measure);
        log::debug!("selected measure index {}", measure.0);
        ClickOutcome::Selected(measure)
    }
}

/// Show a hidden cursor or hide a visible one. Returns the new visibility.
pub fn toggle_highlight<C: Cursor>(cursor: &mut C) -> bool {
    if cursor.is_hidden() {
        cursor.show();
        true
    } else {
        cursor.hide();
        false
    }
}
