//! Pixel → logical-unit mapping.
//!
//! Three coordinate spaces meet here: raw pixels from the UI, fractions of
//! the display viewport, and the sheet's own logical units (10 pixels per
//! unit at zoom 1.0).

use crate::constants::PIXELS_PER_UNIT;
use crate::model::{DisplayState, LogicalPoint};

/// Viewport fractions for a pixel position already corrected for the
/// container offset.
pub fn relative_position(pixel_x: f64, pixel_y: f64, display: &DisplayState) -> (f64, f64) {
    (pixel_x / display.display_width, pixel_y / display.display_height)
}

/// Logical position of a click given as viewport fractions.
///
/// In single-line mode the horizontal scroll is not part of the event
/// coordinates, so it is added back before the transform.
pub fn position_in_units(relative_x: f64, relative_y: f64, display: &DisplayState) -> LogicalPoint {
    let mut x = relative_x;
    if display.single_horizontal_line {
        x += display.scroll_left / display.display_width;
    }
    to_logical_units(x, relative_y, display)
}

/// Scale viewport fractions to sheet units.
pub fn to_logical_units(relative_x: f64, relative_y: f64, display: &DisplayState) -> LogicalPoint {
    let view_width = if display.single_horizontal_line {
        // The page width is meaningless for an endless line; use what is visible.
        display.container_offset_width / display.zoom / PIXELS_PER_UNIT
    } else {
        display.sheet_page_width
    };
    let view_height = display.display_height / display.zoom / PIXELS_PER_UNIT;

    LogicalPoint::new(relative_x * view_width, relative_y * view_height)
}
