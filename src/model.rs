//! Data model for width editing.
//!
//! The graphical model (measures on screen, staff entries, the cursor)
//! belongs to the rendering host. What lives here is the small amount of
//! state the editor owns plus the value types exchanged with the host.

use serde::{Deserialize, Serialize};

use crate::constants::NO_SELECTION_LABEL;

/// Stable ordinal of a source measure: its index in the loaded sheet.
///
/// Selection keeps these instead of references into the graphical model,
/// which the host may rebuild on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeasureId(pub usize);

/// One measure column of the score, shared by all parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMeasure {
    /// Number shown to the user
    pub measure_number: i32,
    /// Number as written in the document's `number` attribute
    pub measure_number_xml: i32,
    /// Whether this is an implicit measure (e.g., pickup/anacrusis)
    #[serde(default)]
    pub implicit: bool,
    /// Multiplier on the naturally computed width (1.0 = neutral)
    pub width_factor: f64,
}

impl SourceMeasure {
    pub fn new(measure_number: i32, measure_number_xml: i32) -> Self {
        Self {
            measure_number,
            measure_number_xml,
            implicit: false,
            width_factor: 1.0,
        }
    }
}

/// First measure whose document number is `number`.
pub fn find_by_xml_number(measures: &[SourceMeasure], number: i32) -> Option<&SourceMeasure> {
    measures.iter().find(|m| m.measure_number_xml == number)
}

/// Width-relevant content of a parsed MusicXML document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetModel {
    /// Title of the piece
    pub title: Option<String>,
    /// MusicXML version (e.g., "3.1", "4.0")
    pub version: Option<String>,
    /// Sheet-wide width factor read from the root element
    pub sheet_width_factor: f64,
    /// Measures of the first part, in document order
    pub measures: Vec<SourceMeasure>,
}

impl SheetModel {
    pub fn new() -> Self {
        Self {
            title: None,
            version: None,
            sheet_width_factor: 1.0,
            measures: Vec::new(),
        }
    }

    pub fn measure_count(&self) -> usize {
        self.measures.len()
    }
}

impl Default for SheetModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable copy of all width factors, used across the FFI boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidthSnapshot {
    pub sheet_width_factor: f64,
    pub measures: Vec<SourceMeasure>,
}

impl From<&SheetModel> for WidthSnapshot {
    fn from(sheet: &SheetModel) -> Self {
        Self {
            sheet_width_factor: sheet.sheet_width_factor,
            measures: sheet.measures.clone(),
        }
    }
}

/// A position in sheet units, independent of pixels and zoom.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LogicalPoint {
    pub x: f64,
    pub y: f64,
}

impl LogicalPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: &LogicalPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Display metrics the host reports at the time of an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    /// Current zoom factor (1.0 = 100%)
    pub zoom: f64,
    /// Width of the drawing surface in pixels
    pub display_width: f64,
    /// Height of the drawing surface in pixels
    pub display_height: f64,
    /// Layout width of the scrolling container in pixels
    pub container_offset_width: f64,
    /// Visible height of the container, excluding its scrollbar
    pub container_client_height: f64,
    /// Page width of the sheet in logical units
    pub sheet_page_width: f64,
    /// Whether the score is drawn as one endless horizontal line
    pub single_horizontal_line: bool,
    /// Horizontal scroll offset of the container in pixels
    pub scroll_left: f64,
}

/// A renderable staff entry found near a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaffEntryHit {
    /// Absolute timestamp of the entry, in whole notes from the start
    pub timestamp: f64,
    /// Where the entry is drawn
    pub position: LogicalPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorType {
    Standard,
    /// Shades the whole area of the current measure
    CurrentArea,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorOptions {
    pub cursor_type: CursorType,
    pub alpha: f64,
}

/// Values the UI shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayFields {
    /// Selected measure number, or "-"
    pub selected_measure: String,
    /// Width of the selected measure ("120%"), absent without a selection
    pub measure_width: Option<String>,
    /// Sheet-wide width ("100%")
    pub sheet_width: String,
    pub filename: Option<String>,
}

impl Default for DisplayFields {
    fn default() -> Self {
        Self {
            selected_measure: NO_SELECTION_LABEL.to_string(),
            measure_width: None,
            sheet_width: "100%".to_string(),
            filename: None,
        }
    }
}

/// An annotated document ready to be saved by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    pub filename: String,
    pub mime: &'static str,
    pub contents: String,
}
