//! Fixed names and tolerances shared by the editor, the parser and the
//! annotator.

// ── Document attributes ─────────────────────────────────────────────
/// Per-measure width factor, written on `<measure>` elements.
pub const MEASURE_WIDTH_ATTR: &str = "osmdWidthFactor";
/// Sheet-wide width factor, written on the `<score-partwise>` root.
pub const SHEET_WIDTH_ATTR: &str = "osmdMeasureWidthFactor";

pub const SCORE_ROOT: &str = "score-partwise";
pub const MEASURE_ELEMENT: &str = "measure";

// ── Width factors ───────────────────────────────────────────────────
pub const NEUTRAL_WIDTH_FACTOR: f64 = 1.0;
/// Anything closer than this to 1.0 counts as neutral.
pub const NEUTRAL_TOLERANCE: f64 = 0.00001;

// ── Export ──────────────────────────────────────────────────────────
pub const EXPORT_ENCODING: &str = "UTF-8";
pub const EXPORT_MIME: &str = "text/plain;charset=utf-8";
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

// ── Display ─────────────────────────────────────────────────────────
/// Shown in the selected-measure field when nothing is selected.
pub const NO_SELECTION_LABEL: &str = "-";
/// Logical units per display pixel at zoom 1.0.
pub const PIXELS_PER_UNIT: f64 = 10.0;
