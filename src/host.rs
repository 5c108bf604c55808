//! Seams to the collaborators the editor drives but does not own: the
//! rendering engine with its cursor, and the UI surface that delivers
//! pointer, button and text-field events.

use crate::model::*;
use crate::widths::WidthFactorStore;

/// Playback/highlight cursor of the rendering engine.
pub trait Cursor {
    /// Position the cursor iterator at an absolute timestamp.
    fn move_to(&mut self, timestamp: f64);
    /// Measure owning the first note under the cursor.
    fn measure_under_cursor(&self) -> Option<MeasureId>;
    fn set_options(&mut self, options: CursorOptions);
    fn show(&mut self);
    fn hide(&mut self);
    /// Redraw at the current position.
    fn update(&mut self);
    fn is_hidden(&self) -> bool;
}

/// The rendering engine and the page it draws into.
pub trait ScoreHost {
    type Cursor: Cursor;

    fn display_state(&self) -> DisplayState;

    /// `offsetTop` of the display container and of each of its offset
    /// ancestors, innermost first.
    fn container_offsets_top(&self) -> Vec<f64>;

    /// Staff entry drawn nearest to `at`, if the sheet has any.
    fn nearest_entry(&self, at: LogicalPoint) -> Option<StaffEntryHit>;

    fn cursor(&mut self) -> &mut Self::Cursor;

    /// Lay out and draw the sheet with the given factors. Resets the
    /// horizontal scroll position.
    fn render(&mut self, widths: &WidthFactorStore);

    fn set_scroll_left(&mut self, scroll_left: f64);

    /// Name of the loaded file, if known.
    fn filename(&self) -> Option<String>;

    /// Push new display values to the UI.
    fn refresh_display(&mut self, _fields: &DisplayFields) {}

    /// Hand an exported document to the user (download, save dialog...).
    fn deliver_file(&mut self, file: ExportedFile);
}

/// Where an event comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    /// Press on the sheet container
    PointerDown,
    SheetMinus,
    SheetPlus,
    MeasureMinus,
    MeasurePlus,
    ToggleCursor,
    DownloadXml,
    MeasureWidthInput,
    SheetWidthInput,
}

impl EventSource {
    pub const ALL: [EventSource; 9] = [
        EventSource::PointerDown,
        EventSource::SheetMinus,
        EventSource::SheetPlus,
        EventSource::MeasureMinus,
        EventSource::MeasurePlus,
        EventSource::ToggleCursor,
        EventSource::DownloadXml,
        EventSource::MeasureWidthInput,
        EventSource::SheetWidthInput,
    ];

    /// Element id / event name as used by the web front end.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventSource::PointerDown => "mousedown",
            EventSource::SheetMinus => "sheet-minus-btn",
            EventSource::SheetPlus => "sheet-plus-btn",
            EventSource::MeasureMinus => "measure-width-minus-btn",
            EventSource::MeasurePlus => "measure-width-plus-btn",
            EventSource::ToggleCursor => "toggle-cursor-btn",
            EventSource::DownloadXml => "download-xml-btn",
            EventSource::MeasureWidthInput => "measure-width-display",
            EventSource::SheetWidthInput => "sheet-factor-display",
        }
    }
}

/// Handle returned by the surface for one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// The UI surface's event registration.
pub trait EventSurface {
    fn subscribe(&mut self, source: EventSource) -> SubscriptionId;
    fn unsubscribe(&mut self, source: EventSource, id: SubscriptionId);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub page_x: f64,
    pub page_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    Mouse { page_x: f64, page_y: f64 },
    /// Active touches; only the first one counts
    Touch { touches: Vec<TouchPoint> },
}

impl PointerInput {
    /// Page coordinates of the press.
    pub fn page_position(&self) -> Option<(f64, f64)> {
        match self {
            PointerInput::Mouse { page_x, page_y } => Some((*page_x, *page_y)),
            PointerInput::Touch { touches } => touches.first().map(|t| (t.page_x, t.page_y)),
        }
    }
}

/// One interaction delivered by the UI surface.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    PointerDown(PointerInput),
    SheetMinus,
    SheetPlus,
    MeasureMinus,
    MeasurePlus,
    ToggleCursor,
    DownloadXml,
    /// Current contents of the measure width field
    MeasureWidthInput(String),
    /// Current contents of the sheet width field
    SheetWidthInput(String),
}

impl UiEvent {
    pub fn source(&self) -> EventSource {
        match self {
            UiEvent::PointerDown(_) => EventSource::PointerDown,
            UiEvent::SheetMinus => EventSource::SheetMinus,
            UiEvent::SheetPlus => EventSource::SheetPlus,
            UiEvent::MeasureMinus => EventSource::MeasureMinus,
            UiEvent::MeasurePlus => EventSource::MeasurePlus,
            UiEvent::ToggleCursor => EventSource::ToggleCursor,
            UiEvent::DownloadXml => EventSource::DownloadXml,
            UiEvent::MeasureWidthInput(_) => EventSource::MeasureWidthInput,
            UiEvent::SheetWidthInput(_) => EventSource::SheetWidthInput,
        }
    }
}
