//! Shared test host: a ScoreHost/EventSurface pair backed by the
//! reference GraphicalLayout, recording everything the editor asks of it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;

use scorewidth::host::*;
use scorewidth::layout::{GraphicalLayout, NaturalMeasure};
use scorewidth::*;

/// Display pixels per logical unit with the display below (zoom 1.0,
/// 1000px wide showing a 100-unit page).
pub const PX_PER_UNIT: f64 = 10.0;
pub const STAFF_Y: f64 = 10.0;

pub fn sheetmusic_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("sheetmusic")
}

pub fn read_sample(name: &str) -> String {
    std::fs::read_to_string(sheetmusic_dir().join(name))
        .unwrap_or_else(|e| panic!("Failed to read {name}: {e}"))
}

#[derive(Debug, Default)]
pub struct TestCursor {
    pub layout: GraphicalLayout,
    pub timestamp: Option<f64>,
    pub hidden: bool,
    pub options: Option<CursorOptions>,
    pub updates: usize,
}

impl Cursor for TestCursor {
    fn move_to(&mut self, timestamp: f64) {
        self.timestamp = Some(timestamp);
    }

    fn measure_under_cursor(&self) -> Option<MeasureId> {
        self.timestamp.and_then(|t| self.layout.measure_at(t))
    }

    fn set_options(&mut self, options: CursorOptions) {
        self.options = Some(options);
    }

    fn show(&mut self) {
        self.hidden = false;
    }

    fn hide(&mut self) {
        self.hidden = true;
    }

    fn update(&mut self) {
        self.updates += 1;
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }
}

pub struct TestHost {
    pub natural: Vec<NaturalMeasure>,
    pub layout: GraphicalLayout,
    pub display: DisplayState,
    pub offsets_top: Vec<f64>,
    pub cursor: TestCursor,
    pub renders: usize,
    pub filename: Option<String>,
    pub refreshed: Vec<DisplayFields>,
    pub delivered: Vec<ExportedFile>,
}

impl TestHost {
    /// Host for `measure_count` whole-note measures, 20 units wide, each
    /// with entries on beats 1 and 3.
    pub fn new(measure_count: usize) -> Self {
        let natural = (0..measure_count)
            .map(|i| NaturalMeasure {
                id: MeasureId(i),
                width: 20.0,
                duration: 1.0,
                onsets: vec![0.0, 0.5],
            })
            .collect();
        Self {
            natural,
            layout: GraphicalLayout::default(),
            display: DisplayState {
                zoom: 1.0,
                display_width: 1000.0,
                display_height: 800.0,
                container_offset_width: 1000.0,
                container_client_height: 780.0,
                sheet_page_width: 100.0,
                single_horizontal_line: false,
                scroll_left: 0.0,
            },
            offsets_top: vec![40.0, 60.0],
            cursor: TestCursor {
                hidden: true,
                ..TestCursor::default()
            },
            renders: 0,
            filename: Some("four-measures.musicxml".to_string()),
            refreshed: Vec::new(),
            delivered: Vec::new(),
        }
    }

    /// Container-relative pixel position of the centre of a measure.
    pub fn pixel_center_of(&self, id: MeasureId) -> (f64, f64) {
        let b = self.layout.measure_box(id).expect("measure is laid out");
        ((b.x + b.width / 2.0) * PX_PER_UNIT, STAFF_Y * PX_PER_UNIT)
    }
}

impl ScoreHost for TestHost {
    type Cursor = TestCursor;

    fn display_state(&self) -> DisplayState {
        self.display
    }

    fn container_offsets_top(&self) -> Vec<f64> {
        self.offsets_top.clone()
    }

    fn nearest_entry(&self, at: LogicalPoint) -> Option<StaffEntryHit> {
        self.layout.nearest_entry(at)
    }

    fn cursor(&mut self) -> &mut TestCursor {
        &mut self.cursor
    }

    fn render(&mut self, widths: &WidthFactorStore) {
        self.layout = GraphicalLayout::single_line(&self.natural, widths, LogicalPoint::new(5.0, STAFF_Y));
        self.cursor.layout = self.layout.clone();
        self.renders += 1;
        // like a browser re-layout: scroll jumps back to the start
        self.display.scroll_left = 0.0;
    }

    fn set_scroll_left(&mut self, scroll_left: f64) {
        self.display.scroll_left = scroll_left;
    }

    fn filename(&self) -> Option<String> {
        self.filename.clone()
    }

    fn refresh_display(&mut self, fields: &DisplayFields) {
        self.refreshed.push(fields.clone());
    }

    fn deliver_file(&mut self, file: ExportedFile) {
        self.delivered.push(file);
    }
}

#[derive(Debug, Default)]
pub struct TestSurface {
    next_id: u64,
    pub active: HashMap<EventSource, SubscriptionId>,
    pub unsubscribe_calls: usize,
}

impl EventSurface for TestSurface {
    fn subscribe(&mut self, source: EventSource) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.active.insert(source, id);
        id
    }

    fn unsubscribe(&mut self, source: EventSource, id: SubscriptionId) {
        self.unsubscribe_calls += 1;
        if self.active.get(&source) == Some(&id) {
            self.active.remove(&source);
        }
    }
}

/// Editor over the four-measure sample, subscribed and rendered once.
pub fn loaded_editor() -> (WidthEditor<TestHost>, TestSurface) {
    let mut editor = WidthEditor::new(TestHost::new(4), EditorConfig::default());
    let mut surface = TestSurface::default();
    editor.attach(&mut surface);
    editor
        .load_musicxml(read_sample("four-measures.musicxml"))
        .expect("sample loads");
    render(&mut editor);
    (editor, surface)
}

/// Let the host draw with the editor's current factors.
pub fn render(editor: &mut WidthEditor<TestHost>) {
    let widths = editor.widths().clone();
    editor.host_mut().render(&widths);
    editor.sheet_rendered();
}

pub fn click_measure(editor: &mut WidthEditor<TestHost>, index: usize) -> scorewidth::selection::ClickOutcome {
    let (x, y) = editor.host().pixel_center_of(MeasureId(index));
    editor.click(x, y)
}
