//! Input dispatcher — routes UI events to click resolution and the width
//! store, re-renders after every change, and owns the event
//! subscriptions.
//!
//! Everything runs synchronously inside `handle`: one event finishes its
//! mutation and render before the host delivers the next.

use std::collections::HashMap;

use crate::annotate::annotate;
use crate::config::EditorConfig;
use crate::constants::*;
use crate::error::{EditorError, EditorResult, WidthRejection};
use crate::host::*;
use crate::model::*;
use crate::parser::parse_musicxml;
use crate::selection::{toggle_highlight, ClickOutcome, SelectionResolver};
use crate::widths::{format_percentage, WidthFactorStore};

pub struct WidthEditor<H: ScoreHost> {
    host: H,
    config: EditorConfig,
    selection: SelectionResolver,
    widths: WidthFactorStore,
    /// Document text exactly as read, before any edits
    loaded_xml: Option<String>,
    subscriptions: HashMap<EventSource, SubscriptionId>,
}

impl<H: ScoreHost> WidthEditor<H> {
    pub fn new(host: H, config: EditorConfig) -> Self {
        let selection = SelectionResolver::new(config.highlight_alpha);
        let widths = WidthFactorStore::new(&config);
        Self {
            host,
            config,
            selection,
            widths,
            loaded_xml: None,
            subscriptions: HashMap::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn widths(&self) -> &WidthFactorStore {
        &self.widths
    }

    pub fn selection(&self) -> &SelectionResolver {
        &self.selection
    }

    pub fn loaded_xml(&self) -> Option<&str> {
        self.loaded_xml.as_deref()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Subscriptions
    // ═══════════════════════════════════════════════════════════════════

    /// Subscribe to every event source the editor handles.
    pub fn attach<S: EventSurface>(&mut self, surface: &mut S) {
        for source in EventSource::ALL {
            if self.subscriptions.contains_key(&source) {
                continue;
            }
            let id = surface.subscribe(source);
            self.subscriptions.insert(source, id);
        }
        log::trace!("subscribed to {} event sources", self.subscriptions.len());
    }

    /// Revoke every subscription. Calling it again does nothing.
    pub fn dispose<S: EventSurface>(&mut self, surface: &mut S) {
        for (source, id) in self.subscriptions.drain() {
            surface.unsubscribe(source, id);
        }
    }

    pub fn is_subscribed(&self, source: EventSource) -> bool {
        self.subscriptions.contains_key(&source)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Loading
    // ═══════════════════════════════════════════════════════════════════

    /// Loader hook: keeps the raw text for export and hands it back
    /// unchanged.
    pub fn on_document_read(&mut self, text: String) -> String {
        self.loaded_xml = Some(text.clone());
        text
    }

    /// Capture `xml`, read its measures and factors, and start over with
    /// nothing selected.
    pub fn load_musicxml(&mut self, xml: String) -> EditorResult<()> {
        let xml = self.on_document_read(xml);
        let sheet = parse_musicxml(&xml)?;
        log::info!("loaded sheet with {} measures", sheet.measure_count());
        self.new_sheet_loaded(&sheet);
        Ok(())
    }

    /// Install the factors of a new sheet and reset the selection.
    pub fn new_sheet_loaded(&mut self, sheet: &SheetModel) {
        self.widths.load(sheet);
        self.selection.reset();
        self.refresh_display();
    }

    /// Called by the host after it finished drawing the sheet.
    pub fn sheet_rendered(&mut self) {
        self.refresh_display();
    }

    // ═══════════════════════════════════════════════════════════════════
    // Events
    // ═══════════════════════════════════════════════════════════════════

    /// Process one UI event. Only a failed export returns an error;
    /// rejected input is logged and dropped.
    pub fn handle(&mut self, event: UiEvent) -> EditorResult<()> {
        let source = event.source();
        if !self.is_subscribed(source) {
            log::trace!("ignoring {} event: not subscribed", source.as_str());
            return Ok(());
        }

        let step = self.config.percentage_step;
        match event {
            UiEvent::PointerDown(input) => {
                self.pointer_down(&input);
            }
            UiEvent::MeasureMinus => {
                let result = self.widths.step_measure_width(self.selection.current(), -step);
                self.after_width_change(source, result);
            }
            UiEvent::MeasurePlus => {
                let result = self.widths.step_measure_width(self.selection.current(), step);
                self.after_width_change(source, result);
            }
            UiEvent::MeasureWidthInput(text) => {
                let result = self
                    .widths
                    .set_measure_width_from_input(self.selection.current(), &text);
                self.after_width_change(source, result);
            }
            UiEvent::SheetMinus => {
                let result = Ok(self.widths.step_sheet_width(-step));
                self.after_width_change(source, result);
            }
            UiEvent::SheetPlus => {
                let result = Ok(self.widths.step_sheet_width(step));
                self.after_width_change(source, result);
            }
            UiEvent::SheetWidthInput(text) => {
                let result = self.widths.set_sheet_width_from_input(&text);
                self.after_width_change(source, result);
            }
            UiEvent::ToggleCursor => {
                toggle_highlight(self.host.cursor());
            }
            UiEvent::DownloadXml => {
                let file = self.export()?;
                self.host.deliver_file(file);
            }
        }
        Ok(())
    }

    fn pointer_down(&mut self, input: &PointerInput) -> ClickOutcome {
        let Some((page_x, page_y)) = input.page_position() else {
            log::debug!("pointer event without coordinates");
            return ClickOutcome::EmptySpace;
        };
        let offset_top: f64 = self.host.container_offsets_top().iter().sum();
        self.click(page_x, page_y - offset_top)
    }

    /// Resolve a click at container-relative pixel coordinates.
    pub fn click(&mut self, pixel_x: f64, pixel_y: f64) -> ClickOutcome {
        let outcome = self.selection.resolve_click(&mut self.host, pixel_x, pixel_y);
        if let ClickOutcome::Selected(_) = outcome {
            self.refresh_display();
        }
        outcome
    }

    fn after_width_change(&mut self, source: EventSource, result: Result<f64, WidthRejection>) {
        match result {
            Ok(factor) => {
                log::debug!("{}: width factor now {}", source.as_str(), factor);
                self.refresh_display();
                self.render_and_scroll_back();
            }
            Err(WidthRejection::Empty) => {}
            Err(rejection) => {
                log::debug!("{}: ignored, {}", source.as_str(), rejection);
            }
        }
    }

    /// Render, then restore the horizontal scroll the render reset.
    fn render_and_scroll_back(&mut self) {
        let scroll_left = self.host.display_state().scroll_left;
        self.host.render(&self.widths);
        self.host.set_scroll_left(scroll_left);
    }

    // ═══════════════════════════════════════════════════════════════════
    // Display & export
    // ═══════════════════════════════════════════════════════════════════

    pub fn display_fields(&self) -> DisplayFields {
        let current = self.selection.current();
        let selected = current.and_then(|id| self.widths.measure(id));
        DisplayFields {
            selected_measure: selected
                .map_or_else(|| NO_SELECTION_LABEL.to_string(), |m| m.measure_number.to_string()),
            measure_width: selected.map(|m| format_percentage(m.width_factor)),
            sheet_width: format_percentage(self.widths.sheet_factor()),
            filename: self.host.filename(),
        }
    }

    fn refresh_display(&mut self) {
        let fields = self.display_fields();
        self.host.refresh_display(&fields);
    }

    /// Annotated copy of the loaded document, named after the loaded file.
    pub fn export(&self) -> EditorResult<ExportedFile> {
        let loaded = self.loaded_xml.as_deref().ok_or(EditorError::NothingLoaded)?;
        let contents = annotate(loaded, self.widths.sheet_factor(), self.widths.measures())?;
        let filename = self
            .host
            .filename()
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| self.config.fallback_filename.clone());
        log::info!("exporting {} ({} bytes, {})", filename, contents.len(), EXPORT_ENCODING);
        Ok(ExportedFile {
            filename,
            mime: EXPORT_MIME,
            contents,
        })
    }
}
