//! Reference graphical layout — places measures on one horizontal line,
//! scaled by their width factors, and answers the two queries click
//! resolution needs: "nearest staff entry to a point" and "which measure
//! is playing at this timestamp".
//!
//! Hosts with their own engraver don't need this; it exists so the
//! editor can be driven without one.

use crate::model::*;
use crate::widths::WidthFactorStore;

/// Horizontal space reserved before the first entry of a measure.
const MEASURE_LEFT_PAD: f64 = 1.5;
/// Horizontal space kept free after the last entry.
const MEASURE_RIGHT_PAD: f64 = 1.0;

/// Unscaled content of one measure.
#[derive(Debug, Clone, PartialEq)]
pub struct NaturalMeasure {
    pub id: MeasureId,
    /// Width at factor 1.0, in logical units
    pub width: f64,
    /// Length in whole notes (3/4 = 0.75)
    pub duration: f64,
    /// Entry onsets within the measure, in whole notes
    pub onsets: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureBox {
    pub id: MeasureId,
    pub x: f64,
    pub width: f64,
    /// Absolute start timestamp
    pub start: f64,
    pub duration: f64,
}

impl MeasureBox {
    fn contains_timestamp(&self, timestamp: f64) -> bool {
        timestamp >= self.start && timestamp < self.start + self.duration
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphicalLayout {
    measures: Vec<MeasureBox>,
    entries: Vec<StaffEntryHit>,
    staff_y: f64,
}

impl GraphicalLayout {
    /// Lay out `natural` left to right starting at `origin`.
    pub fn single_line(natural: &[NaturalMeasure], widths: &WidthFactorStore, origin: LogicalPoint) -> Self {
        let mut measures = Vec::with_capacity(natural.len());
        let mut entries = Vec::new();
        let mut x = origin.x;
        let mut start = 0.0;

        for nm in natural {
            let width = nm.width * widths.effective_factor(nm.id);
            let usable = (width - MEASURE_LEFT_PAD - MEASURE_RIGHT_PAD).max(0.0);
            let duration = nm.duration.max(f64::EPSILON);

            for &onset in &nm.onsets {
                // cursor_x = measure.x + pad + (offset / duration) * usable
                let ex = x + MEASURE_LEFT_PAD + (onset / duration) * usable;
                entries.push(StaffEntryHit {
                    timestamp: start + onset,
                    position: LogicalPoint::new(ex, origin.y),
                });
            }

            measures.push(MeasureBox {
                id: nm.id,
                x,
                width,
                start,
                duration: nm.duration,
            });
            x += width;
            start += nm.duration;
        }

        Self {
            measures,
            entries,
            staff_y: origin.y,
        }
    }

    pub fn measures(&self) -> &[MeasureBox] {
        &self.measures
    }

    pub fn entries(&self) -> &[StaffEntryHit] {
        &self.entries
    }

    pub fn staff_y(&self) -> f64 {
        self.staff_y
    }

    /// Right edge of the last measure.
    pub fn total_width(&self) -> f64 {
        self.measures.last().map_or(0.0, |m| m.x + m.width)
    }

    /// Entry closest to `at`; the earlier entry wins ties.
    pub fn nearest_entry(&self, at: LogicalPoint) -> Option<StaffEntryHit> {
        let mut best: Option<(f64, &StaffEntryHit)> = None;
        for entry in &self.entries {
            let dist = entry.position.distance_squared(&at);
            if best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, entry));
            }
        }
        best.map(|(_, e)| *e)
    }

    /// Measure sounding at `timestamp`.
    pub fn measure_at(&self, timestamp: f64) -> Option<MeasureId> {
        self.measures
            .iter()
            .find(|m| m.contains_timestamp(timestamp))
            .map(|m| m.id)
    }

    pub fn measure_box(&self, id: MeasureId) -> Option<&MeasureBox> {
        self.measures.iter().find(|m| m.id == id)
    }
}
