//! Width factor store — the single source of truth for per-measure and
//! sheet-wide width factors.
//!
//! Stepped values are rounded to two decimals so repeated +/- presses
//! don't drift (1.2000000001). Typed values are taken as entered.

use crate::config::{EditorConfig, PercentRange};
use crate::constants::*;
use crate::error::WidthRejection;
use crate::model::*;

#[derive(Debug, Clone, PartialEq)]
pub struct WidthFactorStore {
    measures: Vec<SourceMeasure>,
    sheet_factor: f64,
    measure_range: PercentRange,
    sheet_range: PercentRange,
}

impl WidthFactorStore {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            measures: Vec::new(),
            sheet_factor: NEUTRAL_WIDTH_FACTOR,
            measure_range: config.measure_input_range,
            sheet_range: config.sheet_input_range,
        }
    }

    /// Replace all factors with those of a freshly loaded sheet.
    pub fn load(&mut self, sheet: &SheetModel) {
        self.measures = sheet.measures.clone();
        self.sheet_factor = sheet.sheet_width_factor;
    }

    pub fn measures(&self) -> &[SourceMeasure] {
        &self.measures
    }

    pub fn measure(&self, id: MeasureId) -> Option<&SourceMeasure> {
        self.measures.get(id.0)
    }

    pub fn width_factor(&self, id: MeasureId) -> Option<f64> {
        self.measure(id).map(|m| m.width_factor)
    }

    pub fn sheet_factor(&self) -> f64 {
        self.sheet_factor
    }

    /// Effective multiplier of a measure: its own factor compounded with
    /// the sheet factor.
    pub fn effective_factor(&self, id: MeasureId) -> f64 {
        self.width_factor(id).unwrap_or(NEUTRAL_WIDTH_FACTOR) * self.sheet_factor
    }

    pub fn snapshot(&self) -> WidthSnapshot {
        WidthSnapshot {
            sheet_width_factor: self.sheet_factor,
            measures: self.measures.clone(),
        }
    }

    // ─── Mutations ───────────────────────────────────────────────────

    pub fn step_measure_width(
        &mut self,
        selected: Option<MeasureId>,
        delta: f64,
    ) -> Result<f64, WidthRejection> {
        let measure = self.selected_mut(selected)?;
        measure.width_factor = round_hundredths(measure.width_factor + delta);
        Ok(measure.width_factor)
    }

    pub fn set_measure_width_from_input(
        &mut self,
        selected: Option<MeasureId>,
        raw: &str,
    ) -> Result<f64, WidthRejection> {
        let range = self.measure_range;
        let measure = self.selected_mut(selected)?;
        let percent = parse_percentage(raw).ok_or_else(|| WidthRejection::Unparsable(raw.to_string()))?;
        check_range(percent, range)?;
        measure.width_factor = percent / 100.0;
        Ok(measure.width_factor)
    }

    pub fn step_sheet_width(&mut self, delta: f64) -> f64 {
        self.sheet_factor = round_hundredths(self.sheet_factor + delta);
        self.sheet_factor
    }

    pub fn set_sheet_width_from_input(&mut self, raw: &str) -> Result<f64, WidthRejection> {
        let stripped = strip_percentage(raw);
        if stripped.is_empty() {
            // mid-typing, e.g. after deleting "100%"
            return Err(WidthRejection::Empty);
        }
        let percent = parse_leading_float(&stripped)
            .ok_or_else(|| WidthRejection::Unparsable(raw.to_string()))?;
        check_range(percent, self.sheet_range)?;
        self.sheet_factor = percent / 100.0;
        Ok(self.sheet_factor)
    }

    fn selected_mut(&mut self, selected: Option<MeasureId>) -> Result<&mut SourceMeasure, WidthRejection> {
        let id = selected.ok_or(WidthRejection::NoSelection)?;
        self.measures
            .get_mut(id.0)
            .ok_or(WidthRejection::UnknownMeasure(id.0))
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────

pub fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Whether a factor is 1.0 up to floating point noise.
pub fn is_neutral(factor: f64) -> bool {
    (factor - NEUTRAL_WIDTH_FACTOR).abs() < NEUTRAL_TOLERANCE
}

/// "1.2" → "120%". The product is snapped to hundredths first so a typed
/// 14.5% (stored as 0.145) shows as 15%, not 14%.
pub fn format_percentage(factor: f64) -> String {
    format!("{}%", round_hundredths(factor * 100.0).round() as i64)
}

/// Parse "80%", "80", "12,5 %" into a percentage number.
pub fn parse_percentage(raw: &str) -> Option<f64> {
    parse_leading_float(&strip_percentage(raw))
}

fn strip_percentage(raw: &str) -> String {
    raw.replacen('%', "", 1).replacen(',', ".", 1).trim().to_string()
}

/// Longest numeric prefix, so "80 %" and "80abc" both read as 80 and
/// "1e2" as 100.
fn parse_leading_float(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let digits_in = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let mut mantissa_digits = digits_in(end);
    end += mantissa_digits;
    if end < bytes.len() && bytes[end] == b'.' {
        let fraction = digits_in(end + 1);
        mantissa_digits += fraction;
        end += 1 + fraction;
    }
    if mantissa_digits == 0 {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let exp_digits = digits_in(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }
    s[..end].parse::<f64>().ok()
}

fn check_range(percent: f64, range: PercentRange) -> Result<(), WidthRejection> {
    if range.contains(percent) {
        Ok(())
    } else {
        Err(WidthRejection::OutOfRange {
            value: percent,
            min: range.min,
            max: range.max,
        })
    }
}
