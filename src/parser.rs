//! MusicXML parser — reads the measure structure and any persisted width
//! factors into a `SheetModel`.

use roxmltree::{Document, Node};

use crate::constants::*;
use crate::error::{EditorError, EditorResult};
use crate::model::*;

/// Parse a MusicXML XML string into a SheetModel.
pub fn parse_musicxml(xml: &str) -> EditorResult<SheetModel> {
    let doc = parse_document(xml)?;
    let root = doc.root_element();

    // Verify this is a score-partwise document
    if !root.tag_name().name().eq_ignore_ascii_case(SCORE_ROOT) {
        return Err(EditorError::UnsupportedRoot(root.tag_name().name().to_string()));
    }

    let mut sheet = SheetModel::new();
    sheet.version = root.attribute("version").map(String::from);
    sheet.sheet_width_factor = parse_width_factor(root.attribute(SHEET_WIDTH_ATTR));

    let mut seen_part = false;
    for child in root.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "work" => parse_work(&child, &mut sheet),
            "credit" => parse_credit(&child, &mut sheet),
            // Measure columns are shared by all parts; the first one defines them.
            "part" if !seen_part => {
                seen_part = true;
                parse_part(&child, &mut sheet);
            }
            _ => {}
        }
    }

    log::debug!(
        "parsed sheet {:?}: {} measures, sheet factor {}",
        sheet.title,
        sheet.measures.len(),
        sheet.sheet_width_factor
    );
    Ok(sheet)
}

/// Parse with the options MusicXML needs (it carries a DOCTYPE).
pub(crate) fn parse_document(xml: &str) -> EditorResult<Document<'_>> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    Ok(Document::parse_with_options(xml, options)?)
}

/// Leading integer of a measure `number` attribute: "12" and "12a" give
/// 12, "X1" gives None. Surrounding whitespace and a sign are accepted.
pub(crate) fn parse_measure_number(raw: &str) -> Option<i32> {
    let s = raw.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i32>().ok().map(|n| sign * n)
}

/// Persisted factor, or neutral when absent or not a positive number.
fn parse_width_factor(raw: Option<&str>) -> f64 {
    match raw.and_then(|v| v.trim().parse::<f64>().ok()) {
        Some(f) if f.is_finite() && f > 0.0 => f,
        Some(_) => {
            log::warn!("ignoring non-positive width factor {:?}", raw);
            NEUTRAL_WIDTH_FACTOR
        }
        None => NEUTRAL_WIDTH_FACTOR,
    }
}

// ─── Work / credits ──────────────────────────────────────────────────

fn parse_work(node: &Node, sheet: &mut SheetModel) {
    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().name() == "work-title" {
            // Only use work-title as a fallback; <credit type="title"> takes priority.
            if sheet.title.is_none() {
                sheet.title = child.text().map(|t| t.trim().to_string());
            }
        }
    }
}

fn parse_credit(node: &Node, sheet: &mut SheetModel) {
    let mut credit_type = "";
    let mut credit_text = String::new();

    for child in node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "credit-type" => credit_type = child.text().unwrap_or("").trim(),
            "credit-words" => {
                let text = child.text().unwrap_or("").trim();
                if !text.is_empty() {
                    if !credit_text.is_empty() {
                        credit_text.push('\n');
                    }
                    credit_text.push_str(text);
                }
            }
            _ => {}
        }
    }

    if credit_type == "title" && !credit_text.is_empty() {
        sheet.title = Some(credit_text);
    }
}

// ─── Part (measures) ─────────────────────────────────────────────────

fn parse_part(node: &Node, sheet: &mut SheetModel) {
    for child in node.children().filter(|n| n.is_element()) {
        if child.tag_name().name() == MEASURE_ELEMENT {
            let previous = sheet.measures.last();
            let measure = parse_measure(&child, previous);
            sheet.measures.push(measure);
        }
    }
}

fn parse_measure(node: &Node, previous: Option<&SourceMeasure>) -> SourceMeasure {
    let raw_number = node.attribute("number").unwrap_or("");
    let next_number = previous.map_or(1, |p| p.measure_number + 1);

    // Unnumbered measures keep counting from their predecessor; the
    // annotator will refuse them since the document can't be matched.
    let (measure_number, measure_number_xml) = match parse_measure_number(raw_number) {
        Some(n) => (n, n),
        None => {
            log::warn!("measure number {:?} is not numeric", raw_number);
            (next_number, previous.map_or(next_number, |p| p.measure_number_xml + 1))
        }
    };

    SourceMeasure {
        measure_number,
        measure_number_xml,
        implicit: node.attribute("implicit") == Some("yes"),
        width_factor: parse_width_factor(node.attribute(MEASURE_WIDTH_ATTR)),
    }
}
