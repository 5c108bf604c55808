//! Integration tests — parse the sample files in the sheetmusic/ directory,
//! uncompressed and packed as .mxl.

mod common;

use std::io::{Cursor, Write};

use common::*;
use pretty_assertions::assert_eq;
use scorewidth::{
    annotate_with_snapshot_json, parse_bytes, parse_file, parse_musicxml, read_widths_json,
    EditorError, SourceMeasure, WidthSnapshot,
};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Pack `xml` into an in-memory .mxl archive.
fn build_mxl(xml: &str, with_container: bool) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    if with_container {
        zip.start_file("META-INF/container.xml", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8"?>
<container><rootfiles><rootfile full-path="score/main.xml" media-type="application/vnd.recordare.musicxml+xml"/></rootfiles></container>"#,
        )
        .unwrap();
    }
    zip.start_file("score/main.xml", options).unwrap();
    zip.write_all(xml.as_bytes()).unwrap();

    zip.finish().unwrap().into_inner()
}

// ─── Uncompressed MusicXML (.musicxml) ──────────────────────────────

#[test]
fn parse_four_measures_musicxml() {
    let (sheet, xml) = parse_file(sheetmusic_dir().join("four-measures.musicxml"))
        .expect("Failed to parse four-measures.musicxml");

    assert_eq!(sheet.title.as_deref(), Some("Four Measures"));
    assert_eq!(sheet.version.as_deref(), Some("3.1"));
    assert_eq!(sheet.sheet_width_factor, 1.0);
    // second part's measures are the same columns
    assert_eq!(sheet.measure_count(), 4);
    let numbers: Vec<i32> = sheet.measures.iter().map(|m| m.measure_number_xml).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
    assert!(sheet.measures.iter().all(|m| m.width_factor == 1.0 && !m.implicit));
    assert!(xml.contains("<!DOCTYPE score-partwise"));
}

#[test]
fn parse_persisted_factors() {
    let sheet = parse_musicxml(&read_sample("pickup-annotated.musicxml")).unwrap();

    // <credit type="title"> wins over <work-title>
    assert_eq!(sheet.title.as_deref(), Some("Pickup Tune"));
    assert_eq!(sheet.sheet_width_factor, 0.8);
    assert_eq!(
        sheet.measures,
        vec![
            SourceMeasure { measure_number: 0, measure_number_xml: 0, implicit: true, width_factor: 1.0 },
            SourceMeasure { measure_number: 1, measure_number_xml: 1, implicit: false, width_factor: 1.25 },
            SourceMeasure { measure_number: 2, measure_number_xml: 2, implicit: false, width_factor: 1.0 },
        ]
    );
}

#[test]
fn unnumbered_measures_keep_counting() {
    let xml = r#"<score-partwise><part id="P1">
        <measure number="1"/><measure number="X1"/><measure number="3"/>
    </part></score-partwise>"#;
    let sheet = parse_musicxml(xml).unwrap();
    let numbers: Vec<(i32, i32)> = sheet
        .measures
        .iter()
        .map(|m| (m.measure_number, m.measure_number_xml))
        .collect();
    assert_eq!(numbers, vec![(1, 1), (2, 2), (3, 3)]);
}

#[test]
fn rejects_timewise_scores() {
    let result = parse_musicxml("<score-timewise/>");
    assert!(matches!(result, Err(EditorError::UnsupportedRoot(ref r)) if r == "score-timewise"));
}

#[test]
fn rejects_malformed_xml() {
    assert!(matches!(parse_musicxml("<score-partwise>"), Err(EditorError::Xml(_))));
}

// ─── Compressed MusicXML (.mxl) ─────────────────────────────────────

#[test]
fn parse_mxl_with_container() {
    let xml = read_sample("four-measures.musicxml");
    let data = build_mxl(&xml, true);

    let (sheet, extracted) = parse_bytes(&data, Some("mxl")).expect("Failed to parse mxl");

    assert_eq!(sheet.measure_count(), 4);
    assert_eq!(extracted, xml);
}

#[test]
fn parse_mxl_without_container_autodetects() {
    let xml = read_sample("pickup-annotated.musicxml");
    let data = build_mxl(&xml, false);

    let (sheet, _) = parse_bytes(&data, None).expect("Failed to parse mxl");

    assert_eq!(sheet.sheet_width_factor, 0.8);
}

#[test]
fn garbage_is_not_an_archive() {
    let result = parse_bytes(b"\x00\x01not a zip", Some("mxl"));
    assert!(matches!(result, Err(EditorError::Archive(_))));
}

// ─── JSON bridge ────────────────────────────────────────────────────

#[test]
fn widths_json_round_trip_through_annotation() {
    let xml = read_sample("four-measures.musicxml");
    let mut snapshot: WidthSnapshot = serde_json::from_str(&read_widths_json(&xml).unwrap()).unwrap();
    snapshot.sheet_width_factor = 1.1;
    snapshot.measures[2].width_factor = 0.7;

    let annotated = annotate_with_snapshot_json(&xml, &serde_json::to_string(&snapshot).unwrap()).unwrap();
    let reread: WidthSnapshot = serde_json::from_str(&read_widths_json(&annotated).unwrap()).unwrap();

    assert_eq!(reread, snapshot);
}
