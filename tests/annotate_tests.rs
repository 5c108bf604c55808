//! Annotation of the loaded document with width factors.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use scorewidth::{annotate, parse_musicxml, EditorError, SourceMeasure};

fn measures(factors: &[(i32, f64)]) -> Vec<SourceMeasure> {
    factors
        .iter()
        .map(|&(n, f)| SourceMeasure {
            width_factor: f,
            ..SourceMeasure::new(n, n)
        })
        .collect()
}

#[test]
fn neutral_factors_leave_no_attributes() {
    let xml = read_sample("four-measures.musicxml");
    let out = annotate(&xml, 1.0, &measures(&[(1, 1.0), (2, 1.0), (3, 1.000001), (4, 1.0)])).unwrap();

    assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<score-partwise version=\"3.1\">"));
    assert!(!out.contains("osmdWidthFactor"));
    assert!(!out.contains("osmdMeasureWidthFactor"));
    // content survives, DOCTYPE does not
    assert!(out.contains("<software>hand &amp; keyboard</software>"));
    assert!(out.contains("<!-- upper voice -->"));
    assert!(out.contains("<rest/>"));
    assert!(!out.contains("DOCTYPE"));
}

#[test]
fn edited_factors_are_written_on_every_part() {
    let xml = read_sample("four-measures.musicxml");
    let out = annotate(&xml, 0.85, &measures(&[(1, 1.0), (2, 1.3), (3, 1.0), (4, 0.6)])).unwrap();

    assert!(out.contains(r#"<score-partwise version="3.1" osmdMeasureWidthFactor="0.85">"#));
    // measure 2 appears once per part
    assert_eq!(out.matches(r#"<measure number="2" osmdWidthFactor="1.3">"#).count(), 2);
    assert_eq!(out.matches(r#"<measure number="4" osmdWidthFactor="0.6">"#).count(), 2);
    assert_eq!(out.matches(r#"<measure number="3">"#).count(), 2);
}

#[test]
fn annotating_twice_is_idempotent() {
    let xml = read_sample("four-measures.musicxml");
    let factors = measures(&[(1, 1.0), (2, 1.3), (3, 0.9), (4, 1.0)]);

    let once = annotate(&xml, 1.2, &factors).unwrap();
    let twice = annotate(&once, 1.2, &factors).unwrap();

    assert_eq!(once, twice);
    assert_eq!(twice.matches("osmdWidthFactor=\"1.3\"").count(), 2);
}

#[test]
fn character_references_survive_reannotation() {
    let xml = concat!(
        r#"<score-partwise><part id="P1">"#,
        r#"<measure number="1" text="a&#10;b&#9;c&#13;d"><words>x&#13;y</words></measure>"#,
        r#"</part></score-partwise>"#
    );
    let factors = measures(&[(1, 1.2)]);

    let once = annotate(xml, 1.0, &factors).unwrap();
    let twice = annotate(&once, 1.0, &factors).unwrap();

    assert!(once.contains(r#"text="a&#10;b&#9;c&#13;d""#), "{once}");
    assert!(once.contains("<words>x&#13;y</words>"), "{once}");
    assert_eq!(once, twice);
}

#[test]
fn reannotating_replaces_and_removes_factors() {
    let xml = read_sample("pickup-annotated.musicxml");
    let out = annotate(&xml, 1.0, &measures(&[(0, 1.0), (1, 1.5), (2, 1.0)])).unwrap();

    assert!(out.contains(r#"<score-partwise version="4.0">"#));
    assert!(out.contains(r#"<measure number="1" osmdWidthFactor="1.5">"#));
    assert!(!out.contains("1.25"));
    assert!(out.contains(r#"<measure number="2" width="180.5">"#));
}

#[test]
fn missing_measure_aborts_annotation() {
    let xml = read_sample("four-measures.musicxml");
    let result = annotate(&xml, 1.0, &measures(&[(1, 1.0), (2, 1.3), (3, 1.0)]));

    match result {
        Err(EditorError::MeasureNotFound { number }) => assert_eq!(number, 4),
        other => panic!("expected MeasureNotFound, got {other:?}"),
    }
}

#[test]
fn unnumbered_measure_is_an_error() {
    let xml = r#"<score-partwise><part id="P1"><measure number="X1"/></part></score-partwise>"#;
    let result = annotate(xml, 1.0, &measures(&[(1, 1.0)]));
    assert!(matches!(result, Err(EditorError::InvalidMeasureNumber(ref n)) if n == "X1"));
}

#[test]
fn annotated_document_reloads_with_same_factors() {
    let xml = read_sample("four-measures.musicxml");
    let factors = measures(&[(1, 0.75), (2, 1.3), (3, 1.0), (4, 2.0)]);

    let out = annotate(&xml, 0.55, &factors).unwrap();
    let sheet = parse_musicxml(&out).unwrap();

    assert_eq!(sheet.sheet_width_factor, 0.55);
    let reloaded: Vec<f64> = sheet.measures.iter().map(|m| m.width_factor).collect();
    assert_eq!(reloaded, vec![0.75, 1.3, 1.0, 2.0]);
}

#[test]
fn namespaces_and_escapes_survive() {
    let xml = concat!(
        r#"<score-partwise xmlns:x="urn:extra" x:tag="a&amp;b">"#,
        r#"<part id="P1"><measure number="1"><x:note x:q="&quot;q&quot;">1 &lt; 2</x:note></measure></part>"#,
        r#"<?app keep?></score-partwise>"#
    );
    let out = annotate(xml, 1.0, &measures(&[(1, 1.1)])).unwrap();

    assert_eq!(
        out,
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            r#"<score-partwise xmlns:x="urn:extra" x:tag="a&amp;b">"#,
            r#"<part id="P1"><measure number="1" osmdWidthFactor="1.1"><x:note x:q="&quot;q&quot;">1 &lt; 2</x:note></measure></part>"#,
            r#"<?app keep?></score-partwise>"#
        )
    );
}
