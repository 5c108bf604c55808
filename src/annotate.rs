//! XML annotator — writes the current width factors into a copy of the
//! loaded MusicXML document.
//!
//! The document is parsed with roxmltree and re-emitted node by node.
//! Only two things change: the root gets `osmdMeasureWidthFactor` and each
//! `<measure>` gets `osmdWidthFactor`, both omitted when neutral. Existing
//! attributes of the same name are replaced in place, so annotating an
//! annotated document changes nothing.

use roxmltree::{Node, NodeType};

use crate::constants::*;
use crate::error::{EditorError, EditorResult};
use crate::model::{find_by_xml_number, SourceMeasure};
use crate::parser::{parse_document, parse_measure_number};
use crate::widths::is_neutral;

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Annotate `loaded_xml` with `sheet_factor` and the factors of `measures`.
///
/// Fails without output if a `<measure>` in the document has no
/// counterpart in `measures`.
pub fn annotate(loaded_xml: &str, sheet_factor: f64, measures: &[SourceMeasure]) -> EditorResult<String> {
    let doc = parse_document(loaded_xml)?;

    let mut writer = XmlWriter::new(sheet_factor, measures);
    writer.node(doc.root_element())?;

    Ok(format!("{XML_DECLARATION}\n{}", writer.out))
}

// ═══════════════════════════════════════════════════════════════════════
// XmlWriter
// ═══════════════════════════════════════════════════════════════════════

struct XmlWriter<'m> {
    sheet_factor: f64,
    measures: &'m [SourceMeasure],
    out: String,
}

impl<'m> XmlWriter<'m> {
    fn new(sheet_factor: f64, measures: &'m [SourceMeasure]) -> Self {
        Self {
            sheet_factor,
            measures,
            out: String::new(),
        }
    }

    fn node(&mut self, node: Node) -> EditorResult<()> {
        match node.node_type() {
            NodeType::Element => self.element(node)?,
            NodeType::Text => self.out.push_str(&escape_text(node.text().unwrap_or(""))),
            NodeType::Comment => {
                self.out.push_str("<!--");
                self.out.push_str(node.text().unwrap_or(""));
                self.out.push_str("-->");
            }
            NodeType::PI => {
                if let Some(pi) = node.pi() {
                    self.out.push_str("<?");
                    self.out.push_str(pi.target);
                    if let Some(value) = pi.value {
                        self.out.push(' ');
                        self.out.push_str(value);
                    }
                    self.out.push_str("?>");
                }
            }
            NodeType::Root => {
                for child in node.children() {
                    self.node(child)?;
                }
            }
        }
        Ok(())
    }

    fn element(&mut self, node: Node) -> EditorResult<()> {
        let name = qualified_name(node, node.tag_name().namespace(), node.tag_name().name());
        let mut attrs = namespace_declarations(node);
        attrs.extend(node.attributes().map(|a| {
            (qualified_name(node, a.namespace(), a.name()), a.value().to_string())
        }));

        let local = node.tag_name().name();
        if local.eq_ignore_ascii_case(SCORE_ROOT) {
            set_factor(&mut attrs, SHEET_WIDTH_ATTR, self.sheet_factor);
        } else if local.eq_ignore_ascii_case(MEASURE_ELEMENT) {
            let factor = self.measure_factor(node)?;
            set_factor(&mut attrs, MEASURE_WIDTH_ATTR, factor);
        }

        self.out.push('<');
        self.out.push_str(&name);
        for (key, value) in &attrs {
            self.out.push_str(&format!(r#" {}="{}""#, key, escape_attr(value)));
        }

        if !node.has_children() {
            self.out.push_str("/>");
            return Ok(());
        }
        self.out.push('>');
        for child in node.children() {
            self.node(child)?;
        }
        self.out.push_str("</");
        self.out.push_str(&name);
        self.out.push('>');
        Ok(())
    }

    fn measure_factor(&self, node: Node) -> EditorResult<f64> {
        let raw = node.attribute("number").unwrap_or("");
        let number = parse_measure_number(raw)
            .ok_or_else(|| EditorError::InvalidMeasureNumber(raw.to_string()))?;

        match find_by_xml_number(self.measures, number) {
            Some(m) => Ok(m.width_factor),
            None => {
                log::error!("couldn't find measure {number}");
                Err(EditorError::MeasureNotFound { number })
            }
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────

/// Write `factor` under `key`, or drop `key` when the factor is neutral.
fn set_factor(attrs: &mut Vec<(String, String)>, key: &str, factor: f64) {
    let existing = attrs.iter().position(|(k, _)| k == key);
    match (existing, is_neutral(factor)) {
        (Some(i), true) => {
            attrs.remove(i);
        }
        (Some(i), false) => attrs[i].1 = factor.to_string(),
        (None, false) => attrs.push((key.to_string(), factor.to_string())),
        (None, true) => {}
    }
}

fn qualified_name(node: Node, namespace: Option<&str>, local: &str) -> String {
    let prefix = match namespace {
        Some(XML_NAMESPACE) => Some("xml"),
        Some(uri) => node.lookup_prefix(uri),
        None => None,
    };
    match prefix {
        Some(p) if !p.is_empty() => format!("{p}:{local}"),
        _ => local.to_string(),
    }
}

/// `xmlns` attributes for namespaces that come into scope at `node`.
fn namespace_declarations(node: Node) -> Vec<(String, String)> {
    let parent = node.parent_element();
    node.namespaces()
        .filter(|ns| ns.name() != Some("xml"))
        .filter(|ns| {
            parent.map_or(true, |p| {
                !p.namespaces().any(|pns| pns.name() == ns.name() && pns.uri() == ns.uri())
            })
        })
        .map(|ns| match ns.name() {
            Some(prefix) => (format!("xmlns:{prefix}"), ns.uri().to_string()),
            None => ("xmlns".to_string(), ns.uri().to_string()),
        })
        .collect()
}

// A raw \r would be folded into \n by the next parse, and raw whitespace
// in attribute values into spaces, so both go back out as references.
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\r', "&#13;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value)
        .replace('"', "&quot;")
        .replace('\n', "&#10;")
        .replace('\t', "&#9;")
}
