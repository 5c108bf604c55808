//! scorewidth — measure width editing for MusicXML scores.
//!
//! Turns clicks on a rendered score into a selected measure, keeps
//! per-measure and sheet-wide width factors, and writes them back into the
//! originally loaded document so they survive a reload.
//!
//! # Example
//! ```no_run
//! use scorewidth::{annotate, parse_file};
//!
//! let (sheet, xml) = parse_file("path/to/score.musicxml").unwrap();
//! let mut measures = sheet.measures.clone();
//! measures[1].width_factor = 1.3;
//! let annotated = annotate(&xml, sheet.sheet_width_factor, &measures).unwrap();
//! println!("{annotated}");
//! ```

pub mod annotate;
pub mod config;
pub mod constants;
pub mod coords;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod layout;
pub mod model;
pub mod mxl;
pub mod parser;
pub mod selection;
pub mod widths;

#[cfg(target_os = "android")]
pub mod android;

use std::path::Path;

pub use annotate::annotate;
pub use config::EditorConfig;
pub use dispatch::WidthEditor;
pub use error::{EditorError, EditorResult, WidthRejection};
pub use model::*;
pub use mxl::extract_musicxml_from_mxl;
pub use parser::parse_musicxml;
pub use widths::WidthFactorStore;

/// Read a MusicXML file from a file path.
/// Returns the parsed sheet together with the document text to annotate later.
/// Automatically detects format based on file extension:
/// - `.musicxml` or `.xml` → uncompressed MusicXML
/// - `.mxl` → compressed MXL (ZIP archive)
pub fn parse_file<P: AsRef<Path>>(path: P) -> EditorResult<(SheetModel, String)> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;

    parse_bytes(&data, path.extension().and_then(|e| e.to_str()))
}

/// Parse MusicXML from raw bytes with an optional format hint.
/// If `extension` is None, tries to auto-detect the format.
pub fn parse_bytes(data: &[u8], extension: Option<&str>) -> EditorResult<(SheetModel, String)> {
    let xml = match extension {
        Some("mxl") => extract_musicxml_from_mxl(data)?,
        Some("musicxml") | Some("xml") => std::str::from_utf8(data)
            .map_err(|e| EditorError::Xml(format!("Invalid UTF-8 in MusicXML file: {e}")))?
            .to_string(),
        _ => {
            // Auto-detect: try as XML first, then as MXL
            match std::str::from_utf8(data) {
                Ok(xml) if xml.trim_start().starts_with('<') => xml.to_string(),
                _ => extract_musicxml_from_mxl(data)?,
            }
        }
    };
    let sheet = parse_musicxml(&xml)?;
    Ok((sheet, xml))
}

/// Width factors persisted in a document, as JSON.
pub fn read_widths_json(xml: &str) -> EditorResult<String> {
    let sheet = parse_musicxml(xml)?;
    Ok(serde_json::to_string(&WidthSnapshot::from(&sheet))?)
}

/// Annotate a document with factors given as a `WidthSnapshot` JSON string.
pub fn annotate_with_snapshot_json(xml: &str, snapshot_json: &str) -> EditorResult<String> {
    let snapshot: WidthSnapshot = serde_json::from_str(snapshot_json)?;
    annotate(xml, snapshot.sheet_width_factor, &snapshot.measures)
}

// ═══════════════════════════════════════════════════════════════════════
// C FFI — for iOS (static library) and Android (JNI)
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

unsafe fn str_arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

fn into_c_string(result: EditorResult<String>) -> *mut c_char {
    match result {
        Ok(s) => CString::new(s).unwrap_or_default().into_raw(),
        Err(e) => {
            log::error!("scorewidth FFI call failed: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Annotate a MusicXML document with the factors in `snapshot_json`.
/// Returns null on failure (including a measure missing from the snapshot).
/// The caller must free the returned string with `scorewidth_free_string`.
///
/// # Safety
/// `xml` and `snapshot_json` must be valid null-terminated UTF-8 C strings.
#[no_mangle]
pub unsafe extern "C" fn scorewidth_annotate(
    xml: *const c_char,
    snapshot_json: *const c_char,
) -> *mut c_char {
    let (Some(xml), Some(json)) = (unsafe { str_arg(xml) }, unsafe { str_arg(snapshot_json) }) else {
        return std::ptr::null_mut();
    };
    into_c_string(annotate_with_snapshot_json(xml, json))
}

/// Read the width factors stored in a MusicXML document as JSON.
/// The caller must free the returned string with `scorewidth_free_string`.
///
/// # Safety
/// `xml` must be a valid null-terminated UTF-8 C string.
#[no_mangle]
pub unsafe extern "C" fn scorewidth_read_widths(xml: *const c_char) -> *mut c_char {
    let Some(xml) = (unsafe { str_arg(xml) }) else {
        return std::ptr::null_mut();
    };
    into_c_string(read_widths_json(xml))
}

/// Free a string previously returned by scorewidth functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a scorewidth function, or null.
#[no_mangle]
pub unsafe extern "C" fn scorewidth_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}
