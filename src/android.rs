//! JNI bindings for Android.
//!
//! These functions are called from Kotlin via the JNI bridge.

use jni::objects::{JClass, JString};
use jni::sys::jstring;
use jni::JNIEnv;

use crate::{annotate_with_snapshot_json, read_widths_json, EditorResult};

fn to_jstring(env: &mut JNIEnv, result: EditorResult<String>) -> jstring {
    match result {
        Ok(s) => match env.new_string(&s) {
            Ok(js) => js.into_raw(),
            Err(_) => std::ptr::null_mut(),
        },
        Err(e) => {
            log::error!("scorewidth JNI call failed: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Annotate MusicXML with width factors.
///
/// Called from Kotlin as:
///   external fun annotate(xml: String, snapshotJson: String): String?
#[no_mangle]
pub extern "system" fn Java_com_scorewidth_app_ScoreWidth_annotate(
    mut env: JNIEnv,
    _class: JClass,
    xml: JString,
    snapshot_json: JString,
) -> jstring {
    let xml: String = match env.get_string(&xml) {
        Ok(s) => s.into(),
        Err(_) => return std::ptr::null_mut(),
    };
    let json: String = match env.get_string(&snapshot_json) {
        Ok(s) => s.into(),
        Err(_) => return std::ptr::null_mut(),
    };

    let result = annotate_with_snapshot_json(&xml, &json);
    to_jstring(&mut env, result)
}

/// Read the width factors persisted in MusicXML, as JSON.
///
/// Called from Kotlin as:
///   external fun readWidths(xml: String): String?
#[no_mangle]
pub extern "system" fn Java_com_scorewidth_app_ScoreWidth_readWidths(
    mut env: JNIEnv,
    _class: JClass,
    xml: JString,
) -> jstring {
    let xml: String = match env.get_string(&xml) {
        Ok(s) => s.into(),
        Err(_) => return std::ptr::null_mut(),
    };

    let result = read_widths_json(&xml);
    to_jstring(&mut env, result)
}
