//! FFI interface for host applications
//!
//! Provides C-compatible functions for structural selection and highlight
//! rendering. Requests and results are passed as JSON.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use serde::{Deserialize, Serialize};

use crate::config::ExtractorConfig;
use crate::document::{parse, DocumentFormat};
use crate::error::ExtractError;
use crate::highlight::render;
use crate::schema::{ExtractedField, PendingSelection};
use crate::structure::{find_enclosing, match_all, TagPath};

/// Result struct returned to the host
/// Both pointers are owned by Rust and must be freed via fx_free_result
#[repr(C)]
pub struct FxResultFFI {
    /// JSON-serialized result (null-terminated)
    pub json_ptr: *mut c_char,
    /// Error message if the call failed (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

#[derive(Debug, Deserialize)]
struct SelectRequest {
    #[serde(default)]
    format: DocumentFormat,
    selection: String,
    #[serde(default)]
    config: ExtractorConfig,
}

#[derive(Debug, Serialize)]
struct SelectResponse {
    tag_path: Option<TagPath>,
    matches: Vec<String>,
    /// True when the selection itself was used as the only match
    fallback: bool,
    /// True when the selection was below the minimum length; `matches` is empty
    ignored: bool,
}

#[derive(Debug, Deserialize)]
struct RenderRequest {
    fields: Vec<ExtractedField>,
    #[serde(default)]
    pending: Option<PendingSelection>,
}

#[derive(Debug, Serialize)]
struct RenderResponse {
    markup: String,
}

/// Locate a selection in a raw document and return every structural match.
///
/// # Arguments
/// * `raw_ptr` - Pointer to document content (UTF-8, not necessarily null-terminated)
/// * `raw_len` - Length of document content in bytes
/// * `request_json` - JSON `{"selection": "...", "format": "html", "config": {...}}`
///
/// # Returns
/// FxResultFFI with either json_ptr set (`{"tag_path", "matches", "fallback", "ignored"}`)
/// or error_ptr set. A too-short selection is not an error: it comes back
/// with `ignored: true` and no matches.
///
/// # Safety
/// - `raw_ptr` must point to valid memory of at least `raw_len` bytes
/// - `request_json` must be a valid null-terminated C string
/// - Caller must free the result via `fx_free_result`
#[no_mangle]
pub unsafe extern "C" fn fx_select(
    raw_ptr: *const c_char,
    raw_len: usize,
    request_json: *const c_char,
) -> FxResultFFI {
    let raw = match read_raw(raw_ptr, raw_len) {
        Ok(s) => s,
        Err(msg) => return make_error_result(msg),
    };
    let request: SelectRequest = match read_request(request_json) {
        Ok(r) => r,
        Err(msg) => return make_error_result(&msg),
    };

    if let Err(e) = request.config.validate() {
        return make_error_result(&e.to_string());
    }

    let document = parse(&raw, request.format);
    let response = match find_enclosing(&document, &request.selection, &request.config) {
        Ok(located) => {
            let matches = match_all(&document, &located.path, &request.selection, &request.config);
            SelectResponse {
                tag_path: Some(located.path),
                matches,
                fallback: false,
                ignored: false,
            }
        }
        Err(ExtractError::NoEnclosingElementFound) => SelectResponse {
            tag_path: None,
            matches: vec![request.selection.trim().to_string()],
            fallback: true,
            ignored: false,
        },
        Err(ExtractError::SelectionTooShort { .. }) => SelectResponse {
            tag_path: None,
            matches: Vec::new(),
            fallback: false,
            ignored: true,
        },
        Err(e) => return make_error_result(&e.to_string()),
    };

    make_json_result(&response)
}

/// Render a raw document with field highlights.
///
/// `request_json` is `{"fields": [ExtractedField...], "pending": PendingSelection?}`.
///
/// # Safety
/// Same as fx_select
#[no_mangle]
pub unsafe extern "C" fn fx_render(
    raw_ptr: *const c_char,
    raw_len: usize,
    request_json: *const c_char,
) -> FxResultFFI {
    let raw = match read_raw(raw_ptr, raw_len) {
        Ok(s) => s,
        Err(msg) => return make_error_result(msg),
    };
    let request: RenderRequest = match read_request(request_json) {
        Ok(r) => r,
        Err(msg) => return make_error_result(&msg),
    };

    let markup = render(&raw, &request.fields, request.pending.as_ref());
    make_json_result(&RenderResponse { markup })
}

/// Free an FxResultFFI returned by fx_select or fx_render
///
/// # Safety
/// - `result` must have been returned by this library
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn fx_free_result(result: FxResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

unsafe fn read_raw(raw_ptr: *const c_char, raw_len: usize) -> Result<String, &'static str> {
    if raw_ptr.is_null() || raw_len == 0 {
        return Ok(String::new());
    }
    let slice = std::slice::from_raw_parts(raw_ptr as *const u8, raw_len);
    std::str::from_utf8(slice)
        .map(str::to_string)
        .map_err(|_| "Invalid UTF-8 in document")
}

unsafe fn read_request<T: for<'de> Deserialize<'de>>(request_json: *const c_char) -> Result<T, String> {
    if request_json.is_null() {
        return Err("Request JSON is null".to_string());
    }
    let request_str = CStr::from_ptr(request_json)
        .to_str()
        .map_err(|_| "Invalid UTF-8 in request JSON".to_string())?;
    serde_json::from_str(request_str).map_err(|e| format!("Failed to parse request JSON: {}", e))
}

fn make_json_result<T: Serialize>(value: &T) -> FxResultFFI {
    match serde_json::to_string(value) {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => FxResultFFI {
                json_ptr: cstr.into_raw(),
                error_ptr: ptr::null_mut(),
            },
            Err(_) => make_error_result("Result contains null bytes"),
        },
        Err(e) => make_error_result(&format!("Serialize error: {}", e)),
    }
}

// Helper to create error result
fn make_error_result(msg: &str) -> FxResultFFI {
    let error_cstr = CString::new(msg).unwrap_or_default();
    FxResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    // Runs an FFI call and returns (json, error), freeing the result
    fn call(
        f: unsafe extern "C" fn(*const c_char, usize, *const c_char) -> FxResultFFI,
        raw: &str,
        request: &str,
    ) -> (Option<Value>, Option<String>) {
        let request = CString::new(request).unwrap();
        unsafe {
            let result = f(raw.as_ptr() as *const c_char, raw.len(), request.as_ptr());
            let json = (!result.json_ptr.is_null()).then(|| {
                let s = CStr::from_ptr(result.json_ptr).to_str().unwrap();
                serde_json::from_str(s).unwrap()
            });
            let error = (!result.error_ptr.is_null())
                .then(|| CStr::from_ptr(result.error_ptr).to_string_lossy().into_owned());
            fx_free_result(result);
            (json, error)
        }
    }

    const HTML: &str = "<div><h2>Alpha</h2><p>x</p></div><div><h2>Beta</h2><p>y</p></div>";

    #[test]
    fn test_select() {
        let (json, error) = call(fx_select, HTML, r#"{"selection": "Alpha"}"#);
        assert!(error.is_none());

        let json = json.unwrap();
        assert_eq!(json["tag_path"], serde_json::json!(["div", "h2"]));
        assert_eq!(json["matches"], serde_json::json!(["Alpha", "Beta"]));
        assert_eq!(json["fallback"], false);
        assert_eq!(json["ignored"], false);
    }

    #[test]
    fn test_select_fallback_and_errors() {
        let (json, _) = call(fx_select, HTML, r#"{"selection": "Gamma", "format": "html"}"#);
        let json = json.unwrap();
        assert_eq!(json["tag_path"], Value::Null);
        assert_eq!(json["matches"], serde_json::json!(["Gamma"]));
        assert_eq!(json["fallback"], true);

        let (_, error) = call(fx_select, HTML, "{");
        assert!(error.unwrap().starts_with("Failed to parse request JSON"));
    }

    #[test]
    fn test_short_selection_is_ignored() {
        let (json, error) = call(fx_select, HTML, r#"{"selection": "Hi"}"#);
        assert!(error.is_none());

        let json = json.unwrap();
        assert_eq!(json["ignored"], true);
        assert_eq!(json["matches"], serde_json::json!([]));
        assert_eq!(json["tag_path"], Value::Null);
    }

    #[test]
    fn test_out_of_range_config_is_rejected() {
        let request = r#"{"selection": "Alpha", "config": {"max_path_depth": 18446744073709551615}}"#;
        let (json, error) = call(fx_select, HTML, request);
        assert!(json.is_none());
        assert!(error
            .unwrap()
            .starts_with("Invalid configuration value for max_path_depth"));
    }

    #[test]
    fn test_render() {
        let request = r#"{
            "fields": [{
                "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
                "name": "title",
                "preview_snippet": "Alpha",
                "matched_texts": ["Alpha", "Beta"],
                "color": "blue"
            }]
        }"#;

        let (json, error) = call(fx_render, HTML, request);
        assert!(error.is_none());
        let markup = json.unwrap()["markup"].as_str().unwrap().to_string();
        assert_eq!(markup.matches("<mark ").count(), 2);
        assert!(markup.contains("#3b82f6"));
    }
}
