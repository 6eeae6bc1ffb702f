// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Copies of caller-owned C strings.
//!
//! Nothing returned here borrows foreign memory: the runtime frees its
//! buffers as soon as the submission call returns.

use std::ffi::{CStr, c_char, c_int};

use log::error;

/// Copy a NUL-terminated C string, or `None` if the pointer is NULL.
///
/// Invalid UTF-8 is replaced with U+FFFD rather than rejected.
///
/// # Safety
/// If `ptr` is non-NULL it must point to a NUL-terminated string that stays
/// valid for the duration of the call.
pub(crate) unsafe fn to_rust_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: ptr is non-NULL and the caller guarantees NUL termination.
    let cstr = unsafe { CStr::from_ptr(ptr) };
    Some(cstr.to_string_lossy().into_owned())
}

/// Copy a C string, mapping NULL to the empty string without a diagnostic.
///
/// # Safety
/// Same contract as [`to_rust_string`].
pub(crate) unsafe fn string_or_empty(ptr: *const c_char) -> String {
    // SAFETY: forwarded caller contract.
    unsafe { to_rust_string(ptr) }.unwrap_or_default()
}

/// Copy a C string the check was expected to provide.
///
/// A NULL pointer is logged with the field name and the kind of submission
/// it belongs to, then replaced by the empty string.
///
/// # Safety
/// Same contract as [`to_rust_string`].
pub(crate) unsafe fn expected_field(ptr: *const c_char, field: &str, submission: &str) -> String {
    // SAFETY: forwarded caller contract.
    match unsafe { to_rust_string(ptr) } {
        Some(value) => value,
        None => {
            error!(
                "Can't parse value for key '{field}' in {submission} submitted from python check"
            );
            String::new()
        }
    }
}

/// Copy a length-delimited byte buffer the check was expected to provide.
///
/// A NULL pointer or a negative length is logged like a missing field and
/// yields an empty buffer.
///
/// # Safety
/// If `ptr` is non-NULL and `len` is non-negative, `ptr` must point to at
/// least `len` readable bytes.
pub(crate) unsafe fn expected_bytes(
    ptr: *const c_char,
    len: c_int,
    field: &str,
    submission: &str,
) -> Vec<u8> {
    let Ok(len) = usize::try_from(len) else {
        error!(
            "Can't parse value for key '{field}' in {submission} submitted from python check: negative size {len}"
        );
        return Vec::new();
    };
    if ptr.is_null() {
        error!("Can't parse value for key '{field}' in {submission} submitted from python check");
        return Vec::new();
    }
    // SAFETY: ptr is non-NULL and the caller guarantees len readable bytes.
    let bytes = unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len) };
    bytes.to_vec()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::undocumented_unsafe_blocks
)]
mod tests {
    use super::*;
    use crate::test_utils::capture_logs;
    use std::ffi::CString;
    use std::ptr;

    #[test]
    fn copies_verbatim() {
        let s = CString::new("  Mixed Case value  ").unwrap();
        assert_eq!(
            unsafe { to_rust_string(s.as_ptr()) }.as_deref(),
            Some("  Mixed Case value  ")
        );
    }

    #[test]
    fn null_is_none() {
        assert_eq!(unsafe { to_rust_string(ptr::null()) }, None);
        assert_eq!(unsafe { string_or_empty(ptr::null()) }, "");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let s = CString::new(vec![b'a', 0xff, b'b']).unwrap();
        assert_eq!(unsafe { string_or_empty(s.as_ptr()) }, "a\u{fffd}b");
    }

    #[test]
    fn string_or_empty_is_silent() {
        let (value, logs) = capture_logs(|| unsafe { string_or_empty(ptr::null()) });
        assert_eq!(value, "");
        assert!(logs.is_empty());
    }

    #[test]
    fn expected_field_logs_missing() {
        let (value, logs) =
            capture_logs(|| unsafe { expected_field(ptr::null(), "msg_title", "event") });
        assert_eq!(value, "");
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].0, log::Level::Error);
        assert_eq!(
            logs[0].1,
            "Can't parse value for key 'msg_title' in event submitted from python check"
        );
    }

    #[test]
    fn expected_field_present_is_silent() {
        let s = CString::new("hello").unwrap();
        let (value, logs) = capture_logs(|| unsafe { expected_field(s.as_ptr(), "host", "event") });
        assert_eq!(value, "hello");
        assert!(logs.is_empty());
    }

    #[test]
    fn expected_bytes_copies_exact_length() {
        let raw = b"{\"a\":1}trailing";
        let (value, logs) = capture_logs(|| unsafe {
            expected_bytes(raw.as_ptr().cast(), 7, "raw_event", "event platform event")
        });
        assert_eq!(value, b"{\"a\":1}");
        assert!(logs.is_empty());
    }

    #[test]
    fn expected_bytes_rejects_null_and_negative() {
        let (value, logs) = capture_logs(|| unsafe {
            expected_bytes(ptr::null(), 4, "raw_event", "event platform event")
        });
        assert!(value.is_empty());
        assert_eq!(logs.len(), 1);

        let raw = b"abcd";
        let (value, logs) = capture_logs(|| unsafe {
            expected_bytes(raw.as_ptr().cast(), -1, "raw_event", "event platform event")
        });
        assert!(value.is_empty());
        assert_eq!(logs.len(), 1);
        assert!(logs[0].1.contains("negative size -1"));
    }
}
