// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

use std::ffi::c_char;

use crate::cstring::to_rust_string;

/// Copy a NULL-terminated array of C strings into owned tags.
///
/// Order and duplicates are preserved. A NULL array yields no tags.
///
/// # Safety
/// If `tags` is non-NULL it must point to a sequence of valid C string
/// pointers terminated by a NULL pointer. There is no length: a missing
/// terminator makes this read past the end of the array.
pub(crate) unsafe fn decode_tags(tags: *const *const c_char) -> Vec<String> {
    let mut decoded = Vec::new();
    if tags.is_null() {
        return decoded;
    }

    let mut current = tags;
    loop {
        // SAFETY: current is within the array, the caller guarantees a NULL
        // terminator before the end.
        let tag = unsafe { *current };
        if tag.is_null() {
            return decoded;
        }
        // SAFETY: non-NULL elements are valid C strings per the caller contract.
        if let Some(tag) = unsafe { to_rust_string(tag) } {
            decoded.push(tag);
        }
        // SAFETY: the element just read was not the terminator, so the next
        // slot is still part of the array.
        current = unsafe { current.add(1) };
    }
}
