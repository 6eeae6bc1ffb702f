// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! C ABI exposed to the Python runtime.
//!
//! Exports the submission callbacks the runtime calls from check code:
//! - `SubmitMetric`
//! - `SubmitServiceCheck`
//! - `SubmitEvent`
//! - `SubmitHistogramBucket`
//! - `SubmitEventPlatformEvent`
//!
//! All of them return nothing. Strings are NUL-terminated and owned by the
//! caller; they are copied before the call returns. Tag arrays are
//! NULL-terminated. A submission made before [`install`] is dropped.

#![allow(non_camel_case_types)] // C ABI types use C naming conventions
#![allow(non_snake_case)] // exported names are fixed by the runtime

use std::ffi::{c_char, c_float, c_int, c_long, c_longlong};
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use log::error;

use crate::config::Config;
use crate::errors::{InstallError, SubmitError};
use crate::sender::SenderRegistry;
use crate::submit::{Bridge, report_dropped};

/// Metric kind code, see [`crate::MetricKind`] for the values.
pub type metric_type_t = c_int;

/// Event record as laid out by the runtime.
#[repr(C)]
#[derive(Debug)]
pub struct event_t {
    pub title: *const c_char,
    pub text: *const c_char,
    pub ts: c_long,
    pub priority: *const c_char,
    pub host: *const c_char,
    pub tags: *const *const c_char,
    pub alert_type: *const c_char,
    pub aggregation_key: *const c_char,
    pub source_type_name: *const c_char,
}

static BRIDGE: OnceLock<Bridge<Box<dyn SenderRegistry>>> = OnceLock::new();

/// Install the process-wide registry the exported functions resolve senders
/// from, and restrict the `log` facade to `config.log_level`.
///
/// Can only be done once per process; a rejected install changes nothing.
pub fn install<R: SenderRegistry + 'static>(
    registry: R,
    config: Config,
) -> Result<(), InstallError> {
    let registry: Box<dyn SenderRegistry> = Box::new(registry);
    BRIDGE
        .set(Bridge::new(registry, config))
        .map_err(|_| InstallError::AlreadyInstalled)?;
    if let Some(bridge) = BRIDGE.get() {
        bridge.config().apply();
    }
    Ok(())
}

/// Run one submission, keeping panics from unwinding into the runtime.
fn with_bridge(submission: &str, f: impl FnOnce(&Bridge<Box<dyn SenderRegistry>>)) {
    let Some(bridge) = BRIDGE.get() else {
        report_dropped(submission, &SubmitError::RegistryNotInstalled, true);
        return;
    };
    if panic::catch_unwind(AssertUnwindSafe(|| f(bridge))).is_err() {
        error!("Panic while submitting {submission} from python check, submission dropped");
    }
}

/// Submit a metric sample for a check.
///
/// # Safety
/// - Every string pointer must be NULL or a valid NUL-terminated string.
/// - `tags` must be NULL or a NULL-terminated array of valid strings.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn SubmitMetric(
    check_id: *const c_char,
    metric_type: metric_type_t,
    metric_name: *const c_char,
    value: c_float,
    tags: *const *const c_char,
    hostname: *const c_char,
) {
    with_bridge("metric", |bridge| {
        // SAFETY: caller guarantees the pointer contract above.
        unsafe { bridge.submit_metric(check_id, metric_type, metric_name, value, tags, hostname) }
    });
}

/// Submit a service check for a check.
///
/// # Safety
/// Same pointer contract as [`SubmitMetric`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn SubmitServiceCheck(
    check_id: *const c_char,
    sc_name: *const c_char,
    status: c_int,
    tags: *const *const c_char,
    hostname: *const c_char,
    message: *const c_char,
) {
    with_bridge("service check", |bridge| {
        // SAFETY: caller guarantees the pointer contract above.
        unsafe { bridge.submit_service_check(check_id, sc_name, status, tags, hostname, message) }
    });
}

/// Submit an event for a check.
///
/// # Safety
/// `event` must be NULL or point to a valid `event_t` whose fields follow the
/// pointer contract of [`SubmitMetric`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn SubmitEvent(check_id: *const c_char, event: *const event_t) {
    with_bridge("event", |bridge| {
        // SAFETY: caller guarantees the pointer contract above.
        unsafe { bridge.submit_event(check_id, event) }
    });
}

/// Submit a histogram bucket for a check.
///
/// # Safety
/// Same pointer contract as [`SubmitMetric`].
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn SubmitHistogramBucket(
    check_id: *const c_char,
    metric_name: *const c_char,
    value: c_longlong,
    lower_bound: c_float,
    upper_bound: c_float,
    monotonic: c_int,
    hostname: *const c_char,
    tags: *const *const c_char,
    flush_first_value: bool,
) {
    with_bridge("histogram bucket", |bridge| {
        // SAFETY: caller guarantees the pointer contract above.
        unsafe {
            bridge.submit_histogram_bucket(
                check_id,
                metric_name,
                value,
                lower_bound,
                upper_bound,
                monotonic,
                hostname,
                tags,
                flush_first_value,
            )
        }
    });
}

/// Submit a serialized event platform payload for a check.
///
/// # Safety
/// `raw_event` must be NULL or point to at least `raw_event_size` readable
/// bytes. Other pointers follow the contract of [`SubmitMetric`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn SubmitEventPlatformEvent(
    check_id: *const c_char,
    raw_event: *const c_char,
    raw_event_size: c_int,
    event_type: *const c_char,
) {
    with_bridge("event platform event", |bridge| {
        // SAFETY: caller guarantees the pointer contract above.
        unsafe {
            bridge.submit_event_platform_event(check_id, raw_event, raw_event_size, event_type)
        }
    });
}
