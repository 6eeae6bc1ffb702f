// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Fakes shared by the unit tests.
#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::ffi::{CString, c_char};
use std::ptr;
use std::sync::{Arc, Mutex, MutexGuard, Once};

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::check::CheckId;
use crate::errors::RegistryError;
use crate::metrics::{Event, HistogramBucket, ServiceCheckStatus};
use crate::sender::{Sender, SenderRegistry};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Metric {
        verb: &'static str,
        name: String,
        value: f64,
        hostname: String,
        tags: Vec<String>,
    },
    ServiceCheck {
        name: String,
        status: ServiceCheckStatus,
        hostname: String,
        tags: Vec<String>,
        message: String,
    },
    Event(Event),
    HistogramBucket(HistogramBucket),
    EventPlatformEvent {
        raw_event: Vec<u8>,
        event_type: String,
    },
}

/// Sender that records every call it receives.
#[derive(Default)]
pub struct RecordingSender {
    calls: Mutex<Vec<Call>>,
}

impl RecordingSender {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn metric(&self, verb: &'static str, name: &str, value: f64, hostname: &str, tags: &[String]) {
        self.record(Call::Metric {
            verb,
            name: name.to_string(),
            value,
            hostname: hostname.to_string(),
            tags: tags.to_vec(),
        });
    }
}

impl Sender for RecordingSender {
    fn gauge(&self, metric: &str, value: f64, hostname: &str, tags: &[String]) {
        self.metric("gauge", metric, value, hostname, tags);
    }

    fn rate(&self, metric: &str, value: f64, hostname: &str, tags: &[String]) {
        self.metric("rate", metric, value, hostname, tags);
    }

    fn count(&self, metric: &str, value: f64, hostname: &str, tags: &[String]) {
        self.metric("count", metric, value, hostname, tags);
    }

    fn monotonic_count(&self, metric: &str, value: f64, hostname: &str, tags: &[String]) {
        self.metric("monotonic_count", metric, value, hostname, tags);
    }

    fn counter(&self, metric: &str, value: f64, hostname: &str, tags: &[String]) {
        self.metric("counter", metric, value, hostname, tags);
    }

    fn histogram(&self, metric: &str, value: f64, hostname: &str, tags: &[String]) {
        self.metric("histogram", metric, value, hostname, tags);
    }

    fn historate(&self, metric: &str, value: f64, hostname: &str, tags: &[String]) {
        self.metric("historate", metric, value, hostname, tags);
    }

    fn service_check(
        &self,
        name: &str,
        status: ServiceCheckStatus,
        hostname: &str,
        tags: &[String],
        message: &str,
    ) {
        self.record(Call::ServiceCheck {
            name: name.to_string(),
            status,
            hostname: hostname.to_string(),
            tags: tags.to_vec(),
            message: message.to_string(),
        });
    }

    fn event(&self, event: Event) {
        self.record(Call::Event(event));
    }

    fn histogram_bucket(&self, bucket: HistogramBucket) {
        self.record(Call::HistogramBucket(bucket));
    }

    fn event_platform_event(&self, raw_event: Vec<u8>, event_type: &str) {
        self.record(Call::EventPlatformEvent {
            raw_event,
            event_type: event_type.to_string(),
        });
    }
}

/// Registry that answers every lookup the same way.
pub enum StaticRegistry {
    Nothing,
    Failing(String),
    Always(Arc<dyn Sender>),
}

impl SenderRegistry for StaticRegistry {
    fn get_sender(&self, _check_id: &CheckId) -> Result<Option<Arc<dyn Sender>>, RegistryError> {
        match self {
            StaticRegistry::Nothing => Ok(None),
            StaticRegistry::Failing(cause) => Err(RegistryError::Other(cause.clone())),
            StaticRegistry::Always(sender) => Ok(Some(Arc::clone(sender))),
        }
    }
}

/// Owns C strings and the NULL-terminated pointer array built from them.
pub struct CTags {
    _strings: Vec<CString>,
    ptrs: Vec<*const c_char>,
}

impl CTags {
    pub fn new(tags: &[&str]) -> Self {
        let strings: Vec<CString> = tags.iter().map(|t| CString::new(*t).unwrap()).collect();
        let mut ptrs: Vec<*const c_char> = strings.iter().map(|s| s.as_ptr()).collect();
        ptrs.push(ptr::null());
        Self {
            _strings: strings,
            ptrs,
        }
    }

    pub fn as_ptr(&self) -> *const *const c_char {
        self.ptrs.as_ptr()
    }
}

thread_local! {
    static CAPTURED: RefCell<Option<Vec<(Level, String)>>> = const { RefCell::new(None) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        // trace/debug/info chatter is not a diagnostic
        if record.level() > Level::Warn {
            return;
        }
        CAPTURED.with(|captured| {
            if let Some(records) = captured.borrow_mut().as_mut() {
                records.push((record.level(), record.args().to_string()));
            }
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();
static MAX_LEVEL: Mutex<()> = Mutex::new(());

/// Serialize tests that depend on or change the global `log` max level.
pub fn max_level_guard() -> MutexGuard<'static, ()> {
    MAX_LEVEL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Run `f` and return the warnings and errors it logged on this thread.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, Vec<(Level, String)>) {
    let _guard = max_level_guard();
    INIT.call_once(|| {
        let _ = log::set_logger(&LOGGER);
    });
    log::set_max_level(LevelFilter::Trace);
    CAPTURED.with(|captured| *captured.borrow_mut() = Some(Vec::new()));
    let out = f();
    let logs = CAPTURED.with(|captured| captured.borrow_mut().take().unwrap_or_default());
    (out, logs)
}
