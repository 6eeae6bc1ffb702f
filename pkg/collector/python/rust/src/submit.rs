// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Conversion of raw check submissions into sender calls.
//!
//! Every submission follows the same path: resolve the check's sender, copy
//! the foreign values, forward exactly one call. The `try_*` methods report
//! why a submission was dropped; the plain methods only log it, since the
//! runtime has no way to receive a result.

use std::ffi::{c_char, c_float, c_int, c_longlong};
use std::sync::Arc;

use log::{error, trace};

use crate::check::CheckId;
use crate::config::Config;
use crate::cstring::{expected_bytes, expected_field, string_or_empty, to_rust_string};
use crate::errors::SubmitError;
use crate::ffi::event_t;
use crate::metrics::{Event, EventAlertType, EventPriority, HistogramBucket, MetricKind};
use crate::sender::{Sender, SenderRegistry, resolve};
use crate::tags::decode_tags;

const METRIC: &str = "metric";
const SERVICE_CHECK: &str = "service check";
const EVENT: &str = "event";
const HISTOGRAM_BUCKET: &str = "histogram bucket";
const EVENT_PLATFORM_EVENT: &str = "event platform event";

/// Entry point for check submissions, bound to one sender registry.
///
/// Holds no per-call state: concurrent submissions from many check threads
/// only share the registry.
pub struct Bridge<R> {
    registry: R,
    config: Config,
}

impl<R: SenderRegistry> Bridge<R> {
    pub fn new(registry: R, config: Config) -> Self {
        Self { registry, config }
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    /// # Safety
    /// `check_id` must be NULL or a valid C string.
    unsafe fn sender_for(
        &self,
        check_id: *const c_char,
    ) -> Result<(CheckId, Arc<dyn Sender>), SubmitError> {
        // SAFETY: forwarded caller contract.
        let check_id = unsafe { to_rust_string(check_id) }
            .map(CheckId::from)
            .ok_or(SubmitError::MissingCheckId)?;
        let sender = resolve(&self.registry, &check_id)?;
        Ok((check_id, sender))
    }

    fn report(&self, submission: &str, err: &SubmitError) {
        report_dropped(submission, err, self.config.log_unknown_metric_types);
    }

    /// Submit one metric sample.
    ///
    /// # Safety
    /// Every string pointer must be NULL or a valid C string, and `tags` must
    /// be NULL or a NULL-terminated array of valid C strings. None of them
    /// is retained after the call.
    pub unsafe fn try_submit_metric(
        &self,
        check_id: *const c_char,
        metric_type: c_int,
        name: *const c_char,
        value: c_float,
        tags: *const *const c_char,
        hostname: *const c_char,
    ) -> Result<(), SubmitError> {
        // SAFETY: forwarded caller contract.
        let (check_id, sender) = unsafe { self.sender_for(check_id) }?;

        // SAFETY: forwarded caller contract.
        let (name, hostname, tags) = unsafe {
            (
                string_or_empty(name),
                string_or_empty(hostname),
                decode_tags(tags),
            )
        };

        let Ok(kind) = MetricKind::try_from(metric_type) else {
            return Err(SubmitError::UnknownMetricKind {
                code: metric_type,
                check_id,
                metric: name,
            });
        };

        let value = f64::from(value);
        dispatch_metric(sender.as_ref(), kind, &name, value, &hostname, &tags);
        trace!("Submitted {kind} '{name}' = {value}");
        Ok(())
    }

    /// Boundary-facing form of [`Bridge::try_submit_metric`].
    ///
    /// # Safety
    /// Same contract as [`Bridge::try_submit_metric`].
    pub unsafe fn submit_metric(
        &self,
        check_id: *const c_char,
        metric_type: c_int,
        name: *const c_char,
        value: c_float,
        tags: *const *const c_char,
        hostname: *const c_char,
    ) {
        // SAFETY: forwarded caller contract.
        let result =
            unsafe { self.try_submit_metric(check_id, metric_type, name, value, tags, hostname) };
        if let Err(e) = result {
            self.report(METRIC, &e);
        }
    }

    /// Submit one service check.
    ///
    /// # Safety
    /// Same pointer contract as [`Bridge::try_submit_metric`].
    pub unsafe fn try_submit_service_check(
        &self,
        check_id: *const c_char,
        name: *const c_char,
        status: c_int,
        tags: *const *const c_char,
        hostname: *const c_char,
        message: *const c_char,
    ) -> Result<(), SubmitError> {
        // SAFETY: forwarded caller contract.
        let (_, sender) = unsafe { self.sender_for(check_id) }?;

        // SAFETY: forwarded caller contract.
        let (name, tags, hostname, message) = unsafe {
            (
                string_or_empty(name),
                decode_tags(tags),
                string_or_empty(hostname),
                string_or_empty(message),
            )
        };

        sender.service_check(&name, status.into(), &hostname, &tags, &message);
        trace!("Submitted service check '{name}' with status {status}");
        Ok(())
    }

    /// Boundary-facing form of [`Bridge::try_submit_service_check`].
    ///
    /// # Safety
    /// Same contract as [`Bridge::try_submit_service_check`].
    pub unsafe fn submit_service_check(
        &self,
        check_id: *const c_char,
        name: *const c_char,
        status: c_int,
        tags: *const *const c_char,
        hostname: *const c_char,
        message: *const c_char,
    ) {
        // SAFETY: forwarded caller contract.
        let result = unsafe {
            self.try_submit_service_check(check_id, name, status, tags, hostname, message)
        };
        if let Err(e) = result {
            self.report(SERVICE_CHECK, &e);
        }
    }

    /// Submit one event.
    ///
    /// # Safety
    /// `event` must be NULL or point to a valid `event_t` whose string and tag
    /// fields follow the pointer contract of [`Bridge::try_submit_metric`].
    pub unsafe fn try_submit_event(
        &self,
        check_id: *const c_char,
        event: *const event_t,
    ) -> Result<(), SubmitError> {
        // SAFETY: forwarded caller contract.
        let (_, sender) = unsafe { self.sender_for(check_id) }?;

        // SAFETY: event is NULL or valid per the caller contract.
        let raw = unsafe { event.as_ref() }.ok_or(SubmitError::MissingEvent)?;
        // SAFETY: the fields of a valid event_t follow the pointer contract.
        let event = unsafe { assemble_event(raw) };

        trace!("Submitted event '{}'", event.title);
        sender.event(event);
        Ok(())
    }

    /// Boundary-facing form of [`Bridge::try_submit_event`].
    ///
    /// # Safety
    /// Same contract as [`Bridge::try_submit_event`].
    pub unsafe fn submit_event(&self, check_id: *const c_char, event: *const event_t) {
        // SAFETY: forwarded caller contract.
        if let Err(e) = unsafe { self.try_submit_event(check_id, event) } {
            self.report(EVENT, &e);
        }
    }

    /// Submit one histogram bucket.
    ///
    /// # Safety
    /// Same pointer contract as [`Bridge::try_submit_metric`].
    #[allow(clippy::too_many_arguments)]
    pub unsafe fn try_submit_histogram_bucket(
        &self,
        check_id: *const c_char,
        name: *const c_char,
        value: c_longlong,
        lower_bound: c_float,
        upper_bound: c_float,
        monotonic: c_int,
        hostname: *const c_char,
        tags: *const *const c_char,
        flush_first_value: bool,
    ) -> Result<(), SubmitError> {
        // SAFETY: forwarded caller contract.
        let (_, sender) = unsafe { self.sender_for(check_id) }?;

        // SAFETY: forwarded caller contract.
        let (name, host, tags) = unsafe {
            (
                string_or_empty(name),
                string_or_empty(hostname),
                decode_tags(tags),
            )
        };

        sender.histogram_bucket(HistogramBucket {
            name,
            value,
            lower_bound: f64::from(lower_bound),
            upper_bound: f64::from(upper_bound),
            monotonic: monotonic != 0,
            host,
            tags,
            flush_first_value,
        });
        Ok(())
    }

    /// Boundary-facing form of [`Bridge::try_submit_histogram_bucket`].
    ///
    /// # Safety
    /// Same contract as [`Bridge::try_submit_histogram_bucket`].
    #[allow(clippy::too_many_arguments)]
    pub unsafe fn submit_histogram_bucket(
        &self,
        check_id: *const c_char,
        name: *const c_char,
        value: c_longlong,
        lower_bound: c_float,
        upper_bound: c_float,
        monotonic: c_int,
        hostname: *const c_char,
        tags: *const *const c_char,
        flush_first_value: bool,
    ) {
        // SAFETY: forwarded caller contract.
        let result = unsafe {
            self.try_submit_histogram_bucket(
                check_id,
                name,
                value,
                lower_bound,
                upper_bound,
                monotonic,
                hostname,
                tags,
                flush_first_value,
            )
        };
        if let Err(e) = result {
            self.report(HISTOGRAM_BUCKET, &e);
        }
    }

    /// Submit a pre-serialized event platform payload.
    ///
    /// The payload is length-delimited and may contain NUL bytes.
    ///
    /// # Safety
    /// `raw_event` must be NULL or point to at least `raw_event_size` readable
    /// bytes; the other pointers follow the contract of
    /// [`Bridge::try_submit_metric`].
    pub unsafe fn try_submit_event_platform_event(
        &self,
        check_id: *const c_char,
        raw_event: *const c_char,
        raw_event_size: c_int,
        event_type: *const c_char,
    ) -> Result<(), SubmitError> {
        // SAFETY: forwarded caller contract.
        let (_, sender) = unsafe { self.sender_for(check_id) }?;

        // SAFETY: forwarded caller contract.
        let (raw_event, event_type) = unsafe {
            (
                expected_bytes(raw_event, raw_event_size, "raw_event", EVENT_PLATFORM_EVENT),
                expected_field(event_type, "event_type", EVENT_PLATFORM_EVENT),
            )
        };

        sender.event_platform_event(raw_event, &event_type);
        Ok(())
    }

    /// Boundary-facing form of [`Bridge::try_submit_event_platform_event`].
    ///
    /// # Safety
    /// Same contract as [`Bridge::try_submit_event_platform_event`].
    pub unsafe fn submit_event_platform_event(
        &self,
        check_id: *const c_char,
        raw_event: *const c_char,
        raw_event_size: c_int,
        event_type: *const c_char,
    ) {
        // SAFETY: forwarded caller contract.
        let result = unsafe {
            self.try_submit_event_platform_event(check_id, raw_event, raw_event_size, event_type)
        };
        if let Err(e) = result {
            self.report(EVENT_PLATFORM_EVENT, &e);
        }
    }
}

/// Log a dropped submission.
pub(crate) fn report_dropped(submission: &str, err: &SubmitError, log_unknown_metric_types: bool) {
    match err {
        SubmitError::UnknownMetricKind {
            code,
            check_id,
            metric,
        } => {
            if log_unknown_metric_types {
                error!(
                    "Unknown metric type {code} submitted by check '{check_id}', dropping metric '{metric}'"
                );
            }
        }
        SubmitError::MissingEvent => {
            error!("Error submitting {submission} from python check: {err}")
        }
        _ => error!("Error submitting {submission} to the Sender: {err}"),
    }
}

fn dispatch_metric(
    sender: &dyn Sender,
    kind: MetricKind,
    name: &str,
    value: f64,
    hostname: &str,
    tags: &[String],
) {
    match kind {
        MetricKind::Gauge => sender.gauge(name, value, hostname, tags),
        MetricKind::Rate => sender.rate(name, value, hostname, tags),
        MetricKind::Count => sender.count(name, value, hostname, tags),
        MetricKind::MonotonicCount => sender.monotonic_count(name, value, hostname, tags),
        MetricKind::Counter => sender.counter(name, value, hostname, tags),
        MetricKind::Histogram => sender.histogram(name, value, hostname, tags),
        MetricKind::Historate => sender.historate(name, value, hostname, tags),
    }
}

/// Build an [`Event`] from the runtime's record.
///
/// Every missing string is logged with the key the check uses for it. A
/// zero timestamp is logged and left unset; no current time is substituted.
///
/// # Safety
/// The string and tag fields of `raw` must follow the pointer contract of
/// [`Bridge::try_submit_metric`].
unsafe fn assemble_event(raw: &event_t) -> Event {
    // SAFETY: forwarded caller contract.
    let mut event = unsafe {
        Event {
            title: expected_field(raw.title, "msg_title", EVENT),
            text: expected_field(raw.text, "msg_text", EVENT),
            timestamp: None,
            priority: EventPriority(expected_field(raw.priority, "priority", EVENT)),
            host: expected_field(raw.host, "host", EVENT),
            tags: decode_tags(raw.tags),
            alert_type: EventAlertType(expected_field(raw.alert_type, "alert_type", EVENT)),
            aggregation_key: expected_field(raw.aggregation_key, "aggregation_key", EVENT),
            source_type_name: expected_field(raw.source_type_name, "source_type_name", EVENT),
        }
    };

    if raw.ts == 0 {
        error!("Can't cast timestamp to integer in event submitted from python check");
    } else {
        event.timestamp = Some(i64::from(raw.ts));
    }
    event
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::undocumented_unsafe_blocks,
    clippy::indexing_slicing,
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation
)]
mod tests {
    use super::*;
    use crate::metrics::ServiceCheckStatus;
    use crate::sender::SenderMap;
    use crate::test_utils::{CTags, Call, RecordingSender, StaticRegistry, capture_logs};
    use std::ffi::{CString, c_long};
    use std::ptr;

    fn cstr(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    fn bridge_with(sender: Arc<RecordingSender>) -> Bridge<SenderMap> {
        let map = SenderMap::new();
        map.register("check:abc", sender);
        Bridge::new(map, Config::default())
    }

    /// Owns the strings referenced by an `event_t`.
    struct EventFixture {
        strings: Vec<Option<CString>>,
        tags: CTags,
        ts: c_long,
    }

    impl EventFixture {
        fn full() -> Self {
            Self {
                strings: [
                    "Disk full",
                    "The disk is full",
                    "normal",
                    "web-1",
                    "error",
                    "disk:/dev/sda",
                    "my_source",
                ]
                .iter()
                .map(|s| Some(cstr(s)))
                .collect(),
                tags: CTags::new(&["env:prod", "bare"]),
                ts: 1609459200,
            }
        }

        fn without(mut self, index: usize) -> Self {
            self.strings[index] = None;
            self
        }

        fn raw(&self) -> event_t {
            let p = |i: usize| {
                self.strings[i]
                    .as_ref()
                    .map_or(ptr::null(), |s| s.as_ptr())
            };
            event_t {
                title: p(0),
                text: p(1),
                ts: self.ts,
                priority: p(2),
                host: p(3),
                tags: self.tags.as_ptr(),
                alert_type: p(4),
                aggregation_key: p(5),
                source_type_name: p(6),
            }
        }
    }

    #[test]
    fn every_metric_kind_maps_to_its_verb() {
        let verbs = [
            (MetricKind::Gauge, "gauge"),
            (MetricKind::Rate, "rate"),
            (MetricKind::Count, "count"),
            (MetricKind::MonotonicCount, "monotonic_count"),
            (MetricKind::Counter, "counter"),
            (MetricKind::Histogram, "histogram"),
            (MetricKind::Historate, "historate"),
        ];
        for (kind, verb) in verbs {
            let sender = Arc::new(RecordingSender::default());
            let bridge = bridge_with(sender.clone());
            let (id, name, host) = (cstr("check:abc"), cstr("my.metric"), cstr("myhost"));
            let tags = CTags::new(&["a:b", "c"]);

            let result = unsafe {
                bridge.try_submit_metric(
                    id.as_ptr(),
                    kind as c_int,
                    name.as_ptr(),
                    2.5,
                    tags.as_ptr(),
                    host.as_ptr(),
                )
            };
            assert_eq!(result, Ok(()));
            assert_eq!(
                sender.calls(),
                vec![Call::Metric {
                    verb,
                    name: "my.metric".to_string(),
                    value: 2.5,
                    hostname: "myhost".to_string(),
                    tags: vec!["a:b".to_string(), "c".to_string()],
                }]
            );
        }
    }

    #[test]
    fn metric_with_null_name_and_host() {
        let sender = Arc::new(RecordingSender::default());
        let bridge = bridge_with(sender.clone());
        let id = cstr("check:abc");

        let (_, logs) = capture_logs(|| unsafe {
            bridge.submit_metric(
                id.as_ptr(),
                MetricKind::Gauge as c_int,
                ptr::null(),
                1.0,
                ptr::null(),
                ptr::null(),
            )
        });
        assert!(logs.is_empty());
        assert_eq!(
            sender.calls(),
            vec![Call::Metric {
                verb: "gauge",
                name: String::new(),
                value: 1.0,
                hostname: String::new(),
                tags: vec![],
            }]
        );
    }

    #[test]
    fn unknown_metric_kind_is_dropped_and_logged() {
        let sender = Arc::new(RecordingSender::default());
        let bridge = bridge_with(sender.clone());
        let (id, name) = (cstr("check:abc"), cstr("my.metric"));

        let (result, logs) = capture_logs(|| unsafe {
            bridge.try_submit_metric(id.as_ptr(), 7, name.as_ptr(), 1.0, ptr::null(), ptr::null())
        });
        assert_eq!(
            result,
            Err(SubmitError::UnknownMetricKind {
                code: 7,
                check_id: CheckId::from("check:abc"),
                metric: "my.metric".to_string(),
            })
        );
        assert!(logs.is_empty());
        assert!(sender.calls().is_empty());

        let (_, logs) = capture_logs(|| unsafe {
            bridge.submit_metric(id.as_ptr(), -3, name.as_ptr(), 1.0, ptr::null(), ptr::null())
        });
        assert_eq!(
            logs,
            vec![(
                log::Level::Error,
                "Unknown metric type -3 submitted by check 'check:abc', dropping metric 'my.metric'"
                    .to_string()
            )]
        );
        assert!(sender.calls().is_empty());
    }

    #[test]
    fn unknown_metric_kind_can_be_silent() {
        let sender = Arc::new(RecordingSender::default());
        let map = SenderMap::new();
        map.register("check:abc", sender.clone());
        let config = Config {
            log_unknown_metric_types: false,
            ..Config::default()
        };
        let bridge = Bridge::new(map, config);
        let id = cstr("check:abc");

        let (_, logs) = capture_logs(|| unsafe {
            bridge.submit_metric(id.as_ptr(), 99, ptr::null(), 1.0, ptr::null(), ptr::null())
        });
        assert!(logs.is_empty());
        assert!(sender.calls().is_empty());
    }

    #[test]
    fn unresolvable_sender_only_logs() {
        let sender = Arc::new(RecordingSender::default());
        let bridge = bridge_with(sender.clone());
        let id = cstr("unknown-check");
        let name = cstr("n");
        let event = EventFixture::full();
        let raw = event.raw();

        let (_, logs) = capture_logs(|| unsafe {
            bridge.submit_metric(id.as_ptr(), 0, name.as_ptr(), 1.0, ptr::null(), ptr::null());
            bridge.submit_service_check(
                id.as_ptr(),
                name.as_ptr(),
                0,
                ptr::null(),
                ptr::null(),
                ptr::null(),
            );
            bridge.submit_event(id.as_ptr(), &raw);
        });

        assert!(sender.calls().is_empty());
        assert_eq!(logs.len(), 3);
        assert_eq!(
            logs[0].1,
            "Error submitting metric to the Sender: sender unavailable for check 'unknown-check': no sender registered"
        );
        assert!(logs[1].1.starts_with("Error submitting service check to the Sender:"));
        assert!(logs[2].1.starts_with("Error submitting event to the Sender:"));
    }

    #[test]
    fn registry_without_sender() {
        let bridge = Bridge::new(StaticRegistry::Nothing, Config::default());
        let id = cstr("a");
        let result = unsafe {
            bridge.try_submit_metric(id.as_ptr(), 0, ptr::null(), 1.0, ptr::null(), ptr::null())
        };
        assert!(matches!(
            result,
            Err(SubmitError::SenderUnavailable { ref cause, .. }) if cause == "no sender returned"
        ));
    }

    #[test]
    fn null_check_id_is_dropped() {
        let sender = Arc::new(RecordingSender::default());
        let bridge = Bridge::new(StaticRegistry::Always(sender.clone()), Config::default());

        let (result, _) = capture_logs(|| unsafe {
            bridge.try_submit_metric(ptr::null(), 0, ptr::null(), 1.0, ptr::null(), ptr::null())
        });
        assert_eq!(result, Err(SubmitError::MissingCheckId));

        let (_, logs) = capture_logs(|| unsafe {
            bridge.submit_service_check(
                ptr::null(),
                ptr::null(),
                0,
                ptr::null(),
                ptr::null(),
                ptr::null(),
            )
        });
        assert_eq!(
            logs[0].1,
            "Error submitting service check to the Sender: no check id provided"
        );
        assert!(sender.calls().is_empty());
    }

    #[test]
    fn empty_check_id_is_looked_up() {
        let sender = Arc::new(RecordingSender::default());
        let map = SenderMap::new();
        map.register("", sender.clone());
        let bridge = Bridge::new(map, Config::default());
        let id = cstr("");

        let result = unsafe {
            bridge.try_submit_metric(id.as_ptr(), 1, ptr::null(), 3.0, ptr::null(), ptr::null())
        };
        assert_eq!(result, Ok(()));
        assert_eq!(sender.calls().len(), 1);
    }

    #[test]
    fn service_check_forwarded() {
        let sender = Arc::new(RecordingSender::default());
        let bridge = bridge_with(sender.clone());
        let (id, name, host, message) = (
            cstr("check:abc"),
            cstr("my.service"),
            cstr("db-1"),
            cstr("connection refused"),
        );
        let tags = CTags::new(&["port:5432", "port:5432"]);

        let result = unsafe {
            bridge.try_submit_service_check(
                id.as_ptr(),
                name.as_ptr(),
                2,
                tags.as_ptr(),
                host.as_ptr(),
                message.as_ptr(),
            )
        };
        assert_eq!(result, Ok(()));
        assert_eq!(
            sender.calls(),
            vec![Call::ServiceCheck {
                name: "my.service".to_string(),
                status: ServiceCheckStatus::CRITICAL,
                hostname: "db-1".to_string(),
                tags: vec!["port:5432".to_string(), "port:5432".to_string()],
                message: "connection refused".to_string(),
            }]
        );
    }

    #[test]
    fn service_check_status_out_of_range_is_forwarded() {
        let sender = Arc::new(RecordingSender::default());
        let bridge = bridge_with(sender.clone());
        let id = cstr("check:abc");

        unsafe {
            bridge.submit_service_check(
                id.as_ptr(),
                ptr::null(),
                17,
                ptr::null(),
                ptr::null(),
                ptr::null(),
            )
        };
        let calls = sender.calls();
        assert!(matches!(
            &calls[0],
            Call::ServiceCheck { status, message, .. } if *status == ServiceCheckStatus(17) && message.is_empty()
        ));
    }

    #[test]
    fn full_event_is_forwarded_unchanged() {
        let sender = Arc::new(RecordingSender::default());
        let bridge = bridge_with(sender.clone());
        let id = cstr("check:abc");
        let fixture = EventFixture::full();
        let raw = fixture.raw();

        let (result, logs) = capture_logs(|| unsafe { bridge.try_submit_event(id.as_ptr(), &raw) });
        assert_eq!(result, Ok(()));
        assert!(logs.is_empty());
        assert_eq!(
            sender.calls(),
            vec![Call::Event(Event {
                title: "Disk full".to_string(),
                text: "The disk is full".to_string(),
                timestamp: Some(1609459200),
                priority: EventPriority("normal".to_string()),
                host: "web-1".to_string(),
                tags: vec!["env:prod".to_string(), "bare".to_string()],
                alert_type: EventAlertType("error".to_string()),
                aggregation_key: "disk:/dev/sda".to_string(),
                source_type_name: "my_source".to_string(),
            })]
        );
    }

    #[test]
    fn event_zero_timestamp_is_unset() {
        let sender = Arc::new(RecordingSender::default());
        let bridge = bridge_with(sender.clone());
        let id = cstr("check:abc");
        let mut fixture = EventFixture::full();
        fixture.ts = 0;
        let raw = fixture.raw();

        let (_, logs) = capture_logs(|| unsafe { bridge.submit_event(id.as_ptr(), &raw) });
        assert_eq!(
            logs,
            vec![(
                log::Level::Error,
                "Can't cast timestamp to integer in event submitted from python check".to_string()
            )]
        );
        let calls = sender.calls();
        let Call::Event(event) = &calls[0] else {
            panic!("expected an event, got {calls:?}");
        };
        assert_eq!(event.timestamp, None);
        assert_eq!(event.title, "Disk full");
    }

    #[test]
    fn event_missing_title() {
        let sender = Arc::new(RecordingSender::default());
        let bridge = bridge_with(sender.clone());
        let id = cstr("check:abc");
        let fixture = EventFixture::full().without(0);
        let raw = fixture.raw();

        let (_, logs) = capture_logs(|| unsafe { bridge.submit_event(id.as_ptr(), &raw) });
        assert_eq!(logs.len(), 1);
        assert!(logs[0].1.contains("'msg_title'"));

        let calls = sender.calls();
        let Call::Event(event) = &calls[0] else {
            panic!("expected an event, got {calls:?}");
        };
        assert_eq!(event.title, "");
        assert_eq!(event.text, "The disk is full");
    }

    #[test]
    fn event_each_missing_field_is_named() {
        let keys = [
            "msg_title",
            "msg_text",
            "priority",
            "host",
            "alert_type",
            "aggregation_key",
            "source_type_name",
        ];
        for (index, key) in keys.iter().enumerate() {
            let sender = Arc::new(RecordingSender::default());
            let bridge = bridge_with(sender.clone());
            let id = cstr("check:abc");
            let fixture = EventFixture::full().without(index);
            let raw = fixture.raw();

            let (_, logs) = capture_logs(|| unsafe { bridge.submit_event(id.as_ptr(), &raw) });
            assert_eq!(
                logs[0].1,
                format!("Can't parse value for key '{key}' in event submitted from python check")
            );
            assert_eq!(logs.len(), 1);
            assert_eq!(sender.calls().len(), 1);
        }
    }

    #[test]
    fn event_all_fields_missing() {
        let sender = Arc::new(RecordingSender::default());
        let bridge = bridge_with(sender.clone());
        let id = cstr("check:abc");
        let raw = event_t {
            title: ptr::null(),
            text: ptr::null(),
            ts: 0,
            priority: ptr::null(),
            host: ptr::null(),
            tags: ptr::null(),
            alert_type: ptr::null(),
            aggregation_key: ptr::null(),
            source_type_name: ptr::null(),
        };

        let (_, logs) = capture_logs(|| unsafe { bridge.submit_event(id.as_ptr(), &raw) });
        // seven strings plus the timestamp
        assert_eq!(logs.len(), 8);
        assert_eq!(sender.calls(), vec![Call::Event(Event::default())]);
    }

    #[test]
    fn null_event_is_dropped() {
        let sender = Arc::new(RecordingSender::default());
        let bridge = bridge_with(sender.clone());
        let id = cstr("check:abc");

        let (result, _) =
            capture_logs(|| unsafe { bridge.try_submit_event(id.as_ptr(), ptr::null()) });
        assert_eq!(result, Err(SubmitError::MissingEvent));
        assert!(sender.calls().is_empty());
    }

    #[test]
    fn histogram_bucket_forwarded() {
        let sender = Arc::new(RecordingSender::default());
        let bridge = bridge_with(sender.clone());
        let (id, name, host) = (cstr("check:abc"), cstr("latency.bucket"), cstr("h"));
        let tags = CTags::new(&["upper_bound:0.5"]);

        unsafe {
            bridge.submit_histogram_bucket(
                id.as_ptr(),
                name.as_ptr(),
                12,
                0.25,
                0.5,
                1,
                host.as_ptr(),
                tags.as_ptr(),
                true,
            )
        };
        assert_eq!(
            sender.calls(),
            vec![Call::HistogramBucket(HistogramBucket {
                name: "latency.bucket".to_string(),
                value: 12,
                lower_bound: 0.25,
                upper_bound: 0.5,
                monotonic: true,
                host: "h".to_string(),
                tags: vec!["upper_bound:0.5".to_string()],
                flush_first_value: true,
            })]
        );
    }

    #[test]
    fn event_platform_event_forwarded() {
        let sender = Arc::new(RecordingSender::default());
        let bridge = bridge_with(sender.clone());
        let (id, event_type) = (cstr("check:abc"), cstr("dbm-samples"));
        let payload = b"{\"a\":\"\0\"}";

        let (result, logs) = capture_logs(|| unsafe {
            bridge.try_submit_event_platform_event(
                id.as_ptr(),
                payload.as_ptr().cast(),
                payload.len() as c_int,
                event_type.as_ptr(),
            )
        });
        assert_eq!(result, Ok(()));
        assert!(logs.is_empty());
        assert_eq!(
            sender.calls(),
            vec![Call::EventPlatformEvent {
                raw_event: payload.to_vec(),
                event_type: "dbm-samples".to_string(),
            }]
        );
    }

    #[test]
    fn event_platform_event_missing_type() {
        let sender = Arc::new(RecordingSender::default());
        let bridge = bridge_with(sender.clone());
        let id = cstr("check:abc");

        let (_, logs) = capture_logs(|| unsafe {
            bridge.submit_event_platform_event(id.as_ptr(), ptr::null(), 0, ptr::null())
        });
        assert_eq!(logs.len(), 2);
        assert!(logs[1].1.contains("'event_type'"));
        assert_eq!(
            sender.calls(),
            vec![Call::EventPlatformEvent {
                raw_event: vec![],
                event_type: String::new(),
            }]
        );
    }
}
