// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::check::CheckId;
use crate::errors::{RegistryError, SubmitError};
use crate::metrics::{Event, HistogramBucket, ServiceCheckStatus};

/// Aggregation capability of one running check.
///
/// Owned by the aggregation pipeline. The bridge only ever borrows one for
/// the duration of a single submission.
pub trait Sender: Send + Sync {
    fn gauge(&self, metric: &str, value: f64, hostname: &str, tags: &[String]);
    fn rate(&self, metric: &str, value: f64, hostname: &str, tags: &[String]);
    fn count(&self, metric: &str, value: f64, hostname: &str, tags: &[String]);
    fn monotonic_count(&self, metric: &str, value: f64, hostname: &str, tags: &[String]);
    fn counter(&self, metric: &str, value: f64, hostname: &str, tags: &[String]);
    fn histogram(&self, metric: &str, value: f64, hostname: &str, tags: &[String]);
    fn historate(&self, metric: &str, value: f64, hostname: &str, tags: &[String]);
    fn service_check(
        &self,
        name: &str,
        status: ServiceCheckStatus,
        hostname: &str,
        tags: &[String],
        message: &str,
    );
    fn event(&self, event: Event);
    fn histogram_bucket(&self, bucket: HistogramBucket);
    fn event_platform_event(&self, raw_event: Vec<u8>, event_type: &str);
}

/// Process-wide directory from check id to sender.
///
/// Looked up concurrently by every check thread; implementations must be
/// safe for that. `Ok(None)` means the registry knows of no sender.
pub trait SenderRegistry: Send + Sync {
    fn get_sender(&self, check_id: &CheckId) -> Result<Option<Arc<dyn Sender>>, RegistryError>;
}

impl<R: SenderRegistry + ?Sized> SenderRegistry for Box<R> {
    fn get_sender(&self, check_id: &CheckId) -> Result<Option<Arc<dyn Sender>>, RegistryError> {
        (**self).get_sender(check_id)
    }
}

impl<R: SenderRegistry + ?Sized> SenderRegistry for Arc<R> {
    fn get_sender(&self, check_id: &CheckId) -> Result<Option<Arc<dyn Sender>>, RegistryError> {
        (**self).get_sender(check_id)
    }
}

/// Find the sender of `check_id`, turning every failure mode into
/// `SenderUnavailable`.
pub(crate) fn resolve<R: SenderRegistry + ?Sized>(
    registry: &R,
    check_id: &CheckId,
) -> Result<Arc<dyn Sender>, SubmitError> {
    match registry.get_sender(check_id) {
        Ok(Some(sender)) => Ok(sender),
        Ok(None) => Err(SubmitError::SenderUnavailable {
            check_id: check_id.clone(),
            cause: "no sender returned".to_string(),
        }),
        Err(e) => Err(SubmitError::SenderUnavailable {
            check_id: check_id.clone(),
            cause: e.to_string(),
        }),
    }
}

/// In-process registry for hosts whose senders live in Rust.
///
/// Check lifecycle code registers a sender when a check is scheduled and
/// unregisters it when the check stops.
#[derive(Default)]
pub struct SenderMap {
    senders: RwLock<HashMap<CheckId, Arc<dyn Sender>>>,
}

impl SenderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `sender` for `check_id`, returning the sender it replaced.
    pub fn register(
        &self,
        check_id: impl Into<CheckId>,
        sender: Arc<dyn Sender>,
    ) -> Option<Arc<dyn Sender>> {
        let mut senders = match self.senders.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        senders.insert(check_id.into(), sender)
    }

    pub fn unregister(&self, check_id: &CheckId) -> Option<Arc<dyn Sender>> {
        let mut senders = match self.senders.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        senders.remove(check_id)
    }

    pub fn len(&self) -> usize {
        match self.senders.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SenderRegistry for SenderMap {
    fn get_sender(&self, check_id: &CheckId) -> Result<Option<Arc<dyn Sender>>, RegistryError> {
        let senders = match self.senders.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        senders
            .get(check_id)
            .cloned()
            .map(Some)
            .ok_or_else(|| RegistryError::UnknownCheck(check_id.clone()))
    }
}
