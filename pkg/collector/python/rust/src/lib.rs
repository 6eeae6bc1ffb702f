// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Submission bridge between Python checks and the aggregator.
//!
//! Checks running in the embedded Python runtime submit metrics, service
//! checks and events through C callbacks. This crate receives those calls,
//! copies every foreign string out of caller-owned memory, resolves the
//! check's sender and forwards one typed call to it.

// Correctness
#![deny(clippy::indexing_slicing)]
#![deny(clippy::string_slice)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::undocumented_unsafe_blocks)]
// Panicking code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unimplemented)]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

mod check;
pub mod config;
mod cstring;
mod errors;
pub mod ffi;
mod metrics;
mod sender;
mod submit;
mod tags;

#[cfg(test)]
pub(crate) mod test_utils;

pub use check::CheckId;
pub use config::Config;
pub use errors::{InstallError, RegistryError, SubmitError};
pub use ffi::install;
pub use metrics::{
    Event, EventAlertType, EventPriority, HistogramBucket, MetricKind, ServiceCheckStatus,
};
pub use sender::{Sender, SenderMap, SenderRegistry};
pub use submit::Bridge;
