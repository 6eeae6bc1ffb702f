// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

use std::ffi::c_int;

use thiserror::Error;

use crate::check::CheckId;

/// Failure reported by a sender registry lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no sender registered")]
    UnknownCheck(CheckId),
    #[error("{0}")]
    Other(String),
}

/// Reasons a submission is dropped before reaching a sender.
///
/// None of these cross the C boundary: the exported functions only log them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("no check id provided")]
    MissingCheckId,
    #[error("no sender registry installed")]
    RegistryNotInstalled,
    #[error("sender unavailable for check '{check_id}': {cause}")]
    SenderUnavailable { check_id: CheckId, cause: String },
    #[error("no event provided")]
    MissingEvent,
    #[error("unknown metric type {code} submitted by check '{check_id}' for metric '{metric}'")]
    UnknownMetricKind {
        code: c_int,
        check_id: CheckId,
        metric: String,
    },
}

#[derive(Error, Debug)]
pub enum InstallError {
    #[error("a sender registry is already installed")]
    AlreadyInstalled,
}
