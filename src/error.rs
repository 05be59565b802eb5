// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The library level error type.

use std::time::Duration;

/// The errors that may occur while loading, mutating or reading a panel.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction draft was rejected before it was sent to a source.
    ///
    /// No state is touched when this is returned.
    #[error("invalid transaction: {0}")]
    Validation(String),

    /// A sort was requested on a field transactions do not have.
    #[error("cannot sort transactions by unknown field '{0}'")]
    UnknownSortField(String),

    /// The category name is not part of the configured category set.
    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    /// A filter, range or sort order value could not be parsed.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// A load or add request failed in the adapter.
    ///
    /// The message is what the panel stores as its error text.
    #[error("{0}")]
    Source(String),

    /// A request to a source did not complete in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The settings file exists but could not be read or parsed.
    #[error("invalid settings: {0}")]
    Config(String),
}
