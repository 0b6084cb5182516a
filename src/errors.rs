// ABOUTME: Unified error taxonomy for recipe source adapters and the aggregation layer
// ABOUTME: One tagged FetchError contract per adapter so the aggregator owns all fallback decisions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Leafy

use thiserror::Error;

/// Failure taxonomy shared by every source adapter.
///
/// Adapters never swallow failures themselves; they tag them and return, and
/// the aggregation engine holds the single decision table of which tags fall
/// through to the next tier.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No credential configured for this source. A silent capability
    /// downgrade, not an error condition worth surfacing.
    #[error("source {adapter} is not configured")]
    ConfigAbsent {
        /// Adapter name.
        adapter: &'static str,
    },

    /// The configured credential was rejected (HTTP 401/403).
    #[error("invalid API key for {adapter}: check the credential configuration")]
    CredentialInvalid {
        /// Adapter name.
        adapter: &'static str,
    },

    /// Transport-level failure: timeout, connection refused, cross-origin
    /// restriction, malformed body.
    #[error("network failure talking to {adapter}: {message}")]
    Network {
        /// Adapter name.
        adapter: &'static str,
        message: String,
        /// Failure qualified as a cross-origin restriction and should trip
        /// the one-way breaker on sources that carry one.
        cross_origin: bool,
    },

    /// The requested record does not exist at this source. A normal,
    /// non-exceptional outcome at every tier.
    #[error("recipe not found at {adapter}")]
    NotFound {
        /// Adapter name.
        adapter: &'static str,
    },
}

impl FetchError {
    /// Build a [`FetchError::Network`] from a reqwest transport error,
    /// classifying cross-origin-style failures (connection-level errors,
    /// failures with no structured response, or messages naming CORS).
    pub fn from_transport(adapter: &'static str, err: &reqwest::Error) -> Self {
        let message = err.to_string();
        let cross_origin =
            err.is_connect() || err.status().is_none() || message.contains("CORS");
        Self::Network {
            adapter,
            message,
            cross_origin,
        }
    }

    /// Whether this failure qualifies as a cross-origin restriction.
    #[must_use]
    pub const fn is_cross_origin(&self) -> bool {
        matches!(
            self,
            Self::Network {
                cross_origin: true,
                ..
            }
        )
    }
}

/// Result alias for adapter operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Terminal outcome of an aggregate lookup once every tier has been consulted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    /// No tier produced the record.
    #[error("recipe not found")]
    NotFound,

    /// No tier produced the record and the primary source specifically
    /// rejected its credential; surfaced with a distinct diagnostic.
    #[error("invalid API key: check the credential configuration")]
    CredentialInvalid,
}
