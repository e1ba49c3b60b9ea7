//! Error types for relay selection.

use thiserror::Error;

/// Relay selection errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// No active relay (or no usable port) satisfies the constraints
    #[error("no relays satisfying constraints")]
    NoMatchingRelay,
}

/// Errors from parsing textual constraints
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseConstraintError {
    /// Location not of the form `<country>[-<city>[-<hostname>]]`
    #[error("invalid location {0:?}: expected <country>[-<city>[-<hostname>]]")]
    InvalidLocation(String),

    /// Unknown ownership value
    #[error("invalid ownership {0:?}: expected \"owned\" or \"rented\"")]
    InvalidOwnership(String),

    /// A provider constraint without any provider
    #[error("provider list is empty")]
    NoProviders,
}
