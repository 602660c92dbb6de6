//! Error types for the aggregation layer.

use std::fmt;

/// Errors produced by the aggregation layer, wrapping upstream API and
/// roster failures and adding the empty-result conditions.
///
/// `Api` and `Roster` mean a source was unreachable or malformed;
/// `NoRosterData` and `NoLiveData` are distinct so callers can tell
/// "no data" apart from a transient transport error.
#[derive(Debug)]
pub enum AggregationError {
    /// An error from the game API client.
    Api(clashdash_api::Error),
    /// The roster sheet could not be fetched or parsed.
    Roster(crate::roster::RosterError),
    /// The roster sheet yielded zero usable rows.
    NoRosterData,
    /// None of the roster's clans could be fetched from the game API.
    NoLiveData,
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// The aggregator is misconfigured (e.g. missing API token).
    Config(String),
}

impl fmt::Display for AggregationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "game API error: {}", e),
            Self::Roster(e) => write!(f, "roster error: {}", e),
            Self::NoRosterData => write!(f, "no roster data available"),
            Self::NoLiveData => write!(f, "no live clan data available"),
            Self::Serialization(e) => write!(f, "serialization error: {}", e),
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AggregationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Roster(e) => Some(e),
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<clashdash_api::Error> for AggregationError {
    fn from(e: clashdash_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<crate::roster::RosterError> for AggregationError {
    fn from(e: crate::roster::RosterError) -> Self {
        Self::Roster(e)
    }
}

impl From<serde_json::Error> for AggregationError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}
