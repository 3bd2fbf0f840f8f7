//! Error types for marga-nav.

use thiserror::Error;

/// Crate-level error type.
#[derive(Error, Debug)]
pub enum NavError {
    /// Caller-supplied input failed validation (bad venue id, blank section
    /// id, out-of-range floor, empty batch). Never retried.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The floor plan document is missing or not well-formed markup.
    /// Individual malformed shapes inside a well-formed document are
    /// skipped, not escalated.
    #[error("floor plan parse error: {0}")]
    Parse(String),

    /// No stairs/elevator facility connects the requested floor pair.
    /// Distinct from a same-floor "no route", which is an empty route.
    #[error("no transition facility connects floor {from} to floor {to}")]
    NoFloorRoute { from: i32, to: i32 },

    /// The backing store failed to load or persist venue data.
    #[error("store error: {0}")]
    Store(String),

    /// Configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<quick_xml::Error> for NavError {
    fn from(e: quick_xml::Error) -> Self {
        NavError::Parse(e.to_string())
    }
}

impl From<toml::de::Error> for NavError {
    fn from(e: toml::de::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
