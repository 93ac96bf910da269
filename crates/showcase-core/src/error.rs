//! Error taxonomy for the showcase engine.
//!
//! Only configuration problems are errors. Data-shape problems in individual
//! records are repaired at ingestion (see [`crate::record`]) and DOM races are
//! the host adapter's concern, so neither appears here.

/// Showcase configuration or input error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowcaseError {
    /// `pageSize` was zero or negative.
    InvalidPageSize(i64),
    /// A DOM anchor the host markup must provide was not found.
    MissingAnchor(&'static str),
    /// A category slug that is neither `"all"` nor one of the known categories.
    UnknownCategory(String),
    /// The bootstrap payload could not be decoded.
    InvalidBootstrap(String),
    /// A configuration value is out of range.
    InvalidConfig(&'static str),
    /// The host environment lacks an API the showcase needs.
    Unsupported(&'static str),
}

impl core::fmt::Display for ShowcaseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidPageSize(size) => {
                write!(f, "invalid page size {size}: must be a positive integer")
            }
            Self::MissingAnchor(anchor) => write!(f, "missing required DOM anchor `{anchor}`"),
            Self::UnknownCategory(slug) => write!(f, "unknown category `{slug}`"),
            Self::InvalidBootstrap(msg) => write!(f, "invalid bootstrap payload: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Self::Unsupported(api) => write!(f, "host does not support {api}"),
        }
    }
}

impl std::error::Error for ShowcaseError {}

impl From<serde_json::Error> for ShowcaseError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidBootstrap(err.to_string())
    }
}

/// Convenience alias used across the crate.
pub type Result<T, E = ShowcaseError> = core::result::Result<T, E>;
