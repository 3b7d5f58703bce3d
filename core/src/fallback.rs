//! Explicit tagging of live versus fallback data.
//!
//! Callers that keep a local default for when a fetch fails wrap the result
//! in [`Sourced`], so "the API returned nothing" and "the fetch failed and
//! this is canned data" stay distinguishable. Nothing in this crate ever
//! substitutes fallback data silently.

use crate::error::ApiError;

/// Where a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Fetched from the API.
    Live,
    /// A caller-supplied default used because the fetch failed.
    Fallback,
}

/// A value tagged with its origin. The error that forced the fallback is
/// kept alongside it.
#[derive(Debug)]
pub struct Sourced<T> {
    pub value: T,
    pub source: DataSource,
    pub error: Option<ApiError>,
}

impl<T> Sourced<T> {
    pub fn live(value: T) -> Self {
        Self {
            value,
            source: DataSource::Live,
            error: None,
        }
    }

    pub fn fallback(value: T, error: ApiError) -> Self {
        Self {
            value,
            source: DataSource::Fallback,
            error: Some(error),
        }
    }

    /// Tag a fetch result, substituting `fallback` only on error.
    pub fn from_result(result: Result<T, ApiError>, fallback: T) -> Self {
        match result {
            Ok(value) => Self::live(value),
            Err(error) => Self::fallback(fallback, error),
        }
    }

    pub fn is_live(&self) -> bool {
        self.source == DataSource::Live
    }
}
