use std::result::Result as StdResult;

use thiserror::Error;

use crate::ElementId;

/// Result type for strata operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    #[error("{consumer} must be used within a layer provider")]
    /// A context-dependent API was used without an enclosing layer.
    MissingProvider {
        /// Name of the API that required the provider.
        consumer: &'static str,
    },

    #[error("layer root {0:?} is already registered")]
    /// The root is already registered as a visible layer.
    DuplicateLayer(ElementId),

    #[error("element not found: {0:?}")]
    /// The element has been removed from its document.
    ElementNotFound(ElementId),

    #[error("hierarchy: {0}")]
    /// Invalid tree mutation.
    Hierarchy(String),

    #[error("config: {0}")]
    /// Configuration could not be parsed.
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
