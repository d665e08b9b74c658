//! Error types surfaced by the renderer and the DOM environment.

use thiserror::Error;

/// Errors produced by [`crate::FragmentRenderer`].
#[derive(Debug, Error)]
pub enum Error {
    /// No DOM environment was ambient when `render` was called.
    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    /// The rendering backend failed with a recognized error.
    #[error("Failed to render component: {message}")]
    Render {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The rendering backend failed with a value that is not an error.
    /// It is handed back untouched.
    #[error("component rendering was aborted with a non-error value: {0}")]
    Thrown(serde_json::Value),

    /// The DOM environment could not parse the rendered markup.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    pub fn is_environment(&self) -> bool {
        matches!(self, Error::Environment(_))
    }

    pub fn is_render(&self) -> bool {
        matches!(self, Error::Render { .. })
    }

    /// The raw value for [`Error::Thrown`], `None` for every other variant.
    pub fn thrown_value(&self) -> Option<&serde_json::Value> {
        match self {
            Error::Thrown(value) => Some(value),
            _ => None,
        }
    }
}

/// No DOM-like environment is installed on the calling thread.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "rendering components requires a DOM-like environment; install one \
     (e.g. `dom::install(Html5everDom::default())`) or provide a simulated DOM"
)]
pub struct EnvironmentError;

/// Failures raised by a [`crate::dom::DomEnvironment`] while parsing markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("failed to read markup: {0}")]
    Io(String),

    #[error("parser produced no fragment root")]
    MissingContent,
}

pub type Result<T> = std::result::Result<T, Error>;
