//! The rendering backend the renderer delegates to.
//!
//! A backend turns an opaque component handle plus [`RenderOptions`] into
//! an HTML string. It is injected into [`crate::FragmentRenderer`], so tests
//! can substitute a stub for the real engine.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Entry point of a rendering engine: hands out containers.
pub trait RenderBackend<C: ?Sized> {
    type Container: Container<C>;

    fn create_container(&self) -> impl Future<Output = Result<Self::Container, Thrown>> + Send;
}

/// A rendering container obtained from a [`RenderBackend`].
pub trait Container<C: ?Sized> {
    fn render_to_string(
        &self,
        component: &C,
        options: &RenderOptions,
    ) -> impl Future<Output = Result<String, Thrown>> + Send;

    /// Tear the container down. Called once after every render attempt.
    fn release(self) -> impl Future<Output = ()> + Send
    where
        Self: Sized,
    {
        std::future::ready(())
    }
}

/// Whatever a backend can fail with.
///
/// Recognized errors carry a message and get wrapped by the renderer.
/// Bare values (sentinels, codes, objects) are passed back unchanged.
pub enum Thrown {
    Error(Box<dyn std::error::Error + Send + Sync>),
    Value(Value),
}

impl Thrown {
    pub fn value(value: impl Into<Value>) -> Self {
        Thrown::Value(value.into())
    }

    pub fn msg(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Thrown::Error(message.into())
    }

    /// The message of a recognized error, `None` for bare values.
    pub fn message(&self) -> Option<String> {
        match self {
            Thrown::Error(err) => Some(err.to_string()),
            Thrown::Value(_) => None,
        }
    }
}

impl<E> From<E> for Thrown
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        Thrown::Error(Box::new(err))
    }
}

impl fmt::Debug for Thrown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Thrown::Error(err) => f.debug_tuple("Error").field(err).finish(),
            Thrown::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

impl fmt::Display for Thrown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Thrown::Error(err) => write!(f, "{}", err),
            Thrown::Value(value) => write!(f, "{}", value),
        }
    }
}

/// Options forwarded verbatim to [`Container::render_to_string`].
///
/// The renderer never reads these; the backend owns their meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    /// Properties bound to the component.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub props: Map<String, Value>,
    /// Slot name to HTML content. The unnamed slot is `"default"`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub slots: BTreeMap<String, String>,
    /// Route parameters for dynamic routes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
    /// Per-request values exposed to the component.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub locals: Map<String, Value>,
    /// URL of the request the component is rendered for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,
    /// Render without the surrounding document shell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_type: Option<String>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    pub fn with_slot(mut self, name: impl Into<String>, html: impl Into<String>) -> Self {
        self.slots.insert(name.into(), html.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_local(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.locals.insert(name.into(), value.into());
        self
    }

    pub fn with_request(mut self, url: impl Into<String>) -> Self {
        self.request = Some(url.into());
        self
    }

    pub fn with_partial(mut self, partial: bool) -> Self {
        self.partial = Some(partial);
        self
    }
}
