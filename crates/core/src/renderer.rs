//! Component to fragment rendering.

use std::future::Future;

use futures::future::{self, Either};
use tracing::{debug, warn};

use crate::backend::{Container, RenderBackend, RenderOptions, Thrown};
use crate::dom::{self, Fragment};
use crate::error::{EnvironmentError, Error, Result};

/// Renders components through an injected backend and parses the output
/// with the ambient DOM environment.
#[derive(Debug, Clone, Default)]
pub struct FragmentRenderer<B> {
    backend: B,
}

impl<B> FragmentRenderer<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Render `component` with empty options. See [`render_with_options`].
    pub fn render<'a, C>(&'a self, component: &'a C) -> impl Future<Output = Result<Fragment>> + 'a
    where
        C: ?Sized,
        B: RenderBackend<C>,
    {
        render_with_options(&self.backend, component, RenderOptions::default())
    }

    pub fn render_with_options<'a, C>(
        &'a self,
        component: &'a C,
        options: RenderOptions,
    ) -> impl Future<Output = Result<Fragment>> + 'a
    where
        C: ?Sized,
        B: RenderBackend<C>,
    {
        render_with_options(&self.backend, component, options)
    }
}

/// Render `component` with empty options. See [`render_with_options`].
pub fn render<'a, B, C>(
    backend: &'a B,
    component: &'a C,
) -> impl Future<Output = Result<Fragment>> + 'a
where
    B: RenderBackend<C>,
    C: ?Sized,
{
    render_with_options(backend, component, RenderOptions::default())
}

/// Render `component` into a detached [`Fragment`].
///
/// The DOM environment is looked up when this function is called, not when
/// the future is first polled. Without one, the returned future is already
/// resolved to [`Error::Environment`] and the backend is never touched.
///
/// Backend failures that carry a message become [`Error::Render`]; bare
/// thrown values come back as [`Error::Thrown`]. Parse failures from the
/// environment are returned as [`Error::Parse`] without rewording.
pub fn render_with_options<'a, B, C>(
    backend: &'a B,
    component: &'a C,
    options: RenderOptions,
) -> impl Future<Output = Result<Fragment>> + 'a
where
    B: RenderBackend<C>,
    C: ?Sized,
{
    let Some(env) = dom::current() else {
        debug!("no DOM environment installed; refusing to render");
        return Either::Left(future::ready(Err(Error::Environment(EnvironmentError))));
    };

    Either::Right(async move {
        debug!(?options, "rendering component");
        let html = render_to_string(backend, component, &options)
            .await
            .map_err(classify)?;

        let fragment = env.parse_fragment(&html)?;
        debug!(
            bytes = html.len(),
            nodes = fragment.children.len(),
            "rendered component fragment"
        );
        Ok::<_, Error>(fragment)
    })
}

/// Acquire a container, render, and release the container on either outcome.
async fn render_to_string<B, C>(
    backend: &B,
    component: &C,
    options: &RenderOptions,
) -> std::result::Result<String, Thrown>
where
    B: RenderBackend<C>,
    C: ?Sized,
{
    let container = backend.create_container().await?;
    let result = container.render_to_string(component, options).await;
    container.release().await;
    result
}

fn classify(thrown: Thrown) -> Error {
    match thrown {
        Thrown::Error(source) => {
            let message = source.to_string();
            warn!(%message, "component render failed");
            Error::Render { message, source }
        }
        Thrown::Value(value) => {
            warn!(%value, "component render aborted with a non-error value");
            Error::Thrown(value)
        }
    }
}
