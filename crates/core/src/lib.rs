//! Render UI components into detached DOM fragments.
//!
//! A [`RenderBackend`] produces HTML for an opaque component handle; the
//! ambient [`dom::DomEnvironment`] parses it into a [`Fragment`] that tests
//! can walk with ordinary child traversal.
//!
//! ```no_run
//! use std::future::Future;
//!
//! use component_fragment::{dom, render, Container, Html5everDom, RenderBackend, RenderOptions, Thrown};
//!
//! struct Card;
//! struct Engine;
//!
//! impl RenderBackend<Card> for Engine {
//!     type Container = Engine;
//!
//!     fn create_container(&self) -> impl Future<Output = Result<Engine, Thrown>> + Send {
//!         async { Ok(Engine) }
//!     }
//! }
//!
//! impl Container<Card> for Engine {
//!     fn render_to_string(
//!         &self,
//!         _card: &Card,
//!         _options: &RenderOptions,
//!     ) -> impl Future<Output = Result<String, Thrown>> + Send {
//!         async { Ok("<article>Hi</article>".to_string()) }
//!     }
//! }
//!
//! # async fn run() -> component_fragment::Result<()> {
//! let _dom = dom::install(Html5everDom::new());
//! let fragment = render(&Engine, &Card).await?;
//! assert_eq!(fragment.first_element_child().unwrap().tag, "article");
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod dom;
pub mod error;
pub mod renderer;

pub use backend::{Container, RenderBackend, RenderOptions, Thrown};
pub use dom::{DomNode, Fragment, Html5everDom, NodeType};
pub use error::{EnvironmentError, Error, ParseError, Result};
pub use renderer::{render, render_with_options, FragmentRenderer};

/// Parse markup with the ambient environment, the same way rendered
/// output is parsed.
pub fn parse_fragment(html: &str) -> Result<Fragment> {
    let env = dom::current().ok_or(EnvironmentError)?;
    Ok(env.parse_fragment(html)?)
}
