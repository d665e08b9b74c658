//! The ambient DOM environment of the calling thread.
//!
//! Nothing is installed by default. Test harnesses install a simulated DOM
//! for the duration of a scope; rendering checks for it before doing any work.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;

use super::DomEnvironment;

thread_local! {
    static STACK: RefCell<Vec<Arc<dyn DomEnvironment>>> = const { RefCell::new(Vec::new()) };
}

/// Keeps an environment installed until dropped.
///
/// Guards must be dropped in reverse order of installation.
#[must_use = "the environment is uninstalled as soon as the guard is dropped"]
pub struct EnvironmentGuard {
    depth: usize,
    // Tied to the thread whose stack it pushed onto.
    _not_send: PhantomData<*const ()>,
}

impl Drop for EnvironmentGuard {
    fn drop(&mut self) {
        STACK.with(|stack| stack.borrow_mut().truncate(self.depth));
    }
}

/// Install `env` as the ambient environment of this thread.
pub fn install(env: impl DomEnvironment + 'static) -> EnvironmentGuard {
    STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        let depth = stack.len();
        stack.push(Arc::new(env));
        EnvironmentGuard {
            depth,
            _not_send: PhantomData,
        }
    })
}

/// Run `f` with `env` installed, restoring the previous environment after.
pub fn with_environment<R>(env: impl DomEnvironment + 'static, f: impl FnOnce() -> R) -> R {
    let _guard = install(env);
    f()
}

/// The innermost environment installed on this thread.
pub fn current() -> Option<Arc<dyn DomEnvironment>> {
    STACK.with(|stack| stack.borrow().last().cloned())
}

pub fn is_available() -> bool {
    STACK.with(|stack| !stack.borrow().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Fragment, Html5everDom};
    use crate::error::ParseError;

    struct Fixed(&'static str);

    impl DomEnvironment for Fixed {
        fn parse_fragment(&self, _html: &str) -> Result<Fragment, ParseError> {
            Err(ParseError::Io(self.0.to_string()))
        }
    }

    fn current_label() -> Option<String> {
        current().map(|env| match env.parse_fragment("") {
            Err(ParseError::Io(label)) => label,
            _ => "html5ever".to_string(),
        })
    }

    #[test]
    fn nothing_installed_by_default() {
        assert!(!is_available());
        assert!(current().is_none());
    }

    #[test]
    fn guard_scopes_installation() {
        {
            let _guard = install(Html5everDom::new());
            assert!(is_available());
        }
        assert!(!is_available());
    }

    #[test]
    fn inner_install_shadows_and_restores() {
        let _outer = install(Fixed("outer"));
        with_environment(Fixed("inner"), || {
            assert_eq!(current_label().as_deref(), Some("inner"));
        });
        assert_eq!(current_label().as_deref(), Some("outer"));
    }

    #[test]
    fn other_threads_do_not_see_installation() {
        let _guard = install(Html5everDom::new());
        let seen = std::thread::spawn(is_available).join().unwrap();
        assert!(!seen);
    }
}
