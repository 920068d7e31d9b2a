//! Navigation capability used by the session and the guard.

/// Client-side navigation.
pub trait Navigator {
    /// Navigate to `path` (may carry a query string).
    fn push(&self, path: &str);
    /// Path of the route currently shown, without query or fragment.
    fn current_path(&self) -> String;
}

#[cfg(feature = "csr")]
pub use browser::BrowserNavigator;

#[cfg(feature = "csr")]
mod browser {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::Navigator;

    type NavigateFn = Rc<dyn Fn(&str)>;

    /// Router-backed navigator.
    ///
    /// The session is built before the router mounts, so the router's
    /// navigate function is bound afterwards; until then `push` falls back
    /// to a full page load.
    #[derive(Default)]
    pub struct BrowserNavigator {
        navigate: RefCell<Option<NavigateFn>>,
    }

    impl BrowserNavigator {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        pub fn bind(&self, navigate: impl Fn(&str) + 'static) {
            *self.navigate.borrow_mut() = Some(Rc::new(navigate));
        }
    }

    impl Navigator for BrowserNavigator {
        fn push(&self, path: &str) {
            let navigate = self.navigate.borrow().clone();
            match navigate {
                Some(navigate) => navigate(path),
                None => {
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().assign(path);
                    }
                }
            }
        }

        fn current_path(&self) -> String {
            web_sys::window()
                .and_then(|w| w.location().pathname().ok())
                .unwrap_or_else(|| "/".to_owned())
        }
    }
}
