//! Sign-in panel state.

use mingle_core::auth::SignInMethod;

/// Sign-in panel state.
///
/// `methods` is the precomputed row list from the platform capability set.
/// `return_url` is resolved once at startup; `None` means the browser flow
/// has nowhere to land and GitHub login silently does nothing.
#[derive(Debug, Clone)]
pub struct SignInState {
    pub selected: usize,
    pub methods: Vec<SignInMethod>,
    pub return_url: Option<String>,
}

impl SignInState {
    pub fn new(methods: Vec<SignInMethod>, return_url: Option<String>) -> Self {
        Self {
            selected: 0,
            methods,
            return_url,
        }
    }

    pub fn selected_method(&self) -> Option<SignInMethod> {
        self.methods.get(self.selected).copied()
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.methods.len() {
            self.selected += 1;
        }
    }
}
