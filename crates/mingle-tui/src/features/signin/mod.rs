//! Sign-in panel feature (state/update/render).

pub mod render;
pub mod state;
pub mod update;

pub use state::SignInState;
pub use update::{handle_apple_login_result, handle_github_session_result, handle_key};
