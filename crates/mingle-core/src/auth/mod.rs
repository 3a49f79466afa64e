//! Sign-in plumbing: platform capabilities, the token contract, browser
//! auth sessions, and Sign in with Apple.

pub mod apple;
pub mod capabilities;
pub mod session;
pub mod tokens;

pub use capabilities::{Capabilities, SignInMethod};
pub use session::AuthSessionResult;
pub use tokens::TokenPair;
