//! Platform capability detection for the sign-in surface.
//!
//! Everything platform-conditional in the UI derives from [`Capabilities`],
//! resolved once at startup. Render and update paths never branch on the
//! target platform directly.

/// A sign-in method offered on the options panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInMethod {
    Github,
    Apple,
    Email,
}

impl SignInMethod {
    /// Returns the row label shown on the sign-in panel.
    pub fn label(&self) -> &'static str {
        match self {
            SignInMethod::Github => "login with GitHub to get started",
            SignInMethod::Apple => "Sign in with Apple",
            SignInMethod::Email => "login with email",
        }
    }
}

/// Platform capabilities, resolved once at startup.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    /// Native identity sign-in and the launch age prompt are tied to
    /// Apple platforms.
    pub apple_platform: bool,
}

impl Capabilities {
    /// Detects capabilities for the current build target.
    pub fn detect() -> Self {
        Self {
            apple_platform: cfg!(target_os = "macos"),
        }
    }

    /// Whether the age gate starts open on launch.
    pub fn age_gate_on_launch(&self) -> bool {
        self.apple_platform
    }

    /// The sign-in methods available on this platform, in display order.
    pub fn sign_in_methods(&self) -> Vec<SignInMethod> {
        let mut methods = vec![SignInMethod::Github];
        if self.apple_platform {
            methods.push(SignInMethod::Apple);
            methods.push(SignInMethod::Email);
        }
        methods
    }
}
