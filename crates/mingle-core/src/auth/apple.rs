//! Sign in with Apple via the identity helper.
//!
//! The native identity prompt lives in a separate helper binary (config
//! key `identity_helper`). The helper prints the credential as a single
//! JSON value on stdout; exit code 0 = success, 2 = canceled, anything
//! else = failure. The credential is forwarded verbatim to the backend,
//! which answers with a token pair.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::auth::tokens::TokenPair;

/// Helper exit code meaning the user canceled the prompt.
pub const CANCELED_EXIT_CODE: i32 = 2;

/// Scopes requested for every sign-in.
pub const REQUESTED_SCOPES: &[IdentityScope] = &[IdentityScope::FullName, IdentityScope::Email];

/// Identity scopes understood by the helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityScope {
    FullName,
    Email,
}

impl IdentityScope {
    /// Returns the `--scope` argument value for the helper.
    pub fn as_arg(&self) -> &'static str {
        match self {
            IdentityScope::FullName => "full_name",
            IdentityScope::Email => "email",
        }
    }
}

/// Opaque identity credential, forwarded verbatim as the login request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppleCredential(pub serde_json::Value);

/// Outcome of the identity prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum IdentityPromptOutcome {
    Credential(AppleCredential),
    Canceled,
}

/// Outcome of the full sign-in chain (identity prompt, then backend login).
#[derive(Debug, Clone, PartialEq)]
pub enum AppleLoginOutcome {
    Tokens(TokenPair),
    Canceled,
}

/// Runs the identity helper and parses its credential output.
///
/// # Errors
/// Returns an error if the operation fails.
pub async fn request_identity(
    helper: &str,
    scopes: &[IdentityScope],
) -> Result<IdentityPromptOutcome> {
    let mut command = tokio::process::Command::new(helper);
    for scope in scopes {
        command.arg("--scope").arg(scope.as_arg());
    }

    let output = command
        .output()
        .await
        .with_context(|| format!("Failed to run identity helper '{helper}'"))?;

    if output.status.code() == Some(CANCELED_EXIT_CODE) {
        return Ok(IdentityPromptOutcome::Canceled);
    }

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "Identity helper '{helper}' failed ({}): {}",
            output.status,
            stderr.trim()
        );
    }

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)
        .context("Failed to parse identity helper output as JSON")?;
    Ok(IdentityPromptOutcome::Credential(AppleCredential(value)))
}

/// Runs the full sign-in chain: identity prompt, then backend login.
///
/// A canceled prompt short-circuits without touching the network.
///
/// # Errors
/// Returns an error if the operation fails.
pub async fn sign_in(helper: &str, api_base_url: &str) -> Result<AppleLoginOutcome> {
    match request_identity(helper, REQUESTED_SCOPES).await? {
        IdentityPromptOutcome::Canceled => Ok(AppleLoginOutcome::Canceled),
        IdentityPromptOutcome::Credential(credential) => {
            let pair = apple_login(api_base_url, &credential).await?;
            Ok(AppleLoginOutcome::Tokens(pair))
        }
    }
}

/// POSTs the credential to the backend and returns the issued token pair.
///
/// # Errors
/// Returns an error if the operation fails.
pub async fn apple_login(api_base_url: &str, credential: &AppleCredential) -> Result<TokenPair> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{api_base_url}/apple/login"))
        .header("Content-Type", "application/json")
        .json(credential)
        .send()
        .await
        .context("Failed to send Apple login request")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Apple login failed (HTTP {status}): {body}");
    }

    response
        .json()
        .await
        .context("Failed to parse Apple login response")
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn sample_credential() -> AppleCredential {
        AppleCredential(serde_json::json!({
            "user": "001234.abcdef",
            "email": "dev@example.com",
            "identityToken": "opaque-jwt",
        }))
    }

    /// Login: exactly one POST to /apple/login with the credential as body.
    #[tokio::test]
    async fn test_apple_login_posts_credential_verbatim() {
        let server = MockServer::start().await;
        let credential = sample_credential();

        Mock::given(method("POST"))
            .and(path("/apple/login"))
            .and(body_json(credential.0.clone()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "accessToken": "issued-access",
                "refreshToken": "issued-refresh",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let pair = apple_login(&server.uri(), &credential).await.unwrap();
        assert_eq!(pair.access_token, "issued-access");
        assert_eq!(pair.refresh_token, "issued-refresh");
    }

    /// Login: non-success status surfaces as an error with the HTTP code.
    #[tokio::test]
    async fn test_apple_login_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/apple/login"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad credential"))
            .mount(&server)
            .await;

        let err = apple_login(&server.uri(), &sample_credential())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("HTTP 401"));
    }

    #[cfg(unix)]
    fn write_helper_script(dir: &std::path::Path, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("identity-helper.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path.to_str().unwrap().to_string()
    }

    /// Helper: stdout JSON becomes the credential, scopes are forwarded.
    #[cfg(unix)]
    #[tokio::test]
    async fn test_request_identity_success() {
        let dir = tempfile::tempdir().unwrap();
        let args_file = dir.path().join("args.txt");
        let helper = write_helper_script(
            dir.path(),
            &format!(
                "echo \"$@\" > {}\nprintf '{{\"user\":\"u1\"}}'",
                args_file.display()
            ),
        );

        let outcome = request_identity(&helper, REQUESTED_SCOPES).await.unwrap();
        assert_eq!(
            outcome,
            IdentityPromptOutcome::Credential(AppleCredential(serde_json::json!({"user": "u1"})))
        );

        let args = std::fs::read_to_string(&args_file).unwrap();
        assert_eq!(args.trim(), "--scope full_name --scope email");
    }

    /// Helper: exit code 2 means the user canceled.
    #[cfg(unix)]
    #[tokio::test]
    async fn test_request_identity_canceled() {
        let dir = tempfile::tempdir().unwrap();
        let helper = write_helper_script(dir.path(), "exit 2");

        let outcome = request_identity(&helper, REQUESTED_SCOPES).await.unwrap();
        assert_eq!(outcome, IdentityPromptOutcome::Canceled);
    }

    /// Helper: any other non-zero exit is a failure with stderr attached.
    #[cfg(unix)]
    #[tokio::test]
    async fn test_request_identity_failure() {
        let dir = tempfile::tempdir().unwrap();
        let helper = write_helper_script(dir.path(), "echo 'no provider' >&2\nexit 1");

        let err = request_identity(&helper, REQUESTED_SCOPES)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no provider"));
    }

    /// Helper: garbage stdout is a parse failure, not a credential.
    #[cfg(unix)]
    #[tokio::test]
    async fn test_request_identity_bad_output() {
        let dir = tempfile::tempdir().unwrap();
        let helper = write_helper_script(dir.path(), "printf 'not json'");

        assert!(request_identity(&helper, REQUESTED_SCOPES).await.is_err());
    }

    /// Chain: a canceled prompt never reaches the backend.
    #[cfg(unix)]
    #[tokio::test]
    async fn test_sign_in_canceled_prompt_skips_backend() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/apple/login"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let helper = write_helper_script(dir.path(), "exit 2");

        let outcome = sign_in(&helper, &server.uri()).await.unwrap();
        assert_eq!(outcome, AppleLoginOutcome::Canceled);
    }

    /// Chain: a credential flows through to the backend and yields tokens.
    #[cfg(unix)]
    #[tokio::test]
    async fn test_sign_in_credential_yields_tokens() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/apple/login"))
            .and(body_json(serde_json::json!({"user": "u1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "accessToken": "a1",
                "refreshToken": "r1",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let helper = write_helper_script(dir.path(), "printf '{\"user\":\"u1\"}'");

        let outcome = sign_in(&helper, &server.uri()).await.unwrap();
        assert_eq!(
            outcome,
            AppleLoginOutcome::Tokens(TokenPair {
                access_token: "a1".to_string(),
                refresh_token: "r1".to_string(),
            })
        );
    }
}
