//! Sign-in effect handlers.
//!
//! Pure async functions that return `UiEvent`; the runtime spawns them
//! through the task lifecycle and forwards results to the inbox.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::time::{Duration, Instant};

use mingle_core::auth::AuthSessionResult;
use mingle_core::auth::apple::AppleLoginOutcome;
use mingle_core::auth::session::RETURN_PATH;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::events::UiEvent;

/// Waits for the browser to come back to the loopback return URL.
///
/// Binds the return URL's port and accepts connections until a request hits
/// the return path; that request's full URL is the session outcome. The
/// timeout maps to `Dismissed`, cancellation to `Canceled`.
pub async fn auth_session(
    return_url: String,
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
) -> UiEvent {
    let result = run_auth_session(return_url, timeout, cancel).await;
    UiEvent::GithubSessionResult { result }
}

async fn run_auth_session(
    return_url: String,
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
) -> Result<AuthSessionResult, String> {
    let parsed = url::Url::parse(&return_url).map_err(|e| format!("invalid return url: {e}"))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| "return url has no host".to_string())?
        .to_string();
    let port = parsed
        .port_or_known_default()
        .ok_or_else(|| "return url has no port".to_string())?;

    let listener = TcpListener::bind((host.as_str(), port))
        .map_err(|e| format!("failed to bind {host}:{port}: {e}"))?;
    listener
        .set_nonblocking(true)
        .map_err(|e| format!("failed to configure listener: {e}"))?;

    // The accept loop blocks, so it lives on its own thread; the async side
    // just waits for the outcome or the cancel token.
    let origin = format!("http://{host}:{port}");
    let (tx, mut rx) = mpsc::unbounded_channel::<AuthSessionResult>();
    let thread_cancel = cancel.clone();
    std::thread::spawn(move || {
        listen_for_redirect(&listener, &origin, timeout, thread_cancel.as_ref(), &tx);
    });

    let outcome = async move {
        match rx.recv().await {
            Some(outcome) => Ok(outcome),
            None => Err("auth listener exited unexpectedly".to_string()),
        }
    };

    match cancel {
        Some(token) => {
            tokio::select! {
                () = token.cancelled() => Ok(AuthSessionResult::Canceled),
                result = outcome => result,
            }
        }
        None => outcome.await,
    }
}

fn listen_for_redirect(
    listener: &TcpListener,
    origin: &str,
    timeout: Option<Duration>,
    cancel: Option<&CancellationToken>,
    tx: &mpsc::UnboundedSender<AuthSessionResult>,
) {
    let start = Instant::now();
    loop {
        match listener.accept() {
            Ok((mut stream, _)) => {
                let mut buffer = [0u8; 2048];
                let _ = stream.read(&mut buffer);
                let request = String::from_utf8_lossy(&buffer);
                match redirect_path(&request) {
                    Some(path) => {
                        let _ = stream.write_all(done_response().as_bytes());
                        let _ = tx.send(AuthSessionResult::Success {
                            url: format!("{origin}{path}"),
                        });
                        return;
                    }
                    None => {
                        // Stray request (favicon and friends); keep waiting.
                        let _ = stream.write_all(not_found_response().as_bytes());
                    }
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                if cancel.is_some_and(|token| token.is_cancelled()) {
                    return;
                }
                if timeout.is_some_and(|limit| start.elapsed() >= limit) {
                    let _ = tx.send(AuthSessionResult::Dismissed);
                    return;
                }
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(_) => {
                let _ = tx.send(AuthSessionResult::Dismissed);
                return;
            }
        }
    }
}

/// Extracts the request path from a raw HTTP request when it targets the
/// return path.
fn redirect_path(request: &str) -> Option<String> {
    let request_line = request.lines().next()?;
    let mut parts = request_line.split_whitespace();
    let _method = parts.next()?;
    let path = parts.next()?;

    let url = url::Url::parse(&format!("http://localhost{path}")).ok()?;
    if !url.path().starts_with(RETURN_PATH) {
        return None;
    }
    Some(url.path().to_string())
}

fn done_response() -> String {
    let body = "<html><body><h3>Sign-in complete</h3><p>You can close this window and return to the terminal.</p></body></html>";
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    )
}

fn not_found_response() -> String {
    let body = "<html><body><h3>Not found</h3></body></html>";
    format!(
        "HTTP/1.1 404 Not Found\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    )
}

/// Runs the native identity prompt plus the backend token exchange.
pub async fn apple_login(
    helper: String,
    api_base_url: String,
    cancel: Option<CancellationToken>,
) -> UiEvent {
    let flow = async move {
        mingle_core::auth::apple::sign_in(&helper, &api_base_url)
            .await
            .map_err(|err| format!("{err:#}"))
    };
    let result = match cancel {
        Some(token) => {
            tokio::select! {
                () = token.cancelled() => Ok(AppleLoginOutcome::Canceled),
                result = flow => result,
            }
        }
        None => flow.await,
    };
    UiEvent::AppleLoginResult { result }
}
