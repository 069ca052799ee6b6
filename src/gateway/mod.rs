//! HTTP gateway: the single entry point for browser-originated API calls.
//!
//! The gateway supervises the backend process and reverse-proxies every
//! request under `/api` to it. Per request the flow is
//! Received -> Forwarded -> {BackendResponded | ProxyError} -> ClientResponse,
//! with no retries across the proxy boundary.

use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use tokio::process::Command;

use crate::config::Config;
use crate::errors::AppError;

/// Maximum proxied request body size.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Restart behavior for the supervised backend process.
#[derive(Debug, Clone, Copy)]
pub enum RestartPolicy {
    /// Never restart; a crashed backend stays down until the gateway restarts
    Never,
    /// Restart up to `max` times, waiting `delay` between attempts
    FixedRetries { max: u32, delay: Duration },
}

impl RestartPolicy {
    pub fn fixed(max: u32) -> Self {
        if max == 0 {
            RestartPolicy::Never
        } else {
            RestartPolicy::FixedRetries {
                max,
                delay: Duration::from_secs(1),
            }
        }
    }

    /// Whether a restart is allowed after `restarts` prior restarts.
    pub fn allows_restart(&self, restarts: u32) -> bool {
        match self {
            RestartPolicy::Never => false,
            RestartPolicy::FixedRetries { max, .. } => restarts < *max,
        }
    }

    pub fn delay(&self) -> Duration {
        match self {
            RestartPolicy::Never => Duration::ZERO,
            RestartPolicy::FixedRetries { delay, .. } => *delay,
        }
    }
}

/// The command the gateway supervises.
#[derive(Debug, Clone)]
pub struct BackendCommand {
    pub program: std::path::PathBuf,
    pub args: Vec<String>,
}

impl BackendCommand {
    /// Resolve the backend command: an explicit override from config, or the
    /// current executable re-run in backend mode.
    pub fn from_config(config: &Config) -> std::io::Result<Self> {
        match &config.backend_cmd {
            Some(cmd) => {
                let mut parts = cmd.split_whitespace();
                let program = parts.next().ok_or_else(|| {
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "WELLMIND_BACKEND_CMD is empty",
                    )
                })?;
                Ok(Self {
                    program: program.into(),
                    args: parts.map(|s| s.to_string()).collect(),
                })
            }
            None => Ok(Self {
                program: std::env::current_exe()?,
                args: vec!["backend".to_string()],
            }),
        }
    }
}

/// A backend process kept alive by the gateway.
///
/// The child is spawned with kill-on-drop, so terminating the gateway never
/// leaves an orphaned backend behind.
pub struct SupervisedChild {
    task: tokio::task::JoinHandle<()>,
}

impl SupervisedChild {
    pub fn spawn(command: BackendCommand, policy: RestartPolicy) -> Self {
        let task = tokio::spawn(async move {
            let mut restarts = 0u32;
            loop {
                let mut child = match Command::new(&command.program)
                    .args(&command.args)
                    .kill_on_drop(true)
                    .spawn()
                {
                    Ok(child) => {
                        tracing::info!(
                            program = %command.program.display(),
                            "Backend process started"
                        );
                        child
                    }
                    Err(e) => {
                        tracing::error!("Failed to start backend process: {}", e);
                        return;
                    }
                };

                match child.wait().await {
                    Ok(status) => tracing::warn!("Backend process exited: {}", status),
                    Err(e) => tracing::error!("Failed waiting on backend process: {}", e),
                }

                if !policy.allows_restart(restarts) {
                    tracing::error!(
                        restarts,
                        "Backend restart budget exhausted; backend stays down"
                    );
                    return;
                }
                restarts += 1;
                tracing::info!(attempt = restarts, "Restarting backend process");
                tokio::time::sleep(policy.delay()).await;
            }
        });

        Self { task }
    }

    /// Stop supervising and kill the backend process.
    pub fn shutdown(&self) {
        self.task.abort();
    }
}

impl Drop for SupervisedChild {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Shared proxy state.
#[derive(Clone)]
pub struct ProxyState {
    client: reqwest::Client,
    /// Base URL of the backend, e.g. `http://127.0.0.1:5001`
    upstream: String,
}

/// Build the gateway router: `/api/*` proxied to the backend, plus a local
/// health check.
pub fn create_proxy_router(upstream: String, client: reqwest::Client) -> Router {
    let state = ProxyState { client, upstream };

    Router::new()
        .route("/api/{*path}", any(proxy))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Forward one request to the backend and relay its response.
async fn proxy(State(state): State<ProxyState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());
    let url = format!("{}{}", state.upstream, path_and_query);

    let body = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return AppError::validation("Request body too large").into_response();
        }
    };

    let upstream_response = state
        .client
        .request(parts.method.clone(), url)
        .headers(forwardable_headers(&parts.headers))
        .body(body)
        .send()
        .await;

    match upstream_response {
        Ok(response) => {
            let status = response.status();
            let headers = forwardable_headers(response.headers());
            match response.bytes().await {
                Ok(bytes) => {
                    let mut relayed = Response::new(Body::from(bytes));
                    *relayed.status_mut() = status;
                    *relayed.headers_mut() = headers;
                    relayed
                }
                Err(e) => {
                    tracing::error!("Proxy error reading backend response: {}", e);
                    AppError::from(e).into_response()
                }
            }
        }
        Err(e) => {
            tracing::error!("Proxy error: {}", e);
            AppError::from(e).into_response()
        }
    }
}

/// Strip hop-by-hop and length headers; the client recomputes those.
fn forwardable_headers(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = HeaderMap::new();
    for (name, value) in headers {
        if name == header::HOST
            || name == header::CONNECTION
            || name == header::CONTENT_LENGTH
            || name == header::TRANSFER_ENCODING
        {
            continue;
        }
        forwarded.append(name.clone(), value.clone());
    }
    forwarded
}

/// Health check for the gateway itself (not proxied).
async fn health_check() -> &'static str {
    "OK"
}

/// Run the gateway: supervise the backend and serve the proxy until ctrl-c.
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let command = BackendCommand::from_config(&config)?;
    let child = SupervisedChild::spawn(command, RestartPolicy::fixed(config.backend_restarts));

    let client = reqwest::Client::builder()
        .timeout(config.proxy_timeout)
        .build()?;
    let app = create_proxy_router(format!("http://{}", config.backend_addr), client);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Gateway listening on {}", config.bind_addr);
    tracing::info!("Proxying /api to http://{}", config.backend_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    // Take the backend down with us
    child.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restart_policy_never() {
        let policy = RestartPolicy::Never;
        assert!(!policy.allows_restart(0));
    }

    #[test]
    fn test_restart_policy_fixed_budget() {
        let policy = RestartPolicy::fixed(3);
        assert!(policy.allows_restart(0));
        assert!(policy.allows_restart(2));
        assert!(!policy.allows_restart(3));
    }

    #[test]
    fn test_restart_policy_zero_is_never() {
        assert!(matches!(RestartPolicy::fixed(0), RestartPolicy::Never));
    }

    #[test]
    fn test_backend_command_override_parsing() {
        let mut config = crate::config::Config::from_env();
        config.backend_cmd = Some("python3 app.py --port 5001".to_string());
        let command = BackendCommand::from_config(&config).unwrap();
        assert_eq!(command.program, std::path::PathBuf::from("python3"));
        assert_eq!(command.args, vec!["app.py", "--port", "5001"]);
    }

    #[test]
    fn test_forwardable_headers_strips_hop_by_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "example.com".parse().unwrap());
        headers.insert(header::CONTENT_LENGTH, "12".parse().unwrap());
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());

        let forwarded = forwardable_headers(&headers);
        assert!(forwarded.get(header::HOST).is_none());
        assert!(forwarded.get(header::CONTENT_LENGTH).is_none());
        assert_eq!(
            forwarded.get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
