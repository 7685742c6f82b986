//! HTTP fetching with identity rotation and bounded retry.
//!
//! The fetcher is split in two layers:
//! - [`Transport`]: performs a single GET with a given User-Agent
//! - [`Fetcher`]: wraps any transport with per-attempt identity rotation and
//!   linear backoff between attempts
//!
//! # Retry Strategy
//!
//! - `max_retries` attempts in total, the first request counts as attempt 1
//! - After failed attempt `k` the fetcher sleeps `2 * k` backoff units
//! - No jitter; the last failure is wrapped in [`FetchError::RetriesExhausted`]

use rand::{Rng, rng};
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue, REFERER, USER_AGENT};
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Browser identities rotated across attempts.
pub const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36 Edg/91.0.864.59",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/92.0.4515.107 Safari/537.36",
];

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_RETRIES: usize = 3;
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(1);

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request timed out: {url}")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("search request failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: usize,
        #[source]
        source: Box<FetchError>,
    },
}

/// A single GET round-trip.
///
/// Implementations return the decoded body on a success status and an error
/// for anything else; retry policy lives in [`Fetcher`].
pub trait Transport {
    async fn get(&self, url: &str, user_agent: &str) -> Result<String, FetchError>;
}

/// Reusable `reqwest` client carrying the fixed baseline headers.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build the client once; baseline headers and timeout apply to every request.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .default_headers(baseline_headers())
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

fn baseline_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
    );
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.baidu.com/"));
    headers
}

impl Transport for HttpTransport {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn get(&self, url: &str, user_agent: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| classify(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        // Always UTF-8, whatever the response claims.
        let bytes = response.bytes().await.map_err(|e| classify(e, url))?;
        debug!(bytes = bytes.len(), "Received response body");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn classify(e: reqwest::Error, url: &str) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport(e)
    }
}

/// Chooses an index into the identity pool; receives the pool length.
pub type IdentityPicker = Box<dyn FnMut(usize) -> usize + Send>;

fn random_picker() -> IdentityPicker {
    Box::new(|len| rng().random_range(0..len))
}

/// Retrying fetcher over a [`Transport`].
///
/// Fetching needs `&mut self` because every attempt swaps the active
/// identity; share an instance across tasks only behind a lock.
pub struct Fetcher<T = HttpTransport> {
    transport: T,
    max_retries: usize,
    backoff_unit: Duration,
    user_agents: Vec<String>,
    picker: IdentityPicker,
    current_user_agent: Option<String>,
}

impl Fetcher<HttpTransport> {
    /// Fetcher over a real HTTP client with the given timeout.
    pub fn http(timeout: Duration, max_retries: usize) -> Result<Self, FetchError> {
        Ok(Self::new(HttpTransport::new(timeout)?, max_retries))
    }
}

impl<T: Transport> Fetcher<T> {
    /// Wrap `transport` with the default identity pool, random picker and 1s backoff unit.
    pub fn new(transport: T, max_retries: usize) -> Self {
        Self {
            transport,
            max_retries: max_retries.max(1),
            backoff_unit: DEFAULT_BACKOFF_UNIT,
            user_agents: USER_AGENTS.iter().map(|s| s.to_string()).collect(),
            picker: random_picker(),
            current_user_agent: None,
        }
    }

    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    /// Replace the identity pool; an empty pool keeps the built-in one.
    pub fn with_user_agents(mut self, user_agents: Vec<String>) -> Self {
        if !user_agents.is_empty() {
            self.user_agents = user_agents;
        }
        self
    }

    pub fn with_picker(mut self, picker: IdentityPicker) -> Self {
        self.picker = picker;
        self
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// Identity used by the most recent attempt.
    pub fn current_user_agent(&self) -> Option<&str> {
        self.current_user_agent.as_deref()
    }

    fn rotate_identity(&mut self) -> String {
        let len = self.user_agents.len();
        let idx = (self.picker)(len).min(len - 1);
        let agent = self.user_agents[idx].clone();
        self.current_user_agent = Some(agent.clone());
        agent
    }

    /// Delay slept after failed attempt number `attempt` (1-based).
    pub fn backoff_delay(&self, attempt: usize) -> Duration {
        let factor = u32::try_from(2 * attempt).unwrap_or(u32::MAX);
        self.backoff_unit.saturating_mul(factor)
    }

    /// GET `url`, retrying on any failure up to `max_retries` attempts.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch(&mut self, url: &str) -> Result<String, FetchError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            attempt += 1;
            let user_agent = self.rotate_identity();
            let attempt_t0 = Instant::now();

            match self.transport.get(url, &user_agent).await {
                Ok(body) => {
                    debug!(
                        attempt,
                        bytes = body.len(),
                        elapsed_ms = attempt_t0.elapsed().as_millis(),
                        "Fetch succeeded"
                    );
                    return Ok(body);
                }
                Err(e) => {
                    if attempt >= self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_t0.elapsed().as_millis(),
                            error = %e,
                            "fetch() exhausted retries"
                        );
                        return Err(FetchError::RetriesExhausted {
                            attempts: attempt,
                            source: Box::new(e),
                        });
                    }

                    let delay = self.backoff_delay(attempt);
                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_t0.elapsed().as_millis(),
                        ?delay,
                        error = %e,
                        "fetch() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

impl<T> fmt::Debug for Fetcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetcher")
            .field("max_retries", &self.max_retries)
            .field("backoff_unit", &self.backoff_unit)
            .field("user_agents", &self.user_agents.len())
            .field("current_user_agent", &self.current_user_agent)
            .finish()
    }
}
