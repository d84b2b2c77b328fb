// src/core/net.rs
//
// Blocking JSON GET with a fixed attempt cap and linear backoff.

use std::{fmt, thread, time::Duration};

use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::consts::{MAX_ATTEMPTS, USER_AGENT};
use crate::error::FetchError;

/// Why one attempt failed. Every kind is retried; the kind only shapes the log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    Timeout(String),
    Connect(String),
    Other(String),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Timeout(m) => write!(f, "timeout: {m}"),
            Failure::Connect(m) => write!(f, "connection failed: {m}"),
            Failure::Other(m) => f.write_str(m),
        }
    }
}

impl From<reqwest::Error> for Failure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Failure::Timeout(e.to_string())
        } else if e.is_connect() {
            Failure::Connect(e.to_string())
        } else if let Some(status) = e.status() {
            Failure::Other(format!("HTTP {status}"))
        } else if e.is_decode() {
            Failure::Other(format!("undecodable body: {e}"))
        } else {
            Failure::Other(e.to_string())
        }
    }
}

/// Run `op` up to [`MAX_ATTEMPTS`] times. Attempt `n` (1-based) that fails is
/// followed by a sleep of `base_delay * n`, except after the last one.
pub fn with_retry<T>(
    source: &str,
    base_delay: Duration,
    mut op: impl FnMut(u32) -> Result<T, Failure>,
) -> Result<T, FetchError> {
    let mut last = s!();
    for attempt in 1..=MAX_ATTEMPTS {
        match op(attempt) {
            Ok(v) => return Ok(v),
            Err(failure) => {
                match &failure {
                    Failure::Timeout(_) => logw!("{source}: attempt {attempt}/{MAX_ATTEMPTS} timed out"),
                    Failure::Connect(_) => logw!("{source}: attempt {attempt}/{MAX_ATTEMPTS} could not connect"),
                    Failure::Other(m) => logw!("{source}: attempt {attempt}/{MAX_ATTEMPTS} failed: {m}"),
                }
                last = failure.to_string();
                if attempt < MAX_ATTEMPTS {
                    thread::sleep(base_delay * attempt);
                }
            }
        }
    }
    loge!("{source}: giving up after {MAX_ATTEMPTS} attempts: {last}");
    Err(FetchError::Exhausted { attempts: MAX_ATTEMPTS, last_error: last })
}

/// One configured HTTP client per source. Cloning shares the connection pool.
#[derive(Clone, Debug)]
pub struct Fetcher {
    http: Client,
    source: &'static str,
    base_delay: Duration,
}

impl Fetcher {
    pub fn new(source: &'static str, timeout: Duration, base_delay: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { http, source, base_delay })
    }

    /// GET `url?query…` and decode the body as JSON, retrying per [`with_retry`].
    /// Shape checks belong to the caller: a decodable body is always `Ok`.
    pub fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        accept: Option<&str>,
    ) -> Result<Value, FetchError> {
        with_retry(self.source, self.base_delay, |attempt| {
            logd!("{}: GET {url} (attempt {attempt})", self.source);
            let mut req = self.http.get(url).query(query);
            if let Some(accept) = accept {
                req = req.header(reqwest::header::ACCEPT, accept);
            }
            let resp = req.send()?.error_for_status()?;
            Ok(resp.json::<Value>()?)
        })
    }
}
