use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, COOKIE, ORIGIN, REFERER, USER_AGENT};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::env::EnvVars;
use crate::config::Config;
use crate::error::{ConfigError, GenerateError, SonggenError};

/// Submission call timeout, independent of the overall job budget
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(20);
/// Single status poll call timeout
const STATUS_TIMEOUT: Duration = Duration::from_secs(15);
/// Minimum number of status polls regardless of the configured job timeout
const MIN_POLL_ATTEMPTS: u32 = 5;

/// Browser identity the service expects; requests without it get rejected
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 10; K) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/140.0.0.0 Mobile Safari/537.36";
const SERVICE_ORIGIN: &str = "https://notegpt.io";
const SERVICE_REFERER: &str = "https://notegpt.io/ai-music-generator";

/// Links for a successfully generated track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTrack {
    pub music_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// Normalized job state reported by the status endpoint.
///
/// The service reports free-form strings; matching happens on the
/// lower-cased value so upstream casing changes cannot flip an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobStatus {
    Pending,
    Success,
    Failed,
    /// Anything unrecognized; the poll loop treats it like `Pending`
    Unknown,
}

impl JobStatus {
    fn from_raw(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "pending" => JobStatus::Pending,
            "success" => JobStatus::Success,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Unknown,
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    lyrics: &'a str,
    /// 0 selects the service-side default track length
    duration: u32,
}

#[derive(Deserialize, Debug, Default)]
struct GenerateResponse {
    #[serde(default)]
    data: Option<GenerateData>,
    #[serde(default)]
    conversation_id: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct GenerateData {
    #[serde(default)]
    conversation_id: Option<String>,
}

impl GenerateResponse {
    /// The job handle may arrive nested or top-level; the first non-empty
    /// value wins. An empty string counts as missing.
    fn conversation_id(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|data| data.conversation_id.as_deref())
            .filter(|id| !id.is_empty())
            .or(self.conversation_id.as_deref().filter(|id| !id.is_empty()))
    }
}

#[derive(Deserialize, Debug, Default)]
struct StatusResponse {
    #[serde(default)]
    data: StatusData,
}

#[derive(Deserialize, Debug, Default)]
struct StatusData {
    #[serde(default)]
    status: String,
    #[serde(default)]
    music_url: Option<String>,
    #[serde(default)]
    thumbnail_url: Option<String>,
}

/// One parsed, normalized status poll result
#[derive(Debug)]
struct PollReply {
    status: JobStatus,
    music_url: Option<String>,
    thumbnail_url: Option<String>,
}

/// Client for the NoteGPT music generation API.
///
/// Owns a pre-configured HTTP client carrying the fixed browser header set
/// plus the session cookie when one is configured. One `submit_and_await`
/// call maps to one generation job: a single submission POST followed by a
/// bounded status poll loop.
#[derive(Clone)]
pub struct NotegptClient {
    client: reqwest::Client,
    generate_url: String,
    status_url: String,
    poll_interval: Duration,
}

impl NotegptClient {
    pub fn from_config(config: &Config) -> Result<Self, SonggenError> {
        if config.notegpt_cookie.is_none() {
            warn!(
                "{} not set; generation requests will likely fail authentication",
                EnvVars::NOTEGPT_COOKIES
            );
        }

        let headers = default_headers(config.notegpt_cookie.as_deref())?;
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| SonggenError::Internal(e.into()))?;

        Ok(Self {
            client,
            generate_url: config.generate_url.clone(),
            status_url: config.status_url.clone(),
            poll_interval: config.poll_interval(),
        })
    }

    /// Submit one generation job and wait for its terminal state.
    ///
    /// Runs the whole submit / poll cycle; the returned error is the
    /// user-facing failure reason. `timeout` caps the polling phase through
    /// the attempt budget rather than a wall-clock deadline; the budget never
    /// falls below [`MIN_POLL_ATTEMPTS`].
    pub async fn submit_and_await(
        &self,
        prompt: &str,
        lyrics: &str,
        timeout: Duration,
    ) -> Result<GeneratedTrack, GenerateError> {
        let conversation_id = self.submit(prompt, lyrics).await?;
        info!("Generation job accepted: {}", conversation_id);

        let attempts = attempt_budget(timeout, self.poll_interval);
        for attempt in 1..=attempts {
            match self.poll_status(&conversation_id).await {
                Ok(reply) => match reply.status {
                    JobStatus::Failed => return Err(GenerateError::GenerationFailed),
                    JobStatus::Success => {
                        info!("Generation job {} finished", conversation_id);
                        return Ok(GeneratedTrack {
                            music_url: reply.music_url,
                            thumbnail_url: reply.thumbnail_url,
                        });
                    }
                    JobStatus::Pending | JobStatus::Unknown => {
                        debug!(
                            "Job {} still pending (attempt {}/{})",
                            conversation_id, attempt, attempts
                        );
                    }
                },
                // A single failed poll is not fatal; the budget bounds the wait
                Err(e) => warn!("Poll request failed: {}", e),
            }

            if attempt < attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        Err(GenerateError::Timeout)
    }

    /// POST the job and pull the conversation id out of the response
    async fn submit(&self, prompt: &str, lyrics: &str) -> Result<String, GenerateError> {
        let payload = GenerateRequest { prompt, lyrics, duration: 0 };

        let response = self
            .client
            .post(&self.generate_url)
            .timeout(SUBMIT_TIMEOUT)
            .json(&payload)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                error!("Generation request failed: {}", e);
                classify_submit_error(&e)
            })?;

        let body: GenerateResponse = response.json().await.map_err(|e| {
            error!("Generation response was not valid JSON: {}", e);
            GenerateError::StartFailed
        })?;

        match body.conversation_id() {
            Some(id) => Ok(id.to_string()),
            None => Err(GenerateError::MissingJobId),
        }
    }

    /// One status GET; transport, HTTP and decode problems all surface as
    /// errors for the caller to treat as transient
    async fn poll_status(&self, conversation_id: &str) -> Result<PollReply, reqwest::Error> {
        let response = self
            .client
            .get(&self.status_url)
            .timeout(STATUS_TIMEOUT)
            .query(&[("conversation_id", conversation_id)])
            .send()
            .await?
            .error_for_status()?;

        let body: StatusResponse = response.json().await?;

        Ok(PollReply {
            status: JobStatus::from_raw(&body.data.status),
            music_url: body.data.music_url,
            thumbnail_url: body.data.thumbnail_url,
        })
    }
}

/// Fixed header set mirroring the mobile Chrome session the cookie came from
fn default_headers(cookie: Option<&str>) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ORIGIN, HeaderValue::from_static(SERVICE_ORIGIN));
    headers.insert(REFERER, HeaderValue::from_static(SERVICE_REFERER));
    headers.insert(
        HeaderName::from_static("sec-ch-ua-platform"),
        HeaderValue::from_static("\"Android\""),
    );

    if let Some(cookie) = cookie {
        let value = HeaderValue::from_str(cookie).map_err(|_| ConfigError::InvalidValue {
            field: EnvVars::NOTEGPT_COOKIES.to_string(),
            reason: "not a valid HTTP header value".to_string(),
        })?;
        headers.insert(COOKIE, value);
    }

    Ok(headers)
}

/// 401/403 on submission means the session cookie is the problem; anything
/// else (other statuses, transport errors) is a generic start failure
fn classify_submit_error(error: &reqwest::Error) -> GenerateError {
    match error.status() {
        Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN) => GenerateError::AuthFailed,
        _ => GenerateError::StartFailed,
    }
}

/// Number of status polls allowed inside `timeout`, never fewer than
/// [`MIN_POLL_ATTEMPTS`]. Monotone in `timeout`: a longer budget can only
/// add attempts.
fn attempt_budget(timeout: Duration, interval: Duration) -> u32 {
    let interval_ms = interval.as_millis().max(1);
    let allowed = u32::try_from(timeout.as_millis() / interval_ms).unwrap_or(u32::MAX);
    allowed.max(MIN_POLL_ATTEMPTS)
}
