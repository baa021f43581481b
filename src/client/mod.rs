//! HTTP client for the onboarding endpoints
//!
//! Every call carries the configured timeout and an [`AbortSignal`].
//! Recoverable failures (429, 5xx, connect errors, timeouts) are retried
//! with backoff; other 4xx responses fail immediately.

mod abort;
mod retry;

pub use abort::{AbortHandle, AbortSignal, abort_pair};
pub use retry::{
    RetryPolicy, delay_for_attempt, is_recoverable, is_recoverable_transport, parse_retry_after,
};

use reqwest::{Client, RequestBuilder, header};
use serde::Serialize;

use crate::config::ClientConfig;
use crate::onboarding::UserProfile;
use crate::{Error, Result};

/// Body of an XP update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct XpRequest {
    pub xp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Serialize)]
struct TranscriptRequest<'a> {
    transcript: &'a str,
}

/// Client for the voice onboarding API
#[derive(Debug, Clone)]
pub struct OnboardingClient {
    http: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl OnboardingClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: config.retry,
        })
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a transcript and receive the new profile
    ///
    /// # Errors
    ///
    /// Returns `Rejected` when the server refuses the transcript (e.g. no
    /// name found), `Unavailable` when retries run out, and `Cancelled`
    /// when `abort` fires first.
    pub async fn submit_transcript(
        &self,
        transcript: &str,
        abort: &AbortSignal,
    ) -> Result<UserProfile> {
        let url = format!("{}/onboarding/voice", self.base_url);
        let body = TranscriptRequest { transcript };

        self.send_with_retry(|| self.http.post(&url).json(&body), abort)
            .await
    }

    /// Apply an XP update to a profile
    ///
    /// # Errors
    ///
    /// Same as [`Self::submit_transcript`]
    pub async fn update_xp(
        &self,
        id: &str,
        request: &XpRequest,
        abort: &AbortSignal,
    ) -> Result<UserProfile> {
        let url = format!("{}/users/{id}/xp", self.base_url);

        self.send_with_retry(|| self.http.put(&url).json(request), abort)
            .await
    }

    async fn send_with_retry<F>(&self, build: F, abort: &AbortSignal) -> Result<UserProfile>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0u32;

        loop {
            if abort.is_aborted() {
                return Err(Error::Cancelled);
            }

            let outcome = tokio::select! {
                biased;
                () = abort.aborted() => return Err(Error::Cancelled),
                outcome = build().send() => outcome,
            };

            let (last_error, retry_after) = match outcome {
                Ok(response) if response.status().is_success() => {
                    return tokio::select! {
                        biased;
                        () = abort.aborted() => Err(Error::Cancelled),
                        profile = response.json::<UserProfile>() => Ok(profile?),
                    };
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    let retry_after = parse_retry_after(
                        response
                            .headers()
                            .get(header::RETRY_AFTER)
                            .and_then(|v| v.to_str().ok()),
                    );
                    let body = response.text().await.unwrap_or_default();

                    if !is_recoverable(status) {
                        return Err(Error::Rejected {
                            status,
                            message: error_message(&body),
                        });
                    }
                    (format!("status {status}: {}", error_message(&body)), retry_after)
                }
                Err(e) if is_recoverable_transport(&e) => (e.to_string(), None),
                Err(e) => return Err(e.into()),
            };

            if attempt >= self.retry.max_retries {
                return Err(Error::Unavailable {
                    attempts: attempt + 1,
                    last_error,
                });
            }

            let delay = delay_for_attempt(&self.retry, attempt, retry_after);
            tracing::warn!(
                attempt = attempt + 1,
                max_retries = self.retry.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %last_error,
                "retrying onboarding request"
            );

            tokio::select! {
                biased;
                () = abort.aborted() => return Err(Error::Cancelled),
                () = tokio::time::sleep(delay) => {}
            }
            attempt += 1;
        }
    }
}

/// Pull the `error` field out of a JSON error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.as_str().map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn error_message_reads_json_field() {
        assert_eq!(
            error_message(r#"{"error":"Transcript is required"}"#),
            "Transcript is required"
        );
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_message(r#"{"detail":"x"}"#), r#"{"detail":"x"}"#);
    }

    #[test]
    fn xp_request_omits_absent_fields() {
        let body = serde_json::to_value(XpRequest { xp: 60, ..XpRequest::default() }).unwrap();
        assert_eq!(body, serde_json::json!({ "xp": 60 }));
    }

    #[test]
    fn trims_trailing_slash() {
        let config = ClientConfig {
            base_url: "http://localhost:3000/api/".to_string(),
            timeout: Duration::from_secs(1),
            retry: RetryPolicy::default(),
        };
        let client = OnboardingClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api");
    }

    #[tokio::test]
    async fn aborted_signal_short_circuits() {
        let config = ClientConfig::default();
        let client = OnboardingClient::new(&config).unwrap();
        let (handle, signal) = abort_pair();
        handle.abort();

        let err = client.submit_transcript("me chamo ana", &signal).await.unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }
}
