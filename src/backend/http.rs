//! reqwest-backed implementation of [`MeetingBackend`].
//!
//! Every request carries the client-wide timeout configured at construction,
//! so a hung backend surfaces as [`ApiError::Timeout`] instead of leaving the
//! dispatcher busy forever.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

use super::api::{ApiError, MeetingBackend};
use super::types::{ChatReply, ChatRequest, ErrorBody, MemorySnapshot, Ordered, Participant};

pub struct HttpBackend {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Config(format!("invalid base URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "base URL {base_url} cannot carry a path"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self { base_url, client })
    }

    /// Join path segments onto the base URL. Each segment is percent-encoded
    /// on its own, so names with spaces or slashes stay a single segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            warn!("Backend error: {} - {}", status, message);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl MeetingBackend for HttpBackend {
    fn name(&self) -> &str {
        self.base_url.as_str()
    }

    async fn team_members(&self) -> Result<Vec<Participant>, ApiError> {
        let url = self.endpoint(&["api", "team-members"]);
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let roster: Ordered<Participant> = Self::read_json(response).await?;
        info!("Loaded {} team members", roster.len());
        Ok(roster.into_inner().into_iter().map(|(_, p)| p).collect())
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        let url = self.endpoint(&["api", "chat"]);
        info!(
            "POST {}: message_len={}, selected_members={}",
            url,
            request.message.len(),
            request.selected_members.len()
        );
        let response = self.client.post(url).json(request).send().await?;
        let reply: ChatReply = Self::read_json(response).await?;
        debug!(
            "Chat reply with {} responses (conversation {:?})",
            reply.responses.len(),
            reply.conversation_id
        );
        let missing = reply.unanswered(&request.selected_members);
        if !missing.is_empty() {
            warn!("No reply from: {}", missing.join(", "));
        }
        Ok(reply)
    }

    async fn member_memory(&self, name: &str) -> Result<MemorySnapshot, ApiError> {
        let url = self.endpoint(&["api", "member-memory", name]);
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base: &str) -> HttpBackend {
        HttpBackend::new(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn endpoint_joins_onto_bare_host() {
        let b = backend("http://127.0.0.1:5000");
        assert_eq!(
            b.endpoint(&["api", "team-members"]).as_str(),
            "http://127.0.0.1:5000/api/team-members"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let b = backend("http://example.test/meeting/");
        assert_eq!(
            b.endpoint(&["api", "chat"]).as_str(),
            "http://example.test/meeting/api/chat"
        );
    }

    #[test]
    fn endpoint_encodes_names_as_one_segment() {
        let b = backend("http://127.0.0.1:5000");
        assert_eq!(
            b.endpoint(&["api", "member-memory", "Alex Chen"]).as_str(),
            "http://127.0.0.1:5000/api/member-memory/Alex%20Chen"
        );
        assert_eq!(
            b.endpoint(&["api", "member-memory", "a/b"]).path(),
            "/api/member-memory/a%2Fb"
        );
    }

    #[test]
    fn new_rejects_garbage_url() {
        assert!(matches!(
            HttpBackend::new("not a url", Duration::from_secs(1)),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    fn new_rejects_cannot_be_a_base_url() {
        assert!(matches!(
            HttpBackend::new("mailto:team@example.test", Duration::from_secs(1)),
            Err(ApiError::Config(_))
        ));
    }
}
