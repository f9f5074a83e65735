//! REST client for the RAG tutoring backend.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use tutor_core::error::{Result, TutorError};
use tutor_core::session::{
    ChatGateway, ImageAttachment, MessageReply, Session, SessionDetail, SessionSummary,
};

use crate::config::RagConfig;
use crate::dto::{
    CreateSessionResponse, QueryResponse, SessionDetailResponse, SessionHistoryResponse,
};

/// HTTP implementation of [`ChatGateway`].
///
/// All failures are normalized: connection-level problems become
/// `TutorError::Transport`, non-success statuses become `TutorError::Api`
/// with the response body as message, and undecodable bodies become
/// `TutorError::Serialization`.
#[derive(Debug, Clone)]
pub struct RagClient {
    client: Client,
    config: RagConfig,
}

impl RagClient {
    /// Creates a client with the provided configuration.
    pub fn new(config: RagConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Creates a client configured from secret.json / environment variables.
    pub fn from_env() -> Self {
        Self::new(RagConfig::load())
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {key}")),
            None => request,
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TutorError::api(status.as_u16(), message));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| TutorError::serialization("JSON", e.to_string()))
    }
}

#[async_trait]
impl ChatGateway for RagClient {
    async fn create_session(&self, student_id: &str) -> Result<Session> {
        let url = self.endpoint("/session/create");
        tracing::debug!(student_id, "creating session");

        let response = self
            .authorize(self.client.post(&url))
            .query(&[("student_id", student_id)])
            .timeout(self.config.request_timeout)
            .send()
            .await?;

        let payload: CreateSessionResponse = Self::decode(response).await?;
        Ok(payload.session.into())
    }

    async fn send_message(
        &self,
        session_id: &str,
        user_input: &str,
        student_id: &str,
        image: Option<&ImageAttachment>,
    ) -> Result<MessageReply> {
        let url = self.endpoint("/rag/query");
        tracing::debug!(
            session_id,
            has_image = image.is_some(),
            "submitting rag query"
        );

        let mut form = Form::new()
            .text("session_id", session_id.to_string())
            .text("user_input", user_input.to_string())
            .text("student_id", student_id.to_string());

        if let Some(image) = image {
            let part = Part::bytes(image.data.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.mime_type)
                .map_err(|e| {
                    TutorError::serialization(
                        "multipart",
                        format!("invalid MIME type '{}': {}", image.mime_type, e),
                    )
                })?;
            form = form.part("image", part);
        }

        let response = self
            .authorize(self.client.post(&url))
            .multipart(form)
            .timeout(self.config.query_timeout)
            .send()
            .await?;

        let payload: QueryResponse = Self::decode(response).await?;
        Ok(payload.into())
    }

    async fn session_history(&self, student_id: &str) -> Result<Vec<SessionSummary>> {
        let url = self.endpoint("/session/list");

        let response = self
            .authorize(self.client.get(&url))
            .query(&[("student_id", student_id)])
            .timeout(self.config.request_timeout)
            .send()
            .await?;

        let payload: SessionHistoryResponse = Self::decode(response).await?;
        Ok(payload.sessions.into_iter().map(Into::into).collect())
    }

    async fn session_detail(&self, session_id: &str, student_id: &str) -> Result<SessionDetail> {
        let url = self.endpoint("/session");

        let response = self
            .authorize(self.client.get(&url))
            .query(&[("student_id", student_id), ("session_id", session_id)])
            .timeout(self.config.request_timeout)
            .send()
            .await?;

        let payload: SessionDetailResponse = Self::decode(response).await?;
        Ok(payload.into())
    }

    async fn delete_session(&self, session_id: &str, student_id: &str) -> Result<()> {
        let url = self.endpoint("/session");
        tracing::debug!(session_id, "deleting session");

        let response = self
            .authorize(self.client.delete(&url))
            .query(&[("student_id", student_id), ("session_id", session_id)])
            .timeout(self.config.request_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TutorError::api(status.as_u16(), message));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = RagClient::new(RagConfig::new("https://rag.example.school/"));
        assert_eq!(
            client.endpoint("/session/list"),
            "https://rag.example.school/session/list"
        );
    }

    #[test]
    fn test_endpoint_keeps_plain_base() {
        let client = RagClient::new(RagConfig::new("http://localhost:8000"));
        assert_eq!(client.endpoint("/rag/query"), "http://localhost:8000/rag/query");
    }
}
