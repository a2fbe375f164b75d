use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{StaticToken, TokenProvider};
use crate::errors::{ChatError, PageError, RateLimitKind};
use crate::models::listing::{AgentInstance, Transaction};
use crate::models::message::Message;
use crate::paginate::{Page, PageRequest, PageSource};

/// Error string the API returns with a 429 once the anonymous free-request
/// quota is used up. Matched exactly; any other reason is a plain rate limit.
pub const ANONYMOUS_QUOTA_ERROR: &str =
    "You have reached the maximum number of free requests. Please sign in to continue.";

/// Configuration injected by the surrounding application.
pub struct ClientConfig {
    pub base_url: String,
    pub team_id: Option<String>,
}

impl ClientConfig {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            team_id: None,
        }
    }

    pub fn with_team_id<S: Into<String>>(mut self, team_id: S) -> Self {
        self.team_id = Some(team_id.into());
        self
    }
}

/// Which conversation surface a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    General,
    Agent,
    Code,
}

/// Body of a POST to the conversation endpoint. The transcript includes the
/// just-appended user message, matching what the backend expects.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRequest<'a> {
    pub question: &'a str,
    pub messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<&'a str>,
    #[serde(rename = "type")]
    pub kind: ChatKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
struct RateLimitBody {
    message: Option<String>,
    error: Option<String>,
}

/// HTTP client for the agentscan API: one streaming conversation endpoint
/// plus cursor-paginated list endpoints.
#[derive(Clone)]
pub struct AgentscanClient {
    client: Client,
    config: Arc<ClientConfig>,
    tokens: Arc<dyn TokenProvider>,
}

impl AgentscanClient {
    /// No request timeout is configured: a streaming reply is open-ended and
    /// ends when the server closes the body.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
            tokens: Arc::new(StaticToken::anonymous()),
        })
    }

    pub fn with_tokens(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn team_id(&self) -> Option<&str> {
        self.config.team_id.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Start a conversation exchange. Returns the raw response so the caller
    /// can consume the body as a byte stream.
    pub async fn conversation(
        &self,
        request: &ConversationRequest<'_>,
    ) -> Result<reqwest::Response, ChatError> {
        let mut builder = self.client.post(self.url("/conversation")).json(request);
        if let Some(token) = self.tokens.access_token().await {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let response = builder.send().await?;
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::TOO_MANY_REQUESTS => {
                let body: RateLimitBody = response.json().await.unwrap_or_default();
                let kind = if body.error.as_deref() == Some(ANONYMOUS_QUOTA_ERROR) {
                    RateLimitKind::AnonymousQuota
                } else {
                    RateLimitKind::Other
                };
                Err(ChatError::RateLimited {
                    kind,
                    message: body
                        .message
                        .unwrap_or_else(|| "Please try again later".to_string()),
                })
            }
            status => Err(ChatError::Status(status)),
        }
    }

    async fn get_list(
        &self,
        path: &str,
        request: &PageRequest,
    ) -> Result<reqwest::Response, PageError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(cursor) = &request.cursor {
            query.push(("cursor", cursor.clone()));
        }
        if let Some(chain) = &request.chain {
            query.push(("chain", chain.clone()));
        }
        if let Some(agent_id) = &request.agent_id {
            query.push(("agentId", agent_id.clone()));
        }
        if !request.excluded_ids.is_empty() {
            query.push(("excludedIds", request.excluded_ids.join(",")));
        }

        tracing::debug!(path, cursor = ?request.cursor, "fetching page");
        let response = self.client.get(self.url(path)).query(&query).send().await?;
        match response.status() {
            status if status.is_success() => Ok(response),
            status => Err(PageError::Status(status)),
        }
    }

    pub async fn agents(&self, request: &PageRequest) -> Result<Page<AgentInstance>, PageError> {
        let body: AgentsEnvelope = self.get_list("/agents", request).await?.json().await?;
        Ok(Page {
            items: body.agents,
            next_cursor: body.next_cursor,
        })
    }

    pub async fn transactions(
        &self,
        request: &PageRequest,
    ) -> Result<Page<Transaction>, PageError> {
        let body: TransactionsEnvelope =
            self.get_list("/transactions", request).await?.json().await?;
        Ok(Page {
            items: body.transactions,
            next_cursor: body.next_cursor,
        })
    }

    pub async fn instances(
        &self,
        request: &PageRequest,
    ) -> Result<Page<AgentInstance>, PageError> {
        let body: InstancesEnvelope = self.get_list("/instance", request).await?.json().await?;
        Ok(Page {
            items: body.instances,
            next_cursor: body.next_cursor,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AgentsEnvelope {
    agents: Vec<AgentInstance>,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionsEnvelope {
    transactions: Vec<Transaction>,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstancesEnvelope {
    instances: Vec<AgentInstance>,
    #[serde(default)]
    next_cursor: Option<String>,
}

/// `/agents` as a paginator source.
pub struct AgentsSource {
    client: AgentscanClient,
}

impl AgentsSource {
    pub fn new(client: AgentscanClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for AgentsSource {
    type Item = AgentInstance;

    async fn fetch(&self, request: &PageRequest) -> Result<Page<AgentInstance>, PageError> {
        self.client.agents(request).await
    }
}

/// `/transactions` as a paginator source.
pub struct TransactionsSource {
    client: AgentscanClient,
}

impl TransactionsSource {
    pub fn new(client: AgentscanClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for TransactionsSource {
    type Item = Transaction;

    async fn fetch(&self, request: &PageRequest) -> Result<Page<Transaction>, PageError> {
        self.client.transactions(request).await
    }
}

/// `/instance` as a paginator source.
pub struct InstancesSource {
    client: AgentscanClient,
}

impl InstancesSource {
    pub fn new(client: AgentscanClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for InstancesSource {
    type Item = AgentInstance;

    async fn fetch(&self, request: &PageRequest) -> Result<Page<AgentInstance>, PageError> {
        self.client.instances(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_request_wire_shape() {
        let messages = vec![Message::user("What is an OLAS Agent?")];
        let request = ConversationRequest {
            question: "What is an OLAS Agent?",
            messages: &messages,
            team_id: Some("team-1"),
            kind: ChatKind::Agent,
            instance: Some("306"),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["question"], "What is an OLAS Agent?");
        assert_eq!(value["teamId"], "team-1");
        assert_eq!(value["type"], "agent");
        assert_eq!(value["instance"], "306");
        assert_eq!(value["messages"][0]["role"], "user");
    }

    #[test]
    fn test_conversation_request_omits_absent_fields() {
        let request = ConversationRequest {
            question: "hi",
            messages: &[],
            team_id: None,
            kind: ChatKind::General,
            instance: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["type"], "general");
        assert!(value.get("teamId").is_none());
        assert!(value.get("instance").is_none());
    }
}
