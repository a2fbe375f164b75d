use futures::StreamExt;

use crate::chat::decode::StreamDecoder;
use crate::client::{AgentscanClient, ChatKind, ConversationRequest};
use crate::errors::ChatError;
use crate::events::ChatObserver;
use crate::models::message::{Message, Role};

/// Which conversation the session speaks for: the general explorer chat or a
/// specific agent instance.
pub struct ChatContext {
    pub kind: ChatKind,
    pub instance_id: Option<String>,
}

impl ChatContext {
    pub fn general() -> Self {
        Self {
            kind: ChatKind::General,
            instance_id: None,
        }
    }

    pub fn agent<S: Into<String>>(instance_id: S) -> Self {
        Self {
            kind: ChatKind::Agent,
            instance_id: Some(instance_id.into()),
        }
    }
}

/// A conversation transcript plus the machinery to extend it.
///
/// `submit` appends the user message optimistically, streams the assistant
/// reply into the tail of the transcript, and rolls the whole exchange back
/// if anything fails. At most one submit runs at a time; the loading flag is
/// the mutual exclusion, no lock involved.
pub struct ChatSession {
    client: AgentscanClient,
    context: ChatContext,
    messages: Vec<Message>,
    is_loading: bool,
    observer: Option<Box<dyn ChatObserver>>,
}

impl ChatSession {
    pub fn new(client: AgentscanClient, context: ChatContext) -> Self {
        Self {
            client,
            context,
            messages: Vec::new(),
            is_loading: false,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn ChatObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Content of the most recent assistant reply, if any.
    pub fn last_reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|message| message.role == Role::Assistant)
            .map(|message| message.content.as_str())
    }

    /// Send a question and stream the reply into the transcript.
    ///
    /// Rejects empty questions and concurrent submits. On any failure the
    /// transcript is exactly as it was before the call and the session stays
    /// usable; the loading flag clears on every exit path.
    pub async fn submit(&mut self, question: &str) -> Result<(), ChatError> {
        let question = question.trim().to_string();
        if question.is_empty() {
            return Err(ChatError::EmptyQuestion);
        }
        if self.is_loading {
            return Err(ChatError::Busy);
        }

        self.is_loading = true;
        let result = self.run_exchange(&question).await;
        self.is_loading = false;

        if let Err(error) = &result {
            self.notify(|observer| observer.on_error(error));
        }
        result
    }

    async fn run_exchange(&mut self, question: &str) -> Result<(), ChatError> {
        let checkpoint = self.messages.len();
        self.messages.push(Message::user(question));
        self.notify(|observer| observer.on_request_start(question));

        match self.stream_reply(question).await {
            Ok(()) => {
                let content = self.last_reply().unwrap_or_default().to_string();
                self.notify(|observer| observer.on_complete(&content));
                Ok(())
            }
            Err(error) => {
                // Snapshot-truncate rollback of the pending exchange.
                self.messages.truncate(checkpoint);
                Err(error)
            }
        }
    }

    async fn stream_reply(&mut self, question: &str) -> Result<(), ChatError> {
        let response = {
            let request = ConversationRequest {
                question,
                messages: &self.messages,
                team_id: self.client.team_id(),
                kind: self.context.kind,
                instance: self.context.instance_id.as_deref(),
            };
            self.client.conversation(&request).await?
        };

        self.messages.push(Message::assistant());

        let mut decoder = StreamDecoder::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            let deltas = decoder.push(&chunk)?;
            self.apply_deltas(&decoder, &deltas);
            if decoder.is_done() {
                break;
            }
        }
        let deltas = decoder.finish()?;
        self.apply_deltas(&decoder, &deltas);
        Ok(())
    }

    fn apply_deltas(&mut self, decoder: &StreamDecoder, deltas: &[String]) {
        if deltas.is_empty() {
            return;
        }
        // The visible message is set to the full accumulated content, never
        // appended, so replayed chunks cannot double-insert.
        if let Some(last) = self.messages.last_mut() {
            if last.role == Role::Assistant {
                last.content = decoder.content().to_string();
            }
        }
        for delta in deltas {
            self.notify(|observer| observer.on_chunk(delta, decoder.content()));
        }
    }

    fn notify(&self, f: impl FnOnce(&dyn ChatObserver)) {
        if let Some(observer) = &self.observer {
            f(observer.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;

    fn offline_session() -> ChatSession {
        let client = AgentscanClient::new(ClientConfig::new("http://127.0.0.1:9")).unwrap();
        ChatSession::new(client, ChatContext::general())
    }

    #[tokio::test]
    async fn test_empty_question_is_rejected_before_any_side_effect() {
        let mut session = offline_session();
        let err = session.submit("   ").await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyQuestion));
        assert!(session.messages().is_empty());
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_submit_while_loading_is_a_no_op() {
        let mut session = offline_session();
        session.is_loading = true;

        let err = session.submit("hello?").await.unwrap_err();
        assert!(matches!(err, ChatError::Busy));
        // The transcript is untouched and the in-flight request's flag is
        // not clobbered by the rejected call.
        assert!(session.messages().is_empty());
        assert!(session.is_loading());
    }

    #[tokio::test]
    async fn test_network_failure_rolls_back_and_clears_loading() {
        // Port 9 (discard) refuses connections, so the request itself fails.
        let mut session = offline_session();
        let err = session.submit("hello?").await.unwrap_err();
        assert!(matches!(err, ChatError::Http(_)));
        assert!(session.messages().is_empty());
        assert!(!session.is_loading());
    }
}
