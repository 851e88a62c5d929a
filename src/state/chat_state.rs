//! Conversation session state.

use crate::api::BackendApi;
use crate::error::Result;
use crate::relevance::{ContextRelevance, KeywordRelevance};
use crate::state::AssistantContext;

/// Greeting seeded into every fresh session.
pub const GREETING: &str =
    "Olá! 👋 Sou seu assistente de value betting. Como posso ajudar você hoje?";

/// Assistant reply shown when an exchange fails. The failure is absorbed
/// here; it never propagates past the session.
pub const FALLBACK_REPLY: &str = "Desculpe, ocorreu um erro. Tente novamente. 😔";

/// Suggested starter questions, offered while the log holds only the
/// greeting.
pub const QUICK_QUESTIONS: [&str; 4] = [
    "O que é EV?",
    "Quais os jogos de hoje?",
    "Como funciona a gestão de banca?",
    "Vale a pena fazer múltiplas?",
];

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// A single chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Session exchange state.
///
/// `Sending` doubles as the mutual-exclusion guard: a second send while one
/// is in flight is silently ignored, so at most one exchange is ever open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Sending,
}

/// The conversation session.
///
/// Owns the ordered, append-only message log and the context snapshot, and
/// orchestrates the send/receive exchange. Messages are appended strictly in
/// causal order: a user message always precedes its assistant reply.
#[derive(Debug)]
pub struct ChatSession {
    messages: Vec<Message>,
    state: SessionState,
    context: Option<AssistantContext>,
    relevance: Box<dyn ContextRelevance>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// Create a session with the default keyword relevance predicate.
    pub fn new() -> Self {
        Self::with_relevance(Box::new(KeywordRelevance::default()))
    }

    /// Create a session with an injected relevance predicate.
    pub fn with_relevance(relevance: Box<dyn ContextRelevance>) -> Self {
        Self {
            messages: vec![Message::assistant(GREETING)],
            state: SessionState::Idle,
            context: None,
            relevance,
        }
    }

    /// The message log, in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Current exchange state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether an exchange is in flight.
    pub fn is_sending(&self) -> bool {
        self.state == SessionState::Sending
    }

    /// The held context snapshot, if one was built.
    pub fn context(&self) -> Option<&AssistantContext> {
        self.context.as_ref()
    }

    /// Replace the held context snapshot.
    pub fn set_context(&mut self, context: AssistantContext) {
        self.context = Some(context);
    }

    /// Whether only the seeded greeting is in the log.
    pub fn is_fresh(&self) -> bool {
        self.messages.len() == 1
    }

    /// Accept a message for sending.
    ///
    /// Returns `None` (a no-op, not an error) when the text is
    /// empty/whitespace or an exchange is already in flight. Otherwise
    /// appends the user message, enters `Sending`, and returns whether the
    /// context snapshot should accompany the request.
    pub fn begin_send(&mut self, text: &str) -> Option<bool> {
        let text = text.trim();
        if text.is_empty() || self.is_sending() {
            return None;
        }

        self.messages.push(Message::user(text));
        self.state = SessionState::Sending;
        Some(self.relevance.is_relevant(text))
    }

    /// Close the in-flight exchange.
    ///
    /// A successful reply is appended as-is; a failure is absorbed into the
    /// fixed fallback reply. Either way the session returns to `Idle`, so
    /// every user message ends up paired with exactly one assistant message.
    pub fn complete_send(&mut self, reply: Result<String>) {
        let content = match reply {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("chat exchange failed: {e}");
                FALLBACK_REPLY.to_string()
            }
        };

        self.messages.push(Message::assistant(content));
        self.state = SessionState::Idle;
    }

    /// Run a full exchange against the backend.
    pub async fn send(&mut self, api: &dyn BackendApi, text: &str) {
        let Some(attach_context) = self.begin_send(text) else {
            return;
        };

        let context = if attach_context {
            self.context.clone()
        } else {
            None
        };
        let reply = api.send_message(text.trim(), context).await;
        self.complete_send(reply);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBackendApi;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn context() -> AssistantContext {
        AssistantContext {
            bankroll: dec!(150.00),
            phase: 1,
            opportunities: Vec::new(),
            multiples: Vec::new(),
            stats: Default::default(),
        }
    }

    #[test]
    fn test_fresh_session_is_seeded() {
        let session = ChatSession::new();
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0], Message::assistant(GREETING));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.is_fresh());
    }

    #[test]
    fn test_begin_send_rejects_blank_input() {
        let mut session = ChatSession::new();
        assert_eq!(session.begin_send(""), None);
        assert_eq!(session.begin_send("   \n\t"), None);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_begin_send_guards_reentrancy() {
        let mut session = ChatSession::new();
        assert!(session.begin_send("olá").is_some());
        assert_eq!(session.state(), SessionState::Sending);

        let before = session.messages().len();
        assert_eq!(session.begin_send("outra"), None);
        assert_eq!(session.messages().len(), before);
    }

    #[test]
    fn test_begin_send_trims_and_appends() {
        let mut session = ChatSession::new();
        session.begin_send("  olá  ");
        assert_eq!(session.messages()[1], Message::user("olá"));
    }

    #[test]
    fn test_relevance_decides_context_attachment() {
        let mut session = ChatSession::new();
        assert_eq!(session.begin_send("Quais os jogos de hoje?"), Some(true));
        session.complete_send(Ok("resposta".to_string()));
        assert_eq!(session.begin_send("Oi, tudo bem?"), Some(false));
    }

    #[test]
    fn test_complete_send_absorbs_failure() {
        let mut session = ChatSession::new();
        session.begin_send("olá");
        session.complete_send(Err(Error::backend("boom")));

        assert_eq!(session.state(), SessionState::Idle);
        let last = session.messages().last().unwrap();
        assert_eq!(last, &Message::assistant(FALLBACK_REPLY));
    }

    #[tokio::test]
    async fn test_send_failure_grows_log_by_two_and_idles() {
        let mut api = MockBackendApi::new();
        api.expect_send_message()
            .returning(|_, _| Err(Error::backend("connection refused")));

        let mut session = ChatSession::new();
        session.send(&api, "olá").await;

        // Greeting + user + fallback assistant.
        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.messages()[1], Message::user("olá"));
        assert_eq!(session.messages()[2], Message::assistant(FALLBACK_REPLY));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_send_attaches_context_when_relevant() {
        let mut api = MockBackendApi::new();
        api.expect_send_message()
            .withf(|text, context| text == "Quais os jogos de hoje?" && context.is_some())
            .returning(|_, _| Ok("Hoje temos 3 jogos.".to_string()));

        let mut session = ChatSession::new();
        session.set_context(context());
        session.send(&api, "Quais os jogos de hoje?").await;

        assert_eq!(
            session.messages().last().unwrap(),
            &Message::assistant("Hoje temos 3 jogos.")
        );
    }

    #[tokio::test]
    async fn test_send_omits_context_when_irrelevant() {
        let mut api = MockBackendApi::new();
        api.expect_send_message()
            .withf(|_, context| context.is_none())
            .returning(|_, _| Ok("Oi!".to_string()));

        let mut session = ChatSession::new();
        session.set_context(context());
        session.send(&api, "Oi, tudo bem?").await;
        assert_eq!(session.messages().len(), 3);
    }

    #[tokio::test]
    async fn test_send_without_context_sends_none() {
        let mut api = MockBackendApi::new();
        api.expect_send_message()
            .withf(|_, context| context.is_none())
            .returning(|_, _| Ok("resposta".to_string()));

        // Relevant question, but no snapshot was ever built.
        let mut session = ChatSession::new();
        session.send(&api, "Quais os jogos de hoje?").await;
        assert_eq!(session.state(), SessionState::Idle);
    }
}
