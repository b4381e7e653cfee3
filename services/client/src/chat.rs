//! services/client/src/chat.rs
//!
//! The chat view controller for one workspace: loads history, sends messages
//! with optimistic display, and keeps every message classified.
//!
//! Classification happens exactly once per message, right when it enters the
//! list. The history-load path and the live-send path go through the same
//! `classify` function, so a freshly generated quiz and the same quiz
//! reloaded later can never render differently.

use std::sync::Arc;
use studymate_core::classify::{classify, ClassifiedMessage, ResponseKind};
use studymate_core::domain::{AccessToken, ChatMessage, Question, Role};
use studymate_core::ports::{ChatService, PortResult};
use tracing::{debug, warn};

/// The message list of one open workspace.
pub struct ChatView {
    chat: Arc<dyn ChatService>,
    token: AccessToken,
    workspace_id: i64,
    history_limit: usize,
    messages: Vec<ClassifiedMessage>,
}

impl ChatView {
    pub fn new(
        chat: Arc<dyn ChatService>,
        token: AccessToken,
        workspace_id: i64,
        history_limit: usize,
    ) -> Self {
        Self {
            chat,
            token,
            workspace_id,
            history_limit,
            messages: Vec::new(),
        }
    }

    pub fn workspace_id(&self) -> i64 {
        self.workspace_id
    }

    pub fn messages(&self) -> &[ClassifiedMessage] {
        &self.messages
    }

    /// Replaces the list with freshly classified history.
    pub async fn load_history(&mut self) -> PortResult<()> {
        let history = self
            .chat
            .history(&self.token, self.workspace_id, self.history_limit)
            .await?;
        debug!(count = history.len(), "loaded chat history");
        self.messages = history.into_iter().map(classify).collect();
        Ok(())
    }

    /// Sends a message.
    ///
    /// The user message is appended immediately with a temporary id for
    /// instant feedback; on success it is replaced by the confirmed pair
    /// from the server, on failure it is removed again so a failed send
    /// leaves the list exactly as it was.
    pub async fn send(&mut self, text: &str) -> PortResult<()> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let optimistic = classify(ChatMessage {
            id: ChatMessage::temporary_id(),
            workspace_id: self.workspace_id,
            role: Role::User,
            content: text.to_string(),
        });
        self.messages.push(optimistic);

        match self
            .chat
            .send_message(&self.token, self.workspace_id, text)
            .await
        {
            Ok(turn) => {
                // Reconcile: swap the optimistic entry for the stored one,
                // then append the classified assistant reply.
                self.messages.pop();
                self.messages.push(classify(turn.user_message));
                self.messages.push(classify(turn.ai_message));
                Ok(())
            }
            Err(e) => {
                warn!("send failed, rolling back optimistic message: {e}");
                self.messages.pop();
                Err(e)
            }
        }
    }

    pub async fn clear(&mut self) -> PortResult<()> {
        self.chat.clear_history(&self.token, self.workspace_id).await?;
        self.messages.clear();
        Ok(())
    }

    /// The most recently generated quiz or flashcard set, for starting a
    /// session from it.
    pub fn latest_question_set(&self) -> Option<&[Question]> {
        self.messages
            .iter()
            .rev()
            .find_map(|m| m.kind.questions())
            .filter(|qs| !qs.is_empty())
    }

    /// The classification of the newest assistant message, if any.
    pub fn latest_assistant_kind(&self) -> Option<&ResponseKind> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.message.role == Role::Assistant)
            .map(|m| &m.kind)
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use studymate_core::domain::ChatTurn;
    use studymate_core::ports::PortError;

    /// An in-memory stand-in for the chat port. Stores messages like the
    /// backend would and can be switched into a failing mode.
    struct FakeChat {
        stored: Mutex<Vec<ChatMessage>>,
        reply_content: Mutex<String>,
        fail_next_send: Mutex<bool>,
    }

    impl FakeChat {
        fn new() -> Self {
            Self {
                stored: Mutex::new(Vec::new()),
                reply_content: Mutex::new("Hello! Ask me anything.".to_string()),
                fail_next_send: Mutex::new(false),
            }
        }

        fn set_reply(&self, content: &str) {
            *self.reply_content.lock().unwrap() = content.to_string();
        }

        fn fail_next_send(&self) {
            *self.fail_next_send.lock().unwrap() = true;
        }
    }

    #[async_trait]
    impl ChatService for FakeChat {
        async fn send_message(
            &self,
            _token: &AccessToken,
            workspace_id: i64,
            message: &str,
        ) -> PortResult<ChatTurn> {
            if std::mem::take(&mut *self.fail_next_send.lock().unwrap()) {
                return Err(PortError::Unexpected("backend down".to_string()));
            }

            let mut stored = self.stored.lock().unwrap();
            let next_id = stored.len() as i64 + 1;
            let user_message = ChatMessage {
                id: next_id,
                workspace_id,
                role: Role::User,
                content: message.to_string(),
            };
            let ai_message = ChatMessage {
                id: next_id + 1,
                workspace_id,
                role: Role::Assistant,
                content: self.reply_content.lock().unwrap().clone(),
            };
            stored.push(user_message.clone());
            stored.push(ai_message.clone());

            Ok(ChatTurn {
                workspace_id,
                user_message,
                ai_message,
                subject: Some("biology".to_string()),
            })
        }

        async fn history(
            &self,
            _token: &AccessToken,
            _workspace_id: i64,
            limit: usize,
        ) -> PortResult<Vec<ChatMessage>> {
            let stored = self.stored.lock().unwrap();
            Ok(stored.iter().rev().take(limit).rev().cloned().collect())
        }

        async fn clear_history(
            &self,
            _token: &AccessToken,
            _workspace_id: i64,
        ) -> PortResult<()> {
            self.stored.lock().unwrap().clear();
            Ok(())
        }
    }

    fn view(chat: Arc<FakeChat>) -> ChatView {
        ChatView::new(chat, AccessToken("test-token".to_string()), 7, 50)
    }

    const QUIZ_JSON: &str = r#"[
        {"type": "quiz", "question": "2+2?", "options": ["3", "4"], "correctAnswer": "4"}
    ]"#;

    #[tokio::test]
    async fn send_replaces_optimistic_message_with_confirmed_pair() {
        let chat = Arc::new(FakeChat::new());
        let mut view = view(chat);

        view.send("What is osmosis?").await.unwrap();

        assert_eq!(view.messages().len(), 2);
        let user = &view.messages()[0];
        assert_eq!(user.message.role, Role::User);
        assert!(user.message.id > 0, "optimistic id must be reconciled");
        assert_eq!(view.messages()[1].message.role, Role::Assistant);
    }

    #[tokio::test]
    async fn failed_send_leaves_the_list_untouched() {
        let chat = Arc::new(FakeChat::new());
        let mut view = view(chat.clone());
        view.send("first").await.unwrap();
        let before = view.messages().to_vec();

        chat.fail_next_send();
        let err = view.send("second").await.unwrap_err();
        assert!(matches!(err, PortError::Unexpected(_)));
        assert_eq!(view.messages(), before.as_slice());
    }

    #[tokio::test]
    async fn empty_input_is_a_no_op() {
        let chat = Arc::new(FakeChat::new());
        let mut view = view(chat);
        view.send("   ").await.unwrap();
        assert!(view.messages().is_empty());
    }

    #[tokio::test]
    async fn live_send_and_history_reload_classify_identically() {
        let chat = Arc::new(FakeChat::new());
        chat.set_reply(QUIZ_JSON);
        let mut view = view(chat.clone());

        view.send("Quiz me on arithmetic").await.unwrap();
        let live = view.messages().last().unwrap().clone();
        match &live.kind {
            ResponseKind::Quiz(questions) => assert_eq!(questions.len(), 1),
            other => panic!("expected quiz, got {other:?}"),
        }
        assert_eq!(live.display_content, "Generated 1 quiz questions");

        // Reload from "storage" and compare the classification.
        view.load_history().await.unwrap();
        let reloaded = view.messages().last().unwrap();
        assert_eq!(reloaded, &live);
    }

    #[tokio::test]
    async fn latest_question_set_finds_the_newest_payload() {
        let chat = Arc::new(FakeChat::new());
        let mut view = view(chat.clone());

        view.send("hello").await.unwrap();
        assert!(view.latest_question_set().is_none());

        chat.set_reply(QUIZ_JSON);
        view.send("Quiz me").await.unwrap();
        let questions = view.latest_question_set().unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].prompt(), "2+2?");
    }

    #[tokio::test]
    async fn clear_empties_both_sides() {
        let chat = Arc::new(FakeChat::new());
        let mut view = view(chat.clone());
        view.send("hello").await.unwrap();

        view.clear().await.unwrap();
        assert!(view.messages().is_empty());
        view.load_history().await.unwrap();
        assert!(view.messages().is_empty());
    }
}
