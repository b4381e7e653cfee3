//! End-to-end flow over an in-memory backend: log in, open a workspace,
//! chat, receive a generated quiz, and run the session to completion.

use async_trait::async_trait;
use client_lib::chat::ChatView;
use client_lib::context::{AppContext, Services};
use client_lib::quiz_task::{FeedbackTiming, QuizRunner};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use studymate_core::classify::ResponseKind;
use studymate_core::domain::{
    AccessToken, ChatMessage, ChatTurn, DocumentInfo, Role, User, Workspace,
};
use studymate_core::ports::{
    AuthService, ChatService, DocumentService, PortError, PortResult, WorkspaceService,
};
use studymate_core::quiz::{QuizPhase, Submission};

const QUIZ_PAYLOAD: &str = r#"[
    {"type": "quiz", "question": "2+2?", "options": ["3", "4"], "correctAnswer": "4"},
    {"type": "quiz", "question": "Capital of France?", "options": ["Paris", "Lyon"], "correctAnswer": "Paris"},
    {"type": "quiz", "question": "Largest planet?", "options": ["Jupiter", "Mars"], "correctAnswer": "Jupiter"}
]"#;

/// A backend stand-in implementing every port against in-memory state.
struct FakeBackend {
    messages: Mutex<Vec<ChatMessage>>,
    next_id: Mutex<i64>,
}

impl FakeBackend {
    fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
        }
    }

    fn allocate_id(&self) -> i64 {
        let mut next = self.next_id.lock().unwrap();
        let id = *next;
        *next += 1;
        id
    }

    fn user() -> User {
        User {
            id: 1,
            email: "student@example.com".to_string(),
            full_name: "Studious Student".to_string(),
            is_active: true,
        }
    }

    fn workspace() -> Workspace {
        Workspace {
            id: 7,
            name: "Bio 101".to_string(),
            subject: "biology".to_string(),
            user_id: 1,
        }
    }
}

#[async_trait]
impl AuthService for FakeBackend {
    async fn signup(&self, email: &str, _password: &str, full_name: &str) -> PortResult<User> {
        Ok(User {
            email: email.to_string(),
            full_name: full_name.to_string(),
            ..Self::user()
        })
    }

    async fn login(&self, _email: &str, password: &str) -> PortResult<AccessToken> {
        if password == "correct horse" {
            Ok(AccessToken("token-123".to_string()))
        } else {
            Err(PortError::Unauthorized)
        }
    }

    async fn current_user(&self, token: &AccessToken) -> PortResult<User> {
        if token.as_str() == "token-123" {
            Ok(Self::user())
        } else {
            Err(PortError::Unauthorized)
        }
    }
}

#[async_trait]
impl WorkspaceService for FakeBackend {
    async fn list_workspaces(&self, _token: &AccessToken) -> PortResult<Vec<Workspace>> {
        Ok(vec![Self::workspace()])
    }

    async fn create_workspace(
        &self,
        _token: &AccessToken,
        name: &str,
        subject: &str,
    ) -> PortResult<Workspace> {
        Ok(Workspace {
            name: name.to_string(),
            subject: subject.to_string(),
            ..Self::workspace()
        })
    }

    async fn get_workspace(
        &self,
        _token: &AccessToken,
        workspace_id: i64,
    ) -> PortResult<Workspace> {
        if workspace_id == 7 {
            Ok(Self::workspace())
        } else {
            Err(PortError::NotFound(format!("workspace {workspace_id}")))
        }
    }
}

#[async_trait]
impl DocumentService for FakeBackend {
    async fn upload_document(
        &self,
        _token: &AccessToken,
        workspace_id: i64,
        file_name: &str,
        _bytes: Vec<u8>,
    ) -> PortResult<DocumentInfo> {
        Ok(DocumentInfo {
            id: self.allocate_id(),
            workspace_id,
            file_name: file_name.to_string(),
        })
    }

    async fn list_documents(
        &self,
        _token: &AccessToken,
        _workspace_id: i64,
    ) -> PortResult<Vec<DocumentInfo>> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl ChatService for FakeBackend {
    async fn send_message(
        &self,
        _token: &AccessToken,
        workspace_id: i64,
        message: &str,
    ) -> PortResult<ChatTurn> {
        let user_message = ChatMessage {
            id: self.allocate_id(),
            workspace_id,
            role: Role::User,
            content: message.to_string(),
        };
        // "Quiz me" produces a generated quiz; everything else echoes text.
        let content = if message.to_lowercase().contains("quiz") {
            QUIZ_PAYLOAD.to_string()
        } else {
            format!("You asked: {message}")
        };
        let ai_message = ChatMessage {
            id: self.allocate_id(),
            workspace_id,
            role: Role::Assistant,
            content,
        };

        let mut stored = self.messages.lock().unwrap();
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
        let stored = self.messages.lock().unwrap();
        Ok(stored.iter().rev().take(limit).rev().cloned().collect())
    }

    async fn clear_history(&self, _token: &AccessToken, _workspace_id: i64) -> PortResult<()> {
        self.messages.lock().unwrap().clear();
        Ok(())
    }
}

fn services(backend: &Arc<FakeBackend>) -> Services {
    Services {
        auth: backend.clone(),
        workspaces: backend.clone(),
        documents: backend.clone(),
        chat: backend.clone(),
    }
}

async fn logged_in_chat(backend: &Arc<FakeBackend>) -> ChatView {
    let mut context = AppContext::login(services(backend), "student@example.com", "correct horse")
        .await
        .expect("login should succeed");
    context.open_workspace(7).await.expect("workspace exists");
    let chat = context.chat_view(50).expect("workspace is open");
    context.logout();
    chat
}

#[tokio::test]
async fn bad_credentials_are_rejected_at_login() {
    let backend = Arc::new(FakeBackend::new());
    let err = AppContext::login(services(&backend), "student@example.com", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::Unauthorized));
}

#[tokio::test]
async fn chat_view_requires_an_open_workspace() {
    let backend = Arc::new(FakeBackend::new());
    let context = AppContext::login(services(&backend), "student@example.com", "correct horse")
        .await
        .unwrap();
    assert!(context.chat_view(50).is_err());
}

#[tokio::test(start_paused = true)]
async fn quiz_me_flow_from_chat_to_completed_session() {
    let backend = Arc::new(FakeBackend::new());
    let mut chat = logged_in_chat(&backend).await;

    chat.send("Tell me about cells").await.unwrap();
    chat.send("Quiz me on this topic!").await.unwrap();

    // The assistant reply classified as a quiz with the full question list.
    assert!(matches!(
        chat.latest_assistant_kind(),
        Some(ResponseKind::Quiz(_))
    ));
    let questions = chat.latest_question_set().unwrap().to_vec();
    assert_eq!(questions.len(), 3);

    // Run the session: right, wrong, right.
    let timing = FeedbackTiming {
        short: Duration::from_millis(10),
        long: Duration::from_millis(30),
    };
    let runner = QuizRunner::new(questions, timing);

    for answer in ["4", "Lyon", "Jupiter"] {
        let outcome = runner.submit(answer).await;
        assert!(matches!(outcome, Submission::Feedback { .. }));
        tokio::time::sleep(Duration::from_millis(40)).await;
    }

    let session = runner.session();
    let session = session.lock().await;
    assert_eq!(session.phase(), QuizPhase::Complete);
    assert_eq!(session.score(), 2);
    assert_eq!(session.percentage(), 67);
    assert_eq!(session.answered_correctly(), &[true, false, true]);
}

#[tokio::test]
async fn quiz_survives_a_history_reload_identically() {
    let backend = Arc::new(FakeBackend::new());
    let mut chat = logged_in_chat(&backend).await;

    chat.send("Quiz me please").await.unwrap();
    let live = chat.messages().last().unwrap().clone();

    let mut reloaded_chat = logged_in_chat(&backend).await;
    reloaded_chat.load_history().await.unwrap();
    let reloaded = reloaded_chat.messages().last().unwrap();

    assert_eq!(reloaded, &live);
    assert_eq!(
        reloaded_chat.latest_question_set().map(|q| q.len()),
        Some(3)
    );
}
