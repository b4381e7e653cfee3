//! crates/studymate_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs mirror the backend wire shapes but carry no transport
//! or rendering concerns.

use serde::{Deserialize, Serialize};

/// The author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single chat message, as stored by the backend.
///
/// Server-assigned ids are positive. Messages shown optimistically before
/// the server has confirmed them use negative temporary ids (see
/// [`ChatMessage::temporary_id`]), so the two ranges can never collide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub workspace_id: i64,
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Derives a temporary id for optimistic display from a millisecond
    /// timestamp. Always negative.
    pub fn temporary_id() -> i64 {
        -chrono::Utc::now().timestamp_millis().abs()
    }
}

/// The result of one send-message round trip: the stored user message and
/// the assistant's reply, both with server-assigned ids.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatTurn {
    pub workspace_id: i64,
    pub user_message: ChatMessage,
    pub ai_message: ChatMessage,
    pub subject: Option<String>,
}

// Represents a user - used throughout the app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
}

/// A user-scoped container associating uploaded documents and chat history
/// with one subject of study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: i64,
    pub name: String,
    pub subject: String,
    pub user_id: i64,
}

/// Metadata for a document uploaded into a workspace.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentInfo {
    pub id: i64,
    pub workspace_id: i64,
    pub file_name: String,
}

/// A bearer token obtained at login. Wrapped so it cannot be confused with
/// other strings at the port boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(pub String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//=========================================================================================
// Generated Question Payloads
//=========================================================================================

/// One element of a generated quiz or flashcard set.
///
/// The backend emits these as JSON objects tagged by a `type` field, so the
/// enum deserializes directly from the stored message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Question {
    Quiz {
        question: String,
        #[serde(default)]
        options: Vec<String>,
        // camelCase on the wire, matching the generator's output schema.
        #[serde(rename = "correctAnswer", default)]
        correct_answer: Option<String>,
    },
    Flashcard {
        front: String,
        back: String,
        #[serde(default)]
        category: String,
    },
}

impl Question {
    /// The question text or card-front text.
    pub fn prompt(&self) -> &str {
        match self {
            Question::Quiz { question, .. } => question,
            Question::Flashcard { front, .. } => front,
        }
    }

    /// Candidate answers for a multiple-choice question. Empty for
    /// flashcards and free-text questions.
    pub fn options(&self) -> &[String] {
        match self {
            Question::Quiz { options, .. } => options,
            Question::Flashcard { .. } => &[],
        }
    }

    /// The declared correct answer, when one exists.
    pub fn correct_answer(&self) -> Option<&str> {
        match self {
            Question::Quiz { correct_answer, .. } => correct_answer.as_deref(),
            Question::Flashcard { back, .. } => Some(back),
        }
    }

    /// A question with an empty options list is always free-text, even if a
    /// correct answer is present. Scoring relies on this.
    pub fn is_multiple_choice(&self) -> bool {
        !self.options().is_empty()
    }
}

//=========================================================================================
// Evaluation Payloads
//=========================================================================================

/// One scored assessment of a free-text answer against a reference answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationItem {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub user_answer: String,
    #[serde(default)]
    pub correct_answer: String,
    /// A fraction in [0, 1]. The raw value is preserved; display tiers are
    /// derived from it (see the `evaluation` module).
    pub score: f64,
    #[serde(default)]
    pub evaluation: String,
    #[serde(default)]
    pub feedback: String,
}

/// The batch evaluation shape the backend emits, wrapping one item per
/// evaluated answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    #[serde(alias = "items")]
    pub evaluations: Vec<EvaluationItem>,
    #[serde(default)]
    pub overall_score: f64,
    #[serde(default)]
    pub total_questions: u32,
}

/// An evaluation payload in either of the two shapes the backend has been
/// observed to produce.
///
/// The canonical shape is `Batch` (the backend wraps even a single
/// evaluation as a batch-of-one); a bare `Single` item still parses, since
/// the two schemas share no discriminator beyond the nested list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EvaluationResult {
    Batch(EvaluationReport),
    Single(EvaluationItem),
}
