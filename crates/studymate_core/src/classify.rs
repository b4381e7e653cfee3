//! crates/studymate_core/src/classify.rs
//!
//! Classifies raw chat messages into their semantic kind: plain text, a
//! generated quiz, a flashcard set, or an evaluation result.
//!
//! Classification runs exactly once per message, at ingestion, and the same
//! function serves both the history-load path and the live-send path so the
//! two can never render the same payload differently.

use crate::domain::{ChatMessage, EvaluationResult, Question, Role};
use serde_json::Value;

/// The semantic kind of a classified message, carrying the typed payload.
///
/// A payload is present exactly when the kind is not `Text`; the enum makes
/// that invariant structural.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseKind {
    Text,
    Quiz(Vec<Question>),
    Flashcard(Vec<Question>),
    Evaluation(EvaluationResult),
}

impl ResponseKind {
    /// The question list for quiz and flashcard kinds, if any.
    pub fn questions(&self) -> Option<&[Question]> {
        match self {
            ResponseKind::Quiz(qs) | ResponseKind::Flashcard(qs) => Some(qs),
            _ => None,
        }
    }
}

/// A chat message plus its classification. Derived, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedMessage {
    pub message: ChatMessage,
    pub kind: ResponseKind,
    /// A short human summary shown in place of raw serialized data. Equal to
    /// the original content for plain text and evaluations.
    pub display_content: String,
}

/// Classifies a single chat message.
///
/// Pure function of its input. Malformed or unrecognized content always
/// falls open to plain text; classification can never fail visibly.
pub fn classify(message: ChatMessage) -> ClassifiedMessage {
    // User messages pass through unchanged.
    if message.role == Role::User {
        return as_text(message);
    }

    let parsed: Value = match serde_json::from_str(&message.content) {
        Ok(value) => value,
        // The common case: an ordinary assistant reply.
        Err(_) => return as_text(message),
    };

    match &parsed {
        Value::Array(elements) if !elements.is_empty() => {
            classify_tagged_list(message, &parsed, elements)
        }
        Value::Object(fields) => {
            let discriminator = fields.get("response_type").and_then(Value::as_str);
            match discriminator {
                Some("quiz") | Some("questions") => {
                    classify_question_object(message, fields, QuestionSet::Quiz)
                }
                Some("flashcard") => {
                    classify_question_object(message, fields, QuestionSet::Flashcard)
                }
                Some("evaluation") => classify_evaluation(message, &parsed),
                // Valid structured data, unrecognized shape.
                _ => as_text(message),
            }
        }
        _ => as_text(message),
    }
}

//=========================================================================================
// Branch Helpers
//=========================================================================================

#[derive(Clone, Copy)]
enum QuestionSet {
    Quiz,
    Flashcard,
}

impl QuestionSet {
    fn wrap(self, questions: Vec<Question>) -> ResponseKind {
        match self {
            QuestionSet::Quiz => ResponseKind::Quiz(questions),
            QuestionSet::Flashcard => ResponseKind::Flashcard(questions),
        }
    }

    fn summary(self, count: usize) -> String {
        match self {
            QuestionSet::Quiz => format!("Generated {count} quiz questions"),
            QuestionSet::Flashcard => format!("Generated {count} flashcards"),
        }
    }
}

fn as_text(message: ChatMessage) -> ClassifiedMessage {
    let display_content = message.content.clone();
    ClassifiedMessage {
        message,
        kind: ResponseKind::Text,
        display_content,
    }
}

/// A non-empty JSON array whose first element declares a tagged type. This
/// is the shape stored in history for generated quizzes and flashcards.
fn classify_tagged_list(
    message: ChatMessage,
    parsed: &Value,
    elements: &[Value],
) -> ClassifiedMessage {
    let set = match elements[0].get("type").and_then(Value::as_str) {
        Some("quiz") => QuestionSet::Quiz,
        Some("flashcard") => QuestionSet::Flashcard,
        _ => return as_text(message),
    };

    match serde_json::from_value::<Vec<Question>>(parsed.clone()) {
        Ok(questions) => {
            let display_content = set.summary(questions.len());
            ClassifiedMessage {
                message,
                kind: set.wrap(questions),
                display_content,
            }
        }
        Err(_) => as_text(message),
    }
}

/// A discriminator object carrying its questions in a `questions` field.
/// Only produced on the live-send path, but handled here all the same.
fn classify_question_object(
    message: ChatMessage,
    fields: &serde_json::Map<String, Value>,
    set: QuestionSet,
) -> ClassifiedMessage {
    let questions_value = fields
        .get("questions")
        .cloned()
        .unwrap_or(Value::Array(Vec::new()));

    match serde_json::from_value::<Vec<Question>>(questions_value) {
        Ok(questions) => {
            let display_content = set.summary(questions.len());
            ClassifiedMessage {
                message,
                kind: set.wrap(questions),
                display_content,
            }
        }
        Err(_) => as_text(message),
    }
}

fn classify_evaluation(message: ChatMessage, parsed: &Value) -> ClassifiedMessage {
    match serde_json::from_value::<EvaluationResult>(parsed.clone()) {
        Ok(result) => {
            // Evaluation rendering needs the full structure, not a summary.
            let display_content = message.content.clone();
            ClassifiedMessage {
                message,
                kind: ResponseKind::Evaluation(result),
                display_content,
            }
        }
        Err(_) => as_text(message),
    }
}

//=========================================================================================
// Tests
//=========================================================================================
