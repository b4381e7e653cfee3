//! crates/studymate_core/src/quiz.rs
//!
//! The quiz session state machine: walks an ordered question list, captures
//! answers, scores multiple-choice questions, and produces a per-question
//! review at the end.
//!
//! The session itself is synchronous and knows nothing about timers. After a
//! multiple-choice answer it parks in a feedback sub-state and reports how
//! long the feedback should stay visible as a [`FeedbackHold`]; whoever
//! drives the session (see the client's quiz runner) sleeps and then calls
//! [`QuizSession::advance`]. The advance always happens after the feedback
//! state has been observable, never before.

use crate::domain::Question;
use uuid::Uuid;

/// How long feedback should remain visible before the session advances.
///
/// Wrong answers hold longer so the user can study the correct answer. The
/// wall-clock durations belong to the driving layer, not to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackHold {
    /// After a correct answer.
    Short,
    /// After an incorrect answer.
    Long,
}

/// The externally visible phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    InProgress,
    Complete,
}

/// The outcome of a submit or continue call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Empty answer, wrong sub-state, or session already complete. No state
    /// changed.
    Ignored,
    /// A multiple-choice answer was recorded; the session is showing
    /// feedback and waits for [`QuizSession::advance`].
    Feedback { correct: bool, hold: FeedbackHold },
    /// A free-text answer was recorded and the session advanced immediately.
    Advanced,
}

/// One entry of the end-of-session review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewItem<'a> {
    pub question: &'a Question,
    pub user_answer: &'a str,
    /// `None` for free-text questions, which have no canonical correctness.
    pub verdict: Option<bool>,
    /// The declared correct answer, for multiple-choice questions.
    pub correct_answer: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    AwaitingAnswer,
    ShowingFeedback { correct: bool },
    Complete,
}

/// A single in-memory quiz session over a fixed question list.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    questions: Vec<Question>,
    current_index: usize,
    score: u32,
    answered_correctly: Vec<bool>,
    user_answers: Vec<String>,
    step: Step,
}

impl QuizSession {
    /// Starts a session over `questions`.
    ///
    /// An empty list yields a degenerate, already-complete session with a
    /// 0/0 score rather than an error.
    pub fn start(questions: Vec<Question>) -> Self {
        let step = if questions.is_empty() {
            Step::Complete
        } else {
            Step::AwaitingAnswer
        };
        Self {
            id: Uuid::new_v4(),
            questions,
            current_index: 0,
            score: 0,
            answered_correctly: Vec::new(),
            user_answers: Vec::new(),
            step,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn answered_correctly(&self) -> &[bool] {
        &self.answered_correctly
    }

    pub fn user_answers(&self) -> &[String] {
        &self.user_answers
    }

    pub fn phase(&self) -> QuizPhase {
        match self.step {
            Step::Complete => QuizPhase::Complete,
            _ => QuizPhase::InProgress,
        }
    }

    /// True while feedback for the last answer is on display and the
    /// session has not advanced yet.
    pub fn is_showing_feedback(&self) -> bool {
        matches!(self.step, Step::ShowingFeedback { .. })
    }

    /// The question currently awaiting an answer or showing feedback.
    pub fn current_question(&self) -> Option<&Question> {
        match self.step {
            Step::Complete => None,
            _ => self.questions.get(self.current_index),
        }
    }

    /// Submits an answer for the current question.
    ///
    /// Multiple-choice questions are scored by exact string equality against
    /// the declared correct answer and leave the session in the feedback
    /// sub-state. Free-text questions delegate to
    /// [`QuizSession::continue_free_text`]. Empty answers and calls outside
    /// the awaiting-answer sub-state are no-ops.
    pub fn submit_answer(&mut self, answer: &str) -> Submission {
        if self.step != Step::AwaitingAnswer || answer.trim().is_empty() {
            return Submission::Ignored;
        }

        let question = &self.questions[self.current_index];
        if !question.is_multiple_choice() {
            return self.continue_free_text(answer);
        }

        let correct = question.correct_answer() == Some(answer);
        self.answered_correctly.push(correct);
        self.user_answers.push(answer.to_string());
        if correct {
            self.score += 1;
        }
        self.step = Step::ShowingFeedback { correct };

        let hold = if correct {
            FeedbackHold::Short
        } else {
            FeedbackHold::Long
        };
        Submission::Feedback { correct, hold }
    }

    /// Records a free-text answer and advances immediately. Free-text
    /// questions are never auto-scored; correctness is left to server-side
    /// evaluation in the surrounding flow.
    pub fn continue_free_text(&mut self, answer: &str) -> Submission {
        if self.step != Step::AwaitingAnswer || answer.trim().is_empty() {
            return Submission::Ignored;
        }

        self.answered_correctly.push(false);
        self.user_answers.push(answer.to_string());
        self.move_to_next();
        Submission::Advanced
    }

    /// Leaves the feedback sub-state and moves to the next question, or to
    /// completion after the last one. A no-op unless feedback is showing, so
    /// a stale timer can never advance a session that was restarted in the
    /// meantime.
    pub fn advance(&mut self) -> bool {
        if !self.is_showing_feedback() {
            return false;
        }
        self.move_to_next();
        true
    }

    /// Resets to the initial state over the same question list.
    pub fn restart(&mut self) {
        self.current_index = 0;
        self.score = 0;
        self.answered_correctly.clear();
        self.user_answers.clear();
        self.step = if self.questions.is_empty() {
            Step::Complete
        } else {
            Step::AwaitingAnswer
        };
    }

    /// The final score as a rounded percentage. 0 for an empty session.
    pub fn percentage(&self) -> u32 {
        if self.questions.is_empty() {
            return 0;
        }
        (self.score as f64 / self.questions.len() as f64 * 100.0).round() as u32
    }

    /// The per-question review for every answered question, in order.
    pub fn review(&self) -> Vec<ReviewItem<'_>> {
        self.questions
            .iter()
            .zip(self.answered_correctly.iter())
            .zip(self.user_answers.iter())
            .map(|((question, &correct), user_answer)| {
                let multiple_choice = question.is_multiple_choice();
                ReviewItem {
                    question,
                    user_answer,
                    verdict: multiple_choice.then_some(correct),
                    correct_answer: if multiple_choice {
                        question.correct_answer()
                    } else {
                        None
                    },
                }
            })
            .collect()
    }

    fn move_to_next(&mut self) {
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.step = Step::AwaitingAnswer;
        } else {
            self.step = Step::Complete;
        }
    }
}

//=========================================================================================
// Tests
//=========================================================================================
