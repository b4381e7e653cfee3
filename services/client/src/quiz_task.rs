//! services/client/src/quiz_task.rs
//!
//! Drives a `QuizSession` through its feedback-display delays.
//!
//! The core session parks in a feedback sub-state after each multiple-choice
//! answer and waits for an explicit `advance`. The runner owns that timing:
//! it sleeps the configured hold and then advances, racing a
//! `CancellationToken` so a restart or teardown invalidates any advance that
//! is still pending.

use std::sync::Mutex as StdMutex;
use std::sync::Arc;
use std::time::Duration;
use studymate_core::domain::Question;
use studymate_core::quiz::{FeedbackHold, QuizSession, Submission};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Wall-clock feedback hold lengths. Incorrect answers stay on screen
/// longer so the user can study the correct answer.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackTiming {
    pub short: Duration,
    pub long: Duration,
}

impl Default for FeedbackTiming {
    fn default() -> Self {
        Self {
            short: Duration::from_millis(600),
            long: Duration::from_millis(1500),
        }
    }
}

impl FeedbackTiming {
    /// The wall-clock duration for a hold.
    pub fn duration_for(&self, hold: FeedbackHold) -> Duration {
        match hold {
            FeedbackHold::Short => self.short,
            FeedbackHold::Long => self.long,
        }
    }
}

/// A quiz session plus its pending-advance timer.
pub struct QuizRunner {
    session: Arc<Mutex<QuizSession>>,
    timing: FeedbackTiming,
    pending: StdMutex<CancellationToken>,
}

impl QuizRunner {
    pub fn new(questions: Vec<Question>, timing: FeedbackTiming) -> Self {
        Self {
            session: Arc::new(Mutex::new(QuizSession::start(questions))),
            timing,
            pending: StdMutex::new(CancellationToken::new()),
        }
    }

    /// The shared session, for reading state and rendering.
    pub fn session(&self) -> Arc<Mutex<QuizSession>> {
        Arc::clone(&self.session)
    }

    /// Submits an answer. When the session enters the feedback sub-state, an
    /// advance is scheduled for after the matching hold.
    pub async fn submit(&self, answer: &str) -> Submission {
        let outcome = self.session.lock().await.submit_answer(answer);
        if let Submission::Feedback { hold, .. } = outcome {
            self.schedule_advance(hold);
        }
        outcome
    }

    /// Records a free-text answer; advances immediately, no timer involved.
    pub async fn continue_free_text(&self, answer: &str) -> Submission {
        self.session.lock().await.continue_free_text(answer)
    }

    /// Restarts the session. Any advance still pending from the previous
    /// run is cancelled first, so a stale timer can never move the fresh
    /// session forward.
    pub async fn restart(&self) {
        self.cancel_pending();
        self.session.lock().await.restart();
        debug!("quiz session restarted");
    }

    fn schedule_advance(&self, hold: FeedbackHold) {
        let delay = self.timing.duration_for(hold);
        let token = self.pending.lock().expect("pending lock poisoned").clone();
        let session = Arc::clone(&self.session);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    session.lock().await.advance();
                }
            }
        });
    }

    fn cancel_pending(&self) {
        let mut pending = self.pending.lock().expect("pending lock poisoned");
        pending.cancel();
        *pending = CancellationToken::new();
    }
}

impl Drop for QuizRunner {
    fn drop(&mut self) {
        // Teardown invalidates any timer still in flight.
        if let Ok(pending) = self.pending.lock() {
            pending.cancel();
        }
    }
}

//=========================================================================================
// Tests
//=========================================================================================
