pub mod classify;
pub mod domain;
pub mod evaluation;
pub mod ports;
pub mod quiz;

pub use classify::{classify, ClassifiedMessage, ResponseKind};
pub use domain::{
    AccessToken, ChatMessage, ChatTurn, DocumentInfo, EvaluationItem, EvaluationReport,
    EvaluationResult, Question, Role, User, Workspace,
};
pub use evaluation::{Presentation, ScoreTier};
pub use ports::{AuthService, ChatService, DocumentService, PortError, PortResult, WorkspaceService};
pub use quiz::{FeedbackHold, QuizPhase, QuizSession, ReviewItem, Submission};
