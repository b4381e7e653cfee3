pub mod adapters;
pub mod chat;
pub mod config;
pub mod context;
pub mod error;
pub mod quiz_task;

pub use chat::ChatView;
pub use config::Config;
pub use context::{AppContext, Services};
pub use error::ClientError;
pub use quiz_task::{FeedbackTiming, QuizRunner};
