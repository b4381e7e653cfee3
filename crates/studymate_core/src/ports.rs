//! crates/studymate_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the backend the client talks
//! to. These traits form the boundary of the core: everything behind them
//! (HTTP, auth transport, file upload mechanics) is an opaque collaborator.

use async_trait::async_trait;
use crate::domain::{
    AccessToken, ChatMessage, ChatTurn, DocumentInfo, User, Workspace,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn signup(&self, email: &str, password: &str, full_name: &str) -> PortResult<User>;

    /// Exchanges credentials for a bearer token.
    async fn login(&self, email: &str, password: &str) -> PortResult<AccessToken>;

    async fn current_user(&self, token: &AccessToken) -> PortResult<User>;
}

#[async_trait]
pub trait WorkspaceService: Send + Sync {
    async fn list_workspaces(&self, token: &AccessToken) -> PortResult<Vec<Workspace>>;

    async fn create_workspace(
        &self,
        token: &AccessToken,
        name: &str,
        subject: &str,
    ) -> PortResult<Workspace>;

    async fn get_workspace(&self, token: &AccessToken, workspace_id: i64)
        -> PortResult<Workspace>;
}

#[async_trait]
pub trait DocumentService: Send + Sync {
    async fn upload_document(
        &self,
        token: &AccessToken,
        workspace_id: i64,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> PortResult<DocumentInfo>;

    async fn list_documents(
        &self,
        token: &AccessToken,
        workspace_id: i64,
    ) -> PortResult<Vec<DocumentInfo>>;
}

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Sends a message and returns the stored user/assistant pair. The
    /// assistant message's content may be a serialized quiz, flashcard, or
    /// evaluation payload; classification is the caller's concern.
    async fn send_message(
        &self,
        token: &AccessToken,
        workspace_id: i64,
        message: &str,
    ) -> PortResult<ChatTurn>;

    async fn history(
        &self,
        token: &AccessToken,
        workspace_id: i64,
        limit: usize,
    ) -> PortResult<Vec<ChatMessage>>;

    async fn clear_history(&self, token: &AccessToken, workspace_id: i64) -> PortResult<()>;
}
