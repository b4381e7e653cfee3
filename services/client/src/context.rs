//! services/client/src/context.rs
//!
//! The explicit application context: who is logged in, with what token, and
//! which workspace is open. Created on successful login and torn down on
//! logout; there is no module-level session state anywhere in the client.

use std::sync::Arc;
use studymate_core::domain::{AccessToken, DocumentInfo, User, Workspace};
use studymate_core::ports::{
    AuthService, ChatService, DocumentService, PortError, PortResult, WorkspaceService,
};
use tracing::info;

use crate::chat::ChatView;

/// The backend service handles, created once at startup and shared by every
/// component that needs them.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub workspaces: Arc<dyn WorkspaceService>,
    pub documents: Arc<dyn DocumentService>,
    pub chat: Arc<dyn ChatService>,
}

/// An authenticated session: the logged-in user, their token, and the
/// currently open workspace, if any.
pub struct AppContext {
    services: Services,
    user: User,
    token: AccessToken,
    current_workspace: Option<Workspace>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("user", &self.user)
            .field("current_workspace", &self.current_workspace)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Logs in and builds the context. This is the only way to obtain one.
    pub async fn login(services: Services, email: &str, password: &str) -> PortResult<Self> {
        let token = services.auth.login(email, password).await?;
        let user = services.auth.current_user(&token).await?;
        info!(user = %user.email, "logged in");
        Ok(Self {
            services,
            user,
            token,
            current_workspace: None,
        })
    }

    /// Tears the session down. The token and user leave scope with the
    /// context; nothing survives for the next login to trip over.
    pub fn logout(self) {
        info!(user = %self.user.email, "logged out");
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn current_workspace(&self) -> Option<&Workspace> {
        self.current_workspace.as_ref()
    }

    pub async fn list_workspaces(&self) -> PortResult<Vec<Workspace>> {
        self.services.workspaces.list_workspaces(&self.token).await
    }

    pub async fn create_workspace(&mut self, name: &str, subject: &str) -> PortResult<&Workspace> {
        let workspace = self
            .services
            .workspaces
            .create_workspace(&self.token, name, subject)
            .await?;
        info!(workspace = %workspace.name, "created workspace");
        Ok(self.current_workspace.insert(workspace))
    }

    /// Opens a workspace by id, making it current.
    pub async fn open_workspace(&mut self, workspace_id: i64) -> PortResult<&Workspace> {
        let workspace = self
            .services
            .workspaces
            .get_workspace(&self.token, workspace_id)
            .await?;
        Ok(self.current_workspace.insert(workspace))
    }

    /// Uploads a document into the current workspace.
    pub async fn upload_document(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> PortResult<DocumentInfo> {
        let workspace = self.require_workspace()?;
        self.services
            .documents
            .upload_document(&self.token, workspace.id, file_name, bytes)
            .await
    }

    pub async fn list_documents(&self) -> PortResult<Vec<DocumentInfo>> {
        let workspace = self.require_workspace()?;
        self.services
            .documents
            .list_documents(&self.token, workspace.id)
            .await
    }

    /// Builds a chat view over the current workspace.
    pub fn chat_view(&self, history_limit: usize) -> PortResult<ChatView> {
        let workspace = self.require_workspace()?;
        Ok(ChatView::new(
            self.services.chat.clone(),
            self.token.clone(),
            workspace.id,
            history_limit,
        ))
    }

    fn require_workspace(&self) -> PortResult<&Workspace> {
        self.current_workspace
            .as_ref()
            .ok_or_else(|| PortError::Unexpected("no workspace is open".to_string()))
    }
}
