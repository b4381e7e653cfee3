//! services/client/src/adapters/http.rs
//!
//! This module contains the HTTP adapter, which is the concrete implementation
//! of the backend service ports from the `studymate_core` crate. It handles all
//! interactions with the learning-assistant REST API using `reqwest`.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use studymate_core::domain::{
    AccessToken, ChatMessage, ChatTurn, DocumentInfo, User, Workspace,
};
use studymate_core::ports::{
    AuthService, ChatService, DocumentService, PortError, PortResult, WorkspaceService,
};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An HTTP adapter that implements every backend port.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    /// Creates a new `HttpBackend` against the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> PortResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| PortError::Unexpected(format!("invalid endpoint path '{path}': {e}")))
    }

    fn authed(&self, builder: RequestBuilder, token: &AccessToken) -> RequestBuilder {
        builder.bearer_auth(token.as_str())
    }

    /// Maps HTTP status codes onto port errors and extracts the backend's
    /// `detail` message when one is present.
    async fn check(response: Response) -> PortResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.detail)
            .unwrap_or_else(|_| format!("HTTP {status}"));

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(PortError::Unauthorized),
            StatusCode::NOT_FOUND => Err(PortError::NotFound(detail)),
            _ => Err(PortError::Unexpected(detail)),
        }
    }
}

fn transport_error(e: reqwest::Error) -> PortError {
    PortError::Unexpected(format!("transport error: {e}"))
}

//=========================================================================================
// Wire Record Structs
//=========================================================================================

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Deserialize)]
struct TokenRecord {
    access_token: String,
}

#[derive(Deserialize)]
struct WorkspaceListRecord {
    #[serde(default)]
    workspaces: Vec<Workspace>,
}

#[derive(Deserialize)]
struct DocumentListRecord {
    #[serde(default)]
    documents: Vec<DocumentInfo>,
}

#[derive(Deserialize)]
struct HistoryRecord {
    #[serde(default)]
    messages: Vec<ChatMessage>,
}

//=========================================================================================
// Port Implementations
//=========================================================================================

#[async_trait]
impl AuthService for HttpBackend {
    async fn signup(&self, email: &str, password: &str, full_name: &str) -> PortResult<User> {
        let response = self
            .client
            .post(self.url("/auth/signup")?)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "full_name": full_name,
            }))
            .send()
            .await
            .map_err(transport_error)?;
        Self::check(response).await?.json().await.map_err(transport_error)
    }

    async fn login(&self, email: &str, password: &str) -> PortResult<AccessToken> {
        // The token endpoint is form-encoded, with the email in the
        // `username` field.
        let response = self
            .client
            .post(self.url("/auth/token")?)
            .form(&[("username", email), ("password", password)])
            .send()
            .await
            .map_err(transport_error)?;
        let record: TokenRecord =
            Self::check(response).await?.json().await.map_err(transport_error)?;
        debug!("obtained access token");
        Ok(AccessToken(record.access_token))
    }

    async fn current_user(&self, token: &AccessToken) -> PortResult<User> {
        let response = self
            .authed(self.client.get(self.url("/auth/me")?), token)
            .send()
            .await
            .map_err(transport_error)?;
        Self::check(response).await?.json().await.map_err(transport_error)
    }
}

#[async_trait]
impl WorkspaceService for HttpBackend {
    async fn list_workspaces(&self, token: &AccessToken) -> PortResult<Vec<Workspace>> {
        let response = self
            .authed(self.client.get(self.url("/workspaces/")?), token)
            .send()
            .await
            .map_err(transport_error)?;
        let record: WorkspaceListRecord =
            Self::check(response).await?.json().await.map_err(transport_error)?;
        Ok(record.workspaces)
    }

    async fn create_workspace(
        &self,
        token: &AccessToken,
        name: &str,
        subject: &str,
    ) -> PortResult<Workspace> {
        let response = self
            .authed(self.client.post(self.url("/workspaces/")?), token)
            .json(&serde_json::json!({ "name": name, "subject": subject }))
            .send()
            .await
            .map_err(transport_error)?;
        Self::check(response).await?.json().await.map_err(transport_error)
    }

    async fn get_workspace(
        &self,
        token: &AccessToken,
        workspace_id: i64,
    ) -> PortResult<Workspace> {
        let response = self
            .authed(
                self.client.get(self.url(&format!("/workspaces/{workspace_id}"))?),
                token,
            )
            .send()
            .await
            .map_err(transport_error)?;
        Self::check(response).await?.json().await.map_err(transport_error)
    }
}

#[async_trait]
impl DocumentService for HttpBackend {
    async fn upload_document(
        &self,
        token: &AccessToken,
        workspace_id: i64,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> PortResult<DocumentInfo> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .authed(
                self.client.post(
                    self.url(&format!("/workspaces/{workspace_id}/documents/upload"))?,
                ),
                token,
            )
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        Self::check(response).await?.json().await.map_err(transport_error)
    }

    async fn list_documents(
        &self,
        token: &AccessToken,
        workspace_id: i64,
    ) -> PortResult<Vec<DocumentInfo>> {
        let response = self
            .authed(
                self.client
                    .get(self.url(&format!("/workspaces/{workspace_id}/documents"))?),
                token,
            )
            .send()
            .await
            .map_err(transport_error)?;
        let record: DocumentListRecord =
            Self::check(response).await?.json().await.map_err(transport_error)?;
        Ok(record.documents)
    }
}

#[async_trait]
impl ChatService for HttpBackend {
    async fn send_message(
        &self,
        token: &AccessToken,
        workspace_id: i64,
        message: &str,
    ) -> PortResult<ChatTurn> {
        let response = self
            .authed(self.client.post(self.url("/chat/")?), token)
            .json(&serde_json::json!({
                "workspace_id": workspace_id,
                "message": message,
                "web_search": false,
                "crag": true,
            }))
            .send()
            .await
            .map_err(transport_error)?;
        Self::check(response).await?.json().await.map_err(transport_error)
    }

    async fn history(
        &self,
        token: &AccessToken,
        workspace_id: i64,
        limit: usize,
    ) -> PortResult<Vec<ChatMessage>> {
        let mut url = self.url(&format!("/chat/history/{workspace_id}"))?;
        url.query_pairs_mut().append_pair("limit", &limit.to_string());

        let response = self
            .authed(self.client.get(url), token)
            .send()
            .await
            .map_err(transport_error)?;
        let record: HistoryRecord =
            Self::check(response).await?.json().await.map_err(transport_error)?;
        Ok(record.messages)
    }

    async fn clear_history(&self, token: &AccessToken, workspace_id: i64) -> PortResult<()> {
        let response = self
            .authed(
                self.client
                    .delete(self.url(&format!("/chat/history/{workspace_id}"))?),
                token,
            )
            .send()
            .await
            .map_err(transport_error)?;
        Self::check(response).await?;
        Ok(())
    }
}
