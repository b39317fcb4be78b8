use std::sync::Arc;

use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{
    dao::models::{ContentDraft, ContentKind, ContentPatch, ContentRecord},
    dto::{
        common::ApiResponse,
        content::ContentRecordDto,
        profile::{ProfileDto, RenameOwnerRequest, UpsertProfileRequest},
    },
};

use super::config::FacadeConfig;

/// Convenient result alias returning [`RemoteError`] failures.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failures that can occur while talking to the remote content store.
///
/// The façade does not distinguish between these: every variant is a
/// fallback trigger.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Required environment variable is missing.
    #[error("missing client environment variable `{var}`")]
    MissingEnvVar {
        /// Name of the missing variable.
        var: &'static str,
    },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build content store client")]
    ClientBuilder {
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent (unreachable host, timeout, …).
    #[error("failed to send request to `{path}`")]
    RequestSend {
        /// Request path relative to the base URL.
        path: String,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The store answered with a non-success status.
    #[error("unexpected response status {status} for `{path}`")]
    RequestStatus {
        /// Request path relative to the base URL.
        path: String,
        /// HTTP status received.
        status: StatusCode,
    },
    /// The response body could not be parsed into the envelope.
    #[error("failed to decode response for `{path}`")]
    DecodeResponse {
        /// Request path relative to the base URL.
        path: String,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The store reported `success: false` inside a 2xx response.
    #[error("store rejected request to `{path}`")]
    Rejected {
        /// Request path relative to the base URL.
        path: String,
    },
    /// A successful envelope arrived without the payload it promised.
    #[error("response for `{path}` carried no data")]
    MissingData {
        /// Request path relative to the base URL.
        path: String,
    },
    /// A record timestamp could not be parsed.
    #[error("invalid timestamp in response for `{path}`")]
    InvalidTimestamp {
        /// Request path relative to the base URL.
        path: String,
        /// Parse failure.
        #[source]
        source: time::error::Parse,
    },
}

/// HTTP client for the remote content store.
#[derive(Clone)]
pub struct RemoteContentStore {
    client: Client,
    base_url: Arc<str>,
}

impl RemoteContentStore {
    /// Build a client from the configuration.
    pub fn new(config: FacadeConfig) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| RemoteError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::<str>::from(config.base_url.trim_end_matches('/')),
        })
    }

    /// Send a request and unwrap the `{ success, data }` envelope.
    async fn send<T, B>(
        &self,
        method: Method,
        path: String,
        body: Option<&B>,
    ) -> RemoteResult<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}/{}", self.base_url, path);
        let mut builder = self.client.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| RemoteError::RequestSend {
                path: path.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::RequestStatus { path, status });
        }

        let envelope = response
            .json::<ApiResponse<T>>()
            .await
            .map_err(|source| RemoteError::DecodeResponse {
                path: path.clone(),
                source,
            })?;

        if !envelope.success {
            return Err(RemoteError::Rejected { path });
        }

        Ok(envelope.data)
    }

    fn content_path(owner: &str, kind: ContentKind) -> String {
        format!("user/{owner}/{}", kind.path_segment())
    }

    /// Fetch every record of `kind` owned by `owner`.
    pub async fn list_content(
        &self,
        owner: &str,
        kind: ContentKind,
    ) -> RemoteResult<Vec<ContentRecord>> {
        let path = Self::content_path(owner, kind);
        let dtos: Vec<ContentRecordDto> = self
            .send(Method::GET, path.clone(), None::<&()>)
            .await?
            .unwrap_or_default();

        dtos.into_iter()
            .map(|dto| {
                ContentRecord::try_from(dto).map_err(|source| RemoteError::InvalidTimestamp {
                    path: path.clone(),
                    source,
                })
            })
            .collect()
    }

    /// Create a record remotely; the store assigns the identifier.
    pub async fn create_content(
        &self,
        owner: &str,
        draft: &ContentDraft,
    ) -> RemoteResult<ContentRecord> {
        let path = Self::content_path(owner, draft.payload.kind());
        let dto: ContentRecordDto = self
            .send(Method::POST, path.clone(), Some(draft))
            .await?
            .ok_or_else(|| RemoteError::MissingData { path: path.clone() })?;

        ContentRecord::try_from(dto)
            .map_err(|source| RemoteError::InvalidTimestamp { path, source })
    }

    /// Apply a partial update to the record matching `id`.
    pub async fn update_content(
        &self,
        kind: ContentKind,
        id: &str,
        patch: &ContentPatch,
    ) -> RemoteResult<()> {
        let path = format!("{}/{id}", kind.path_segment());
        let _: Option<serde_json::Value> = self.send(Method::PUT, path, Some(patch)).await?;
        Ok(())
    }

    /// Delete the record matching `id`.
    pub async fn delete_content(
        &self,
        owner: &str,
        kind: ContentKind,
        id: &str,
    ) -> RemoteResult<()> {
        let path = format!("user/{owner}/{}/{id}", kind.path_segment());
        let _: Option<serde_json::Value> = self.send(Method::DELETE, path, None::<&()>).await?;
        Ok(())
    }

    /// Fetch the profile backing an owner identity.
    pub async fn fetch_profile(&self, username: &str) -> RemoteResult<ProfileDto> {
        let path = format!("user/{username}");
        self.send(Method::GET, path.clone(), None::<&()>)
            .await?
            .ok_or(RemoteError::MissingData { path })
    }

    /// Create or replace the profile backing an owner identity.
    pub async fn upsert_profile(
        &self,
        username: &str,
        request: &UpsertProfileRequest,
    ) -> RemoteResult<ProfileDto> {
        let path = format!("user/{username}");
        self.send(Method::POST, path.clone(), Some(request))
            .await?
            .ok_or(RemoteError::MissingData { path })
    }

    /// Rename an owner identity; the server cascades the new username
    /// across all owned content. Callers must re-issue any pending list
    /// under the new identity afterwards.
    pub async fn rename_owner(&self, old_username: &str, new_username: &str) -> RemoteResult<()> {
        let path = format!("user/{old_username}");
        let request = RenameOwnerRequest {
            new_username: new_username.to_owned(),
        };
        let _: Option<serde_json::Value> = self.send(Method::PUT, path, Some(&request)).await?;
        Ok(())
    }

    /// Delete an owner identity and everything it owns.
    pub async fn delete_owner(&self, username: &str) -> RemoteResult<()> {
        let path = format!("user/{username}");
        let _: Option<serde_json::Value> = self.send(Method::DELETE, path, None::<&()>).await?;
        Ok(())
    }
}
