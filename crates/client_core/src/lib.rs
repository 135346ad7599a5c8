use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{
    multipart::{Form, Part},
    Body, Client,
};
use serde::de::DeserializeOwned;
use shared::{
    domain::{GroupId, InventionId, ReviewId, SuggestionId},
    protocol::{
        ChatMessage, ChatMessageCreate, Comment, CommentCreate, Group, GroupCreate, Invention,
        InventionCreate, MentorshipRequest, MentorshipRequestCreate, ModelUploadResponse,
        PeerReview, PeerReviewSubmission, RatingRequest, Suggestion, SuggestionCreate, User,
        UserCreate, VoteRequest,
    },
};
use tracing::{debug, info};
use url::Url;

pub mod chat;
pub mod config;
pub mod error;
pub mod query;
pub mod upload;

pub use chat::GroupChatFeed;
pub use config::ClientSettings;
pub use error::{ClientError, Result};
pub use query::InventionFilters;
pub use upload::{ModelFile, ModelFormat, UploadRejection};

/// Every backend call the desktop client makes. One method per endpoint; no
/// retries and no client-side caching.
#[async_trait]
pub trait ApiHandle: Send + Sync {
    async fn list_inventions(&self, filters: &InventionFilters) -> Result<Vec<Invention>>;
    async fn list_public_inventions(&self) -> Result<Vec<Invention>>;
    async fn get_invention(&self, invention_id: &InventionId) -> Result<Invention>;
    async fn search_inventions(&self, query: &str) -> Result<Vec<Invention>>;
    async fn create_invention(&self, payload: &InventionCreate) -> Result<Invention>;
    async fn vote_invention(&self, invention_id: &InventionId, vote: &VoteRequest) -> Result<()>;
    async fn rate_invention(&self, invention_id: &InventionId, rating: &RatingRequest)
        -> Result<()>;
    async fn upload_model(
        &self,
        invention_id: &InventionId,
        model: &ModelFile,
    ) -> Result<ModelUploadResponse>;
    /// Stops reading once the asset is known to exceed `max_bytes`.
    async fn download_model(&self, model_file_path: &str, max_bytes: u64)
        -> Result<ModelDownload>;

    async fn list_comments(&self, invention_id: &InventionId) -> Result<Vec<Comment>>;
    async fn create_comment(&self, payload: &CommentCreate) -> Result<Comment>;
    async fn create_peer_review(&self, payload: &PeerReviewSubmission) -> Result<PeerReview>;
    async fn update_peer_review(
        &self,
        review_id: &ReviewId,
        payload: &PeerReviewSubmission,
    ) -> Result<PeerReview>;

    async fn list_groups(&self) -> Result<Vec<Group>>;
    async fn create_group(&self, payload: &GroupCreate) -> Result<Group>;
    async fn list_chat_messages(&self, group_id: &GroupId) -> Result<Vec<ChatMessage>>;
    async fn send_chat_message(&self, payload: &ChatMessageCreate) -> Result<ChatMessage>;
    async fn open_group_chat(&self, group_id: &GroupId) -> Result<GroupChatFeed>;

    async fn list_suggestions(&self) -> Result<Vec<Suggestion>>;
    async fn create_suggestion(&self, payload: &SuggestionCreate) -> Result<Suggestion>;
    async fn vote_suggestion(&self, suggestion_id: &SuggestionId) -> Result<()>;

    async fn list_users(&self) -> Result<Vec<User>>;
    async fn list_mentors(&self) -> Result<Vec<User>>;
    async fn create_user(&self, payload: &UserCreate) -> Result<User>;
    async fn create_mentorship_request(
        &self,
        payload: &MentorshipRequestCreate,
    ) -> Result<MentorshipRequest>;
}

/// Largest asset the desktop preview will fetch. Bigger uploads are
/// still listed and can be opened in an external viewer.
pub const MAX_PREVIEW_BYTES: u64 = 256 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelDownload {
    Complete(Vec<u8>),
    TooLarge { limit: u64 },
}

/// Resolves a stored model path to the backend's static `/uploads` mount.
///
/// The backend records the server-side filesystem path
/// (`/app/backend/uploads/<id>_<name>`); only the part after `uploads/` is
/// addressable over HTTP. Absolute URLs pass through unchanged.
pub fn model_asset_url(api_base: &str, model_file_path: &str) -> Result<String> {
    let trimmed = model_file_path.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Ok(trimmed.to_string());
    }

    let normalized = trimmed.replace('\\', "/");
    let relative = match normalized.rfind("uploads/") {
        Some(index) => &normalized[index + "uploads/".len()..],
        None => normalized.rsplit('/').next().unwrap_or_default(),
    };
    if relative.is_empty() {
        return Err(ClientError::InvalidUrl {
            url: model_file_path.to_string(),
            reason: "model path has no file name".to_string(),
        });
    }

    let origin = api_base.strip_suffix("/api").unwrap_or(api_base);
    let mut url = Url::parse(origin).map_err(|err| ClientError::InvalidUrl {
        url: origin.to_string(),
        reason: err.to_string(),
    })?;
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidUrl {
            url: origin.to_string(),
            reason: "backend url cannot carry a path".to_string(),
        })?
        .pop_if_empty()
        .push("uploads")
        .extend(relative.split('/').filter(|segment| !segment.is_empty()));
    Ok(url.to_string())
}

pub struct InventHubClient {
    http: Client,
    api_base: String,
}

impl InventHubClient {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        Self::with_api_base(settings.api_base()?)
    }

    /// `api_base` is the already-normalized `<backend>/api` prefix.
    pub fn with_api_base(api_base: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("inventhub-desktop/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_base: api_base.into(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn model_asset_url(&self, model_file_path: &str) -> Result<String> {
        model_asset_url(&self.api_base, model_file_path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http
            .get(format!("{}{path}", self.api_base))
            .send()
            .await?;
        Ok(error::check_response(response).await?.json().await?)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}{path}", self.api_base))
            .json(body)
            .send()
            .await?;
        Ok(error::check_response(response).await?.json().await?)
    }
}

#[async_trait]
impl ApiHandle for InventHubClient {
    async fn list_inventions(&self, filters: &InventionFilters) -> Result<Vec<Invention>> {
        let params = filters.to_query_pairs();
        debug!(params = ?params, "api: list_inventions");
        let response = self
            .http
            .get(format!("{}/inventions", self.api_base))
            .query(&params)
            .send()
            .await?;
        Ok(error::check_response(response).await?.json().await?)
    }

    async fn list_public_inventions(&self) -> Result<Vec<Invention>> {
        self.get_json("/inventions/public").await
    }

    async fn get_invention(&self, invention_id: &InventionId) -> Result<Invention> {
        self.get_json(&format!("/inventions/{invention_id}")).await
    }

    async fn search_inventions(&self, query: &str) -> Result<Vec<Invention>> {
        let response = self
            .http
            .get(format!("{}/inventions/search", self.api_base))
            .query(&[("q", query)])
            .send()
            .await?;
        Ok(error::check_response(response).await?.json().await?)
    }

    async fn create_invention(&self, payload: &InventionCreate) -> Result<Invention> {
        let created: Invention = self.post_json("/inventions", payload).await?;
        info!(invention_id = %created.id, "api: invention created");
        Ok(created)
    }

    async fn vote_invention(&self, invention_id: &InventionId, vote: &VoteRequest) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/inventions/{invention_id}/vote", self.api_base))
            .json(vote)
            .send()
            .await?;
        error::check_response(response).await?;
        Ok(())
    }

    async fn rate_invention(
        &self,
        invention_id: &InventionId,
        rating: &RatingRequest,
    ) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/inventions/{invention_id}/rate", self.api_base))
            .json(rating)
            .send()
            .await?;
        error::check_response(response).await?;
        Ok(())
    }

    async fn upload_model(
        &self,
        invention_id: &InventionId,
        model: &ModelFile,
    ) -> Result<ModelUploadResponse> {
        // Re-check right before streaming; the file may have changed since it was picked.
        let current = upload::inspect_model_file(&model.path)?;

        let file = tokio::fs::File::open(&current.path).await?;
        let part = Part::stream_with_length(Body::from(file), current.size_bytes)
            .file_name(current.file_name.clone())
            .mime_str(&current.mime_type)?;
        let form = Form::new().part("file", part);

        info!(
            invention_id = %invention_id,
            file_name = %current.file_name,
            size_bytes = current.size_bytes,
            "api: uploading model"
        );
        let response = self
            .http
            .post(format!("{}/inventions/{invention_id}/upload-model", self.api_base))
            .multipart(form)
            .send()
            .await?;
        Ok(error::check_response(response).await?.json().await?)
    }

    async fn download_model(
        &self,
        model_file_path: &str,
        max_bytes: u64,
    ) -> Result<ModelDownload> {
        let url = self.model_asset_url(model_file_path)?;
        let response = self.http.get(&url).send().await?;
        let response = error::check_response(response).await?;
        if let Some(size) = response.content_length().filter(|size| *size > max_bytes) {
            debug!(url = %url, size, "api: model too large for preview");
            return Ok(ModelDownload::TooLarge { limit: max_bytes });
        }

        // Chunked responses carry no length up front.
        let mut bytes = Vec::new();
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            if (bytes.len() + chunk.len()) as u64 > max_bytes {
                debug!(url = %url, read = bytes.len(), "api: model stream exceeded preview limit");
                return Ok(ModelDownload::TooLarge { limit: max_bytes });
            }
            bytes.extend_from_slice(&chunk);
        }
        debug!(url = %url, size = bytes.len(), "api: model downloaded");
        Ok(ModelDownload::Complete(bytes))
    }

    async fn list_comments(&self, invention_id: &InventionId) -> Result<Vec<Comment>> {
        self.get_json(&format!("/comments/{invention_id}")).await
    }

    async fn create_comment(&self, payload: &CommentCreate) -> Result<Comment> {
        self.post_json("/comments", payload).await
    }

    async fn create_peer_review(&self, payload: &PeerReviewSubmission) -> Result<PeerReview> {
        self.post_json("/peer-reviews", payload).await
    }

    async fn update_peer_review(
        &self,
        review_id: &ReviewId,
        payload: &PeerReviewSubmission,
    ) -> Result<PeerReview> {
        let response = self
            .http
            .put(format!("{}/peer-reviews/{review_id}", self.api_base))
            .json(payload)
            .send()
            .await?;
        Ok(error::check_response(response).await?.json().await?)
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        self.get_json("/groups").await
    }

    async fn create_group(&self, payload: &GroupCreate) -> Result<Group> {
        self.post_json("/groups", payload).await
    }

    async fn list_chat_messages(&self, group_id: &GroupId) -> Result<Vec<ChatMessage>> {
        self.get_json(&format!("/chat/messages/{group_id}")).await
    }

    async fn send_chat_message(&self, payload: &ChatMessageCreate) -> Result<ChatMessage> {
        self.post_json("/chat/messages", payload).await
    }

    async fn open_group_chat(&self, group_id: &GroupId) -> Result<GroupChatFeed> {
        chat::connect_group_chat(&self.api_base, group_id.clone()).await
    }

    async fn list_suggestions(&self) -> Result<Vec<Suggestion>> {
        self.get_json("/suggestions").await
    }

    async fn create_suggestion(&self, payload: &SuggestionCreate) -> Result<Suggestion> {
        self.post_json("/suggestions", payload).await
    }

    async fn vote_suggestion(&self, suggestion_id: &SuggestionId) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/suggestions/{suggestion_id}/vote", self.api_base))
            .send()
            .await?;
        error::check_response(response).await?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.get_json("/users").await
    }

    async fn list_mentors(&self) -> Result<Vec<User>> {
        let response = self
            .http
            .get(format!("{}/users", self.api_base))
            .query(&[("is_mentor", "true")])
            .send()
            .await?;
        Ok(error::check_response(response).await?.json().await?)
    }

    async fn create_user(&self, payload: &UserCreate) -> Result<User> {
        self.post_json("/users", payload).await
    }

    async fn create_mentorship_request(
        &self,
        payload: &MentorshipRequestCreate,
    ) -> Result<MentorshipRequest> {
        self.post_json("/mentorship-requests", payload).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
