//! UI/backend events and error modeling for desktop GUI controller.

use std::sync::Arc;

use client_core::ClientError;
use shared::{
    domain::{GroupId, InventionId},
    error::ErrorCode,
    protocol::{
        ChatMessage, Comment, Group, Invention, MentorshipRequest, ModelUploadResponse,
        PeerReview, Suggestion, User,
    },
};

use crate::media::TriangleMesh;

/// Which invention list a load result replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// Unfiltered listing: both the full and the displayed list.
    All,
    /// Filter or search result: only the displayed list.
    Filtered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateForm {
    Invention,
    Group,
    Suggestion,
    UserProfile,
    MentorshipRequest,
}

impl CreateForm {
    pub fn label(self) -> &'static str {
        match self {
            CreateForm::Invention => "invention",
            CreateForm::Group => "group",
            CreateForm::Suggestion => "suggestion",
            CreateForm::UserProfile => "profile",
            CreateForm::MentorshipRequest => "mentorship request",
        }
    }
}

/// One fetch of an invention's model. The backend stores re-uploads under
/// the same path, so `revision` moves on every accepted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelKey {
    pub invention_id: InventionId,
    pub model_file_path: String,
    pub revision: u32,
}

#[derive(Debug, Clone)]
pub enum Created {
    Invention(Invention),
    Group(Group),
    Suggestion(Suggestion),
    User(User),
    MentorshipRequest(MentorshipRequest),
}

impl Created {
    pub fn form(&self) -> CreateForm {
        match self {
            Created::Invention(_) => CreateForm::Invention,
            Created::Group(_) => CreateForm::Group,
            Created::Suggestion(_) => CreateForm::Suggestion,
            Created::User(_) => CreateForm::UserProfile,
            Created::MentorshipRequest(_) => CreateForm::MentorshipRequest,
        }
    }
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    Info(String),
    Error(UiError),

    InventionsLoaded {
        scope: ListScope,
        inventions: Vec<Invention>,
    },
    InventionRefreshed(Invention),
    GroupsLoaded(Vec<Group>),
    SuggestionsLoaded(Vec<Suggestion>),
    UsersLoaded(Vec<User>),
    MentorsLoaded(Vec<User>),
    Created(Created),

    InventionVoted {
        invention_id: InventionId,
    },
    InventionRated {
        invention_id: InventionId,
    },
    ModelUploaded {
        invention_id: InventionId,
        response: ModelUploadResponse,
    },
    ModelLoaded {
        key: ModelKey,
        mesh: Arc<TriangleMesh>,
    },
    ModelTooLarge {
        key: ModelKey,
        limit: u64,
    },
    ModelFailed {
        key: ModelKey,
        error: UiError,
    },

    CommentsLoaded {
        invention_id: InventionId,
        comments: Vec<Comment>,
    },
    CommentPosted {
        invention_id: InventionId,
    },
    PeerReviewSaved(PeerReview),
    SuggestionVoted,

    ChatHistoryLoaded {
        group_id: GroupId,
        messages: Vec<ChatMessage>,
    },
    ChatMessageReceived(ChatMessage),
    ChatMessageSent(ChatMessage),
    ChatClosed {
        group_id: GroupId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    NotFound,
    Server,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    Startup,
    InitialLoad,
    Create(CreateForm),
    Upload,
    Mentorship,
    Comment,
    Review,
    Widget,
    Chat,
    Viewer,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    /// Best-effort classification for failures that only exist as text.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("not found") || message_lower.contains("404") {
            UiErrorCategory::NotFound
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("required")
            || message_lower.contains("not supported")
            || message_lower.contains("too large")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("dns")
            || message_lower.contains("websocket")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("internal server error") {
            UiErrorCategory::Server
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_client_error(context: UiErrorContext, err: &ClientError, fallback: &str) -> Self {
        let category = match err {
            ClientError::Http(_) | ClientError::WebSocket(_) => UiErrorCategory::Transport,
            ClientError::Api { .. } => match err.code() {
                Some(ErrorCode::NotFound) => UiErrorCategory::NotFound,
                Some(ErrorCode::Validation) | Some(ErrorCode::PayloadTooLarge) => {
                    UiErrorCategory::Validation
                }
                Some(ErrorCode::Internal) => UiErrorCategory::Server,
                _ => UiErrorCategory::Unknown,
            },
            ClientError::Upload(_) | ClientError::InvalidUrl { .. } => UiErrorCategory::Validation,
            ClientError::Io(_) => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            message: err.user_message(fallback),
        }
    }

    /// Only upload and mentorship-request failures interrupt the user.
    pub fn raises_alert(&self) -> bool {
        matches!(
            self.context,
            UiErrorContext::Upload | UiErrorContext::Mentorship
        )
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn category_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Network",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::NotFound => "Not found",
        UiErrorCategory::Server => "Server",
        UiErrorCategory::Unknown => "Unexpected",
    }
}
