//! Backend commands queued from UI to backend worker.

use client_core::{InventionFilters, ModelFile};
use shared::{
    domain::{GroupId, InventionId, ReviewId, SuggestionId},
    protocol::{
        ChatMessageCreate, CommentCreate, GroupCreate, InventionCreate, MentorshipRequestCreate,
        PeerReviewSubmission, RatingRequest, SuggestionCreate, UserCreate, VoteRequest,
    },
};

use crate::controller::events::ModelKey;

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    LoadInventions {
        filters: InventionFilters,
    },
    LoadPublicInventions,
    SearchInventions {
        query: String,
    },
    RefreshInvention {
        invention_id: InventionId,
    },
    LoadGroups,
    LoadSuggestions,
    LoadUsers,
    LoadMentors,

    CreateInvention(InventionCreate),
    CreateGroup(GroupCreate),
    CreateSuggestion(SuggestionCreate),
    CreateUser(UserCreate),
    RequestMentorship(MentorshipRequestCreate),

    VoteInvention {
        invention_id: InventionId,
        vote: VoteRequest,
    },
    RateInvention {
        invention_id: InventionId,
        rating: RatingRequest,
    },
    UploadModel {
        invention_id: InventionId,
        model: ModelFile,
    },
    LoadModel(ModelKey),

    LoadComments {
        invention_id: InventionId,
    },
    PostComment(CommentCreate),
    /// `review_id` is set once the form has been saved, turning later submits into updates.
    SubmitPeerReview {
        review_id: Option<ReviewId>,
        submission: PeerReviewSubmission,
    },
    VoteSuggestion {
        suggestion_id: SuggestionId,
    },

    OpenGroupChat {
        group_id: GroupId,
    },
    CloseGroupChat,
    SendChatMessage(ChatMessageCreate),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadInventions { .. } => "load_inventions",
            BackendCommand::LoadPublicInventions => "load_public_inventions",
            BackendCommand::SearchInventions { .. } => "search_inventions",
            BackendCommand::RefreshInvention { .. } => "refresh_invention",
            BackendCommand::LoadGroups => "load_groups",
            BackendCommand::LoadSuggestions => "load_suggestions",
            BackendCommand::LoadUsers => "load_users",
            BackendCommand::LoadMentors => "load_mentors",
            BackendCommand::CreateInvention(_) => "create_invention",
            BackendCommand::CreateGroup(_) => "create_group",
            BackendCommand::CreateSuggestion(_) => "create_suggestion",
            BackendCommand::CreateUser(_) => "create_user",
            BackendCommand::RequestMentorship(_) => "request_mentorship",
            BackendCommand::VoteInvention { .. } => "vote_invention",
            BackendCommand::RateInvention { .. } => "rate_invention",
            BackendCommand::UploadModel { .. } => "upload_model",
            BackendCommand::LoadModel(_) => "load_model",
            BackendCommand::LoadComments { .. } => "load_comments",
            BackendCommand::PostComment(_) => "post_comment",
            BackendCommand::SubmitPeerReview { .. } => "submit_peer_review",
            BackendCommand::VoteSuggestion { .. } => "vote_suggestion",
            BackendCommand::OpenGroupChat { .. } => "open_group_chat",
            BackendCommand::CloseGroupChat => "close_group_chat",
            BackendCommand::SendChatMessage(_) => "send_chat_message",
        }
    }
}
